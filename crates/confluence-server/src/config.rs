//! Server configuration from environment variables.

use std::{env, fmt::Display, str::FromStr};

use confluence_db::DbConfig;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub db: DbConfig,
    pub admin_username: String,
    pub admin_password: String,
    pub session_lifetime_secs: u64,
    pub password_pepper: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("CONFLUENCE_PORT", "8080"),
            db: DbConfig {
                endpoint: try_load("CONFLUENCE_DB_URL", "127.0.0.1:8000"),
                namespace: try_load("CONFLUENCE_DB_NS", "confluence"),
                database: try_load("CONFLUENCE_DB_NAME", "main"),
                username: try_load("CONFLUENCE_DB_USER", "root"),
                password: try_load("CONFLUENCE_DB_PASS", "root"),
            },
            admin_username: try_load("CONFLUENCE_ADMIN_USER", "admin"),
            admin_password: try_load("CONFLUENCE_ADMIN_PASS", "confluence2024"),
            session_lifetime_secs: try_load("CONFLUENCE_SESSION_LIFETIME_SECS", "604800"),
            password_pepper: env::var("CONFLUENCE_PASSWORD_PEPPER").ok(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
