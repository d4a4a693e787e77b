//! Connection handling for the application document store.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::schema::run_migrations;

/// Where and how to reach the store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket endpoint as `host:port`.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8000".into(),
            namespace: "confluence".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// A live store connection with the schema brought up to date.
///
/// Cloning is cheap; the underlying client is shared.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open the WebSocket connection, authenticate, select the
    /// namespace and database, and apply any pending migrations.
    pub async fn init(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            endpoint = %config.endpoint,
            namespace = %config.namespace,
            database = %config.database,
            "connecting to document store"
        );

        let db = Surreal::new::<Ws>(&config.endpoint).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        run_migrations(&db).await?;

        info!("document store ready");
        Ok(Self { db })
    }

    /// The underlying client, for building repositories.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
