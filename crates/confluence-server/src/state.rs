//! Shared application state.

use std::sync::Arc;

use confluence_apply::dashboard::Dashboard;
use confluence_auth::config::AuthConfig;
use confluence_auth::service::IdentityService;
use confluence_console::gate::{AdminCredentials, AdminGate};
use confluence_db::repository::{
    SurrealApplicationRepository, SurrealIdentityRepository, SurrealSessionRepository,
};
use confluence_core::error::ConfluenceResult;
use confluence_db::DbManager;
use surrealdb::engine::remote::ws::Client;

use crate::config::Config;

pub struct AppState {
    pub auth: IdentityService<SurrealIdentityRepository<Client>, SurrealSessionRepository<Client>>,
    pub applications: SurrealApplicationRepository<Client>,
    pub dashboard: Dashboard<SurrealApplicationRepository<Client>>,
    pub gate: AdminGate<SurrealSessionRepository<Client>>,
}

impl AppState {
    pub async fn new(config: &Config) -> ConfluenceResult<Arc<Self>> {
        let manager = DbManager::init(&config.db).await?;

        let db = manager.client().clone();
        let identities = SurrealIdentityRepository::new(db.clone());
        let sessions = SurrealSessionRepository::new(db.clone());
        let applications = SurrealApplicationRepository::new(db);

        let auth = IdentityService::new(
            identities,
            sessions.clone(),
            AuthConfig {
                session_lifetime_secs: config.session_lifetime_secs,
                pepper: config.password_pepper.clone(),
                ..AuthConfig::default()
            },
        );

        let gate = AdminGate::new(
            sessions,
            AdminCredentials {
                username: config.admin_username.clone(),
                password: config.admin_password.clone(),
            },
            config.session_lifetime_secs,
        );

        Ok(Arc::new(Self {
            auth,
            dashboard: Dashboard::new(applications.clone()),
            applications,
            gate,
        }))
    }
}
