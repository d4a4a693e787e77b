//! Integration tests for the admin gate.

use chrono::{Duration, Utc};
use confluence_auth::config::AuthConfig;
use confluence_auth::service::IdentityService;
use confluence_console::gate::{AdminCredentials, AdminGate};
use confluence_core::error::ConfluenceError;
use confluence_core::models::session::{CreateSession, SessionKind};
use confluence_core::repository::SessionRepository;
use confluence_db::repository::{SurrealIdentityRepository, SurrealSessionRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type MemDb = surrealdb::engine::local::Db;

async fn setup() -> (AdminGate<SurrealSessionRepository<MemDb>>, Surreal<MemDb>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    confluence_db::run_migrations(&db).await.unwrap();

    let gate = AdminGate::new(
        SurrealSessionRepository::new(db.clone()),
        AdminCredentials {
            username: "admin".into(),
            password: "letmein-123".into(),
        },
        3_600,
    );
    (gate, db)
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let (gate, _db) = setup().await;

    let err = gate.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));

    let err = gate.login("root", "letmein-123").await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn issued_token_validates_until_it_expires() {
    let (gate, _db) = setup().await;

    let issued = gate.login("admin", "letmein-123").await.unwrap();
    assert!(issued.expires_at > Utc::now());
    gate.validate(&issued.token).await.unwrap();

    // Garbage tokens never validate.
    let err = gate.validate("not-a-token").await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn applicant_session_grants_no_admin_access() {
    let (gate, db) = setup().await;

    let auth = IdentityService::new(
        SurrealIdentityRepository::new(db.clone()),
        SurrealSessionRepository::new(db.clone()),
        AuthConfig::default(),
    );
    let out = auth
        .sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();

    let err = gate.validate(&out.session_token).await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn expired_admin_session_is_invalidated_on_sight() {
    let (gate, db) = setup().await;
    let sessions = SurrealSessionRepository::new(db);

    sessions
        .create(CreateSession {
            kind: SessionKind::Admin,
            identity_id: None,
            token_hash: confluence_auth::token::hash_session_token("stale-admin"),
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    let err = gate.validate("stale-admin").await.unwrap_err();
    assert!(err.to_string().contains("expired"), "got: {err}");

    // A second attempt finds no session at all.
    let err = gate.validate("stale-admin").await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}
