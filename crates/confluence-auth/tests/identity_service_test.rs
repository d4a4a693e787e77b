//! Integration tests for the identity service.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, Utc};
use confluence_auth::config::AuthConfig;
use confluence_auth::federated::{FederatedProfile, FederatedProvider};
use confluence_auth::service::IdentityService;
use confluence_core::error::ConfluenceError;
use confluence_core::models::identity::{IdentityEvent, IdentityProvider};
use confluence_core::models::session::{CreateSession, SessionKind};
use confluence_core::repository::SessionRepository;
use confluence_db::repository::{SurrealIdentityRepository, SurrealSessionRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type MemDb = surrealdb::engine::local::Db;
type Service = IdentityService<SurrealIdentityRepository<MemDb>, SurrealSessionRepository<MemDb>>;

fn test_config() -> AuthConfig {
    AuthConfig {
        min_password_length: 6,
        session_lifetime_secs: 3_600,
        pepper: None,
    }
}

/// Spin up an in-memory DB, run migrations, build the service.
async fn setup() -> (Service, SurrealSessionRepository<MemDb>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    confluence_db::run_migrations(&db).await.unwrap();

    let identity_repo = SurrealIdentityRepository::new(db.clone());
    let session_repo = SurrealSessionRepository::new(db.clone());
    let svc = IdentityService::new(identity_repo, session_repo.clone(), test_config());
    (svc, session_repo)
}

/// Federated provider stub with canned popup/redirect outcomes.
struct StubProvider {
    popup: Result<FederatedProfile, String>,
    redirect: Result<FederatedProfile, String>,
    redirect_calls: AtomicUsize,
}

impl StubProvider {
    fn new(
        popup: Result<FederatedProfile, String>,
        redirect: Result<FederatedProfile, String>,
    ) -> Self {
        Self {
            popup,
            redirect,
            redirect_calls: AtomicUsize::new(0),
        }
    }
}

impl FederatedProvider for StubProvider {
    async fn sign_in_popup(&self) -> Result<FederatedProfile, String> {
        self.popup.clone()
    }

    async fn sign_in_redirect(&self) -> Result<FederatedProfile, String> {
        self.redirect_calls.fetch_add(1, Ordering::SeqCst);
        self.redirect.clone()
    }
}

fn asha_profile() -> FederatedProfile {
    FederatedProfile {
        email: "asha@x.com".into(),
        display_name: Some("Asha Rao".into()),
        avatar_url: None,
    }
}

const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0";
const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

#[tokio::test]
async fn password_sign_up_then_sign_in() {
    let (svc, _sessions) = setup().await;

    let signed_up = svc
        .sign_up_with_password("alice@example.com", "hunter2!", Some("Alice".into()))
        .await
        .unwrap();
    assert_eq!(signed_up.identity.provider, IdentityProvider::Password);
    assert_eq!(signed_up.identity.email.as_deref(), Some("alice@example.com"));

    let signed_in = svc
        .sign_in_with_password("alice@example.com", "hunter2!")
        .await
        .unwrap();
    assert_eq!(signed_in.identity.id, signed_up.identity.id);
    // Each sign-in issues a fresh token.
    assert_ne!(signed_in.session_token, signed_up.session_token);

    let me = svc.authenticate(&signed_in.session_token).await.unwrap();
    assert_eq!(me.id, signed_up.identity.id);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (svc, _sessions) = setup().await;

    let err = svc
        .sign_up_with_password("bob@example.com", "12345", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn duplicate_email_cannot_sign_up_twice() {
    let (svc, _sessions) = setup().await;

    svc.sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();
    let err = svc
        .sign_up_with_password("alice@example.com", "other-pass", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::AlreadyExists { .. }));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let (svc, _sessions) = setup().await;

    svc.sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();

    let wrong = svc
        .sign_in_with_password("alice@example.com", "nope")
        .await
        .unwrap_err();
    let unknown = svc
        .sign_in_with_password("nobody@example.com", "hunter2!")
        .await
        .unwrap_err();

    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn federated_popup_happy_path_reuses_identity() {
    let (svc, _sessions) = setup().await;
    let provider = StubProvider::new(Ok(asha_profile()), Err("unused".into()));

    let first = svc.sign_in_federated(&provider, DESKTOP_UA).await.unwrap();
    assert_eq!(first.identity.provider, IdentityProvider::Federated);
    assert_eq!(first.identity.display_name.as_deref(), Some("Asha Rao"));

    let second = svc.sign_in_federated(&provider, DESKTOP_UA).await.unwrap();
    assert_eq!(second.identity.id, first.identity.id);
    assert_eq!(provider.redirect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blocked_popup_on_mobile_falls_back_to_redirect() {
    let (svc, _sessions) = setup().await;
    let provider = StubProvider::new(Err("auth/popup-blocked".into()), Ok(asha_profile()));

    let out = svc.sign_in_federated(&provider, MOBILE_UA).await.unwrap();
    assert_eq!(out.identity.email.as_deref(), Some("asha@x.com"));
    assert_eq!(provider.redirect_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blocked_popup_on_desktop_is_not_retried() {
    let (svc, _sessions) = setup().await;
    let provider = StubProvider::new(Err("auth/popup-blocked".into()), Ok(asha_profile()));

    let err = svc
        .sign_in_federated(&provider, DESKTOP_UA)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
    assert_eq!(provider.redirect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_popup_provider_error_is_not_retried_even_on_mobile() {
    let (svc, _sessions) = setup().await;
    let provider = StubProvider::new(Err("account disabled".into()), Ok(asha_profile()));

    let err = svc
        .sign_in_federated(&provider, MOBILE_UA)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
    assert_eq!(provider.redirect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn anonymous_sign_in_has_no_email_or_credentials() {
    let (svc, _sessions) = setup().await;

    let out = svc.sign_in_anonymous().await.unwrap();
    assert_eq!(out.identity.provider, IdentityProvider::Anonymous);
    assert!(out.identity.email.is_none());

    let me = svc.authenticate(&out.session_token).await.unwrap();
    assert_eq!(me.id, out.identity.id);
}

#[tokio::test]
async fn sign_out_invalidates_the_session() {
    let (svc, _sessions) = setup().await;

    let out = svc
        .sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();
    svc.sign_out(&out.session_token).await.unwrap();

    let err = svc.authenticate(&out.session_token).await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));

    // Signing out again is a no-op, not an error.
    svc.sign_out(&out.session_token).await.unwrap();
}

#[tokio::test]
async fn expired_session_is_rejected_and_removed() {
    let (svc, sessions) = setup().await;

    let out = svc
        .sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();

    // Plant a session that has already expired.
    let stale = sessions
        .create(CreateSession {
            kind: SessionKind::Applicant,
            identity_id: Some(out.identity.id),
            token_hash: confluence_auth::token::hash_session_token("stale-token"),
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();

    let err = svc.authenticate("stale-token").await.unwrap_err();
    assert!(err.to_string().contains("expired"), "got: {err}");

    // The expired session was invalidated on sight.
    let gone = sessions.get_by_token_hash(&stale.token_hash).await;
    assert!(gone.is_err());
}

#[tokio::test]
async fn admin_session_grants_no_applicant_access() {
    let (svc, sessions) = setup().await;

    sessions
        .create(CreateSession {
            kind: SessionKind::Admin,
            identity_id: None,
            token_hash: confluence_auth::token::hash_session_token("admin-token"),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();

    let err = svc.authenticate("admin-token").await.unwrap_err();
    assert!(matches!(err, ConfluenceError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn sign_in_and_sign_out_are_broadcast() {
    let (svc, _sessions) = setup().await;
    let mut events = svc.subscribe();

    let out = svc
        .sign_up_with_password("alice@example.com", "hunter2!", None)
        .await
        .unwrap();

    match events.recv().await.unwrap() {
        IdentityEvent::SignedIn(identity) => assert_eq!(identity.id, out.identity.id),
        other => panic!("expected SignedIn, got {other:?}"),
    }

    svc.sign_out(&out.session_token).await.unwrap();
    assert!(matches!(
        events.recv().await.unwrap(),
        IdentityEvent::SignedOut
    ));
}
