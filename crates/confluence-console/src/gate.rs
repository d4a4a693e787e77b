//! Admin access gate.
//!
//! Admin access is a server-issued opaque session token obtained with
//! configured credentials; every console operation presents the token.
//! Admin sessions are not tied to an identity.

use chrono::{DateTime, Duration, Utc};
use confluence_auth::error::AuthError;
use confluence_auth::token;
use confluence_core::error::{ConfluenceError, ConfluenceResult};
use confluence_core::models::session::{CreateSession, SessionKind};
use confluence_core::repository::SessionRepository;

/// Configured admin credentials.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// An issued admin session token.
#[derive(Debug, Clone)]
pub struct AdminToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates admin session tokens.
#[derive(Clone)]
pub struct AdminGate<S: SessionRepository + Clone> {
    sessions: S,
    credentials: AdminCredentials,
    session_lifetime_secs: u64,
}

impl<S: SessionRepository + Clone> AdminGate<S> {
    pub fn new(sessions: S, credentials: AdminCredentials, session_lifetime_secs: u64) -> Self {
        Self {
            sessions,
            credentials,
            session_lifetime_secs,
        }
    }

    /// Check the credentials and open an admin session.
    pub async fn login(&self, username: &str, password: &str) -> ConfluenceResult<AdminToken> {
        if username != self.credentials.username || password != self.credentials.password {
            tracing::warn!("rejected admin login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let raw_token = token::generate_session_token();
        let expires_at = Utc::now() + Duration::seconds(self.session_lifetime_secs as i64);

        self.sessions
            .create(CreateSession {
                kind: SessionKind::Admin,
                identity_id: None,
                token_hash: token::hash_session_token(&raw_token),
                expires_at,
            })
            .await?;

        tracing::info!("admin session opened");
        Ok(AdminToken {
            token: raw_token,
            expires_at,
        })
    }

    /// Validate a raw admin token. Expired sessions are invalidated on
    /// sight; applicant tokens grant no admin access.
    pub async fn validate(&self, raw_token: &str) -> ConfluenceResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .sessions
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                ConfluenceError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;

        if session.kind != SessionKind::Admin {
            return Err(AuthError::SessionInvalid.into());
        }

        if session.expires_at <= Utc::now() {
            self.sessions.invalidate(session.id).await?;
            return Err(AuthError::SessionExpired.into());
        }

        Ok(())
    }
}
