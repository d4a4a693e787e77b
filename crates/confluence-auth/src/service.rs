//! Identity service — sign-up, sign-in, and sign-out orchestration.

use chrono::{DateTime, Duration, Utc};
use confluence_core::error::{ConfluenceError, ConfluenceResult};
use confluence_core::models::identity::{CreateIdentity, Identity, IdentityEvent, IdentityProvider};
use confluence_core::models::session::{CreateSession, SessionKind};
use confluence_core::repository::{IdentityRepository, SessionRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::events::IdentityEvents;
use crate::federated::{self, FederatedProfile, FederatedProvider};
use crate::password;
use crate::token;

/// Successful sign-in result.
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub identity: Identity,
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
#[derive(Clone)]
pub struct IdentityService<I: IdentityRepository, S: SessionRepository> {
    identity_repo: I,
    session_repo: S,
    config: AuthConfig,
    events: IdentityEvents,
}

impl<I, S> IdentityService<I, S>
where
    I: IdentityRepository + Clone,
    S: SessionRepository + Clone,
{
    pub fn new(identity_repo: I, session_repo: S, config: AuthConfig) -> Self {
        Self {
            identity_repo,
            session_repo,
            config,
            events: IdentityEvents::default(),
        }
    }

    /// Subscribe to identity-change notifications. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }

    /// Create a password account and sign it in.
    pub async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> ConfluenceResult<AuthOutput> {
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::WeakPassword {
                min: self.config.min_password_length,
            }
            .into());
        }

        let hash = password::hash_password(password, self.config.pepper.as_deref())?;

        let identity = self
            .identity_repo
            .create(CreateIdentity {
                provider: IdentityProvider::Password,
                display_name,
                email: Some(email.to_string()),
                avatar_url: None,
                password_hash: Some(hash),
            })
            .await
            .map_err(|e| match e {
                ConfluenceError::AlreadyExists { .. } => AuthError::EmailTaken.into(),
                other => other,
            })?;

        tracing::info!(identity_id = %identity.id, "password account created");
        self.open_session(identity).await
    }

    /// Authenticate a password account.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ConfluenceResult<AuthOutput> {
        let identity = self
            .identity_repo
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Federated and anonymous accounts carry no hash; reject them
        // the same way as a wrong password.
        let hash = self
            .identity_repo
            .password_hash(identity.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = password::verify_password(password, &hash, self.config.pepper.as_deref())?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.open_session(identity).await
    }

    /// Federated sign-in via the popup flow, falling back to the
    /// redirect flow on mobile browsers where the popup was blocked,
    /// dismissed, or unsupported.
    pub async fn sign_in_federated<P: FederatedProvider>(
        &self,
        provider: &P,
        user_agent: &str,
    ) -> ConfluenceResult<AuthOutput> {
        let profile = match provider.sign_in_popup().await {
            Ok(profile) => profile,
            Err(msg)
                if federated::is_mobile_user_agent(user_agent)
                    && federated::is_popup_failure(&msg) =>
            {
                tracing::info!("popup sign-in failed on mobile, retrying via redirect");
                provider
                    .sign_in_redirect()
                    .await
                    .map_err(AuthError::Federated)?
            }
            Err(msg) => return Err(AuthError::Federated(msg).into()),
        };

        let identity = self.resolve_federated(profile).await?;
        self.open_session(identity).await
    }

    /// Federated sign-in using the redirect flow directly.
    pub async fn sign_in_federated_redirect<P: FederatedProvider>(
        &self,
        provider: &P,
    ) -> ConfluenceResult<AuthOutput> {
        let profile = provider
            .sign_in_redirect()
            .await
            .map_err(AuthError::Federated)?;
        let identity = self.resolve_federated(profile).await?;
        self.open_session(identity).await
    }

    /// Create a throwaway identity with no credentials and sign it in.
    pub async fn sign_in_anonymous(&self) -> ConfluenceResult<AuthOutput> {
        let identity = self
            .identity_repo
            .create(CreateIdentity {
                provider: IdentityProvider::Anonymous,
                display_name: None,
                email: None,
                avatar_url: None,
                password_hash: None,
            })
            .await?;

        self.open_session(identity).await
    }

    /// Invalidate the session behind a raw token. Idempotent: a token
    /// with no live session still results in a signed-out notification.
    pub async fn sign_out(&self, raw_token: &str) -> ConfluenceResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => self.session_repo.invalidate(session.id).await?,
            Err(ConfluenceError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        self.events.emit(IdentityEvent::SignedOut);
        Ok(())
    }

    /// Resolve a raw session token to its identity.
    ///
    /// Expired sessions are invalidated on sight. Admin sessions are
    /// rejected here; they grant no applicant-surface access.
    pub async fn authenticate(&self, raw_token: &str) -> ConfluenceResult<Identity> {
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                ConfluenceError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            self.session_repo.invalidate(session.id).await?;
            return Err(AuthError::SessionExpired.into());
        }

        let identity_id = match (session.kind, session.identity_id) {
            (SessionKind::Applicant, Some(id)) => id,
            _ => return Err(AuthError::SessionInvalid.into()),
        };

        self.identity_repo.get_by_id(identity_id).await
    }

    /// Reuse the identity registered for a federated email, or create
    /// one on first sign-in.
    async fn resolve_federated(&self, profile: FederatedProfile) -> ConfluenceResult<Identity> {
        if let Some(existing) = self.identity_repo.get_by_email(&profile.email).await? {
            return Ok(existing);
        }

        let identity = self
            .identity_repo
            .create(CreateIdentity {
                provider: IdentityProvider::Federated,
                display_name: profile.display_name,
                email: Some(profile.email),
                avatar_url: profile.avatar_url,
                password_hash: None,
            })
            .await?;

        tracing::info!(identity_id = %identity.id, "federated account created");
        Ok(identity)
    }

    async fn open_session(&self, identity: Identity) -> ConfluenceResult<AuthOutput> {
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        self.session_repo
            .create(CreateSession {
                kind: SessionKind::Applicant,
                identity_id: Some(identity.id),
                token_hash,
                expires_at,
            })
            .await?;

        self.events.emit(IdentityEvent::SignedIn(identity.clone()));

        Ok(AuthOutput {
            identity,
            session_token: raw_token,
            expires_at,
        })
    }
}
