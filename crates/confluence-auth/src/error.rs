//! Authentication error types.

use confluence_core::error::ConfluenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    EmailTaken,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("federated sign-in failed: {0}")]
    Federated(String),

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session token")]
    SessionInvalid,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for ConfluenceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => ConfluenceError::Crypto(msg),
            AuthError::EmailTaken => ConfluenceError::AlreadyExists {
                entity: "identity".into(),
            },
            other => ConfluenceError::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}
