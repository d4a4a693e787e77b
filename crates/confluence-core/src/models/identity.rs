//! Identity domain model.
//!
//! Identities are issued by the authentication layer. This system
//! never mutates an identity after creation; it only reads the unique
//! id to scope application queries and writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    Password,
    Federated,
    Anonymous,
}

impl IdentityProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Federated => "federated",
            Self::Anonymous => "anonymous",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "password" => Some(Self::Password),
            "federated" => Some(Self::Federated),
            "anonymous" => Some(Self::Anonymous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub provider: IdentityProvider,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateIdentity {
    pub provider: IdentityProvider,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    /// Argon2id PHC hash. Only present for password accounts.
    pub password_hash: Option<String>,
}

/// Identity-change notification delivered to subscribers.
#[derive(Debug, Clone)]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}
