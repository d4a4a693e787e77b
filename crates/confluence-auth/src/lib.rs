//! Confluence Auth — identity issuance and session management.
//!
//! Covers the identity contract the application flow consumes:
//! password sign-up/sign-in, federated sign-in with a mobile redirect
//! fallback, anonymous sign-in, sign-out, opaque session tokens, and
//! identity-change notifications.

pub mod config;
pub mod error;
pub mod events;
pub mod federated;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use federated::{FederatedProfile, FederatedProvider};
pub use service::{AuthOutput, IdentityService};
