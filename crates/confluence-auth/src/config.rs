//! Authentication configuration.

/// Configuration for the identity service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Minimum password length for new accounts (default: 6).
    pub min_password_length: usize,
    /// Session lifetime in seconds (default: 604_800 = 7 days).
    pub session_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            session_lifetime_secs: 604_800,
            pepper: None,
        }
    }
}
