//! Database-specific error types and conversions.

use confluence_core::error::ConfluenceError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl From<DbError> for ConfluenceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ConfluenceError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => ConfluenceError::AlreadyExists { entity },
            DbError::InvalidTransition { from, to } => {
                ConfluenceError::InvalidTransition { from, to }
            }
            other => ConfluenceError::Database(other.to_string()),
        }
    }
}
