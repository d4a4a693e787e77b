//! Submission flow error types.

use confluence_core::error::ConfluenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{operation} is not available in the current step")]
    WrongState { operation: &'static str },
}

impl From<FlowError> for ConfluenceError {
    fn from(err: FlowError) -> Self {
        ConfluenceError::Validation {
            message: err.to_string(),
        }
    }
}
