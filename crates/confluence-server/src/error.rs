//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use confluence_core::error::ConfluenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] ConfluenceError),

    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Decision requires confirm=true")]
    ConfirmationRequired,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Domain(err) => match err {
                ConfluenceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ConfluenceError::AlreadyExists { .. } => StatusCode::CONFLICT,
                ConfluenceError::InvalidTransition { .. } => StatusCode::CONFLICT,
                ConfluenceError::Validation { .. } => StatusCode::BAD_REQUEST,
                ConfluenceError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::ConfirmationRequired | AppError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        (status, self.to_string()).into_response()
    }
}
