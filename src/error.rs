//! Error types for the application.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing the preference store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No session with the given ID exists.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A theme preference string was not one of `light`, `dark`, `system`.
    #[error("Invalid theme preference: {0}")]
    InvalidPreference(String),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidPreference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Storage(_) | Error::Json(_) => {
                tracing::error!(name: "app.error", error = %self, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
