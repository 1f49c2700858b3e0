//! Error types for rostra-api

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Result type alias for rostra-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rostra-api
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from rostra-core
    #[error("core error: {0}")]
    Core(#[from] rostra_core::Error),

    /// Bearer token missing or not matching the configured token
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Request body is not a valid dataset document
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Writing or reading the snapshot document failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration file or environment problem
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Status code the error maps to on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Error::Core(_) | Error::Storage(_) | Error::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
