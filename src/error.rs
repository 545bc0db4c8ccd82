//! Error types for the item store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the store engine and the HTTP layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No item with this id
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing file could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Store cannot currently serve requests
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn persistence(err: impl std::fmt::Display) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the item store.
pub type Result<T> = std::result::Result<T, StoreError>;
