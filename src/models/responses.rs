//! Response DTOs for the item store API
//!
//! Defines the structure of outgoing HTTP response bodies. Items themselves
//! are serialized directly from `store::Item`.

use serde::Serialize;

/// Response body for the DELETE operation (DELETE /items/:id)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub id: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Item '{}' deleted successfully", id),
            id,
        }
    }
}

/// Response body for the probes (GET /health, GET /ready)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Probe status ("ok" or "ready")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Liveness response
    pub fn ok() -> Self {
        Self::with_status("ok")
    }

    /// Readiness response
    pub fn ready() -> Self {
        Self::with_status("ready")
    }

    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
