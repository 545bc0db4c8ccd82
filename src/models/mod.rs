//! Request and Response models for the item store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateItemRequest, MAX_NAME_LENGTH};
pub use responses::{DeleteResponse, HealthResponse};
