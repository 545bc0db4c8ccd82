//! Request DTOs for the item store API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

/// Maximum allowed item name length in bytes
pub const MAX_NAME_LENGTH: usize = 256;

/// Request body for creating an item (POST /items)
///
/// # Fields
/// - `name`: Label stored with the item
/// - `ttl_seconds`: Seconds until the item expires (0 if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    /// Item label
    pub name: String,
    /// Time to live in seconds
    #[serde(default)]
    pub ttl_seconds: u64,
}

impl CreateItemRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Some(format!(
                "Name exceeds maximum length of {} bytes",
                MAX_NAME_LENGTH
            ));
        }
        None
    }

    /// TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"name": "a", "ttl_seconds": 60}"#;
        let req: CreateItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "a");
        assert_eq!(req.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_create_request_default_ttl() {
        let json = r#"{"name": "a"}"#;
        let req: CreateItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl_seconds, 0);
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let json = r#"{"name": "a", "ttl_seconds": -1}"#;
        assert!(serde_json::from_str::<CreateItemRequest>(json).is_err());
    }

    #[test]
    fn test_validate_name_too_long() {
        let req = CreateItemRequest {
            name: "x".repeat(MAX_NAME_LENGTH + 1),
            ttl_seconds: 1,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = CreateItemRequest {
            name: String::new(),
            ttl_seconds: 60,
        };
        assert!(req.validate().is_none());
    }
}
