//! Item Module
//!
//! Defines the stored item and its TTL arithmetic.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};

// == Item ==
/// A single stored item.
///
/// Field names on the wire match the on-disk format of the file backend
/// (`ID`, `Name`, `CreatedAt`, `ExpiresAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-generated identifier
    #[serde(rename = "ID")]
    pub id: String,
    /// Caller-supplied label
    #[serde(rename = "Name")]
    pub name: String,
    /// Creation timestamp
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp (created_at + ttl)
    #[serde(rename = "ExpiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Item {
    // == Constructor ==
    /// Creates a new item with a fresh id, expiring `ttl` from now.
    pub fn new(name: impl Into<String>, ttl: Duration) -> Result<Self> {
        Self::new_at(name, ttl, Utc::now())
    }

    /// Creates a new item as if created at `now`.
    ///
    /// Fails with `InvalidRequest` when `now + ttl` is not representable.
    pub fn new_at(name: impl Into<String>, ttl: Duration, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                StoreError::InvalidRequest(format!("ttl of {}s is out of range", ttl.as_secs()))
            })?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            expires_at,
        })
    }

    // == Is Expired ==
    /// Checks whether the item had expired at `now`.
    ///
    /// Boundary: an item is expired once `now` reaches `expires_at`, so a
    /// zero TTL item is expired from the moment it is created.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
