//! Store Module
//!
//! The item storage engine: one async contract, two interchangeable backends.
//!
//! # Backends
//! - `MemoryStore`: volatile, map-backed
//! - `FileStore`: JSON file, reloaded on every call and rewritten on every mutation

mod file;
mod item;
mod memory;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, StoreBackend};
use crate::error::Result;

// Re-export public types
pub use file::FileStore;
pub use item::Item;
pub use memory::MemoryStore;

// == Public Constants ==
/// File name of the durable store inside the data directory
pub const DATA_FILE_NAME: &str = "items.json";

// == Item Store Contract ==
/// Capability set shared by every store backend.
///
/// Mutations (`create`, `delete`, `sweep_expired`) take the backend's write
/// lock; reads (`get`, `list`, `ready`) take its read lock. Every returned
/// `Item` is an owned copy.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Whether the store can currently serve requests.
    async fn ready(&self) -> bool;

    /// Stores a new item expiring `ttl` from now and returns a copy.
    async fn create(&self, name: String, ttl: Duration) -> Result<Item>;

    /// Returns the item, expired or not, if it is still stored.
    async fn get(&self, id: &str) -> Result<Item>;

    /// Snapshot of every stored item, in no particular order.
    async fn list(&self) -> Vec<Item>;

    /// Removes the item.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Removes every item expired as of the start of the call and returns
    /// how many were removed.
    async fn sweep_expired(&self) -> usize;
}

/// Store handle shared between request handlers and the cleanup task.
pub type SharedStore = Arc<dyn ItemStore>;

// == Write Failure Mode ==
/// What a durable mutation does when the backing file cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteFailureMode {
    /// Return `StoreError::Persistence` to the caller
    #[default]
    Surface,
    /// Log the failure and report success anyway
    Discard,
}

impl WriteFailureMode {
    /// Parses `surface` / `discard` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "surface" => Some(Self::Surface),
            "discard" => Some(Self::Discard),
            _ => None,
        }
    }
}

// == Factory ==
/// Opens the backend selected by the configuration.
pub async fn open_store(config: &Config) -> Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => {
            let store = FileStore::open(&config.data_dir, config.write_failure_mode).await?;
            Ok(Arc::new(store))
        }
    }
}
