//! Tiny - An ephemeral item store over HTTP
//!
//! Items carry a TTL and are reclaimed by a periodic background sweep.
//! Storage is pluggable: an in-memory map or a JSON file.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::StoreError;
pub use metrics::Metrics;
pub use store::{FileStore, Item, ItemStore, MemoryStore, SharedStore};
pub use tasks::spawn_cleanup_task;
