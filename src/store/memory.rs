//! Memory Store Module
//!
//! Volatile backend: a HashMap of items behind a single RwLock.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{Item, ItemStore};

// == Memory Store ==
/// In-memory item storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Items keyed by id
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    // == Ready ==
    /// Nothing external to check; readiness only waits out a pending writer.
    async fn ready(&self) -> bool {
        let _items = self.items.read().await;
        true
    }

    // == Create ==
    async fn create(&self, name: String, ttl: Duration) -> Result<Item> {
        let mut items = self.items.write().await;

        let item = Item::new(name, ttl)?;
        items.insert(item.id.clone(), item.clone());

        Ok(item)
    }

    // == Get ==
    async fn get(&self, id: &str) -> Result<Item> {
        let items = self.items.read().await;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    // == List ==
    async fn list(&self) -> Vec<Item> {
        let items = self.items.read().await;
        items.values().cloned().collect()
    }

    // == Delete ==
    async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    // == Sweep Expired ==
    async fn sweep_expired(&self) -> usize {
        let mut items = self.items.write().await;

        let now = Utc::now();
        let before = items.len();
        items.retain(|_, item| !item.is_expired_at(now));

        before - items.len()
    }
}
