//! File Store Module
//!
//! Durable backend. The JSON file is the only source of truth: every call
//! loads it under the lock and every mutation rewrites it before the write
//! lock is released. Nothing is cached between calls.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::{fs, sync::RwLock};
use tracing::{debug, error, warn};

use crate::error::{Result, StoreError};
use crate::store::{Item, ItemStore, WriteFailureMode, DATA_FILE_NAME};

type ItemMap = HashMap<String, Item>;

// == File Store ==
/// JSON-file-backed item storage.
///
/// The lock guards the file, not an in-memory copy. It only serializes
/// callers inside this process; two processes sharing one data directory
/// are not supported.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: RwLock<()>,
    write_mode: WriteFailureMode,
}

impl FileStore {
    // == Constructor ==
    /// Opens the store in `dir`, creating the directory and an empty `{}`
    /// data file when they are missing.
    pub async fn open(dir: impl AsRef<Path>, write_mode: WriteFailureMode) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(StoreError::persistence)?;

        let path = dir.join(DATA_FILE_NAME);
        match fs::metadata(&path).await {
            Ok(_) => debug!(path = %path.display(), "Using existing data file"),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::write(&path, b"{}").await.map_err(StoreError::persistence)?;
                debug!(path = %path.display(), "Initialized empty data file");
            }
            Err(err) => return Err(StoreError::persistence(err)),
        }

        Ok(Self {
            path,
            lock: RwLock::new(()),
            write_mode,
        })
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<ItemMap> {
        let bytes = fs::read(&self.path).await.map_err(StoreError::persistence)?;
        serde_json::from_slice(&bytes).map_err(StoreError::persistence)
    }

    // Written to a sibling file first so a crash never leaves a truncated document.
    async fn write_all(&self, items: &ItemMap) -> Result<()> {
        let data = serde_json::to_vec_pretty(items).map_err(StoreError::persistence)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).await.map_err(StoreError::persistence)?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(StoreError::persistence)
    }

    /// Applies the configured write failure mode to a failed mutation.
    fn persist_failed(&self, op: &str, err: StoreError) -> Result<()> {
        match self.write_mode {
            WriteFailureMode::Surface => Err(err),
            WriteFailureMode::Discard => {
                warn!(op, error = %err, path = %self.path.display(), "Discarding persistence failure");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ItemStore for FileStore {
    async fn ready(&self) -> bool {
        let _guard = self.lock.read().await;
        fs::metadata(&self.path).await.is_ok()
    }

    // == Create ==
    async fn create(&self, name: String, ttl: Duration) -> Result<Item> {
        let _guard = self.lock.write().await;

        let item = Item::new(name, ttl)?;

        let mut items = match self.read_all().await {
            Ok(items) => items,
            Err(err) => {
                // Rewriting from an empty map would wipe every stored item.
                self.persist_failed("create", err)?;
                return Ok(item);
            }
        };

        items.insert(item.id.clone(), item.clone());
        if let Err(err) = self.write_all(&items).await {
            self.persist_failed("create", err)?;
        }

        Ok(item)
    }

    // == Get ==
    async fn get(&self, id: &str) -> Result<Item> {
        let _guard = self.lock.read().await;

        let mut items = self.read_all().await?;
        items
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    // == List ==
    async fn list(&self) -> Vec<Item> {
        let _guard = self.lock.read().await;

        match self.read_all().await {
            Ok(items) => items.into_values().collect(),
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "Listing degraded to empty result");
                Vec::new()
            }
        }
    }

    // == Delete ==
    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.write().await;

        let mut items = self.read_all().await?;
        if items.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        if let Err(err) = self.write_all(&items).await {
            self.persist_failed("delete", err)?;
        }

        Ok(())
    }

    // == Sweep Expired ==
    async fn sweep_expired(&self) -> usize {
        let _guard = self.lock.write().await;

        let now = Utc::now();
        let mut items = match self.read_all().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "Sweep skipped, data file unreadable");
                return 0;
            }
        };

        let before = items.len();
        items.retain(|_, item| !item.is_expired_at(now));
        let removed = before - items.len();

        if removed == 0 {
            return 0;
        }

        match self.write_all(&items).await {
            Ok(()) => removed,
            Err(err) => {
                error!(error = %err, path = %self.path.display(), removed, "Sweep could not persist removals");
                0
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract_tests as contract;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_temp(mode: WriteFailureMode) -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), mode).await.unwrap();
        (dir, store)
    }

    /// Blocks the temp-file path with a directory so every rewrite fails
    /// while reads keep working.
    fn block_writes(store: &FileStore) {
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();
    }

    #[tokio::test]
    async fn test_open_initializes_empty_object() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;

        assert!(store.ready().await);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{}");
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_file() {
        let (dir, store) = open_temp(WriteFailureMode::Surface).await;
        let item = store.create("kept".to_string(), Duration::from_secs(60)).await.unwrap();

        let reopened = FileStore::open(dir.path(), WriteFailureMode::Surface).await.unwrap();
        assert_eq!(reopened.get(&item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_on_disk_format() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        let item = store.create("disk".to_string(), Duration::from_secs(60)).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &json[item.id.as_str()];

        assert_eq!(record["ID"], item.id.as_str());
        assert_eq!(record["Name"], "disk");
        assert!(record["CreatedAt"].is_string());
        assert!(record["ExpiresAt"].is_string());
    }

    #[tokio::test]
    async fn test_reads_external_edits() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        store.create("first".to_string(), Duration::from_secs(60)).await.unwrap();

        std::fs::write(store.path(), "{}").unwrap();

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweeps_legacy_records() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        let legacy = r#"{
          "old": {
            "ID": "old",
            "Name": "stale",
            "CreatedAt": "2024-01-01T10:00:00+02:00",
            "ExpiresAt": "2024-01-01T10:00:30+02:00"
          },
          "new": {
            "ID": "new",
            "Name": "fresh",
            "CreatedAt": "2024-01-01T10:00:00Z",
            "ExpiresAt": "2999-01-01T10:00:00Z"
          }
        }"#;
        std::fs::write(store.path(), legacy).unwrap();

        assert_eq!(store.sweep_expired().await, 1);
        assert!(matches!(store.get("old").await, Err(StoreError::NotFound(_))));
        assert_eq!(store.get("new").await.unwrap().name, "fresh");
    }

    #[tokio::test]
    async fn test_missing_file_degrades_reads() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        std::fs::remove_file(store.path()).unwrap();

        assert!(!store.ready().await);
        assert!(store.list().await.is_empty());
        assert!(matches!(store.get("any").await, Err(StoreError::Persistence(_))));
        assert_eq!(store.sweep_expired().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_lists_empty() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.list().await.is_empty());
        let result = store.create("x".to_string(), Duration::from_secs(1)).await;
        assert!(matches!(result, Err(StoreError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_surface_mode_reports_create_failure() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        block_writes(&store);

        let result = store.create("lost".to_string(), Duration::from_secs(60)).await;

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_surface_mode_reports_delete_failure() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        let item = store.create("kept".to_string(), Duration::from_secs(60)).await.unwrap();
        block_writes(&store);

        let result = store.delete(&item.id).await;

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert!(store.get(&item.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_discard_mode_reports_success() {
        let (_dir, store) = open_temp(WriteFailureMode::Discard).await;
        let kept = store.create("kept".to_string(), Duration::from_secs(60)).await.unwrap();
        block_writes(&store);

        let lost = store.create("lost".to_string(), Duration::from_secs(60)).await.unwrap();
        assert_eq!(lost.name, "lost");
        assert!(store.delete(&kept.id).await.is_ok());

        // Neither mutation reached the file.
        let ids: Vec<String> = store.list().await.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![kept.id]);
    }

    #[tokio::test]
    async fn test_sweep_write_failure_reports_zero() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        let item = store.create("expired".to_string(), Duration::ZERO).await.unwrap();
        block_writes(&store);

        assert_eq!(store.sweep_expired().await, 0);
        assert!(store.get(&item.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::create_and_get(&store).await;
    }

    #[tokio::test]
    async fn test_get_returns_expired_until_swept() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::get_returns_expired_until_swept(&store).await;
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::ids_are_unique(&store).await;
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::delete_then_get(&store).await;
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_collection() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::delete_missing_leaves_collection(&store).await;
    }

    #[tokio::test]
    async fn test_zero_ttl_swept_next() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::zero_ttl_swept_next(&store).await;
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::sweep_is_idempotent(&store).await;
    }

    #[tokio::test]
    async fn test_long_ttl_survives_sweep() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::long_ttl_survives_sweep(&store).await;
    }

    #[tokio::test]
    async fn test_list_completeness() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::list_completeness(&store).await;
    }

    #[tokio::test]
    async fn test_short_ttl_lifecycle() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::short_ttl_lifecycle(&store).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates() {
        let (_dir, store) = open_temp(WriteFailureMode::Surface).await;
        contract::concurrent_creates(Arc::new(store), 32).await;
    }
}
