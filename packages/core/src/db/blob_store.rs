//! BlobStore Trait - Persistence Boundary
//!
//! Documents are persisted as opaque JSON blobs keyed by a document key. The
//! backend only needs get/put semantics; overwriting is last-write-wins.
//!
//! # Implementations
//!
//! - [`MemoryBlobStore`] - in-process map, with failure injection for tests
//! - [`FileBlobStore`] - one `<data_dir>/<key>.json` file per document
//!
//! # Examples
//!
//! ```rust
//! use heartbeat_core::db::{BlobStore, MemoryBlobStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), heartbeat_core::db::StoreError> {
//! let store = MemoryBlobStore::new();
//! store.put("demo", "{\"id\":\"root\"}".to_string()).await?;
//! assert!(store.get("demo").await?.is_some());
//! assert!(store.get("other").await?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::db::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Key-value blob persistence
///
/// Implementations must be `Send + Sync` so a store can be shared with the
/// background auto-save task.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the blob stored under `key`, `None` if nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `blob` under `key`, replacing any previous value
    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError>;
}

/// Reject keys that are empty or could escape a flat namespace.
///
/// Allowed characters: ASCII letters, digits, `_`, `-`, `.`, `+`, `=`, but no
/// leading dot.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | '='));
    if valid {
        Ok(())
    } else {
        Err(StoreError::invalid_key(key))
    }
}

/// In-memory blob store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
    offline: AtomicBool,
    failing_puts: AtomicUsize,
    put_calls: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every request fail with [`StoreError::Unavailable`] until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail the next `count` puts, then recover
    pub fn fail_next_puts(&self, count: usize) {
        self.failing_puts.store(count, Ordering::SeqCst);
    }

    /// Number of put attempts so far, failed ones included
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("memory store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        self.check_available()?;
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError> {
        validate_key(key)?;
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let injected_failure = self
            .failing_puts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected_failure {
            return Err(StoreError::unavailable("injected put failure"));
        }

        self.blobs.write().await.insert(key.to_string(), blob);
        Ok(())
    }
}

/// Flat-file blob store: one JSON file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    data_dir: PathBuf,
}

impl FileBlobStore {
    /// Store files under `data_dir` (created on first write)
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|err| StoreError::io(&self.data_dir, err))?;

        // Write then rename so readers never see a half-written file
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, blob)
            .await
            .map_err(|err| StoreError::io(&tmp_path, err))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|err| StoreError::io(&path, err))?;

        tracing::debug!("Wrote document blob to {}", path.display());
        Ok(())
    }
}
