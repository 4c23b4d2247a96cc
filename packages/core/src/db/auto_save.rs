//! Write-through auto-save
//!
//! Every committed change hands a snapshot to [`AutoSaver::schedule`], which
//! returns immediately. A background task saves snapshots in the order they
//! were scheduled; when several are queued only the newest is written, since a
//! save overwrites the whole document anyway.
//!
//! The current [`SaveStatus`] is published on a `tokio::sync::watch` channel so
//! a UI can show an "unsaved changes" indicator.

use crate::db::DocumentStore;
use crate::models::Document;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Persistence state of the live document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Everything scheduled so far is stored
    Saved,
    /// At least one snapshot is waiting to be written
    Pending,
    /// The last save failed; the in-memory document is newer than the store
    Failed { message: String },
}

impl SaveStatus {
    pub fn has_unsaved_changes(&self) -> bool {
        !matches!(self, Self::Saved)
    }
}

/// Background saver bound to one document key
#[derive(Debug)]
pub struct AutoSaver {
    key: String,
    tx: mpsc::UnboundedSender<Document>,
    status: Arc<watch::Sender<SaveStatus>>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<()>,
}

impl AutoSaver {
    /// Spawn the save task on the current tokio runtime
    pub fn spawn(store: DocumentStore, key: impl Into<String>) -> Self {
        let key = key.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(SaveStatus::Saved);
        let status = Arc::new(status);
        let pending = Arc::new(AtomicUsize::new(0));

        let worker = tokio::spawn(run_saves(
            store,
            key.clone(),
            rx,
            Arc::clone(&pending),
            Arc::clone(&status),
        ));

        Self {
            key,
            tx,
            status,
            pending,
            worker,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue `doc` for saving; never blocks
    pub fn schedule(&self, doc: Document) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.status.send_replace(SaveStatus::Pending);

        if self.tx.send(doc).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            self.status.send_replace(SaveStatus::Failed {
                message: "save task is no longer running".to_string(),
            });
            tracing::warn!("Auto-save task for '{}' has stopped", self.key);
        }
    }

    /// Current status
    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Snapshots scheduled but not yet written
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Wait until every scheduled snapshot has been attempted
    pub async fn flush(&self) -> SaveStatus {
        let mut rx = self.status.subscribe();
        let status = match rx.wait_for(|status| *status != SaveStatus::Pending).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }

    /// Stop accepting snapshots, finish the queued ones and return the final status
    pub async fn shutdown(self) -> SaveStatus {
        let Self {
            tx, status, worker, ..
        } = self;
        drop(tx);
        if let Err(err) = worker.await {
            tracing::warn!("Auto-save task ended abnormally: {}", err);
        }
        let final_status = status.borrow().clone();
        final_status
    }
}

async fn run_saves(
    store: DocumentStore,
    key: String,
    mut rx: mpsc::UnboundedReceiver<Document>,
    pending: Arc<AtomicUsize>,
    status: Arc<watch::Sender<SaveStatus>>,
) {
    while let Some(mut doc) = rx.recv().await {
        let mut batch = 1;
        while let Ok(newer) = rx.try_recv() {
            doc = newer;
            batch += 1;
        }
        if batch > 1 {
            tracing::debug!("Coalesced {} queued snapshots of '{}'", batch, key);
        }

        let result = store.save_document(&key, &doc).await;
        pending.fetch_sub(batch, Ordering::SeqCst);

        match &result {
            Ok(()) => tracing::debug!("Auto-saved '{}'", key),
            Err(err) => tracing::warn!("Auto-save of '{}' failed: {}", key, err),
        }

        // Only settle the status once nothing newer is queued
        status.send_modify(|current| {
            if pending.load(Ordering::SeqCst) == 0 {
                *current = match &result {
                    Ok(()) => SaveStatus::Saved,
                    Err(err) => SaveStatus::Failed {
                        message: err.to_string(),
                    },
                };
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::db::{BlobStore, MemoryBlobStore};
    use crate::models::Node;

    fn doc_with_text(text: &str) -> Document {
        Document::new(Node::with_id("root", text))
    }

    fn store_over(blobs: Arc<MemoryBlobStore>) -> DocumentStore {
        DocumentStore::new(blobs).with_retry(RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
        })
    }

    #[tokio::test]
    async fn test_last_scheduled_snapshot_wins() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let saver = AutoSaver::spawn(store_over(blobs.clone()), "k");
        assert_eq!(saver.status(), SaveStatus::Saved);

        for text in ["one", "two", "three"] {
            saver.schedule(doc_with_text(text));
        }
        assert_eq!(saver.flush().await, SaveStatus::Saved);
        assert_eq!(saver.pending(), 0);

        let stored = blobs.get("k").await.unwrap().unwrap();
        let node: Node = serde_json::from_str(&stored).unwrap();
        assert_eq!(node.text, "three");
    }

    #[tokio::test]
    async fn test_failure_is_observable_and_recovers() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let saver = AutoSaver::spawn(store_over(blobs.clone()), "k");

        blobs.set_offline(true);
        saver.schedule(doc_with_text("offline edit"));
        let status = saver.flush().await;
        assert!(matches!(status, SaveStatus::Failed { .. }));
        assert!(status.has_unsaved_changes());

        blobs.set_offline(false);
        saver.schedule(doc_with_text("back online"));
        assert_eq!(saver.flush().await, SaveStatus::Saved);
        assert!(blobs.get("k").await.unwrap().unwrap().contains("back online"));
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let saver = AutoSaver::spawn(store_over(blobs.clone()), "k");
        saver.schedule(doc_with_text("final"));
        assert_eq!(saver.shutdown().await, SaveStatus::Saved);
        assert!(blobs.get("k").await.unwrap().unwrap().contains("final"));
    }

    #[tokio::test]
    async fn test_subscribers_see_pending() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let saver = AutoSaver::spawn(store_over(blobs), "k");
        let rx = saver.subscribe();
        saver.schedule(doc_with_text("x"));
        assert!(rx.has_changed().unwrap());
        saver.flush().await;
        assert_eq!(*rx.borrow(), SaveStatus::Saved);
    }
}
