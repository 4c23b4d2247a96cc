//! Document persistence with retry
//!
//! `DocumentStore` turns documents into JSON blobs and back, on top of any
//! [`BlobStore`]. Saves retry transient failures with exponential backoff
//! (10ms, 20ms, 40ms with the default policy); loads never retry and fall back
//! to a fresh document when nothing usable is stored.

use crate::config::RetryConfig;
use crate::db::{BlobStore, StoreError};
use crate::models::{Document, Node};
use std::sync::Arc;
use tokio::time::Duration;

/// Key of the shared demo document
pub const DEMO_DOCUMENT_KEY: &str = "demo";

/// Storage key of a signed-in user's document: the email with `@` replaced by `_`
///
/// Characters a storage key cannot hold are escaped as `=XX` per UTF-8 byte,
/// so every email maps to a distinct key that passes [`validate_key`].
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::db::document_key_for_email;
///
/// assert_eq!(document_key_for_email("ada@example.com"), "ada_example.com");
/// assert_eq!(document_key_for_email("ada+work@example.com"), "ada+work_example.com");
/// assert_eq!(document_key_for_email("o'brien@example.com"), "o=27brien_example.com");
/// ```
///
/// [`validate_key`]: crate::db::validate_key
pub fn document_key_for_email(email: &str) -> String {
    let mut key = String::new();
    for (index, c) in email.trim().char_indices() {
        match c {
            '@' => key.push('_'),
            '.' if index == 0 => key.push_str("=2E"),
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+') => key.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    key.push_str(&format!("={:02X}", byte));
                }
            }
        }
    }
    key
}

/// Loads and saves whole documents under document keys
#[derive(Clone)]
pub struct DocumentStore {
    blobs: Arc<dyn BlobStore>,
    retry: RetryConfig,
}

impl DocumentStore {
    /// Create a store with the default retry policy
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            retry: RetryConfig::default(),
        }
    }

    /// Replace the retry policy used by [`Self::save_document`]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Load the document stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored. Stored structure is trusted;
    /// only the checklist fields are normalized.
    pub async fn load_document(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let Some(blob) = self.blobs.get(key).await? else {
            tracing::debug!("No document stored under '{}'", key);
            return Ok(None);
        };

        let mut root: Node =
            serde_json::from_str(&blob).map_err(|err| StoreError::serialization(key, err))?;
        root.normalize_checklist();

        let doc = Document::new(root);
        if let Err(err) = doc.validate() {
            tracing::warn!("Document '{}' loaded with structural issues: {}", key, err);
        }

        tracing::info!("Loaded document '{}' ({} nodes)", key, doc.len());
        Ok(Some(doc))
    }

    /// Load `key`, or the fallback document when it is absent or unreadable.
    ///
    /// The fallback is the demo fixture for [`DEMO_DOCUMENT_KEY`] and a fresh
    /// single-root document otherwise.
    pub async fn load_or_default(&self, key: &str) -> Document {
        match self.load_document(key).await {
            Ok(Some(doc)) => doc,
            Ok(None) => Self::fallback(key),
            Err(err) => {
                tracing::warn!("Failed to load document '{}', using fallback: {}", key, err);
                Self::fallback(key)
            }
        }
    }

    fn fallback(key: &str) -> Document {
        if key == DEMO_DOCUMENT_KEY {
            Document::demo()
        } else {
            Document::new_default()
        }
    }

    /// Overwrite the document stored under `key`.
    ///
    /// # Retry Behavior
    ///
    /// - **Retry on**: transient errors (I/O, backend unavailable)
    /// - **Backoff**: `base_delay_ms * 2^attempt`
    /// - **Other errors**: fail immediately
    /// - **Exhausted**: [`StoreError::RetriesExhausted`]
    pub async fn save_document(&self, key: &str, doc: &Document) -> Result<(), StoreError> {
        let blob = serde_json::to_string(doc).map_err(|err| StoreError::serialization(key, err))?;
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match self.blobs.put(key, blob.clone()).await {
                Ok(()) => {
                    if attempt > 0 {
                        tracing::debug!(
                            "Save of '{}' succeeded after {} retry(ies)",
                            key,
                            attempt
                        );
                    }
                    return Ok(());
                }

                Err(err) if err.is_transient() && attempt < max_retries => {
                    tracing::debug!(
                        "Save attempt {}/{} for '{}' failed: {}. Retrying...",
                        attempt + 1,
                        max_retries + 1,
                        key,
                        err
                    );

                    tokio::time::sleep(Duration::from_millis(self.retry.backoff_ms(attempt)))
                        .await;

                    attempt += 1;
                    continue;
                }

                Err(err) if err.is_transient() => {
                    tracing::warn!(
                        "Giving up saving '{}' after {} attempt(s): {}",
                        key,
                        attempt + 1,
                        err
                    );
                    return Err(StoreError::RetriesExhausted {
                        key: key.to_string(),
                        attempts: attempt + 1,
                        last_error: err.to_string(),
                    });
                }

                Err(err) => return Err(err),
            }
        }
    }
}
