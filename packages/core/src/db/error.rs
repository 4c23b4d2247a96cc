//! Storage Error Types
//!
//! Errors raised at the persistence boundary. Loading and saving are
//! best-effort: a failed save never touches the in-memory document, it only
//! changes the observable save status.

use std::path::PathBuf;
use thiserror::Error;

/// Blob store and document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document key cannot be used as a storage key
    #[error("Invalid document key: '{key}'")]
    InvalidKey { key: String },

    /// Filesystem access failed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stored blob is not a valid document
    #[error("Failed to (de)serialize document '{key}': {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },

    /// Backend refused or could not reach the store
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// Save kept failing after all retries
    #[error("Saving '{key}' failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        key: String,
        attempts: usize,
        last_error: String,
    },
}

impl StoreError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Create an I/O error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error for a document key
    pub fn serialization(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.into(),
            source,
        }
    }

    /// Create a backend-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether retrying the same request can succeed.
    ///
    /// Bad keys and malformed blobs fail the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Unavailable(_))
    }
}
