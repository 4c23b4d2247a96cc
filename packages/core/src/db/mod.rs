//! Persistence Layer
//!
//! This module handles loading and saving outline documents:
//!
//! - [`BlobStore`] - key-value blob backend (in-memory or flat files)
//! - [`DocumentStore`] - JSON (de)serialization, fallback documents and save retry
//! - [`AutoSaver`] - background write-through saving with an observable status
//!
//! # Architecture
//!
//! The core never talks to a backend directly. A `DocumentStore` is injected
//! into the editing session, and every committed change is forwarded to the
//! `AutoSaver` without waiting for the write. Concurrent sessions on the same
//! key are last-write-wins.

mod auto_save;
mod blob_store;
mod document_store;
mod error;

pub use auto_save::{AutoSaver, SaveStatus};
pub use blob_store::{validate_key, BlobStore, FileBlobStore, MemoryBlobStore};
pub use document_store::{document_key_for_email, DocumentStore, DEMO_DOCUMENT_KEY};
pub use error::StoreError;
