//! Heartbeat Core Outliner Layer
//!
//! This crate provides the document model, tree operations, editing session
//! and persistence for the Heartbeat outliner: a single tree of text nodes
//! edited through keyboard-driven commands.
//!
//! # Architecture
//!
//! - **Persistent tree**: every edit produces a new `Document` snapshot; untouched
//!   subtrees are shared between snapshots
//! - **Invertible operations**: history stores operations, not snapshots
//! - **Write-through saving**: each committed snapshot is queued on a background
//!   task that writes it to a blob store
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, Document, NodeStyle)
//! - [`operations`] - Pure tree transformations and invertible operations
//! - [`services`] - Editing session, history, navigation, import/export
//! - [`db`] - Blob stores, document persistence and auto-save
//! - [`config`] - Session and persistence configuration
//! - [`utils`] - Content-kind detection for node text

pub mod config;
pub mod db;
pub mod models;
pub mod operations;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::EditorConfig;
pub use models::*;
pub use services::*;
