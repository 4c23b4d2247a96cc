//! Utility functions for Heartbeat Core
//!
//! This module provides helpers used by the presentation side of the editor.

mod content;

pub use content::{classify_content, ContentKind, VideoProvider};
