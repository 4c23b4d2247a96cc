//! Service Layer Error Types
//!
//! This module defines the errors surfaced by the editing session and the
//! import/export layer. Structural errors come from
//! [`TreeError`](crate::operations::TreeError). Persistence failures never
//! reach a command; they are reported through the auto-saver's status.

use crate::models::ValidationError;
use crate::operations::TreeError;
use thiserror::Error;

/// Parse-invalid input. Import is all-or-nothing: on error the live document
/// is left untouched.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Input is not a JSON document tree
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Input has no content lines
    #[error("Nothing to import")]
    Empty,

    /// First content line of a tab outline is indented
    #[error("Line {line}: outline must start at the top level (found {depth} leading tab(s))")]
    MalformedIndentation { line: usize, depth: usize },

    /// Markdown input without any list item
    #[error("Markdown contains no list items")]
    NoListItems,

    /// Parsed tree violates a document invariant
    #[error("Imported document is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// Editing session errors
#[derive(Error, Debug)]
pub enum EditorError {
    /// Rejected structural operation
    #[error("Tree operation rejected: {0}")]
    Tree(#[from] TreeError),

    /// Import failed
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

impl EditorError {
    /// Whether this is the root-deletion rejection
    pub fn is_root_deletion(&self) -> bool {
        matches!(self, Self::Tree(TreeError::CannotDeleteRoot { .. }))
    }
}
