//! Undo/Redo History
//!
//! The history log stores invertible [`NodeOperation`]s rather than tree
//! snapshots, so memory grows with the size of the edits instead of the size of
//! the document. The manager never touches a tree: callers apply
//! `entry.operation.inverse()` on undo and `entry.operation` on redo.
//!
//! # Groups
//!
//! Operations pushed between [`HistoryManager::start_group`] and
//! [`HistoryManager::end_group`] share a group id. Undo and redo always move
//! the whole group (all contiguous entries at the top of the stack that carry
//! the same group id) in one step.
//!
//! # Examples
//!
//! ```rust
//! use heartbeat_core::models::{Document, Node};
//! use heartbeat_core::operations::NodeOperation;
//! use heartbeat_core::services::HistoryManager;
//!
//! let doc = Document::new(Node::with_id("root", "R"));
//! let mut history = HistoryManager::new();
//!
//! let op = NodeOperation::plan_add_child(&doc, "root", Node::with_id("a", "A")).unwrap();
//! let doc = op.apply(&doc).unwrap();
//! history.push(op);
//!
//! let undone = history.undo().unwrap();
//! let doc = undone.entries[0].operation.inverse().apply(&doc).unwrap();
//! assert!(doc.root().children.is_empty());
//! assert!(history.can_redo());
//! ```

use crate::operations::NodeOperation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Default maximum number of entries kept on the undo stack
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One recorded operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub operation: NodeOperation,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

/// Entries moved by a single undo or redo.
///
/// `entries` is in application order: for undo, newest first (apply each
/// inverse in turn); for redo, oldest first (apply each operation in turn).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStep {
    pub group_id: Option<Uuid>,
    pub entries: Vec<HistoryEntry>,
}

/// Bounded undo/redo stacks with group transactions
#[derive(Debug, Clone)]
pub struct HistoryManager {
    /// Oldest entry at the front, newest at the back
    undo: VecDeque<HistoryEntry>,
    /// Next entry to redo at the back
    redo: Vec<HistoryEntry>,
    current_group: Option<Uuid>,
    max_size: usize,
}

impl HistoryManager {
    /// Create a history with the default capacity
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history keeping at most `max_size` undo entries
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            current_group: None,
            max_size: max_size.max(1),
        }
    }

    /// Open a group; subsequent pushes share its id until [`Self::end_group`].
    ///
    /// Returns the new group id. Opening a group while one is open starts a
    /// fresh group.
    pub fn start_group(&mut self) -> Uuid {
        let group_id = Uuid::new_v4();
        self.current_group = Some(group_id);
        group_id
    }

    /// Close the current group (no-op when none is open)
    pub fn end_group(&mut self) {
        self.current_group = None;
    }

    pub fn in_group(&self) -> bool {
        self.current_group.is_some()
    }

    /// Record a committed operation.
    ///
    /// Clears the redo stack and evicts the oldest entry once the undo stack
    /// exceeds its capacity.
    pub fn push(&mut self, operation: NodeOperation) {
        self.redo.clear();

        self.undo.push_back(HistoryEntry {
            operation,
            timestamp: Utc::now(),
            group_id: self.current_group,
        });

        while self.undo.len() > self.max_size {
            self.undo.pop_front();
        }
    }

    /// Pop the newest entry (and the rest of its group) onto the redo stack
    pub fn undo(&mut self) -> Option<HistoryStep> {
        let first = self.undo.pop_back()?;
        let group_id = first.group_id;
        let mut entries = vec![first];

        if group_id.is_some() {
            while self
                .undo
                .back()
                .is_some_and(|entry| entry.group_id == group_id)
            {
                if let Some(entry) = self.undo.pop_back() {
                    entries.push(entry);
                }
            }
        }

        // Oldest ends up on top of the redo stack, so redo replays forward
        self.redo.extend(entries.iter().cloned());

        Some(HistoryStep { group_id, entries })
    }

    /// Pop the next entry (and the rest of its group) back onto the undo stack
    pub fn redo(&mut self) -> Option<HistoryStep> {
        let first = self.redo.pop()?;
        let group_id = first.group_id;
        let mut entries = vec![first];

        if group_id.is_some() {
            while self
                .redo
                .last()
                .is_some_and(|entry| entry.group_id == group_id)
            {
                if let Some(entry) = self.redo.pop() {
                    entries.push(entry);
                }
            }
        }

        self.undo.extend(entries.iter().cloned());
        while self.undo.len() > self.max_size {
            self.undo.pop_front();
        }

        Some(HistoryStep { group_id, entries })
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Get the display name of the next undo operation (for UI)
    pub fn next_undo_display_name(&self) -> Option<&'static str> {
        self.undo.back().map(|entry| entry.operation.display_name())
    }

    /// Get the display name of the next redo operation (for UI)
    pub fn next_redo_display_name(&self) -> Option<&'static str> {
        self.redo.last().map(|entry| entry.operation.display_name())
    }

    /// Drop both stacks and any open group
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.current_group = None;
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
