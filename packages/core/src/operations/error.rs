//! Error types for structural tree operations
//!
//! Every structural operation either produces a new tree or fails with a
//! `TreeError`. All of these are *structural-invalid* conditions. The editing
//! session turns them into no-ops, except for root deletion which is a hard
//! rejection surfaced to the caller.

use thiserror::Error;

/// Errors that can occur during structural tree operations
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::operations::TreeError;
///
/// let err = TreeError::cannot_delete_root("root");
/// assert!(err.is_hard_rejection());
///
/// let err = TreeError::node_not_found("missing");
/// assert!(!err.is_hard_rejection());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Referenced node does not exist in the tree
    #[error("Node '{node_id}' does not exist")]
    NodeNotFound { node_id: String },

    /// The root node cannot be deleted
    #[error("Root node '{node_id}' cannot be deleted")]
    CannotDeleteRoot { node_id: String },

    /// The operation needs a parent but the node is the root
    #[error("Node '{node_id}' is the root and has no parent")]
    RootHasNoParent { node_id: String },

    /// Moving a node below itself would create a cycle
    #[error("Cannot move node '{node_id}' under '{target_parent_id}': target is the node itself or one of its descendants")]
    CyclicMove {
        node_id: String,
        target_parent_id: String,
    },

    /// An inserted subtree reuses an id already present in the tree
    #[error("Node id '{node_id}' is already used in this document")]
    DuplicateId { node_id: String },

    /// Indent of a first child (no preceding sibling to nest under)
    #[error("Node '{node_id}' has no preceding sibling to indent under")]
    NoPreviousSibling { node_id: String },

    /// Outdent of a node whose parent is the root
    #[error("Node '{node_id}' is already at the top level")]
    AlreadyTopLevel { node_id: String },

    /// Checkbox operation on a node that is not a checklist item
    #[error("Node '{node_id}' is not a checklist item")]
    NotChecklistItem { node_id: String },

    /// Sibling index outside the parent's children
    #[error("Index {index} is out of range for parent '{parent_id}' with {len} children")]
    IndexOutOfRange {
        parent_id: String,
        index: usize,
        len: usize,
    },
}

impl TreeError {
    /// Create a NodeNotFound error
    pub fn node_not_found(node_id: impl Into<String>) -> Self {
        Self::NodeNotFound {
            node_id: node_id.into(),
        }
    }

    /// Create a CannotDeleteRoot error
    pub fn cannot_delete_root(node_id: impl Into<String>) -> Self {
        Self::CannotDeleteRoot {
            node_id: node_id.into(),
        }
    }

    /// Create a RootHasNoParent error
    pub fn root_has_no_parent(node_id: impl Into<String>) -> Self {
        Self::RootHasNoParent {
            node_id: node_id.into(),
        }
    }

    /// Create a CyclicMove error
    pub fn cyclic_move(node_id: impl Into<String>, target_parent_id: impl Into<String>) -> Self {
        Self::CyclicMove {
            node_id: node_id.into(),
            target_parent_id: target_parent_id.into(),
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(node_id: impl Into<String>) -> Self {
        Self::DuplicateId {
            node_id: node_id.into(),
        }
    }

    /// True for violations that must not degrade to a silent no-op.
    ///
    /// Only root deletion qualifies; everything else leaves the document
    /// unchanged and is reported as "nothing happened".
    pub fn is_hard_rejection(&self) -> bool {
        matches!(self, Self::CannotDeleteRoot { .. })
    }

    /// Id of the node the error is about
    pub fn node_id(&self) -> &str {
        match self {
            Self::NodeNotFound { node_id }
            | Self::CannotDeleteRoot { node_id }
            | Self::RootHasNoParent { node_id }
            | Self::CyclicMove { node_id, .. }
            | Self::DuplicateId { node_id }
            | Self::NoPreviousSibling { node_id }
            | Self::AlreadyTopLevel { node_id }
            | Self::NotChecklistItem { node_id } => node_id,
            Self::IndexOutOfRange { parent_id, .. } => parent_id,
        }
    }
}
