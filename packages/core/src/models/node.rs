//! Node Data Structures
//!
//! This module defines the outline `Node` and the small value types hanging off it
//! (`NodeType`, `NodeStyle`, `NodeContent`).
//!
//! # Architecture
//!
//! - **Owned children**: A node owns its ordered children; sibling rank is the
//!   position in `children`
//! - **Structural sharing**: Children are held behind `Arc`, so a new tree value
//!   only copies the nodes on the path from the root to an edited node
//! - **Checklist payload**: `checked` exists iff `node_type` is a checklist item
//! - **Presentation only**: `style` and `collapsed` never affect structural validity
//!
//! # Examples
//!
//! ```rust
//! use heartbeat_core::models::{Node, NodeType};
//!
//! let mut groceries = Node::new("Groceries");
//! let mut milk = Node::new("Buy milk");
//! milk.set_checklist_state(Some(false));
//! groceries.push_child(milk);
//!
//! assert_eq!(groceries.children.len(), 1);
//! assert_eq!(groceries.children[0].node_type, Some(NodeType::ChecklistItem));
//! assert_eq!(groceries.children[0].checked, Some(false));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for outline nodes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Node '{node_id}' has inconsistent checklist fields: {reason}")]
    ChecklistMismatch { node_id: String, reason: String },
}

/// Variant tag of a node.
///
/// Plain text nodes carry no tag at all (`node_type == None`). The legacy
/// `"check"` spelling is accepted when reading stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "checklist-item", alias = "check")]
    ChecklistItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Presentation attributes of a node.
///
/// Every field is optional; an absent field means "use the renderer default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
}

impl NodeStyle {
    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        *self == NodeStyle::default()
    }
}

/// The editable content of a node: its text plus the checklist payload.
///
/// Edit history stores a `NodeContent` before and after each edit, so undoing a
/// `/check` slash command restores both the text and the plain node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeContent {
    pub text: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl NodeContent {
    /// Plain text content with no checklist payload
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            node_type: None,
            checked: None,
        }
    }

    /// `Some(checked)` for checklist items, `None` for plain nodes
    pub fn checklist_state(&self) -> Option<bool> {
        match self.node_type {
            Some(NodeType::ChecklistItem) => Some(self.checked.unwrap_or(false)),
            None => None,
        }
    }

    /// Set or clear the checklist payload, keeping `node_type` and `checked` in step
    pub fn set_checklist_state(&mut self, state: Option<bool>) {
        match state {
            Some(checked) => {
                self.node_type = Some(NodeType::ChecklistItem);
                self.checked = Some(checked);
            }
            None => {
                self.node_type = None;
                self.checked = None;
            }
        }
    }
}

/// Outline node.
///
/// # Fields
///
/// - `id`: Opaque identifier, unique within a document and never reassigned
/// - `text`: Node text as typed by the user
/// - `children`: Ordered children; order is sibling rank
/// - `collapsed`: Display hint; collapsed children are skipped when flattening
/// - `node_type` / `checked`: Checklist payload (serialized as `type` / `checked`)
/// - `style`: Optional presentation attributes
///
/// # Serialization
///
/// The JSON form mirrors the stored document format:
///
/// ```json
/// {"id":"root","text":"R","children":[],"collapsed":false}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: String,

    /// Node text
    pub text: String,

    /// Ordered children, shared between tree snapshots
    #[serde(default)]
    pub children: Vec<Arc<Node>>,

    /// Whether children are hidden when navigating
    #[serde(default)]
    pub collapsed: bool,

    /// Variant tag (`"checklist-item"`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    /// Completion flag, present only for checklist items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    /// Presentation attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl Node {
    /// Create a new leaf node with an auto-generated UUID
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), text)
    }

    /// Create a new leaf node with an explicit id
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use heartbeat_core::models::Node;
    /// let root = Node::with_id("root", "My Mindmap");
    /// assert_eq!(root.id, "root");
    /// assert!(root.children.is_empty());
    /// ```
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            children: Vec::new(),
            collapsed: false,
            node_type: None,
            checked: None,
            style: None,
        }
    }

    /// Builder-style helper that appends `child` and returns `self`
    pub fn with_child(mut self, child: Node) -> Self {
        self.push_child(child);
        self
    }

    /// Append `child` as the last child
    pub fn push_child(&mut self, child: Node) {
        self.children.push(Arc::new(child));
    }

    pub fn is_checklist_item(&self) -> bool {
        self.node_type == Some(NodeType::ChecklistItem)
    }

    /// `Some(checked)` for checklist items, `None` for plain nodes
    pub fn checklist_state(&self) -> Option<bool> {
        self.content().checklist_state()
    }

    /// Set or clear the checklist payload
    pub fn set_checklist_state(&mut self, state: Option<bool>) {
        let mut content = self.content();
        content.set_checklist_state(state);
        self.node_type = content.node_type;
        self.checked = content.checked;
    }

    /// Snapshot of the editable content
    pub fn content(&self) -> NodeContent {
        NodeContent {
            text: self.text.clone(),
            node_type: self.node_type,
            checked: self.checked,
        }
    }

    /// Replace text and checklist payload in one step
    pub fn set_content(&mut self, content: NodeContent) {
        self.text = content.text;
        self.node_type = content.node_type;
        self.checked = content.checked;
    }

    /// Depth-first search for `id` in this subtree (including `self`)
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Whether `id` names this node or one of its descendants
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ids of this node and all of its descendants, in pre-order
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.id.clone());
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Number of nodes in this subtree (including `self`)
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }

    /// Repair the checklist invariant on this subtree.
    ///
    /// Stored documents are trusted structurally, but a `checked` flag without
    /// a checklist tag is dropped and a checklist tag without a flag defaults
    /// to unchecked.
    pub fn normalize_checklist(&mut self) {
        match self.node_type {
            Some(NodeType::ChecklistItem) => {
                self.checked.get_or_insert(false);
            }
            None => self.checked = None,
        }
        for child in self.children.iter_mut() {
            Arc::make_mut(child).normalize_checklist();
        }
    }

    /// Validate node structure and required fields over the whole subtree
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - any `id` is empty
    /// - an id occurs twice
    /// - `checked` is present without the checklist tag, or missing with it
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        self.validate_into(&mut seen)
    }

    fn validate_into<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if !seen.insert(self.id.as_str()) {
            return Err(ValidationError::DuplicateId(self.id.clone()));
        }

        match (self.node_type, self.checked) {
            (Some(NodeType::ChecklistItem), None) => {
                return Err(ValidationError::ChecklistMismatch {
                    node_id: self.id.clone(),
                    reason: "checklist item without checked flag".to_string(),
                });
            }
            (None, Some(_)) => {
                return Err(ValidationError::ChecklistMismatch {
                    node_id: self.id.clone(),
                    reason: "checked flag on a plain node".to_string(),
                });
            }
            _ => {}
        }

        for child in &self.children {
            child.validate_into(seen)?;
        }
        Ok(())
    }
}
