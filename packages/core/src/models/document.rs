//! Outline Document
//!
//! A `Document` is an immutable snapshot of one outline: a single root node and
//! everything below it. Every structural operation produces a new `Document`;
//! untouched subtrees are shared with the previous snapshot through `Arc`.

use crate::models::{Node, NodeContent, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reserved identifier of the root node in newly created documents
pub const ROOT_ID: &str = "root";

/// Text of the root node of a fresh document
pub const DEFAULT_ROOT_TEXT: &str = "My Mindmap";

/// Tree snapshot owning the root node.
///
/// Serializes transparently as the root node, which is the stored blob format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Arc<Node>,
}

impl Document {
    /// Wrap an existing root node
    pub fn new(root: Node) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub(crate) fn from_arc(root: Arc<Node>) -> Self {
        Self { root }
    }

    /// Fallback document used when nothing is stored under a key
    pub fn new_default() -> Self {
        Self::new(Node::with_id(ROOT_ID, DEFAULT_ROOT_TEXT))
    }

    /// The demo fixture shown to visitors who are not signed in
    pub fn demo() -> Self {
        let canva = Node::new("4. Edit with Canva")
            .with_child(Node::new("Add overlays"))
            .with_child(Node::new("Add text effects"))
            .with_child(Node::new("Export as video"));

        let root = Node::with_id(ROOT_ID, "Joke Video Creation")
            .with_child(Node::new("1. Select joke reference image"))
            .with_child(Node::new("2. Type joke text"))
            .with_child(Node::new("3. Generate image (AI or meme tool)"))
            .with_child(canva)
            .with_child(Node::new("5. Add song (background music)"))
            .with_child(Node::new(
                "6. Upload to platform (YouTube, Instagram, etc.)",
            ));

        Self::new(root)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_arc(&self) -> &Arc<Node> {
        &self.root
    }

    /// Identifier of the root node
    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.root.id == id
    }

    /// Depth-first lookup by id
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.root.contains(id)
    }

    /// Editable content of `id`, if present
    pub fn content_of(&self, id: &str) -> Option<NodeContent> {
        self.find(id).map(Node::content)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.root.subtree_len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Check id uniqueness and the checklist invariant
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.root.validate()
    }

    /// Whether two snapshots share the same root allocation
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new_default()
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}
