//! Subtree duplication with fresh identifiers
//!
//! Copy/cut/paste duplicates whole subtrees. Every node in a duplicate gets a
//! newly generated id so a paste can never collide with ids already in the
//! document.

use crate::models::Node;
use std::sync::Arc;
use uuid::Uuid;

/// Deep copy of `node` in which every node at every level has a fresh UUID
pub fn with_fresh_ids(node: &Node) -> Node {
    Node {
        id: Uuid::new_v4().to_string(),
        text: node.text.clone(),
        children: node
            .children
            .iter()
            .map(|child| Arc::new(with_fresh_ids(child)))
            .collect(),
        collapsed: node.collapsed,
        node_type: node.node_type,
        checked: node.checked,
        style: node.style.clone(),
    }
}
