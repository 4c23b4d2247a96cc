//! Navigation & Query Layer
//!
//! Derived, read-only views over a document snapshot:
//!
//! - `flatten` - on-screen (pre-order, collapse-aware) order
//! - `path_to` - root-to-node path for breadcrumbs
//! - `search` - case-insensitive substring search in flatten order
//! - `zoom_scope` - subtree view plus breadcrumbs
//! - `next_visible` / `previous_visible` - arrow-key traversal
//!
//! All functions are pure: calling them again on the same snapshot yields the
//! same result, and the snapshot is never modified.

use crate::models::{Document, Node};

/// A flattened node together with its depth relative to the flatten start
#[derive(Debug, Clone, Copy)]
pub struct VisibleNode<'a> {
    pub node: &'a Node,
    pub depth: usize,
}

/// Pre-order traversal of `root`, skipping the children of collapsed nodes.
///
/// The start node itself is always included, even when it is collapsed.
pub fn flatten(root: &Node) -> Vec<&Node> {
    flatten_with_depth(root)
        .into_iter()
        .map(|visible| visible.node)
        .collect()
}

/// Like [`flatten`], with the depth of each node (start node has depth 0)
pub fn flatten_with_depth(root: &Node) -> Vec<VisibleNode<'_>> {
    let mut out = Vec::new();
    visit(root, 0, &mut out);
    out
}

fn visit<'a>(node: &'a Node, depth: usize, out: &mut Vec<VisibleNode<'a>>) {
    out.push(VisibleNode { node, depth });
    if node.collapsed {
        return;
    }
    for child in &node.children {
        visit(child, depth + 1, out);
    }
}

/// Nodes from the root down to `node_id` (inclusive); empty if not found
pub fn path_to<'a>(root: &'a Node, node_id: &str) -> Vec<&'a Node> {
    let mut path = Vec::new();
    if collect_path(root, node_id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn collect_path<'a>(node: &'a Node, node_id: &str, path: &mut Vec<&'a Node>) -> bool {
    path.push(node);
    if node.id == node_id {
        return true;
    }
    for child in &node.children {
        if collect_path(child, node_id, path) {
            return true;
        }
    }
    path.pop();
    false
}

/// Case-insensitive substring search over the flattened (collapse-aware) order.
///
/// The query is matched as typed, surrounding whitespace included; only an
/// empty query matches nothing.
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::models::Node;
/// use heartbeat_core::services::navigation::search;
///
/// let root = Node::with_id("root", "List")
///     .with_child(Node::new("Buy milk"))
///     .with_child(Node::new("Walk dog"));
///
/// let hits: Vec<_> = search(&root, "BUY").iter().map(|n| n.text.as_str()).collect();
/// assert_eq!(hits, ["Buy milk"]);
/// ```
pub fn search<'a>(root: &'a Node, query: &str) -> Vec<&'a Node> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    flatten(root)
        .into_iter()
        .filter(|node| node.text.to_lowercase().contains(&needle))
        .collect()
}

/// A search hit with its breadcrumb path (root first, excluding the hit)
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub node: &'a Node,
    pub path: Vec<&'a Node>,
}

impl SearchHit<'_> {
    /// Breadcrumb label such as `"Root › Groceries"`
    pub fn path_label(&self) -> String {
        self.path
            .iter()
            .map(|node| node.text.as_str())
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

/// [`search`] with the path of every hit, for result lists that show context
pub fn search_with_paths<'a>(root: &'a Node, query: &str) -> Vec<SearchHit<'a>> {
    search(root, query)
        .into_iter()
        .map(|node| {
            let mut path = path_to(root, &node.id);
            path.pop();
            SearchHit { node, path }
        })
        .collect()
}

/// Subtree presented while zoomed into a node
#[derive(Debug, Clone)]
pub struct ZoomView<'a> {
    /// Node the view is rooted at
    pub root: &'a Node,
    /// Ancestors from the document root down to (excluding) `root`
    pub breadcrumbs: Vec<&'a Node>,
}

impl<'a> ZoomView<'a> {
    /// Flatten order inside the zoomed subtree
    pub fn flatten(&self) -> Vec<&'a Node> {
        flatten(self.root)
    }

    /// Whether the view is the whole document
    pub fn is_document_root(&self) -> bool {
        self.breadcrumbs.is_empty()
    }
}

/// Scope navigation to the subtree at `node_id`; `None` if it does not exist
pub fn zoom_scope<'a>(doc: &'a Document, node_id: &str) -> Option<ZoomView<'a>> {
    let mut path = path_to(doc.root(), node_id);
    let root = path.pop()?;
    Some(ZoomView {
        root,
        breadcrumbs: path,
    })
}

/// Id of the node after `node_id` in flatten order (clamped at the end)
pub fn next_visible<'a>(root: &'a Node, node_id: &str) -> Option<&'a str> {
    let flat = flatten(root);
    let index = flat.iter().position(|node| node.id == node_id)?;
    let next = (index + 1).min(flat.len() - 1);
    Some(flat[next].id.as_str())
}

/// Id of the node before `node_id` in flatten order (clamped at the start)
pub fn previous_visible<'a>(root: &'a Node, node_id: &str) -> Option<&'a str> {
    let flat = flatten(root);
    let index = flat.iter().position(|node| node.id == node_id)?;
    Some(flat[index.saturating_sub(1)].id.as_str())
}
