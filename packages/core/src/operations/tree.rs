//! Pure structural operations over outline documents
//!
//! Every function takes a `Document` snapshot and returns a new one; the input
//! is never modified. Only the nodes on the path from the root to the edited
//! node are copied, all other subtrees are shared with the input snapshot.
//!
//! Targets are located with a depth-first search from the root. Outlines are
//! small (hundreds of nodes), so no id index is maintained.
//!
//! # Examples
//!
//! ```rust
//! use heartbeat_core::models::{Document, Node};
//! use heartbeat_core::operations::tree;
//!
//! let doc = Document::new(Node::with_id("root", "R"));
//! let doc = tree::add_child(&doc, "root", Node::with_id("a", "A")).unwrap();
//! let doc = tree::add_sibling(&doc, "a", Node::with_id("b", "B")).unwrap();
//!
//! let ids: Vec<_> = doc.root().children.iter().map(|n| n.id.as_str()).collect();
//! assert_eq!(ids, ["a", "b"]);
//! ```

use crate::models::{Document, Node, NodeContent, NodeStyle};
use crate::operations::slash_command::decode_edit;
use crate::operations::TreeError;
use std::collections::HashSet;
use std::sync::Arc;

/// Position of a node inside a document
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    pub node: &'a Node,
    /// `None` for the root
    pub parent: Option<&'a Node>,
    /// Index among the parent's children (0 for the root)
    pub index: usize,
    /// Distance from the root (0 for the root)
    pub depth: usize,
}

/// Find `id` together with its parent, sibling index and depth
pub fn locate<'a>(doc: &'a Document, id: &str) -> Option<Location<'a>> {
    locate_in(doc.root(), None, 0, 0, id)
}

fn locate_in<'a>(
    node: &'a Node,
    parent: Option<&'a Node>,
    index: usize,
    depth: usize,
    id: &str,
) -> Option<Location<'a>> {
    if node.id == id {
        return Some(Location {
            node,
            parent,
            index,
            depth,
        });
    }
    node.children
        .iter()
        .enumerate()
        .find_map(|(i, child)| locate_in(child, Some(node), i, depth + 1, id))
}

/// Depth-first lookup by id
pub fn find_by_id<'a>(doc: &'a Document, id: &str) -> Option<&'a Node> {
    doc.find(id)
}

/// Copy the path from the root to `target`, applying `f` to the copy of `target`.
///
/// Returns `Ok(None)` when `target` is not in this subtree.
fn rebuild<F>(node: &Arc<Node>, target: &str, f: &mut F) -> Result<Option<Arc<Node>>, TreeError>
where
    F: FnMut(&mut Node) -> Result<(), TreeError>,
{
    if node.id == target {
        let mut updated = Node::clone(node);
        f(&mut updated)?;
        return Ok(Some(Arc::new(updated)));
    }

    for (index, child) in node.children.iter().enumerate() {
        if let Some(replacement) = rebuild(child, target, f)? {
            let mut updated = Node::clone(node);
            updated.children[index] = replacement;
            return Ok(Some(Arc::new(updated)));
        }
    }

    Ok(None)
}

fn update_node<F>(doc: &Document, id: &str, mut f: F) -> Result<Document, TreeError>
where
    F: FnMut(&mut Node) -> Result<(), TreeError>,
{
    rebuild(doc.root_arc(), id, &mut f)?
        .map(Document::from_arc)
        .ok_or_else(|| TreeError::node_not_found(id))
}

fn ensure_fresh_ids(doc: &Document, subtree: &Node) -> Result<(), TreeError> {
    let existing: HashSet<String> = doc.root().subtree_ids().into_iter().collect();
    match subtree.subtree_ids().into_iter().find(|id| existing.contains(id)) {
        Some(id) => Err(TreeError::duplicate_id(id)),
        None => Ok(()),
    }
}

fn insert_unchecked(
    doc: &Document,
    parent_id: &str,
    index: usize,
    subtree: Arc<Node>,
) -> Result<Document, TreeError> {
    update_node(doc, parent_id, |parent| {
        let len = parent.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange {
                parent_id: parent.id.clone(),
                index,
                len,
            });
        }
        parent.children.insert(index, Arc::clone(&subtree));
        Ok(())
    })
}

/// Insert `subtree` as child number `index` of `parent_id`.
///
/// Fails when the parent is missing, the index is past the end, or any id of
/// the subtree already exists in the document.
pub fn insert_node(
    doc: &Document,
    parent_id: &str,
    index: usize,
    subtree: Arc<Node>,
) -> Result<Document, TreeError> {
    ensure_fresh_ids(doc, &subtree)?;
    insert_unchecked(doc, parent_id, index, subtree)
}

/// Append `node` as the last child of `parent_id`
pub fn add_child(doc: &Document, parent_id: &str, node: Node) -> Result<Document, TreeError> {
    let parent = doc
        .find(parent_id)
        .ok_or_else(|| TreeError::node_not_found(parent_id))?;
    let index = parent.children.len();
    insert_node(doc, parent_id, index, Arc::new(node))
}

/// Insert `node` immediately after `reference_id` among its siblings
pub fn add_sibling(doc: &Document, reference_id: &str, node: Node) -> Result<Document, TreeError> {
    let location = locate(doc, reference_id).ok_or_else(|| TreeError::node_not_found(reference_id))?;
    let parent = location
        .parent
        .ok_or_else(|| TreeError::root_has_no_parent(reference_id))?;
    insert_node(doc, &parent.id, location.index + 1, Arc::new(node))
}

/// Remove `node_id` and its whole subtree.
///
/// # Errors
///
/// `TreeError::CannotDeleteRoot` when `node_id` is the root; this is the one
/// structural error callers must not swallow.
pub fn delete_node(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    if doc.is_root(node_id) {
        return Err(TreeError::cannot_delete_root(node_id));
    }

    let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
    let parent_id = location
        .parent
        .map(|parent| parent.id.clone())
        .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;
    let index = location.index;

    update_node(doc, &parent_id, |parent| {
        parent.children.remove(index);
        Ok(())
    })
}

/// Commit `new_text` to `node_id`, applying a leading slash command if present
pub fn edit_text(doc: &Document, node_id: &str, new_text: &str) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        let next = decode_edit(&node.content(), new_text);
        node.set_content(next);
        Ok(())
    })
}

/// Overwrite text and checklist payload of `node_id` verbatim (no slash decoding)
pub fn set_content(doc: &Document, node_id: &str, content: &NodeContent) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        node.set_content(content.clone());
        Ok(())
    })
}

/// Detach `node_id` (with its subtree) and reinsert it as child `new_index` of
/// `new_parent_id`.
///
/// `new_index` is interpreted after the node has been detached, so moving
/// within the same parent uses the final position.
///
/// # Errors
///
/// - `CyclicMove` when `new_parent_id` is `node_id` or one of its descendants
/// - `RootHasNoParent` when moving the root
/// - `NodeNotFound` / `IndexOutOfRange` for bad targets
pub fn move_node(
    doc: &Document,
    node_id: &str,
    new_parent_id: &str,
    new_index: usize,
) -> Result<Document, TreeError> {
    if doc.is_root(node_id) {
        return Err(TreeError::root_has_no_parent(node_id));
    }

    let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
    if location.node.contains(new_parent_id) {
        return Err(TreeError::cyclic_move(node_id, new_parent_id));
    }
    if !doc.contains(new_parent_id) {
        return Err(TreeError::node_not_found(new_parent_id));
    }

    let subtree = location
        .parent
        .map(|parent| Arc::clone(&parent.children[location.index]))
        .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;

    let detached = delete_node(doc, node_id)?;
    insert_unchecked(&detached, new_parent_id, new_index, subtree)
}

/// Flip the `collapsed` display hint
pub fn toggle_collapsed(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        node.collapsed = !node.collapsed;
        Ok(())
    })
}

/// Set the `collapsed` display hint to a given value
pub fn set_collapsed(doc: &Document, node_id: &str, collapsed: bool) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        node.collapsed = collapsed;
        Ok(())
    })
}

/// Replace (or clear, with `None`) the style of `node_id`
pub fn set_style(
    doc: &Document,
    node_id: &str,
    style: Option<NodeStyle>,
) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        node.style = style.clone();
        Ok(())
    })
}

/// Switch between plain node and (unchecked) checklist item
pub fn toggle_checklist(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| {
        let next = match node.checklist_state() {
            Some(_) => None,
            None => Some(false),
        };
        node.set_checklist_state(next);
        Ok(())
    })
}

/// Flip `checked` on a checklist item
pub fn toggle_checked(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    update_node(doc, node_id, |node| match node.checklist_state() {
        Some(checked) => {
            node.set_checklist_state(Some(!checked));
            Ok(())
        }
        None => Err(TreeError::NotChecklistItem {
            node_id: node.id.clone(),
        }),
    })
}

/// Target of an indent: `(new_parent_id, new_index)`
pub fn indent_target(doc: &Document, node_id: &str) -> Result<(String, usize), TreeError> {
    let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
    let parent = location
        .parent
        .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;
    if location.index == 0 {
        return Err(TreeError::NoPreviousSibling {
            node_id: node_id.to_string(),
        });
    }
    let previous = &parent.children[location.index - 1];
    Ok((previous.id.clone(), previous.children.len()))
}

/// Target of an outdent: `(new_parent_id, new_index)`
pub fn outdent_target(doc: &Document, node_id: &str) -> Result<(String, usize), TreeError> {
    let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
    let parent = location
        .parent
        .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;
    let parent_location =
        locate(doc, &parent.id).ok_or_else(|| TreeError::node_not_found(&parent.id))?;
    let grandparent = parent_location.parent.ok_or_else(|| TreeError::AlreadyTopLevel {
        node_id: node_id.to_string(),
    })?;
    Ok((grandparent.id.clone(), parent_location.index + 1))
}

/// Tab: make `node_id` the last child of its preceding sibling
pub fn indent(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    let (parent_id, index) = indent_target(doc, node_id)?;
    move_node(doc, node_id, &parent_id, index)
}

/// Shift+Tab: make `node_id` the next sibling of its current parent
pub fn outdent(doc: &Document, node_id: &str) -> Result<Document, TreeError> {
    let (parent_id, index) = outdent_target(doc, node_id)?;
    move_node(doc, node_id, &parent_id, index)
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
