//! Invertible node operations
//!
//! A `NodeOperation` describes one committed structural change with enough data
//! to replay it (`apply`) and to compute its exact inverse (`inverse`). The
//! history log stores these instead of whole tree snapshots.
//!
//! Operations are built with the `plan_*` constructors, which read the current
//! document to capture positions (parent id, sibling index) and previous values.

use crate::models::{Document, Node, NodeContent, NodeStyle};
use crate::operations::slash_command::decode_edit;
use crate::operations::tree::{self, locate};
use crate::operations::TreeError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One invertible structural change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeOperation {
    /// `node` (with subtree) was inserted as child `index` of `parent_id`
    #[serde(rename_all = "camelCase")]
    Add {
        parent_id: String,
        index: usize,
        node: Arc<Node>,
    },

    /// `node` (with subtree) was removed from position `index` of `parent_id`
    #[serde(rename_all = "camelCase")]
    Delete {
        parent_id: String,
        index: usize,
        node: Arc<Node>,
    },

    /// Text and checklist payload changed
    #[serde(rename_all = "camelCase")]
    Edit {
        node_id: String,
        before: NodeContent,
        after: NodeContent,
    },

    /// Node was reparented and/or reordered
    #[serde(rename_all = "camelCase")]
    Move {
        node_id: String,
        old_parent_id: String,
        old_index: usize,
        new_parent_id: String,
        new_index: usize,
    },

    /// Presentation attributes changed
    #[serde(rename_all = "camelCase")]
    Restyle {
        node_id: String,
        before: Option<NodeStyle>,
        after: Option<NodeStyle>,
    },

    /// Collapse flag changed as part of a structural command
    #[serde(rename_all = "camelCase")]
    SetCollapsed {
        node_id: String,
        before: bool,
        after: bool,
    },
}

impl NodeOperation {
    /// Insert `node` as the last child of `parent_id`
    pub fn plan_add_child(doc: &Document, parent_id: &str, node: Node) -> Result<Self, TreeError> {
        let parent = doc
            .find(parent_id)
            .ok_or_else(|| TreeError::node_not_found(parent_id))?;
        Ok(Self::Add {
            parent_id: parent_id.to_string(),
            index: parent.children.len(),
            node: Arc::new(node),
        })
    }

    /// Insert `node` right after `reference_id`
    pub fn plan_add_sibling(
        doc: &Document,
        reference_id: &str,
        node: Node,
    ) -> Result<Self, TreeError> {
        let location =
            locate(doc, reference_id).ok_or_else(|| TreeError::node_not_found(reference_id))?;
        let parent = location
            .parent
            .ok_or_else(|| TreeError::root_has_no_parent(reference_id))?;
        Ok(Self::Add {
            parent_id: parent.id.clone(),
            index: location.index + 1,
            node: Arc::new(node),
        })
    }

    /// Insert `node` at an explicit position
    pub fn plan_insert(parent_id: &str, index: usize, node: Node) -> Self {
        Self::Add {
            parent_id: parent_id.to_string(),
            index,
            node: Arc::new(node),
        }
    }

    /// Remove `node_id`, capturing its original position and full subtree
    pub fn plan_delete(doc: &Document, node_id: &str) -> Result<Self, TreeError> {
        if doc.is_root(node_id) {
            return Err(TreeError::cannot_delete_root(node_id));
        }
        let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
        let parent = location
            .parent
            .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;
        Ok(Self::Delete {
            parent_id: parent.id.clone(),
            index: location.index,
            node: Arc::clone(&parent.children[location.index]),
        })
    }

    /// Commit `new_text` (slash commands included) to `node_id`.
    ///
    /// Returns `Ok(None)` when the commit would not change anything.
    pub fn plan_edit(doc: &Document, node_id: &str, new_text: &str) -> Result<Option<Self>, TreeError> {
        let before = doc
            .content_of(node_id)
            .ok_or_else(|| TreeError::node_not_found(node_id))?;
        let after = decode_edit(&before, new_text);
        Ok(Self::content_change(node_id, before, after))
    }

    /// Switch `node_id` between plain node and checklist item
    pub fn plan_toggle_checklist(doc: &Document, node_id: &str) -> Result<Self, TreeError> {
        let before = doc
            .content_of(node_id)
            .ok_or_else(|| TreeError::node_not_found(node_id))?;
        let mut after = before.clone();
        after.set_checklist_state(match before.checklist_state() {
            Some(_) => None,
            None => Some(false),
        });
        Ok(Self::Edit {
            node_id: node_id.to_string(),
            before,
            after,
        })
    }

    /// Flip the checkbox of a checklist item
    pub fn plan_toggle_checked(doc: &Document, node_id: &str) -> Result<Self, TreeError> {
        let before = doc
            .content_of(node_id)
            .ok_or_else(|| TreeError::node_not_found(node_id))?;
        let checked = before
            .checklist_state()
            .ok_or_else(|| TreeError::NotChecklistItem {
                node_id: node_id.to_string(),
            })?;
        let mut after = before.clone();
        after.set_checklist_state(Some(!checked));
        Ok(Self::Edit {
            node_id: node_id.to_string(),
            before,
            after,
        })
    }

    fn content_change(node_id: &str, before: NodeContent, after: NodeContent) -> Option<Self> {
        (before != after).then(|| Self::Edit {
            node_id: node_id.to_string(),
            before,
            after,
        })
    }

    /// Move `node_id` under `new_parent_id` at `new_index` (post-detach index).
    ///
    /// Rejects cyclic targets and out-of-range indices up front so that a
    /// planned move always applies cleanly.
    pub fn plan_move(
        doc: &Document,
        node_id: &str,
        new_parent_id: &str,
        new_index: usize,
    ) -> Result<Self, TreeError> {
        if doc.is_root(node_id) {
            return Err(TreeError::root_has_no_parent(node_id));
        }
        let location = locate(doc, node_id).ok_or_else(|| TreeError::node_not_found(node_id))?;
        let old_parent = location
            .parent
            .ok_or_else(|| TreeError::root_has_no_parent(node_id))?;
        if location.node.contains(new_parent_id) {
            return Err(TreeError::cyclic_move(node_id, new_parent_id));
        }
        let new_parent = doc
            .find(new_parent_id)
            .ok_or_else(|| TreeError::node_not_found(new_parent_id))?;

        let len_after_detach = if new_parent.id == old_parent.id {
            new_parent.children.len() - 1
        } else {
            new_parent.children.len()
        };
        if new_index > len_after_detach {
            return Err(TreeError::IndexOutOfRange {
                parent_id: new_parent_id.to_string(),
                index: new_index,
                len: len_after_detach,
            });
        }

        Ok(Self::Move {
            node_id: node_id.to_string(),
            old_parent_id: old_parent.id.clone(),
            old_index: location.index,
            new_parent_id: new_parent_id.to_string(),
            new_index,
        })
    }

    /// Tab semantics as a move
    pub fn plan_indent(doc: &Document, node_id: &str) -> Result<Self, TreeError> {
        let (parent_id, index) = tree::indent_target(doc, node_id)?;
        Self::plan_move(doc, node_id, &parent_id, index)
    }

    /// Shift+Tab semantics as a move
    pub fn plan_outdent(doc: &Document, node_id: &str) -> Result<Self, TreeError> {
        let (parent_id, index) = tree::outdent_target(doc, node_id)?;
        Self::plan_move(doc, node_id, &parent_id, index)
    }

    /// Replace the style of `node_id`. Returns `Ok(None)` when nothing changes.
    pub fn plan_restyle(
        doc: &Document,
        node_id: &str,
        style: Option<NodeStyle>,
    ) -> Result<Option<Self>, TreeError> {
        let node = doc
            .find(node_id)
            .ok_or_else(|| TreeError::node_not_found(node_id))?;
        let after = style.filter(|s| !s.is_empty());
        Ok((node.style != after).then(|| Self::Restyle {
            node_id: node_id.to_string(),
            before: node.style.clone(),
            after,
        }))
    }

    /// Set the collapse flag of `node_id`. Returns `Ok(None)` when it already has that value.
    pub fn plan_set_collapsed(
        doc: &Document,
        node_id: &str,
        collapsed: bool,
    ) -> Result<Option<Self>, TreeError> {
        let node = doc
            .find(node_id)
            .ok_or_else(|| TreeError::node_not_found(node_id))?;
        Ok((node.collapsed != collapsed).then(|| Self::SetCollapsed {
            node_id: node_id.to_string(),
            before: node.collapsed,
            after: collapsed,
        }))
    }

    /// Apply this operation to `doc`, producing the next snapshot
    pub fn apply(&self, doc: &Document) -> Result<Document, TreeError> {
        match self {
            Self::Add {
                parent_id,
                index,
                node,
            } => tree::insert_node(doc, parent_id, *index, Arc::clone(node)),
            Self::Delete {
                parent_id,
                index,
                node,
            } => {
                let location =
                    locate(doc, &node.id).ok_or_else(|| TreeError::node_not_found(&node.id))?;
                let at_recorded_place = location.parent.map(|p| p.id.as_str())
                    == Some(parent_id.as_str())
                    && location.index == *index;
                if !at_recorded_place {
                    tracing::debug!(
                        "Deleting node '{}' away from its recorded position {}[{}]",
                        node.id,
                        parent_id,
                        index
                    );
                }
                tree::delete_node(doc, &node.id)
            }
            Self::Edit { node_id, after, .. } => tree::set_content(doc, node_id, after),
            Self::Move {
                node_id,
                new_parent_id,
                new_index,
                ..
            } => tree::move_node(doc, node_id, new_parent_id, *new_index),
            Self::Restyle { node_id, after, .. } => tree::set_style(doc, node_id, after.clone()),
            Self::SetCollapsed { node_id, after, .. } => {
                tree::set_collapsed(doc, node_id, *after)
            }
        }
    }

    /// The operation that undoes this one
    pub fn inverse(&self) -> Self {
        match self.clone() {
            Self::Add {
                parent_id,
                index,
                node,
            } => Self::Delete {
                parent_id,
                index,
                node,
            },
            Self::Delete {
                parent_id,
                index,
                node,
            } => Self::Add {
                parent_id,
                index,
                node,
            },
            Self::Edit {
                node_id,
                before,
                after,
            } => Self::Edit {
                node_id,
                before: after,
                after: before,
            },
            Self::Move {
                node_id,
                old_parent_id,
                old_index,
                new_parent_id,
                new_index,
            } => Self::Move {
                node_id,
                old_parent_id: new_parent_id,
                old_index: new_index,
                new_parent_id: old_parent_id,
                new_index: old_index,
            },
            Self::Restyle {
                node_id,
                before,
                after,
            } => Self::Restyle {
                node_id,
                before: after,
                after: before,
            },
            Self::SetCollapsed {
                node_id,
                before,
                after,
            } => Self::SetCollapsed {
                node_id,
                before: after,
                after: before,
            },
        }
    }

    /// Id of the node the operation is about
    pub fn node_id(&self) -> &str {
        match self {
            Self::Add { node, .. } | Self::Delete { node, .. } => &node.id,
            Self::Edit { node_id, .. }
            | Self::Move { node_id, .. }
            | Self::Restyle { node_id, .. }
            | Self::SetCollapsed { node_id, .. } => node_id,
        }
    }

    /// Short name for logs and undo/redo menu labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Edit { .. } => "edit",
            Self::Move { .. } => "move",
            Self::Restyle { .. } => "style",
            Self::SetCollapsed { after: true, .. } => "collapse",
            Self::SetCollapsed { after: false, .. } => "expand",
        }
    }
}
