//! Selection Model
//!
//! Selection, clipboard and edit-mode state for one editing session. None of
//! these types mutate a document; the [`Editor`](crate::services::Editor)
//! turns their output into tree operations.
//!
//! - [`Selection`] - single, range (anchor + cursor) and toggle multi-select
//! - [`Clipboard`] - deep copies of selected subtrees tagged copy or cut
//! - [`EditMode`] - the command/edit state machine with its text buffer

use crate::models::{Document, Node};
use crate::operations::with_fresh_ids;
use crate::services::navigation::flatten;
use serde::{Deserialize, Serialize};

/// Ordered set of selected node ids.
///
/// `anchor` is where a range selection starts and stays fixed while the range
/// is extended; `cursor` is the node that receives keyboard commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    ids: Vec<String>,
    anchor: Option<String>,
    cursor: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding just `id`
    pub fn single(id: impl Into<String>) -> Self {
        let mut selection = Self::new();
        selection.select(id);
        selection
    }

    /// Replace the selection with `id` (plain click / arrow key)
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.ids = vec![id.clone()];
        self.anchor = Some(id.clone());
        self.cursor = Some(id);
    }

    /// Select every node between the anchor and `id` in the current flatten
    /// order of `root` (shift-click).
    ///
    /// The span is recomputed from the tree as it is now, so nodes hidden by a
    /// collapse since the anchor was set are not included. Falls back to a
    /// plain select when there is no anchor or either end is not visible.
    pub fn extend_to(&mut self, root: &Node, id: &str) {
        let Some(anchor) = self.anchor.clone() else {
            self.select(id);
            return;
        };

        let order = flatten(root);
        let anchor_index = order.iter().position(|node| node.id == anchor);
        let target_index = order.iter().position(|node| node.id == id);

        match (anchor_index, target_index) {
            (Some(a), Some(t)) => {
                let (start, end) = if a <= t { (a, t) } else { (t, a) };
                self.ids = order[start..=end]
                    .iter()
                    .map(|node| node.id.clone())
                    .collect();
                self.cursor = Some(id.to_string());
            }
            _ => self.select(id),
        }
    }

    /// Add `id` to the selection, or remove it if already selected (ctrl-click)
    pub fn toggle(&mut self, id: &str) {
        if let Some(position) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(position);
            if self.cursor.as_deref() == Some(id) {
                self.cursor = self.ids.last().cloned();
            }
            if self.anchor.as_deref() == Some(id) {
                self.anchor = self.cursor.clone();
            }
        } else {
            self.ids.push(id.to_string());
            self.cursor = Some(id.to_string());
            if self.anchor.is_none() {
                self.anchor = Some(id.to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
        self.cursor = None;
    }

    /// Drop ids that no longer exist in `doc` (after delete, undo, import)
    pub fn retain_existing(&mut self, doc: &Document) {
        self.ids.retain(|id| doc.contains(id));
        if self.cursor.as_deref().is_some_and(|id| !doc.contains(id)) {
            self.cursor = self.ids.last().cloned();
        }
        if self.anchor.as_deref().is_some_and(|id| !doc.contains(id)) {
            self.anchor = self.cursor.clone();
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected nodes whose ancestors are not selected, in document order.
    ///
    /// These are the subtrees a copy, cut or delete acts on; a selected
    /// descendant is already covered by its selected ancestor.
    pub fn top_level<'a>(&self, doc: &'a Document) -> Vec<&'a Node> {
        let mut out = Vec::new();
        collect_top_level(doc.root(), &self.ids, &mut out);
        out
    }
}

fn collect_top_level<'a>(node: &'a Node, ids: &[String], out: &mut Vec<&'a Node>) {
    if ids.iter().any(|id| *id == node.id) {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect_top_level(child, ids, out);
    }
}

/// How the clipboard content was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardOp {
    Copy,
    Cut,
}

/// Where pasted subtrees go relative to the paste target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PasteMode {
    /// Right after the target, in clipboard order
    #[default]
    AsSiblings,
    /// Appended as the last children of the target
    AsChildren,
}

/// Deep copies of selected subtrees
#[derive(Debug, Clone, PartialEq)]
pub struct Clipboard {
    pub nodes: Vec<Node>,
    pub op: ClipboardOp,
}

impl Clipboard {
    /// Capture `nodes` with fresh ids at every level
    pub fn capture(nodes: &[&Node], op: ClipboardOp) -> Self {
        Self {
            nodes: nodes.iter().map(|node| with_fresh_ids(node)).collect(),
            op,
        }
    }

    /// The subtrees to insert for one paste.
    ///
    /// A copy can be pasted repeatedly, so every paste gets another set of
    /// fresh ids. A cut is pasted once as captured.
    pub fn nodes_for_paste(&self) -> Vec<Node> {
        match self.op {
            ClipboardOp::Copy => self.nodes.iter().map(with_fresh_ids).collect(),
            ClipboardOp::Cut => self.nodes.clone(),
        }
    }

    /// Whether the clipboard empties after a paste
    pub fn clears_on_paste(&self) -> bool {
        self.op == ClipboardOp::Cut
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Command/edit state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Keystrokes are editor commands
    #[default]
    Command,
    /// Keystrokes go to the text buffer of `node_id`
    Edit { node_id: String, buffer: String },
}

impl EditMode {
    /// Enter edit mode on `node`, seeding the buffer with its current text
    pub fn begin(node: &Node) -> Self {
        Self::Edit {
            node_id: node.id.clone(),
            buffer: node.text.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Edit { .. })
    }

    pub fn editing_node(&self) -> Option<&str> {
        match self {
            Self::Edit { node_id, .. } => Some(node_id),
            Self::Command => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Edit { buffer, .. } => Some(buffer),
            Self::Command => None,
        }
    }

    /// Replace the buffer contents; ignored in command mode
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        if let Self::Edit { buffer, .. } = self {
            *buffer = text.into();
        }
    }

    /// Leave edit mode, returning `(node_id, buffer)` if we were editing
    pub fn take(&mut self) -> Option<(String, String)> {
        match std::mem::take(self) {
            Self::Edit { node_id, buffer } => Some((node_id, buffer)),
            Self::Command => None,
        }
    }
}
