//! Editing Session
//!
//! `Editor` owns one live document together with its history, selection,
//! clipboard, edit mode, zoom target and (optionally) an [`AutoSaver`]. Every
//! user action arrives as an [`EditorCommand`]; the editor turns it into
//! [`NodeOperation`]s, applies them, records them in history and hands the new
//! snapshot to the auto-saver.
//!
//! # Error policy
//!
//! - Structural errors (missing node, cyclic move, indent of a first child...)
//!   are logged at debug level and the command becomes a no-op
//! - Deleting or cutting the root is rejected with an error
//! - Import errors are returned and leave the live document untouched
//!
//! # Examples
//!
//! ```rust
//! use heartbeat_core::models::Document;
//! use heartbeat_core::services::{CommandOutcome, Editor, EditorCommand};
//!
//! let mut editor = Editor::new(Document::new_default());
//! let outcome = editor.execute(EditorCommand::AddChild).unwrap();
//! assert_eq!(outcome, CommandOutcome::Changed);
//! assert_eq!(editor.document().root().children[0].text, "New Child");
//!
//! editor.execute(EditorCommand::Undo).unwrap();
//! assert!(editor.document().root().children.is_empty());
//! ```

use crate::config::EditorConfig;
use crate::db::{AutoSaver, DocumentStore, SaveStatus};
use crate::models::{Document, Node, NodeStyle};
use crate::operations::{locate, tree, NodeOperation, TreeError};
use crate::services::history::HistoryManager;
use crate::services::import_export::{import_document, OutlineFormat};
use crate::services::navigation::{self, ZoomView};
use crate::services::selection::{Clipboard, ClipboardOp, EditMode, PasteMode, Selection};
use crate::services::EditorError;

/// Text of nodes created by add-sibling and Enter-confirm
pub const NEW_SIBLING_TEXT: &str = "New Sibling";

/// Text of nodes created by add-child
pub const NEW_CHILD_TEXT: &str = "New Child";

/// What happens after an edit is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterConfirm {
    /// Back to command mode on the same node
    #[default]
    Stay,
    /// Insert a new sibling and keep editing it (Enter)
    OpenSibling,
    /// Select the next visible node (arrow down)
    SelectNext,
    /// Select the previous visible node (arrow up)
    SelectPrevious,
}

/// One user action
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // Selection and navigation
    Select(String),
    ExtendSelection(String),
    ToggleSelection(String),
    SelectNext,
    SelectPrevious,
    ZoomIn,
    ZoomOut,
    ZoomReset,

    // Structure
    AddSibling,
    AddChild,
    Delete,
    Indent,
    Outdent,
    MoveNode {
        node_id: String,
        new_parent_id: String,
        index: usize,
    },

    // Single-field updates
    ToggleCollapsed,
    ToggleChecklist,
    ToggleChecked,
    SetStyle(Option<NodeStyle>),

    // Edit mode
    BeginEdit,
    UpdateBuffer(String),
    ConfirmEdit(AfterConfirm),
    CancelEdit,

    // Clipboard
    Copy,
    Cut,
    Paste(PasteMode),

    // History
    Undo,
    Redo,

    /// Replace the whole document with parsed input
    Import {
        format: OutlineFormat,
        input: String,
    },
}

impl EditorCommand {
    /// Commands accepted while a node is being edited
    fn allowed_in_edit_mode(&self) -> bool {
        matches!(
            self,
            Self::UpdateBuffer(_) | Self::ConfirmEdit(_) | Self::CancelEdit
        )
    }
}

/// Whether a command changed the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Changed,
    Unchanged,
}

impl CommandOutcome {
    pub fn changed(self) -> bool {
        self == Self::Changed
    }

    fn or(self, other: Self) -> Self {
        if self.changed() || other.changed() {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }
}

/// A single-document editing session
#[derive(Debug)]
pub struct Editor {
    doc: Document,
    history: HistoryManager,
    selection: Selection,
    clipboard: Option<Clipboard>,
    mode: EditMode,
    zoom: Option<String>,
    saver: Option<AutoSaver>,
}

impl Editor {
    /// Session over `doc` with default settings and no persistence
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, &EditorConfig::default())
    }

    pub fn with_config(doc: Document, config: &EditorConfig) -> Self {
        let selection = Selection::single(doc.root_id());
        Self {
            doc,
            history: HistoryManager::with_max_size(config.history_capacity),
            selection,
            clipboard: None,
            mode: EditMode::Command,
            zoom: None,
            saver: None,
        }
    }

    /// Attach a write-through saver; every committed change is scheduled on it
    pub fn with_auto_saver(mut self, saver: AutoSaver) -> Self {
        self.saver = Some(saver);
        self
    }

    /// Load `key` (or its fallback document) and start auto-saving to it.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(store: DocumentStore, key: &str, config: &EditorConfig) -> Self {
        let store = store.with_retry(config.save_retry.clone());
        let doc = store.load_or_default(key).await;
        tracing::info!("Opened document '{}' with {} nodes", key, doc.len());
        Self::with_config(doc, config).with_auto_saver(AutoSaver::spawn(store, key))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Save status of the attached auto-saver, if any
    pub fn save_status(&self) -> Option<SaveStatus> {
        self.saver.as_ref().map(AutoSaver::status)
    }

    pub fn auto_saver(&self) -> Option<&AutoSaver> {
        self.saver.as_ref()
    }

    /// Detach the auto-saver, e.g. to flush and shut it down
    pub fn take_auto_saver(&mut self) -> Option<AutoSaver> {
        self.saver.take()
    }

    /// Id of the zoomed-into node, `None` when showing the whole document
    pub fn zoom_target(&self) -> Option<&str> {
        self.zoom.as_deref()
    }

    /// Node the view is rooted at
    pub fn view_root(&self) -> &Node {
        self.zoom
            .as_deref()
            .and_then(|id| self.doc.find(id))
            .unwrap_or_else(|| self.doc.root())
    }

    /// Zoomed subtree with breadcrumbs
    pub fn zoom_view(&self) -> Option<ZoomView<'_>> {
        navigation::zoom_scope(&self.doc, &self.view_root().id)
    }

    /// Visible nodes of the current view in on-screen order
    pub fn visible_nodes(&self) -> Vec<&Node> {
        navigation::flatten(self.view_root())
    }

    /// Search the current view
    pub fn search(&self, query: &str) -> Vec<&Node> {
        navigation::search(self.view_root(), query)
    }

    /// Dispatch one command.
    ///
    /// While a node is being edited only buffer, confirm and cancel commands
    /// are processed; everything else is ignored.
    pub fn execute(&mut self, command: EditorCommand) -> Result<CommandOutcome, EditorError> {
        if self.mode.is_editing() && !command.allowed_in_edit_mode() {
            tracing::debug!("Ignoring {:?} while editing", command);
            return Ok(CommandOutcome::Unchanged);
        }

        match command {
            EditorCommand::Select(id) => {
                if self.doc.contains(&id) {
                    self.selection.select(id);
                }
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::ExtendSelection(id) => {
                let view_root = self.view_root().clone();
                self.selection.extend_to(&view_root, &id);
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::ToggleSelection(id) => {
                if self.doc.contains(&id) {
                    self.selection.toggle(&id);
                }
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::SelectNext => self.step_selection(true),
            EditorCommand::SelectPrevious => self.step_selection(false),
            EditorCommand::ZoomIn => self.zoom_in(),
            EditorCommand::ZoomOut => self.zoom_out(),
            EditorCommand::ZoomReset => {
                self.zoom = None;
                Ok(CommandOutcome::Unchanged)
            }

            EditorCommand::AddSibling => self.add_sibling(),
            EditorCommand::AddChild => self.add_child(),
            EditorCommand::Delete => self.delete_selected(),
            EditorCommand::Indent => self.indent_selected(true),
            EditorCommand::Outdent => self.indent_selected(false),
            EditorCommand::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => {
                let planned =
                    NodeOperation::plan_move(&self.doc, &node_id, &new_parent_id, index);
                self.commit_planned(planned)
            }

            EditorCommand::ToggleCollapsed => self.toggle_collapsed(),
            EditorCommand::ToggleChecklist => self.for_each_selected(|doc, id| {
                NodeOperation::plan_toggle_checklist(doc, id).map(Some)
            }),
            EditorCommand::ToggleChecked => self.for_each_selected(|doc, id| {
                NodeOperation::plan_toggle_checked(doc, id).map(Some)
            }),
            EditorCommand::SetStyle(style) => self.for_each_selected(|doc, id| {
                NodeOperation::plan_restyle(doc, id, style.clone())
            }),

            EditorCommand::BeginEdit => {
                let node = self.selection.cursor().and_then(|id| self.doc.find(id));
                if let Some(node) = node {
                    self.mode = EditMode::begin(node);
                }
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::UpdateBuffer(text) => {
                self.mode.set_buffer(text);
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::ConfirmEdit(after) => self.confirm_edit(after),
            EditorCommand::CancelEdit => {
                self.mode = EditMode::Command;
                Ok(CommandOutcome::Unchanged)
            }

            EditorCommand::Copy => {
                self.copy_selected(ClipboardOp::Copy);
                Ok(CommandOutcome::Unchanged)
            }
            EditorCommand::Cut => self.cut_selected(),
            EditorCommand::Paste(mode) => self.paste(mode),

            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),

            EditorCommand::Import { format, input } => self.import(format, &input),
        }
    }

    fn cursor(&self) -> Option<&str> {
        self.selection.cursor()
    }

    fn cursor_id(&self) -> Option<String> {
        self.cursor().map(str::to_string)
    }

    // ------------------------------------------------------------------
    // Commit plumbing
    // ------------------------------------------------------------------

    /// Apply `op`, record it and publish the new snapshot
    fn commit(&mut self, op: NodeOperation) -> Result<CommandOutcome, EditorError> {
        match op.apply(&self.doc) {
            Ok(next) => {
                tracing::debug!("Applied {} on '{}'", op.display_name(), op.node_id());
                self.doc = next;
                self.history.push(op);
                self.after_change();
                Ok(CommandOutcome::Changed)
            }
            Err(err) => self.degrade(err),
        }
    }

    fn commit_planned(
        &mut self,
        planned: Result<NodeOperation, TreeError>,
    ) -> Result<CommandOutcome, EditorError> {
        match planned {
            Ok(op) => self.commit(op),
            Err(err) => self.degrade(err),
        }
    }

    /// Structural errors become no-ops, except the hard rejections
    fn degrade(&self, err: TreeError) -> Result<CommandOutcome, EditorError> {
        if err.is_hard_rejection() {
            tracing::debug!("Rejected: {}", err);
            return Err(err.into());
        }
        tracing::debug!("No-op: {}", err);
        Ok(CommandOutcome::Unchanged)
    }

    /// Run `f` with every committed operation sharing one history group
    fn grouped<F>(&mut self, f: F) -> Result<CommandOutcome, EditorError>
    where
        F: FnOnce(&mut Self) -> Result<CommandOutcome, EditorError>,
    {
        self.history.start_group();
        let result = f(self);
        self.history.end_group();
        result
    }

    /// Keep derived state consistent with the new snapshot and persist it
    fn after_change(&mut self) {
        self.selection.retain_existing(&self.doc);
        if self.selection.is_empty() {
            self.selection.select(self.doc.root_id());
        }
        if self.zoom.as_deref().is_some_and(|id| !self.doc.contains(id)) {
            self.zoom = None;
        }
        if let Some(saver) = &self.saver {
            saver.schedule(self.doc.clone());
        }
    }

    /// Plan and commit one operation per top-level selected node, as a group
    fn for_each_selected<F>(&mut self, plan: F) -> Result<CommandOutcome, EditorError>
    where
        F: Fn(&Document, &str) -> Result<Option<NodeOperation>, TreeError>,
    {
        let targets = self.selected_ids();
        self.grouped(|editor| {
            let mut outcome = CommandOutcome::Unchanged;
            for id in &targets {
                let step = match plan(&editor.doc, id) {
                    Ok(Some(op)) => editor.commit(op)?,
                    Ok(None) => CommandOutcome::Unchanged,
                    Err(err) => editor.degrade(err)?,
                };
                outcome = outcome.or(step);
            }
            Ok(outcome)
        })
    }

    /// Top-level selected node ids in document order
    fn selected_ids(&self) -> Vec<String> {
        self.selection
            .top_level(&self.doc)
            .into_iter()
            .map(|node| node.id.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn step_selection(&mut self, forward: bool) -> Result<CommandOutcome, EditorError> {
        let view_root = self.view_root();
        let next = self
            .cursor()
            .and_then(|id| {
                if forward {
                    navigation::next_visible(view_root, id)
                } else {
                    navigation::previous_visible(view_root, id)
                }
            })
            .unwrap_or(view_root.id.as_str())
            .to_string();
        self.selection.select(next);
        Ok(CommandOutcome::Unchanged)
    }

    fn zoom_in(&mut self) -> Result<CommandOutcome, EditorError> {
        if let Some(id) = self.cursor_id() {
            self.zoom = (!self.doc.is_root(&id) && self.doc.contains(&id)).then_some(id);
        }
        Ok(CommandOutcome::Unchanged)
    }

    fn zoom_out(&mut self) -> Result<CommandOutcome, EditorError> {
        if let Some(current) = self.zoom.take() {
            self.zoom = locate(&self.doc, &current)
                .and_then(|location| location.parent)
                .filter(|parent| !self.doc.is_root(&parent.id))
                .map(|parent| parent.id.clone());
            self.selection.select(current);
        }
        Ok(CommandOutcome::Unchanged)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    fn add_sibling(&mut self) -> Result<CommandOutcome, EditorError> {
        let Some(target) = self.cursor_id() else {
            return Ok(CommandOutcome::Unchanged);
        };
        let node = Node::new(NEW_SIBLING_TEXT);
        let new_id = node.id.clone();
        let planned = NodeOperation::plan_add_sibling(&self.doc, &target, node);
        let outcome = self.commit_planned(planned)?;
        if outcome.changed() {
            self.selection.select(new_id);
        }
        Ok(outcome)
    }

    fn add_child(&mut self) -> Result<CommandOutcome, EditorError> {
        let Some(target) = self.cursor_id() else {
            return Ok(CommandOutcome::Unchanged);
        };
        let node = Node::new(NEW_CHILD_TEXT);
        let new_id = node.id.clone();
        // A collapsed target is expanded in the same undo step as the add
        let outcome = self.grouped(|editor| {
            let expanded = match NodeOperation::plan_set_collapsed(&editor.doc, &target, false) {
                Ok(Some(op)) => editor.commit(op)?,
                Ok(None) => CommandOutcome::Unchanged,
                Err(err) => return editor.degrade(err),
            };
            let planned = NodeOperation::plan_add_child(&editor.doc, &target, node);
            Ok(expanded.or(editor.commit_planned(planned)?))
        })?;
        if outcome.changed() {
            self.selection.select(new_id);
        }
        Ok(outcome)
    }

    /// Node to select after `removed` (document order) are deleted: previous
    /// sibling of the first, else its next surviving sibling, else its parent
    fn selection_after_delete(&self, removed: &[String]) -> Option<String> {
        let first = removed.first()?;
        let location = locate(&self.doc, first)?;
        let parent = location.parent?;

        if location.index > 0 {
            return Some(parent.children[location.index - 1].id.clone());
        }
        parent.children[location.index + 1..]
            .iter()
            .find(|sibling| !removed.contains(&sibling.id))
            .map(|sibling| sibling.id.clone())
            .or_else(|| Some(parent.id.clone()))
    }

    fn delete_selected(&mut self) -> Result<CommandOutcome, EditorError> {
        let targets = self.selected_ids();
        self.delete_nodes(&targets)
    }

    fn delete_nodes(&mut self, targets: &[String]) -> Result<CommandOutcome, EditorError> {
        if let Some(root) = targets.iter().find(|id| self.doc.is_root(id)) {
            return Err(TreeError::cannot_delete_root(root.as_str()).into());
        }
        if targets.is_empty() {
            return Ok(CommandOutcome::Unchanged);
        }

        let next_selection = self.selection_after_delete(targets);
        let outcome = self.grouped(|editor| {
            let mut outcome = CommandOutcome::Unchanged;
            for id in targets {
                let planned = NodeOperation::plan_delete(&editor.doc, id);
                outcome = outcome.or(editor.commit_planned(planned)?);
            }
            Ok(outcome)
        })?;

        if let Some(id) = next_selection.filter(|id| self.doc.contains(id)) {
            self.selection.select(id);
        }
        Ok(outcome)
    }

    fn indent_selected(&mut self, indent: bool) -> Result<CommandOutcome, EditorError> {
        let mut targets = self.selected_ids();
        // Outdent bottom-up so earlier siblings do not land below later ones
        if !indent {
            targets.reverse();
        }
        self.grouped(|editor| {
            let mut outcome = CommandOutcome::Unchanged;
            for id in &targets {
                let planned = if indent {
                    NodeOperation::plan_indent(&editor.doc, id)
                } else {
                    NodeOperation::plan_outdent(&editor.doc, id)
                };
                outcome = outcome.or(editor.commit_planned(planned)?);
            }
            Ok(outcome)
        })
    }

    fn toggle_collapsed(&mut self) -> Result<CommandOutcome, EditorError> {
        let Some(target) = self.cursor_id() else {
            return Ok(CommandOutcome::Unchanged);
        };
        match tree::toggle_collapsed(&self.doc, &target) {
            Ok(next) => {
                self.doc = next;
                self.after_change();
                Ok(CommandOutcome::Changed)
            }
            Err(err) => self.degrade(err),
        }
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    fn confirm_edit(&mut self, after: AfterConfirm) -> Result<CommandOutcome, EditorError> {
        let Some((node_id, buffer)) = self.mode.take() else {
            return Ok(CommandOutcome::Unchanged);
        };

        let outcome = self.grouped(|editor| {
            let mut outcome = match NodeOperation::plan_edit(&editor.doc, &node_id, &buffer) {
                Ok(Some(op)) => editor.commit(op)?,
                Ok(None) => CommandOutcome::Unchanged,
                Err(err) => editor.degrade(err)?,
            };

            if after == AfterConfirm::OpenSibling && !editor.doc.is_root(&node_id) {
                let node = Node::new(NEW_SIBLING_TEXT);
                let new_id = node.id.clone();
                let planned = NodeOperation::plan_add_sibling(&editor.doc, &node_id, node);
                let added = editor.commit_planned(planned)?;
                if added.changed() {
                    editor.selection.select(new_id.as_str());
                    if let Some(node) = editor.doc.find(&new_id) {
                        editor.mode = EditMode::begin(node);
                    }
                }
                outcome = outcome.or(added);
            }
            Ok(outcome)
        })?;

        match after {
            AfterConfirm::SelectNext => {
                self.step_selection(true)?;
            }
            AfterConfirm::SelectPrevious => {
                self.step_selection(false)?;
            }
            AfterConfirm::Stay | AfterConfirm::OpenSibling => {}
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    fn copy_selected(&mut self, op: ClipboardOp) {
        let nodes = self.selection.top_level(&self.doc);
        if nodes.is_empty() {
            return;
        }
        self.clipboard = Some(Clipboard::capture(&nodes, op));
    }

    fn cut_selected(&mut self) -> Result<CommandOutcome, EditorError> {
        let targets = self.selected_ids();
        if let Some(root) = targets.iter().find(|id| self.doc.is_root(id)) {
            return Err(TreeError::cannot_delete_root(root.as_str()).into());
        }
        self.copy_selected(ClipboardOp::Cut);
        self.delete_nodes(&targets)
    }

    fn paste(&mut self, mode: PasteMode) -> Result<CommandOutcome, EditorError> {
        let (Some(clipboard), Some(target)) = (self.clipboard.as_ref(), self.cursor_id()) else {
            return Ok(CommandOutcome::Unchanged);
        };
        let nodes = clipboard.nodes_for_paste();
        let clears = clipboard.clears_on_paste();

        let Some(location) = locate(&self.doc, &target) else {
            return Ok(CommandOutcome::Unchanged);
        };
        let (parent_id, start) = match mode {
            PasteMode::AsSiblings => match location.parent {
                Some(parent) => (parent.id.clone(), location.index + 1),
                None => {
                    tracing::debug!("No-op: cannot paste next to the root");
                    return Ok(CommandOutcome::Unchanged);
                }
            },
            PasteMode::AsChildren => (target.clone(), location.node.children.len()),
        };

        let first_id = nodes.first().map(|node| node.id.clone());
        let outcome = self.grouped(|editor| {
            let mut outcome = CommandOutcome::Unchanged;
            for (offset, node) in nodes.into_iter().enumerate() {
                let op = NodeOperation::plan_insert(&parent_id, start + offset, node);
                outcome = outcome.or(editor.commit(op)?);
            }
            Ok(outcome)
        })?;

        if outcome.changed() {
            if clears {
                self.clipboard = None;
            }
            if let Some(id) = first_id {
                self.selection.select(id);
            }
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn undo(&mut self) -> Result<CommandOutcome, EditorError> {
        let Some(step) = self.history.undo() else {
            return Ok(CommandOutcome::Unchanged);
        };
        let inverses: Vec<NodeOperation> = step
            .entries
            .iter()
            .map(|entry| entry.operation.inverse())
            .collect();
        Ok(self.replay(&inverses, "undo"))
    }

    fn redo(&mut self) -> Result<CommandOutcome, EditorError> {
        let Some(step) = self.history.redo() else {
            return Ok(CommandOutcome::Unchanged);
        };
        let operations: Vec<NodeOperation> = step
            .entries
            .into_iter()
            .map(|entry| entry.operation)
            .collect();
        Ok(self.replay(&operations, "redo"))
    }

    /// Apply history operations in order, all or nothing
    fn replay(&mut self, operations: &[NodeOperation], action: &str) -> CommandOutcome {
        let mut doc = self.doc.clone();
        for op in operations {
            match op.apply(&doc) {
                Ok(next) => doc = next,
                Err(err) => {
                    tracing::warn!(
                        "Cannot {} {} on '{}': {}. Clearing history",
                        action,
                        op.display_name(),
                        op.node_id(),
                        err
                    );
                    self.history.clear();
                    return CommandOutcome::Unchanged;
                }
            }
        }

        self.doc = doc;
        if let Some(id) = operations
            .last()
            .map(|op| op.node_id().to_string())
            .filter(|id| self.doc.contains(id))
        {
            self.selection.select(id);
        }
        self.after_change();
        CommandOutcome::Changed
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    fn import(&mut self, format: OutlineFormat, input: &str) -> Result<CommandOutcome, EditorError> {
        let doc = import_document(format, input)?;
        tracing::info!("Imported {} document with {} nodes", format, doc.len());

        self.doc = doc;
        self.history.clear();
        self.zoom = None;
        self.mode = EditMode::Command;
        self.selection.select(self.doc.root_id());
        self.after_change();
        Ok(CommandOutcome::Changed)
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;
