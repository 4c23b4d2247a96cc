//! Tests for the editing session
//!
//! Covers command dispatch, history groups, the edit-mode state machine,
//! clipboard semantics, zoom and write-through saving.

use super::*;
use crate::db::{BlobStore, MemoryBlobStore};
use crate::models::{NodeType, ROOT_ID};
use std::sync::Arc;

/// root
/// ├── a
/// │   ├── a1
/// │   └── a2
/// ├── b
/// └── c
fn sample() -> Document {
    Document::new(
        Node::with_id(ROOT_ID, "Root")
            .with_child(
                Node::with_id("a", "A")
                    .with_child(Node::with_id("a1", "A1"))
                    .with_child(Node::with_id("a2", "A2")),
            )
            .with_child(Node::with_id("b", "B"))
            .with_child(Node::with_id("c", "C")),
    )
}

fn editor() -> Editor {
    Editor::new(sample())
}

fn run(editor: &mut Editor, command: EditorCommand) -> CommandOutcome {
    editor.execute(command).unwrap()
}

fn select(editor: &mut Editor, id: &str) {
    run(editor, EditorCommand::Select(id.to_string()));
}

fn child_texts(editor: &Editor, id: &str) -> Vec<String> {
    editor
        .document()
        .find(id)
        .unwrap()
        .children
        .iter()
        .map(|c| c.text.clone())
        .collect()
}

#[test]
fn test_starts_on_root_in_command_mode() {
    let editor = editor();
    assert_eq!(editor.selection().cursor(), Some(ROOT_ID));
    assert_eq!(editor.mode(), &EditMode::Command);
    assert!(!editor.can_undo());
    assert!(editor.save_status().is_none());
}

#[test]
fn test_add_then_delete_then_undo_restores_position() {
    let mut editor = Editor::new(Document::new(Node::with_id(ROOT_ID, "Root")));

    run(&mut editor, EditorCommand::AddChild);
    let a = editor.selection().cursor().unwrap().to_string();
    run(&mut editor, EditorCommand::AddSibling);
    let b = editor.selection().cursor().unwrap().to_string();
    assert_eq!(child_texts(&editor, ROOT_ID), ["New Child", "New Sibling"]);

    select(&mut editor, &a);
    assert_eq!(run(&mut editor, EditorCommand::Delete), CommandOutcome::Changed);
    assert!(!editor.document().contains(&a));
    assert_eq!(editor.selection().cursor(), Some(b.as_str()));

    run(&mut editor, EditorCommand::Undo);
    let root = editor.document().root();
    assert_eq!(root.children[0].id, a);
    assert_eq!(root.children[1].id, b);
}

#[test]
fn test_undo_all_restores_initial_and_redo_replays() {
    let mut editor = editor();
    let initial = editor.document().clone();

    run(&mut editor, EditorCommand::AddChild);
    run(&mut editor, EditorCommand::BeginEdit);
    run(&mut editor, EditorCommand::UpdateBuffer("Fresh".to_string()));
    run(&mut editor, EditorCommand::ConfirmEdit(AfterConfirm::Stay));
    run(&mut editor, EditorCommand::Indent);
    run(&mut editor, EditorCommand::ToggleChecklist);
    run(
        &mut editor,
        EditorCommand::SetStyle(Some(NodeStyle {
            text_color: Some("red".to_string()),
            ..Default::default()
        })),
    );
    select(&mut editor, "a");
    run(&mut editor, EditorCommand::Delete);
    run(
        &mut editor,
        EditorCommand::MoveNode {
            node_id: "b".to_string(),
            new_parent_id: "c".to_string(),
            index: 0,
        },
    );
    let last = editor.document().clone();
    assert_ne!(last, initial);

    let mut undos = 0;
    while editor.can_undo() {
        assert_eq!(run(&mut editor, EditorCommand::Undo), CommandOutcome::Changed);
        undos += 1;
    }
    assert_eq!(undos, 7);
    assert_eq!(editor.document(), &initial);
    assert_eq!(run(&mut editor, EditorCommand::Undo), CommandOutcome::Unchanged);

    while editor.can_redo() {
        run(&mut editor, EditorCommand::Redo);
    }
    assert_eq!(editor.document(), &last);

    // redo after undo is the identity
    run(&mut editor, EditorCommand::Undo);
    run(&mut editor, EditorCommand::Redo);
    assert_eq!(editor.document(), &last);
}

#[test]
fn test_new_command_clears_redo() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::AddChild);
    run(&mut editor, EditorCommand::Undo);
    assert!(editor.can_redo());
    select(&mut editor, "b");
    run(&mut editor, EditorCommand::AddSibling);
    assert!(!editor.can_redo());
}

#[test]
fn test_root_deletion_is_rejected() {
    let mut editor = editor();
    let before = editor.document().clone();

    let err = editor.execute(EditorCommand::Delete).unwrap_err();
    assert!(err.is_root_deletion());
    assert!(editor.execute(EditorCommand::Cut).unwrap_err().is_root_deletion());

    assert_eq!(editor.document(), &before);
    assert!(!editor.can_undo());
    assert!(editor.clipboard().is_none());
}

#[test]
fn test_structural_errors_are_no_ops() {
    let mut editor = editor();
    let before = editor.document().clone();

    // Indent of a first child, outdent of a top-level node
    select(&mut editor, "a");
    assert_eq!(run(&mut editor, EditorCommand::Indent), CommandOutcome::Unchanged);
    assert_eq!(run(&mut editor, EditorCommand::Outdent), CommandOutcome::Unchanged);

    // Add sibling to the root, checkbox on a plain node
    select(&mut editor, ROOT_ID);
    assert_eq!(run(&mut editor, EditorCommand::AddSibling), CommandOutcome::Unchanged);
    assert_eq!(run(&mut editor, EditorCommand::ToggleChecked), CommandOutcome::Unchanged);

    // Cyclic and dangling moves
    let cyclic = EditorCommand::MoveNode {
        node_id: "a".to_string(),
        new_parent_id: "a1".to_string(),
        index: 0,
    };
    assert_eq!(run(&mut editor, cyclic), CommandOutcome::Unchanged);
    let dangling = EditorCommand::MoveNode {
        node_id: "a".to_string(),
        new_parent_id: "missing".to_string(),
        index: 0,
    };
    assert_eq!(run(&mut editor, dangling), CommandOutcome::Unchanged);

    // Selecting a missing node keeps the selection
    select(&mut editor, "missing");
    assert_eq!(editor.selection().cursor(), Some(ROOT_ID));

    assert_eq!(editor.document(), &before);
    assert!(!editor.can_undo());
}

#[test]
fn test_selection_after_delete() {
    let mut editor = editor();

    select(&mut editor, "b");
    run(&mut editor, EditorCommand::Delete);
    assert_eq!(editor.selection().cursor(), Some("a"));

    select(&mut editor, "a2");
    run(&mut editor, EditorCommand::Delete);
    assert_eq!(editor.selection().cursor(), Some("a1"));

    run(&mut editor, EditorCommand::Delete);
    assert_eq!(editor.selection().cursor(), Some("a"));

    // First child with a following sibling selects the next sibling
    run(&mut editor, EditorCommand::Delete);
    assert_eq!(editor.selection().cursor(), Some("c"));
}

#[test]
fn test_multi_delete_is_one_undo_step() {
    let mut editor = editor();
    let before = editor.document().clone();

    select(&mut editor, "a1");
    run(&mut editor, EditorCommand::ToggleSelection("b".to_string()));
    run(&mut editor, EditorCommand::ToggleSelection("a".to_string()));
    run(&mut editor, EditorCommand::Delete);
    assert_eq!(child_texts(&editor, ROOT_ID), ["C"]);
    assert_eq!(editor.selection().cursor(), Some("c"));

    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.document(), &before);
    assert!(!editor.can_undo());
}

#[test]
fn test_range_selection_follows_view() {
    let mut editor = editor();
    select(&mut editor, "a1");
    run(&mut editor, EditorCommand::ExtendSelection("b".to_string()));
    assert_eq!(editor.selection().ids(), ["a1", "a2", "b"]);
}

#[test]
fn test_edit_mode_blocks_global_commands() {
    let mut editor = editor();
    select(&mut editor, "b");
    run(&mut editor, EditorCommand::BeginEdit);
    assert_eq!(editor.mode().buffer(), Some("B"));

    assert_eq!(run(&mut editor, EditorCommand::Delete), CommandOutcome::Unchanged);
    assert_eq!(run(&mut editor, EditorCommand::Undo), CommandOutcome::Unchanged);
    assert_eq!(run(&mut editor, EditorCommand::SelectNext), CommandOutcome::Unchanged);
    assert!(editor.document().contains("b"));
    assert_eq!(editor.selection().cursor(), Some("b"));

    run(&mut editor, EditorCommand::UpdateBuffer("Changed".to_string()));
    run(&mut editor, EditorCommand::CancelEdit);
    assert_eq!(editor.mode(), &EditMode::Command);
    assert_eq!(editor.document().find("b").unwrap().text, "B");
    assert!(!editor.can_undo());
}

#[test]
fn test_confirm_with_slash_command_and_open_sibling() {
    let mut editor = editor();
    let before = editor.document().clone();

    select(&mut editor, "b");
    run(&mut editor, EditorCommand::BeginEdit);
    run(&mut editor, EditorCommand::UpdateBuffer("/check Buy milk".to_string()));
    let outcome = run(&mut editor, EditorCommand::ConfirmEdit(AfterConfirm::OpenSibling));
    assert_eq!(outcome, CommandOutcome::Changed);

    let b = editor.document().find("b").unwrap();
    assert_eq!(b.text, "Buy milk");
    assert_eq!(b.node_type, Some(NodeType::ChecklistItem));
    assert_eq!(b.checked, Some(false));

    assert_eq!(child_texts(&editor, ROOT_ID), ["A", "Buy milk", "New Sibling", "C"]);
    let new_id = editor.mode().editing_node().unwrap().to_string();
    assert_eq!(editor.selection().cursor(), Some(new_id.as_str()));
    assert_eq!(editor.mode().buffer(), Some(NEW_SIBLING_TEXT));

    run(&mut editor, EditorCommand::CancelEdit);
    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.document(), &before);
}

#[test]
fn test_confirm_on_root_does_not_open_sibling() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::BeginEdit);
    run(&mut editor, EditorCommand::UpdateBuffer("Renamed".to_string()));
    run(&mut editor, EditorCommand::ConfirmEdit(AfterConfirm::OpenSibling));
    assert_eq!(editor.document().root().text, "Renamed");
    assert_eq!(editor.document().root().children.len(), 3);
    assert!(!editor.mode().is_editing());
}

#[test]
fn test_confirm_then_move_selection() {
    let mut editor = editor();
    select(&mut editor, "a");
    run(&mut editor, EditorCommand::BeginEdit);
    let outcome = run(&mut editor, EditorCommand::ConfirmEdit(AfterConfirm::SelectNext));
    assert_eq!(outcome, CommandOutcome::Unchanged);
    assert_eq!(editor.selection().cursor(), Some("a1"));
    assert!(!editor.can_undo());
}

#[test]
fn test_arrow_navigation_clamps_and_skips_collapsed() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::SelectPrevious);
    assert_eq!(editor.selection().cursor(), Some(ROOT_ID));

    run(&mut editor, EditorCommand::SelectNext);
    run(&mut editor, EditorCommand::ToggleCollapsed);
    run(&mut editor, EditorCommand::SelectNext);
    assert_eq!(editor.selection().cursor(), Some("b"));
    run(&mut editor, EditorCommand::SelectNext);
    run(&mut editor, EditorCommand::SelectNext);
    assert_eq!(editor.selection().cursor(), Some("c"));
}

#[test]
fn test_collapse_is_not_recorded() {
    let mut editor = editor();
    select(&mut editor, "a");
    assert_eq!(run(&mut editor, EditorCommand::ToggleCollapsed), CommandOutcome::Changed);
    assert!(editor.document().find("a").unwrap().collapsed);
    assert!(!editor.can_undo());
    let visible: Vec<_> = editor.visible_nodes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(visible, [ROOT_ID, "a", "b", "c"]);

    // Adding a child to a collapsed node expands it
    run(&mut editor, EditorCommand::AddChild);
    assert!(!editor.document().find("a").unwrap().collapsed);
    assert_eq!(child_texts(&editor, "a"), ["A1", "A2", "New Child"]);
}

#[test]
fn test_undo_add_child_restores_collapsed_parent() {
    let mut editor = editor();
    select(&mut editor, "a");
    run(&mut editor, EditorCommand::ToggleCollapsed);
    let before = editor.document().clone();

    run(&mut editor, EditorCommand::AddChild);
    assert!(!editor.document().find("a").unwrap().collapsed);
    // Expand and add share one group
    assert_eq!(editor.history().undo_len(), 2);

    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.document(), &before);
    assert!(!editor.can_undo());
    assert!(editor.document().find("a").unwrap().collapsed);

    run(&mut editor, EditorCommand::Redo);
    assert!(!editor.document().find("a").unwrap().collapsed);
    assert_eq!(child_texts(&editor, "a"), ["A1", "A2", "New Child"]);
}

#[test]
fn test_style_is_undoable() {
    let mut editor = editor();
    select(&mut editor, "b");
    let style = NodeStyle {
        background_color: Some("#ff0".to_string()),
        ..Default::default()
    };
    run(&mut editor, EditorCommand::SetStyle(Some(style.clone())));
    assert_eq!(editor.document().find("b").unwrap().style, Some(style.clone()));
    assert_eq!(editor.history().next_undo_display_name(), Some("style"));

    // Same style again records nothing
    assert_eq!(
        run(&mut editor, EditorCommand::SetStyle(Some(style))),
        CommandOutcome::Unchanged
    );

    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.document().find("b").unwrap().style, None);
}

#[test]
fn test_copy_paste_regenerates_ids_each_time() {
    let mut editor = editor();
    select(&mut editor, "a");
    assert_eq!(run(&mut editor, EditorCommand::Copy), CommandOutcome::Unchanged);

    select(&mut editor, "c");
    run(&mut editor, EditorCommand::Paste(PasteMode::AsSiblings));
    run(&mut editor, EditorCommand::Paste(PasteMode::AsSiblings));

    assert_eq!(child_texts(&editor, ROOT_ID), ["A", "B", "C", "A", "A"]);
    assert!(editor.document().validate().is_ok());
    assert_eq!(editor.document().len(), 6 + 3 + 3);
    assert!(editor.clipboard().is_some());

    run(&mut editor, EditorCommand::Undo);
    assert_eq!(child_texts(&editor, ROOT_ID), ["A", "B", "C", "A"]);
}

#[test]
fn test_cut_paste_moves_and_clears_clipboard() {
    let mut editor = editor();
    let before = editor.document().clone();

    select(&mut editor, "a");
    run(&mut editor, EditorCommand::ToggleSelection("c".to_string()));
    run(&mut editor, EditorCommand::Cut);
    assert_eq!(child_texts(&editor, ROOT_ID), ["B"]);
    assert_eq!(editor.selection().cursor(), Some("b"));
    assert_eq!(editor.clipboard().unwrap().op, ClipboardOp::Cut);

    run(&mut editor, EditorCommand::Paste(PasteMode::AsChildren));
    assert_eq!(child_texts(&editor, "b"), ["A", "C"]);
    assert!(editor.clipboard().is_none());
    assert_eq!(
        run(&mut editor, EditorCommand::Paste(PasteMode::AsChildren)),
        CommandOutcome::Unchanged
    );

    run(&mut editor, EditorCommand::Undo);
    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.document(), &before);
}

#[test]
fn test_paste_as_sibling_of_root_is_no_op() {
    let mut editor = editor();
    select(&mut editor, "b");
    run(&mut editor, EditorCommand::Copy);
    select(&mut editor, ROOT_ID);
    assert_eq!(
        run(&mut editor, EditorCommand::Paste(PasteMode::AsSiblings)),
        CommandOutcome::Unchanged
    );
    assert_eq!(
        run(&mut editor, EditorCommand::Paste(PasteMode::AsChildren)),
        CommandOutcome::Changed
    );
    assert_eq!(child_texts(&editor, ROOT_ID), ["A", "B", "C", "B"]);
}

#[test]
fn test_zoom_scopes_navigation() {
    let mut editor = editor();
    select(&mut editor, "a");
    run(&mut editor, EditorCommand::ZoomIn);
    assert_eq!(editor.zoom_target(), Some("a"));

    let view = editor.zoom_view().unwrap();
    assert_eq!(view.breadcrumbs.len(), 1);
    let visible: Vec<_> = editor.visible_nodes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(visible, ["a", "a1", "a2"]);

    run(&mut editor, EditorCommand::SelectPrevious);
    assert_eq!(editor.selection().cursor(), Some("a"));
    for _ in 0..5 {
        run(&mut editor, EditorCommand::SelectNext);
    }
    assert_eq!(editor.selection().cursor(), Some("a2"));
    assert!(editor.search("b").is_empty());

    run(&mut editor, EditorCommand::ZoomIn);
    assert_eq!(editor.zoom_target(), Some("a2"));
    run(&mut editor, EditorCommand::ZoomOut);
    assert_eq!(editor.zoom_target(), Some("a"));
    run(&mut editor, EditorCommand::ZoomOut);
    assert_eq!(editor.zoom_target(), None);
    assert_eq!(editor.selection().cursor(), Some("a"));
}

#[test]
fn test_zoom_into_root_is_whole_document() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::ZoomIn);
    assert_eq!(editor.zoom_target(), None);
    assert!(editor.zoom_view().unwrap().is_document_root());
}

#[test]
fn test_zoom_resets_when_target_disappears() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::AddChild);
    run(&mut editor, EditorCommand::ZoomIn);
    assert!(editor.zoom_target().is_some());

    run(&mut editor, EditorCommand::Undo);
    assert_eq!(editor.zoom_target(), None);
    assert_eq!(editor.selection().cursor(), Some(ROOT_ID));
}

#[test]
fn test_import_replaces_document_and_history() {
    let mut editor = editor();
    run(&mut editor, EditorCommand::AddChild);

    let outcome = run(
        &mut editor,
        EditorCommand::Import {
            format: OutlineFormat::TabText,
            input: "Plan\n\tStep".to_string(),
        },
    );
    assert_eq!(outcome, CommandOutcome::Changed);
    assert_eq!(editor.document().root().text, "Plan");
    assert_eq!(editor.selection().cursor(), Some(ROOT_ID));
    assert!(!editor.can_undo());
}

#[test]
fn test_failed_import_leaves_document_untouched() {
    let mut editor = editor();
    let before = editor.document().clone();
    let err = editor
        .execute(EditorCommand::Import {
            format: OutlineFormat::Json,
            input: "{ nope".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::Import(_)));
    assert_eq!(editor.document(), &before);
}

#[tokio::test]
async fn test_committed_changes_are_saved() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let store = DocumentStore::new(blobs.clone());
    let mut editor = Editor::new(sample()).with_auto_saver(AutoSaver::spawn(store, "k"));

    select(&mut editor, "b");
    run(&mut editor, EditorCommand::AddChild);
    run(&mut editor, EditorCommand::ToggleCollapsed);

    let saver = editor.auto_saver().unwrap();
    assert_eq!(saver.flush().await, SaveStatus::Saved);
    assert_eq!(editor.save_status(), Some(SaveStatus::Saved));

    let stored = blobs.get("k").await.unwrap().unwrap();
    let stored: Document = serde_json::from_str(&stored).unwrap();
    assert_eq!(&stored, editor.document());
}
