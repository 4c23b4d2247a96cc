//! Editor Workflow Integration Tests
//!
//! Drives the public `Editor` API the way a keyboard session does and checks
//! the document-level guarantees:
//!
//! - Undoing every recorded command restores the starting document
//! - Redo replays to exactly the same snapshot
//! - Every snapshot along the way keeps unique ids and consistent checklists
//! - Import/export through the session round-trips text and nesting

#[cfg(test)]
mod editor_workflow_tests {
    use anyhow::Result;
    use heartbeat_core::models::{Document, Node};
    use heartbeat_core::services::import_export::{export_markdown, export_tab_text};
    use heartbeat_core::services::{
        AfterConfirm, Editor, EditorCommand, OutlineFormat, PasteMode,
    };

    /// Fixed command script touching every recorded command kind
    fn script(step: usize) -> Vec<EditorCommand> {
        let text = format!("Item {}", step);
        match step % 9 {
            0 => vec![EditorCommand::AddChild],
            1 => vec![
                EditorCommand::BeginEdit,
                EditorCommand::UpdateBuffer(text),
                EditorCommand::ConfirmEdit(AfterConfirm::OpenSibling),
                EditorCommand::UpdateBuffer(format!("/check Task {}", step)),
                EditorCommand::ConfirmEdit(AfterConfirm::Stay),
            ],
            2 => vec![EditorCommand::Indent],
            3 => vec![EditorCommand::ToggleChecked],
            4 => vec![EditorCommand::SelectPrevious, EditorCommand::Copy],
            5 => vec![EditorCommand::Paste(PasteMode::AsSiblings)],
            6 => vec![EditorCommand::Outdent, EditorCommand::ToggleChecklist],
            7 => vec![EditorCommand::SelectNext, EditorCommand::AddSibling],
            _ => vec![EditorCommand::SelectPrevious, EditorCommand::Delete],
        }
    }

    fn run_script(editor: &mut Editor, steps: usize) -> Result<Vec<Document>> {
        let mut snapshots = Vec::new();
        for step in 0..steps {
            for command in script(step) {
                match editor.execute(command) {
                    Ok(_) => {}
                    // The script may land on the root; that is the one hard rejection
                    Err(err) if err.is_root_deletion() => {}
                    Err(err) => return Err(err.into()),
                }
            }
            editor.document().validate()?;
            snapshots.push(editor.document().clone());
        }
        Ok(snapshots)
    }

    #[test]
    fn test_undo_everything_restores_start() -> Result<()> {
        let start = Document::new_default();
        let mut editor = Editor::new(start.clone());

        run_script(&mut editor, 45)?;
        let end = editor.document().clone();
        assert!(end.len() > 1);

        while editor.can_undo() {
            editor.execute(EditorCommand::Undo)?;
            editor.document().validate()?;
        }
        assert_eq!(editor.document(), &start);

        while editor.can_redo() {
            editor.execute(EditorCommand::Redo)?;
        }
        assert_eq!(editor.document(), &end);
        Ok(())
    }

    #[test]
    fn test_history_capacity_limits_undo_depth() -> Result<()> {
        let config = heartbeat_core::EditorConfig {
            history_capacity: 3,
            ..Default::default()
        };
        let mut editor = Editor::with_config(Document::new_default(), &config);
        for _ in 0..5 {
            editor.execute(EditorCommand::AddChild)?;
        }

        let mut undone = 0;
        while editor.can_undo() {
            editor.execute(EditorCommand::Undo)?;
            undone += 1;
        }
        assert_eq!(undone, 3);
        // Two oldest additions are beyond the undo horizon
        assert_eq!(editor.document().len(), 3);
        Ok(())
    }

    #[test]
    fn test_import_then_export_through_session() -> Result<()> {
        let mut editor = Editor::new(Document::new_default());
        let outline = "Launch\n\tDesign\n\t\tWireframes\n\tBuild\n";
        editor.execute(EditorCommand::Import {
            format: OutlineFormat::TabText,
            input: outline.to_string(),
        })?;
        assert_eq!(export_tab_text(editor.document().root()), outline);

        let design = editor.document().root().children[0].id.clone();
        editor.execute(EditorCommand::Select(design))?;
        editor.execute(EditorCommand::ZoomIn)?;
        assert_eq!(
            export_markdown(editor.view_root()),
            "- Design\n  - Wireframes\n"
        );

        let markdown = export_markdown(editor.document().root());
        editor.execute(EditorCommand::Import {
            format: OutlineFormat::Markdown,
            input: markdown,
        })?;
        assert_eq!(export_tab_text(editor.document().root()), outline);
        assert_eq!(editor.zoom_target(), None);
        Ok(())
    }

    #[test]
    fn test_search_follows_collapse_state() -> Result<()> {
        let doc = Document::new(
            Node::with_id("root", "Groceries")
                .with_child(Node::with_id("fruit", "Fruit").with_child(Node::new("Apples")))
                .with_child(Node::new("Apple pie")),
        );
        let mut editor = Editor::new(doc);
        assert_eq!(editor.search("apple").len(), 2);

        editor.execute(EditorCommand::Select("fruit".to_string()))?;
        editor.execute(EditorCommand::ToggleCollapsed)?;
        let hits: Vec<_> = editor
            .search("apple")
            .iter()
            .map(|n| n.text.clone())
            .collect();
        assert_eq!(hits, ["Apple pie"]);
        Ok(())
    }
}
