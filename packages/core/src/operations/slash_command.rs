//! Slash-command decoding for edit commits
//!
//! A node text that starts with a reserved command token switches the node
//! variant as part of the same edit:
//!
//! - `/check Buy milk` → checklist item "Buy milk", unchecked
//! - `/text Buy milk` → plain node "Buy milk"
//!
//! Decoding is a pure `text -> NodeContent` function applied at edit-commit
//! time, so new commands only touch this module.

use crate::models::NodeContent;

/// Recognized slash commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    /// Turn the node into an unchecked checklist item
    Check,
    /// Turn the node back into plain text
    Text,
}

impl SlashCommand {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "/check" => Some(Self::Check),
            "/text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Split a leading command token off `text`.
///
/// Returns the command and the remaining text (leading whitespace removed).
/// Unknown `/words` and texts without a leading slash yield `None`.
pub fn parse_slash_command(text: &str) -> Option<(SlashCommand, &str)> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('/') {
        return None;
    }

    let token_end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let command = SlashCommand::from_token(&trimmed[..token_end])?;
    Some((command, trimmed[token_end..].trim_start()))
}

/// Compute the content a node ends up with when `new_text` is committed.
///
/// Without a command token the checklist payload of `current` is kept and only
/// the text changes.
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::models::{NodeContent, NodeType};
/// use heartbeat_core::operations::decode_edit;
///
/// let after = decode_edit(&NodeContent::plain("old"), "/check Walk dog");
/// assert_eq!(after.text, "Walk dog");
/// assert_eq!(after.node_type, Some(NodeType::ChecklistItem));
/// assert_eq!(after.checked, Some(false));
/// ```
pub fn decode_edit(current: &NodeContent, new_text: &str) -> NodeContent {
    let mut next = current.clone();
    match parse_slash_command(new_text) {
        Some((SlashCommand::Check, rest)) => {
            next.text = rest.to_string();
            next.set_checklist_state(Some(false));
        }
        Some((SlashCommand::Text, rest)) => {
            next.text = rest.to_string();
            next.set_checklist_state(None);
        }
        None => next.text = new_text.to_string(),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeType;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(
            parse_slash_command("/check Buy milk"),
            Some((SlashCommand::Check, "Buy milk"))
        );
        assert_eq!(
            parse_slash_command("  /text   spaced"),
            Some((SlashCommand::Text, "spaced"))
        );
        assert_eq!(parse_slash_command("/check"), Some((SlashCommand::Check, "")));
    }

    #[test]
    fn test_unknown_or_embedded_commands_are_literal() {
        assert_eq!(parse_slash_command("/unknown thing"), None);
        assert_eq!(parse_slash_command("see /check later"), None);
        assert_eq!(parse_slash_command("/checked"), None);
        assert_eq!(parse_slash_command(""), None);
    }

    #[test]
    fn test_decode_plain_edit_keeps_checklist_state() {
        let mut current = NodeContent::plain("old");
        current.set_checklist_state(Some(true));

        let next = decode_edit(&current, "new text");
        assert_eq!(next.text, "new text");
        assert_eq!(next.checklist_state(), Some(true));
    }

    #[test]
    fn test_decode_text_command_clears_checklist() {
        let mut current = NodeContent::plain("task");
        current.set_checklist_state(Some(true));

        let next = decode_edit(&current, "/text plain again");
        assert_eq!(next, NodeContent::plain("plain again"));
    }

    #[test]
    fn test_decode_check_command_resets_checked() {
        let mut current = NodeContent::plain("done");
        current.set_checklist_state(Some(true));

        let next = decode_edit(&current, "/check redo it");
        assert_eq!(next.node_type, Some(NodeType::ChecklistItem));
        assert_eq!(next.checked, Some(false));
        assert_eq!(next.text, "redo it");
    }
}
