//! Tree Operations
//!
//! This module provides the structural editing layer:
//!
//! - [`tree`] - Pure functions producing a new `Document` per edit
//! - [`NodeOperation`] - Invertible description of a committed edit, as stored in history
//! - [`decode_edit`] - Slash-command decoding applied when an edit is committed
//! - [`with_fresh_ids`] - Subtree duplication for the clipboard
//! - [`TreeError`] - Structural-invalid conditions

pub mod clipboard;
pub mod error;
pub mod node_operation;
pub mod slash_command;
pub mod tree;

pub use clipboard::with_fresh_ids;
pub use error::TreeError;
pub use node_operation::NodeOperation;
pub use slash_command::{decode_edit, parse_slash_command, SlashCommand};
pub use tree::{find_by_id, locate, Location};
