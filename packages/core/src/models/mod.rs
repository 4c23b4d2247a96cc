//! Data Models
//!
//! This module contains the core data structures of a Heartbeat outline:
//!
//! - `Node` - One outline entry with ordered children
//! - `Document` - Immutable snapshot owning the root node
//! - `NodeStyle`, `NodeType`, `NodeContent` - Value types attached to nodes

mod document;
mod node;

pub use document::{Document, DEFAULT_ROOT_TEXT, ROOT_ID};
pub use node::{FontStyle, FontWeight, Node, NodeContent, NodeStyle, NodeType, ValidationError};
