//! Business Services
//!
//! This module contains the editing-session services built on top of the
//! pure tree operations:
//!
//! - `Editor` - command dispatch for one live document
//! - `HistoryManager` - grouped undo/redo over invertible operations
//! - `Selection`, `Clipboard`, `EditMode` - interaction state
//! - `navigation` - flatten, search, zoom and arrow traversal
//! - `import_export` - JSON, Markdown and tab-indented outlines
//!
//! Services coordinate between the persistence layer and the tree operations,
//! implementing editing rules and orchestrating multi-step commands.

pub mod editor;
pub mod error;
pub mod history;
pub mod import_export;
pub mod navigation;
pub mod selection;

pub use editor::{AfterConfirm, CommandOutcome, Editor, EditorCommand};
pub use error::{EditorError, ImportError};
pub use history::{HistoryEntry, HistoryManager, HistoryStep, DEFAULT_HISTORY_CAPACITY};
pub use import_export::OutlineFormat;
pub use navigation::{SearchHit, VisibleNode, ZoomView};
pub use selection::{Clipboard, ClipboardOp, EditMode, PasteMode, Selection};
