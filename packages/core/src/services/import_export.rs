//! Import and export formats
//!
//! | Format | Export | Import |
//! |--------|--------|--------|
//! | JSON | full round-trip (ids, collapse, checklist, style) | structure trusted, checklist fields normalized |
//! | Markdown | `- text`, two spaces per depth | bullet lists via `pulldown-cmark` |
//! | Tab text | one tab per depth | indent-depth stack |
//!
//! Exports start at any node, so a zoomed subtree can be exported on its own.
//! They ignore `collapsed`: hidden children are exported too. Imports build a
//! complete new document or fail without side effects.

use crate::models::{Document, Node, DEFAULT_ROOT_TEXT, ROOT_ID};
use crate::services::ImportError;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported outline formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutlineFormat {
    Json,
    Markdown,
    TabText,
}

impl OutlineFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::TabText => "txt",
        }
    }
}

impl fmt::Display for OutlineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::TabText => "tabs",
        };
        f.write_str(name)
    }
}

impl FromStr for OutlineFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            "tabs" | "tab" | "txt" | "text" => Ok(Self::TabText),
            other => Err(format!(
                "Unknown format '{other}' (expected json, markdown or tabs)"
            )),
        }
    }
}

/// Parse `input` as a complete document in `format`
pub fn import_document(format: OutlineFormat, input: &str) -> Result<Document, ImportError> {
    match format {
        OutlineFormat::Json => import_json(input),
        OutlineFormat::Markdown => import_markdown(input),
        OutlineFormat::TabText => import_tab_text(input),
    }
}

/// Render the subtree at `root` in `format`
pub fn export_subtree(root: &Node, format: OutlineFormat) -> Result<String, serde_json::Error> {
    match format {
        OutlineFormat::Json => serde_json::to_string_pretty(root),
        OutlineFormat::Markdown => Ok(export_markdown(root)),
        OutlineFormat::TabText => Ok(export_tab_text(root)),
    }
}

/// Serialize the whole document as pretty-printed JSON
pub fn export_json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Markdown bullet list of the subtree at `root`
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::models::Node;
/// use heartbeat_core::services::import_export::export_markdown;
///
/// let root = Node::with_id("root", "Root").with_child(Node::new("Child"));
/// assert_eq!(export_markdown(&root), "- Root\n  - Child\n");
/// ```
pub fn export_markdown(root: &Node) -> String {
    let mut out = String::new();
    write_lines(root, 0, &mut out, &|depth: usize| "  ".repeat(depth) + "- ");
    out
}

/// Tab-indented outline of the subtree at `root`
pub fn export_tab_text(root: &Node) -> String {
    let mut out = String::new();
    write_lines(root, 0, &mut out, &|depth: usize| "\t".repeat(depth));
    out
}

fn write_lines(node: &Node, depth: usize, out: &mut String, prefix: &dyn Fn(usize) -> String) {
    out.push_str(&prefix(depth));
    out.push_str(&single_line(&node.text));
    out.push('\n');
    for child in &node.children {
        write_lines(child, depth + 1, out, prefix);
    }
}

/// Line-based formats cannot carry embedded newlines
fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}

/// Parse a JSON document tree.
///
/// Ids, order and flags are taken as stored. Checklist fields are normalized
/// and the result must pass [`Document::validate`].
pub fn import_json(input: &str) -> Result<Document, ImportError> {
    let mut root: Node = serde_json::from_str(input)?;
    root.normalize_checklist();
    let doc = Document::new(root);
    doc.validate()?;
    Ok(doc)
}

/// Parse a tab-indented outline.
///
/// Each non-empty line is a node; its depth is the number of leading tabs and
/// its parent is the nearest preceding line with a strictly smaller depth.
/// The rest of the line is kept verbatim as the node text, so empty and
/// space-padded texts survive an export/import cycle.
/// A single top-level line becomes the root; several top-level lines are
/// wrapped under a new root.
///
/// # Examples
///
/// ```rust
/// use heartbeat_core::services::import_export::import_tab_text;
///
/// let doc = import_tab_text("Root\n\tChild 1\n\tChild 2\n\t\tGrandchild").unwrap();
/// assert_eq!(doc.root().text, "Root");
/// assert_eq!(doc.root().children.len(), 2);
/// assert_eq!(doc.root().children[1].children[0].text, "Grandchild");
/// ```
pub fn import_tab_text(input: &str) -> Result<Document, ImportError> {
    let mut builder = OutlineBuilder::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let depth = line.bytes().take_while(|b| *b == b'\t').count();
        if builder.is_empty() && depth > 0 {
            return Err(ImportError::MalformedIndentation {
                line: index + 1,
                depth,
            });
        }
        builder.push(depth, Node::new(&line[depth..]));
    }

    builder.finish().ok_or(ImportError::Empty)
}

/// Parse a Markdown bullet list (as produced by [`export_markdown`]).
///
/// Only list items become nodes; headings and paragraphs outside lists are
/// ignored. Task list items (`- [ ] x`, `- [x] x`) become checklist items.
pub fn import_markdown(input: &str) -> Result<Document, ImportError> {
    // Items in document order with their list depth; `open` indexes into it
    let mut items: Vec<(usize, Node)> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for event in Parser::new_ext(input, Options::ENABLE_TASKLISTS) {
        let current = open.last().copied();
        match event {
            Event::Start(Tag::Item) => {
                open.push(items.len());
                items.push((open.len() - 1, Node::new(String::new())));
            }
            Event::End(TagEnd::Item) => {
                open.pop();
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(index) = current {
                    items[index].1.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(index) = current {
                    items[index].1.text.push(' ');
                }
            }
            Event::TaskListMarker(checked) => {
                if let Some(index) = current {
                    items[index].1.set_checklist_state(Some(checked));
                }
            }
            _ => {}
        }
    }

    let mut builder = OutlineBuilder::default();
    for (depth, mut node) in items {
        node.text = node.text.trim().to_string();
        builder.push(depth, node);
    }
    builder.finish().ok_or(ImportError::NoListItems)
}

/// Stack-based builder turning `(depth, node)` lines in document order into a tree
#[derive(Default)]
struct OutlineBuilder {
    open: Vec<(usize, Node)>,
    top_level: Vec<Node>,
}

impl OutlineBuilder {
    fn is_empty(&self) -> bool {
        self.open.is_empty() && self.top_level.is_empty()
    }

    fn push(&mut self, depth: usize, node: Node) {
        while self.open.last().is_some_and(|(d, _)| *d >= depth) {
            self.close_one();
        }
        self.open.push((depth, node));
    }

    fn close_one(&mut self) {
        if let Some((_, node)) = self.open.pop() {
            match self.open.last_mut() {
                Some((_, parent)) => parent.push_child(node),
                None => self.top_level.push(node),
            }
        }
    }

    fn finish(mut self) -> Option<Document> {
        while !self.open.is_empty() {
            self.close_one();
        }

        let mut root = if self.top_level.len() == 1 {
            self.top_level.pop()?
        } else if self.top_level.is_empty() {
            return None;
        } else {
            let mut wrapper = Node::new(DEFAULT_ROOT_TEXT);
            for node in self.top_level {
                wrapper.push_child(node);
            }
            wrapper
        };
        root.id = ROOT_ID.to_string();
        Some(Document::new(root))
    }
}

#[cfg(test)]
#[path = "import_export_test.rs"]
mod import_export_test;
