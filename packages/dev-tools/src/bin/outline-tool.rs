//! Outline Tool for the Flat-File Store
//!
//! Inspect and move documents in and out of the data directory used by the
//! Heartbeat editor without starting an editing session.
//!
//! # Usage
//!
//! ```bash
//! # Import a tab-indented outline as the document of ada@example.com
//! cargo run --bin outline-tool -- import tabs plan.txt ada@example.com
//!
//! # Export a document (or one subtree) as Markdown
//! cargo run --bin outline-tool -- export markdown ada@example.com
//! cargo run --bin outline-tool -- export markdown ada@example.com <node-id>
//!
//! # Print the visible outline or search it
//! cargo run --bin outline-tool -- show demo
//! cargo run --bin outline-tool -- search demo canva
//! ```
//!
//! # Configuration
//!
//! Reads `HEARTBEAT_DATA_DIR` (default `./data`) and `HEARTBEAT_SAVE_RETRIES`.
//! Document keys containing `@` are treated as emails and mapped to storage keys.
//! Log output is controlled with `RUST_LOG` (default `info`).

use anyhow::{anyhow, bail, Context, Result};
use heartbeat_core::config::EditorConfig;
use heartbeat_core::db::{document_key_for_email, DocumentStore, FileBlobStore};
use heartbeat_core::models::Node;
use heartbeat_core::services::import_export::{export_subtree, import_document};
use heartbeat_core::services::navigation::{flatten_with_depth, search_with_paths};
use heartbeat_core::services::OutlineFormat;
use heartbeat_core::utils::{classify_content, ContentKind};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: outline-tool <command> [args]

commands:
  import <json|markdown|tabs> <file> <key>   replace the document stored under <key>
  export <json|markdown|tabs> <key> [node]   print a document or one subtree
  show <key>                                 print the visible outline
  search <key> <query>                       list matching nodes with their path";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = EditorConfig::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    let store = DocumentStore::new(Arc::new(FileBlobStore::new(&config.data_dir)))
        .with_retry(config.save_retry.clone());
    tracing::debug!("Using data directory {}", config.data_dir.display());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["import", format, file, key] => import(&store, parse_format(format)?, file, key).await,
        ["export", format, key] => export(&store, parse_format(format)?, key, None).await,
        ["export", format, key, node] => {
            export(&store, parse_format(format)?, key, Some(*node)).await
        }
        ["show", key] => show(&store, key).await,
        ["search", key, query @ ..] if !query.is_empty() => {
            search(&store, key, &query.join(" ")).await
        }
        _ => {
            eprintln!("{}", USAGE);
            bail!("unrecognized arguments: {:?}", args)
        }
    }
}

fn parse_format(name: &str) -> Result<OutlineFormat> {
    name.parse().map_err(|e: String| anyhow!(e))
}

fn storage_key(key: &str) -> String {
    if key.contains('@') {
        document_key_for_email(key)
    } else {
        key.to_string()
    }
}

async fn import(
    store: &DocumentStore,
    format: OutlineFormat,
    file: &str,
    key: &str,
) -> Result<()> {
    let input = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file))?;
    let doc = import_document(format, &input)
        .with_context(|| format!("Failed to parse {} as {}", file, format))?;

    let key = storage_key(key);
    store.save_document(&key, &doc).await?;
    println!("✅ Imported {} nodes into '{}'", doc.len(), key);
    Ok(())
}

async fn export(
    store: &DocumentStore,
    format: OutlineFormat,
    key: &str,
    node_id: Option<&str>,
) -> Result<()> {
    let doc = store.load_or_default(&storage_key(key)).await;
    let root = match node_id {
        Some(id) => doc.find(id).ok_or_else(|| anyhow!("Node '{}' not found", id))?,
        None => doc.root(),
    };
    print!("{}", export_subtree(root, format)?);
    Ok(())
}

async fn show(store: &DocumentStore, key: &str) -> Result<()> {
    let doc = store.load_or_default(&storage_key(key)).await;
    for visible in flatten_with_depth(doc.root()) {
        println!("{}{}", "  ".repeat(visible.depth), describe(visible.node));
    }
    Ok(())
}

async fn search(store: &DocumentStore, key: &str, query: &str) -> Result<()> {
    let doc = store.load_or_default(&storage_key(key)).await;
    let hits = search_with_paths(doc.root(), query);
    if hits.is_empty() {
        println!("No matches for '{}'", query);
    }
    for hit in hits {
        println!("{}  ({})  [{}]", hit.node.text, hit.path_label(), hit.node.id);
    }
    Ok(())
}

/// One outline line: fold marker, checkbox, text and detected content kind
fn describe(node: &Node) -> String {
    let fold = match (node.children.is_empty(), node.collapsed) {
        (true, _) => "•",
        (false, true) => "▸",
        (false, false) => "▾",
    };
    let checkbox = match node.checklist_state() {
        Some(true) => "[x] ",
        Some(false) => "[ ] ",
        None => "",
    };
    let kind = match classify_content(&node.text) {
        ContentKind::Plain => String::new(),
        ContentKind::Link { .. } => "  (link)".to_string(),
        ContentKind::Image { .. } => "  (image)".to_string(),
        kind @ ContentKind::Video { .. } => match kind.embed_url() {
            Some(url) => format!("  (video: {})", url),
            None => "  (video)".to_string(),
        },
    };
    format!("{} {}{}{}", fold, checkbox, node.text, kind)
}
