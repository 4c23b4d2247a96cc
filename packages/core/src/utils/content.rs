//! Embedded content detection
//!
//! Node text is plain text, but a URL in it may be rendered as an embed. This
//! module classifies the first URL found in a node's text so the presentation
//! layer can pick a video player, an image or a plain link.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// First http(s) URL in a piece of text
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).unwrap());

/// YouTube watch, short, embed and youtu.be links; captures the 11-char video id
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:[^\s#]*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

/// Image file extension, optionally followed by a query or fragment
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:png|jpe?g|gif|webp|svg|bmp)(?:[?#]\S*)?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    YouTube,
}

/// What the text of a node should be rendered as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentKind {
    Plain,
    Link { url: String },
    Image { url: String },
    Video { provider: VideoProvider, id: String },
}

impl ContentKind {
    /// Player URL for video content
    pub fn embed_url(&self) -> Option<String> {
        match self {
            Self::Video {
                provider: VideoProvider::YouTube,
                id,
            } => Some(format!("https://www.youtube.com/embed/{id}")),
            _ => None,
        }
    }
}

/// Classify the first URL in `text`
///
/// # Examples
///
/// ```
/// use heartbeat_core::utils::{classify_content, ContentKind};
///
/// assert_eq!(classify_content("Buy milk"), ContentKind::Plain);
/// assert!(matches!(
///     classify_content("https://youtu.be/dQw4w9WgXcQ"),
///     ContentKind::Video { .. }
/// ));
/// ```
pub fn classify_content(text: &str) -> ContentKind {
    let Some(found) = URL_RE.find(text) else {
        return ContentKind::Plain;
    };
    // Trailing punctuation belongs to the sentence, not the URL
    let url = found
        .as_str()
        .trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')'));

    if let Some(captures) = YOUTUBE_RE.captures(url) {
        return ContentKind::Video {
            provider: VideoProvider::YouTube,
            id: captures[1].to_string(),
        };
    }

    if IMAGE_RE.is_match(url) {
        return ContentKind::Image {
            url: url.to_string(),
        };
    }

    ContentKind::Link {
        url: url.to_string(),
    }
}
