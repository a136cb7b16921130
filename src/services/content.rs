use scraper::{Html, Node};
use sha2::{Digest, Sha256};

use crate::models::types::ContentHash;

/// Elements whose text never reaches the reader.
const HIDDEN_TAGS: [&str; 4] = ["script", "style", "meta", "noscript"];

/// Extracts the visible text of an HTML page: every text node outside
/// `script`/`style`/`meta`/`noscript`, trimmed and joined with single spaces.
///
/// Comparing this instead of raw HTML keeps cache-busting tokens and inline
/// script state from registering as changes.
pub fn clean_content(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|parent| {
            matches!(parent.value(), Node::Element(el) if HIDDEN_TAGS.iter().any(|tag| *tag == el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

pub fn content_hash(text: &str) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    ContentHash::from(format!("{:x}", hasher.finalize()))
}
