//! Plain text rendering for HWP documents.

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{Document, DocumentNode};

use super::RenderOptions;

/// Convert a document to plain text, one line per top-level node.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let output = doc
        .nodes
        .iter()
        .filter(|node| !(options.skip_empty_paragraphs && is_empty_paragraph(node)))
        .map(DocumentNode::plain_text)
        .collect::<Vec<_>>()
        .join("\n");

    if options.normalize {
        Ok(normalize_nfc(&output))
    } else {
        Ok(output)
    }
}

/// NFC-normalise text. Decomposed Hangul jamo recombine into syllables.
pub fn normalize_nfc(text: &str) -> String {
    text.nfc().collect()
}

fn is_empty_paragraph(node: &DocumentNode) -> bool {
    node.as_paragraph().is_some_and(|p| p.is_empty())
}
