//! Document-level types.

use super::{DocumentNode, StyleCatalog};
use serde::{Deserialize, Serialize};

/// A decoded HWP document: nodes in reading order plus the style catalogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Decoded FileHeader, when present and long enough
    pub header: Option<FileHeader>,

    /// Top-level nodes, sections concatenated in order
    pub nodes: Vec<DocumentNode>,

    /// Style catalogs from DocInfo
    pub styles: StyleCatalog,

    /// Number of BodyText sections decoded
    pub section_count: usize,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the document.
    pub fn add_node(&mut self, node: DocumentNode) {
        self.nodes.push(node);
    }

    /// Check if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of top-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_paragraph()).count()
    }

    /// Number of top-level tables.
    pub fn table_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_table()).count()
    }

    /// Get plain text content of the entire document, one line per node.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(DocumentNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decoded FileHeader stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Signature text (e.g. "HWP Document File")
    pub signature: String,

    /// Version as `major.minor.build.revision`
    pub version: String,

    /// Whether streams are deflated; `None` when the header is too short to say
    pub compressed: Option<bool>,

    /// Whether the document is password-protected
    pub encrypted: bool,

    /// Whether the document is a distribution (view-only) document
    pub distributable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Table};

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_document_counts_and_text() {
        let mut doc = Document::new();
        doc.add_node(DocumentNode::Paragraph(Paragraph::with_text("first")));
        doc.add_node(DocumentNode::Table(Table::with_grid(1, 1)));
        doc.add_node(DocumentNode::Paragraph(Paragraph::with_text("last")));

        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.table_count(), 1);
        assert_eq!(doc.plain_text(), "first\n\nlast");
    }
}
