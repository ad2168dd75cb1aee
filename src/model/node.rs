//! Top-level document nodes.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A structural node in decode order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// A drawing object with its own paragraph list
    TextBox(TextBox),
}

impl DocumentNode {
    /// Get plain text content of the node.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentNode::Paragraph(p) => p.plain_text(),
            DocumentNode::Table(t) => t.plain_text(),
            DocumentNode::TextBox(b) => b.plain_text(),
        }
    }

    /// Check if this node is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, DocumentNode::Paragraph(_))
    }

    /// Check if this node is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, DocumentNode::Table(_))
    }

    /// Check if this node is a text box.
    pub fn is_text_box(&self) -> bool {
        matches!(self, DocumentNode::TextBox(_))
    }

    /// Borrow the table, if this node is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DocumentNode::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow the paragraph, if this node is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            DocumentNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }
}

/// A text box: a shape holding a paragraph list without grid addressing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Object width in HWPUNIT
    pub width: u32,

    /// Object height in HWPUNIT
    pub height: u32,

    /// Paragraph slots; the length is the declared paragraph count
    pub paragraphs: Vec<Paragraph>,

    /// Tables and text boxes anchored inside the box
    pub nested: Vec<DocumentNode>,
}

impl TextBox {
    /// Get plain text content, one line per paragraph.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<String> = self.paragraphs.iter().map(Paragraph::plain_text).collect();
        parts.extend(self.nested.iter().map(DocumentNode::plain_text));
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_variants() {
        let node = DocumentNode::Paragraph(Paragraph::with_text("hi"));
        assert!(node.is_paragraph());
        assert!(!node.is_table());
        assert_eq!(node.plain_text(), "hi");
        assert!(node.as_table().is_none());
    }

    #[test]
    fn test_text_box_text() {
        let text_box = TextBox {
            paragraphs: vec![Paragraph::with_text("one"), Paragraph::with_text("two")],
            ..Default::default()
        };
        let node = DocumentNode::TextBox(text_box);
        assert!(node.is_text_box());
        assert_eq!(node.plain_text(), "one\ntwo");
    }
}
