//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Index into the ParaShape catalog
    pub para_shape: Option<usize>,

    /// Index into the Style catalog
    pub style: Option<usize>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with one unstyled run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(TextRun::new(text));
        p
    }

    /// Add a run, merging it into the previous one when both share a char shape.
    pub fn add_run(&mut self, run: TextRun) {
        if run.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.char_shape == run.char_shape => last.text.push_str(&run.text),
            _ => self.runs.push(run),
        }
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }
}

/// A run of text sharing one character shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Index into the CharShape catalog
    pub char_shape: Option<usize>,
}

impl TextRun {
    /// Create a run with no char shape.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            char_shape: None,
        }
    }

    /// Create a run with a char shape reference.
    pub fn styled(text: impl Into<String>, char_shape: Option<usize>) -> Self {
        Self {
            text: text.into(),
            char_shape,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
