//! Rendering options and configuration.

/// Options for rendering document content.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// NFC-normalise the output
    pub normalize: bool,

    /// Leave out paragraphs with no text
    pub skip_empty_paragraphs: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable NFC normalisation.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enable or disable skipping empty paragraphs.
    pub fn with_skip_empty_paragraphs(mut self, skip: bool) -> Self {
        self.skip_empty_paragraphs = skip;
        self
    }
}
