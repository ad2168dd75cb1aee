//! Decoded HWP document: the public entry point.

use std::path::Path;

use crate::container::ContainerListing;
use crate::error::{Error, Issue, Result};
use crate::model::{Document, FileHeader, Image, ImageInfo, StyleCatalog};
use crate::parser::{DecodeOptions, HwpParser, BODY_TEXT};
use crate::render::{self, JsonFormat, RenderOptions};

/// A decoded HWP document.
///
/// Construction runs the whole decode. The one failure is a missing
/// `BodyText`, which includes input that is not a readable compound file.
/// Everything else degrades into [`issues`](Self::issues).
///
/// # Example
///
/// ```no_run
/// use unhwp::Hwp;
///
/// let data = std::fs::read("document.hwp")?;
/// let hwp = Hwp::from_bytes(&data)?;
/// println!("{}", hwp.text());
/// for issue in hwp.issues() {
///     eprintln!("{}", issue);
/// }
/// # Ok::<(), unhwp::Error>(())
/// ```
#[derive(Debug)]
pub struct Hwp {
    parser: HwpParser,
    document: Document,
    issues: Vec<Issue>,
}

impl Hwp {
    /// Open and decode a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::default())
    }

    /// Open and decode a file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode a document from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, DecodeOptions::default())
    }

    /// Decode a document from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<Self> {
        match HwpParser::from_bytes_with_options(data, options) {
            Ok(parser) => Self::from_parser(parser),
            // No container means no streams at all.
            Err(e @ (Error::UnknownFormat | Error::Container(_))) => {
                log::warn!("No readable compound file: {}", e);
                Err(Error::MissingStream(format!("{} ({})", BODY_TEXT, e)))
            }
            Err(e) => Err(e),
        }
    }

    /// Decode a document from an already-read container listing.
    pub fn from_listing(listing: ContainerListing, options: DecodeOptions) -> Result<Self> {
        Self::from_parser(HwpParser::from_listing(listing, options))
    }

    fn from_parser(parser: HwpParser) -> Result<Self> {
        let decoded = parser.parse()?;
        Ok(Self {
            parser,
            document: decoded.value,
            issues: decoded.issues,
        })
    }

    /// Plain text of the document.
    ///
    /// Uses the decoded structure; when that holds no text, falls back to
    /// scanning the raw body streams.
    pub fn text(&self) -> String {
        let structured = self.document.plain_text();
        let text = if structured.trim().is_empty() {
            log::debug!("Structured text is empty, using the text extractor");
            self.parser.fallback_text()
        } else {
            structured
        };

        if self.parser.options().normalize_text {
            render::normalize_nfc(&text)
        } else {
            text
        }
    }

    /// The decoded document: nodes and style catalogs.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take ownership of the decoded document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// The style catalogs.
    pub fn styles(&self) -> &StyleCatalog {
        &self.document.styles
    }

    /// The FileHeader, when present and long enough.
    pub fn header(&self) -> Option<&FileHeader> {
        self.document.header.as_ref()
    }

    /// Problems recovered from during decoding.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Number of streams under `BinData`.
    pub fn attachment_count(&self) -> usize {
        self.parser.attachment_count()
    }

    /// List the embedded images.
    pub fn images(&self) -> Vec<ImageInfo> {
        self.parser.images()
    }

    /// Get the nth embedded image, `None` when there is no such image.
    pub fn image(&self, index: usize) -> Option<Image> {
        self.parser.image(index)
    }

    /// Render the document as plain text.
    pub fn to_text(&self, options: &RenderOptions) -> Result<String> {
        render::to_text(&self.document, options)
    }

    /// Render the document and its issues as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, &self.issues, format)
    }
}
