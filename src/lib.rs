//! # unhwp
//!
//! Fault-tolerant decoder for HWP 5 compound documents.
//!
//! This library reads the binary HWP format used by Hancom Office and
//! recovers its text, its structure (paragraphs, tables, text boxes) and
//! its style catalogs. Decoding never panics on malformed input: anything
//! short of a missing `BodyText` is recorded as an [`Issue`] and decoding
//! carries on. Input that is not a compound file has no `BodyText` either.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unhwp::parse_file;
//!
//! fn main() -> unhwp::Result<()> {
//!     let hwp = parse_file("document.hwp")?;
//!     println!("{}", hwp.text());
//!
//!     for issue in hwp.issues() {
//!         eprintln!("warning: {}", issue);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Record stream parsing**: tag/level/size headers, extended sizes
//! - **Structure**: paragraphs, character runs, tables with cell geometry, text boxes
//! - **Styles**: fonts, character and paragraph shapes, border fills, named styles
//! - **Fallback text**: degraded recovery when structured decoding finds nothing
//! - **Guards**: timeouts, cancellation and allocation limits

pub mod container;
pub mod detect;
pub mod error;
mod hwp;
pub mod inflate;
pub mod model;
pub mod parser;
pub mod render;
pub mod units;

// Re-export commonly used types
pub use container::{CompoundFileReader, ContainerListing, ContainerReader, Entry};
pub use detect::{detect_format_from_bytes, is_compound_bytes, is_compound_file, parse_file_header};
pub use error::{Decoded, Error, Issue, IssueKind, Result};
pub use hwp::Hwp;
pub use inflate::{Decompressor, RawDeflate};
pub use model::{
    Alignment, BorderFill, CharShape, Document, DocumentNode, FaceName, FileHeader, Image,
    ImageInfo, ParaShape, Paragraph, Style, StyleCatalog, Table, TableCell, TextBox, TextRun,
};
pub use parser::{CancelToken, DecodeLimits, DecodeOptions, HwpParser};
pub use render::{JsonFormat, RenderOptions};

use std::path::Path;
use std::time::Duration;

/// Decode an HWP file.
///
/// # Arguments
///
/// * `path` - Path to the HWP file
///
/// # Example
///
/// ```no_run
/// use unhwp::parse_file;
///
/// let hwp = parse_file("document.hwp").unwrap();
/// println!("Paragraphs: {}", hwp.document().paragraph_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Hwp> {
    Hwp::open(path)
}

/// Decode an HWP file with custom options.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use unhwp::{parse_file_with_options, DecodeOptions};
///
/// let options = DecodeOptions::new().with_timeout(Duration::from_secs(5));
/// let hwp = parse_file_with_options("document.hwp", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Hwp> {
    Hwp::open_with_options(path, options)
}

/// Decode an HWP document from bytes.
///
/// # Example
///
/// ```no_run
/// use unhwp::parse_bytes;
///
/// let data = std::fs::read("document.hwp").unwrap();
/// let hwp = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Hwp> {
    Hwp::from_bytes(data)
}

/// Decode an HWP document from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<Hwp> {
    Hwp::from_bytes_with_options(data, options)
}

/// Extract plain text from an HWP file.
///
/// # Example
///
/// ```no_run
/// use unhwp::extract_text;
///
/// let text = extract_text("document.hwp").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(parse_file(path)?.text())
}

/// Convert an HWP file to JSON.
///
/// # Example
///
/// ```no_run
/// use unhwp::{to_json, JsonFormat};
///
/// let json = to_json("document.hwp", JsonFormat::Pretty).unwrap();
/// std::fs::write("output.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    parse_file(path)?.to_json(format)
}

/// Decode an HWP file on the blocking pool.
///
/// The file is read with async I/O; decoding itself is CPU-bound and runs
/// through `spawn_blocking`.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Hwp> {
    let data = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || Hwp::from_bytes_with_options(&data, options))
        .await
        .map_err(|e| Error::Other(format!("decode task failed: {}", e)))?
}

/// Builder for decoding HWP documents.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use unhwp::Unhwp;
///
/// let text = Unhwp::new()
///     .with_timeout(Duration::from_secs(10))
///     .normalized()
///     .parse("document.hwp")?
///     .text();
/// # Ok::<(), unhwp::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unhwp {
    options: DecodeOptions,
}

impl Unhwp {
    /// Create a new Unhwp builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_timeout(timeout);
        self
    }

    /// Stop when `token` fires.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.options = self.options.with_cancel_token(token);
        self
    }

    /// Set allocation limits.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.options = self.options.with_limits(limits);
        self
    }

    /// NFC-normalise extracted text.
    pub fn normalized(mut self) -> Self {
        self.options = self.options.with_normalized_text(true);
        self
    }

    /// The options this builder will decode with.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode a file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<Hwp> {
        Hwp::open_with_options(path, self.options)
    }

    /// Decode from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<Hwp> {
        Hwp::from_bytes_with_options(data, self.options)
    }

    /// Decode from an already-read container listing.
    pub fn parse_listing(self, listing: ContainerListing) -> Result<Hwp> {
        Hwp::from_listing(listing, self.options)
    }
}
