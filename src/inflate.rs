//! Raw-deflate decompression.
//!
//! HWP streams are DEFLATE data without the zlib header or trailer. The
//! [`Decompressor`] trait keeps the primitive swappable; [`RawDeflate`] is
//! the `flate2` implementation and caps its output so a small stream cannot
//! expand without bound.

use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::error::{Error, Result};

/// Inflates a raw-deflate byte slice.
pub trait Decompressor: Send + Sync {
    /// Decompress `data`, failing on corrupt or non-deflate input.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// `flate2`-backed raw-deflate decompressor.
#[derive(Debug, Clone, Copy)]
pub struct RawDeflate {
    max_output: u64,
}

impl RawDeflate {
    /// Default output cap: 256 MiB.
    pub const DEFAULT_MAX_OUTPUT: u64 = 256 * 1024 * 1024;

    /// Create a decompressor with the default output cap.
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_MAX_OUTPUT)
    }

    /// Create a decompressor that refuses to produce more than `max_output` bytes.
    pub fn with_limit(max_output: u64) -> Self {
        Self { max_output }
    }
}

impl Default for RawDeflate {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for RawDeflate {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::Decompression("empty input".to_string()));
        }

        // Read one byte past the cap to tell "exactly at the cap" from "over it".
        let mut decoder = DeflateDecoder::new(data).take(self.max_output.saturating_add(1));
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        if out.len() as u64 > self.max_output {
            return Err(Error::LimitExceeded(format!(
                "inflated stream exceeds {} bytes",
                self.max_output
            )));
        }

        Ok(out)
    }
}
