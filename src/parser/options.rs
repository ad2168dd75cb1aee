//! Decoding options and configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Options for decoding HWP documents.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Wall-clock budget for one decode call
    pub timeout: Option<Duration>,

    /// Cooperative cancellation flag
    pub cancel: Option<CancelToken>,

    /// Allocation guards
    pub limits: DecodeLimits,

    /// NFC-normalise text returned by `text()`
    pub normalize_text: bool,
}

impl DecodeOptions {
    /// Create new decode options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancel token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Replace the allocation limits.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Enable or disable NFC normalisation of extracted text.
    pub fn with_normalized_text(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Start the clock for one decode call.
    pub fn deadline(&self) -> Deadline {
        Deadline {
            expires: self.timeout.map(|t| Instant::now() + t),
            cancel: self.cancel.clone(),
        }
    }
}

/// Upper bounds on what a single document may allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum rows x cols of one table
    pub max_table_cells: usize,

    /// Maximum paragraph slots one list header may allocate
    pub max_list_paragraphs: usize,

    /// Maximum paragraph slots all lists of one section may allocate
    pub max_paragraph_slots: usize,

    /// Maximum inflated size of one stream in bytes
    pub max_inflated_size: u64,

    /// Maximum records parsed from one stream
    pub max_records: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_table_cells: 100_000,
            max_list_paragraphs: u16::MAX as usize,
            max_paragraph_slots: 1_000_000,
            max_inflated_size: 256 * 1024 * 1024,
            max_records: 4_000_000,
        }
    }
}

/// Shared flag that stops an in-flight decode.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Expiry point for one decode call.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    expires: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl Deadline {
    /// A deadline that never fires.
    pub fn none() -> Self {
        Self::default()
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// Fail with [`Error::Cancelled`] or [`Error::TimedOut`] once expired.
    pub fn check(&self) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(Error::Cancelled);
        }
        match self.expires {
            Some(at) if Instant::now() >= at => Err(Error::TimedOut),
            _ => Ok(()),
        }
    }
}
