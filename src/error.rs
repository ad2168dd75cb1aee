//! Error types for unhwp library.
//!
//! Decoding distinguishes two kinds of problems. [`Error`] is returned when
//! an operation cannot produce a result at all. [`Issue`] records a problem
//! that was recovered from; decoding continues with a partial or default
//! value and the issue travels alongside it in a [`Decoded`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for unhwp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during HWP processing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a compound document.
    #[error("Unknown file format: not a compound document")]
    UnknownFormat,

    /// The compound container could not be read.
    #[error("Container error: {0}")]
    Container(String),

    /// A stream required for decoding is absent.
    #[error("Missing required stream: {0}")]
    MissingStream(String),

    /// Raw-deflate data could not be inflated.
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// A record header or payload is truncated or inconsistent.
    #[error("Malformed record at offset {offset}: {reason}")]
    MalformedRecord {
        /// Byte offset of the record header within its stream
        offset: usize,
        /// What was wrong with it
        reason: String,
    },

    /// An allocation guard was hit.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Decoding was cancelled through a [`CancelToken`](crate::CancelToken).
    #[error("Decoding cancelled")]
    Cancelled,

    /// The decode deadline passed.
    #[error("Decoding timed out")]
    TimedOut,

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// The issue kind this error degrades to when it is recovered from.
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            Error::MissingStream(_) => IssueKind::ContainerMissingStream,
            Error::Decompression(_) => IssueKind::DecompressionFailure,
            Error::LimitExceeded(_) => IssueKind::LimitExceeded,
            Error::Cancelled | Error::TimedOut => IssueKind::Cancelled,
            _ => IssueKind::MalformedRecord,
        }
    }
}

/// Category of a recovered problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A named stream was not present in the container.
    ContainerMissingStream,
    /// A stream could not be inflated.
    DecompressionFailure,
    /// A record was truncated or inconsistent with the parse state.
    MalformedRecord,
    /// A style index did not resolve and was treated as absent.
    UnresolvedStyleReference,
    /// A record tag is not interpreted; the record was kept opaque.
    UnsupportedTag,
    /// An allocation guard stopped decoding.
    LimitExceeded,
    /// The deadline passed or the cancel token fired.
    Cancelled,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::ContainerMissingStream => "missing stream",
            IssueKind::DecompressionFailure => "decompression failure",
            IssueKind::MalformedRecord => "malformed record",
            IssueKind::UnresolvedStyleReference => "unresolved style reference",
            IssueKind::UnsupportedTag => "unsupported tag",
            IssueKind::LimitExceeded => "limit exceeded",
            IssueKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem encountered while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category
    pub kind: IssueKind,

    /// Human-readable description
    pub message: String,

    /// BodyText section index, when the issue belongs to one
    pub section: Option<usize>,

    /// Byte offset within the stream, when known
    pub offset: Option<usize>,
}

impl Issue {
    /// Create a new issue and mirror it to the log.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        let message = message.into();
        log::warn!("{}: {}", kind, message);
        Self {
            kind,
            message,
            section: None,
            offset: None,
        }
    }

    /// Create an issue from a recovered error.
    pub fn from_error(err: &Error) -> Self {
        let issue = Self::new(err.issue_kind(), err.to_string());
        match err {
            Error::MalformedRecord { offset, .. } => issue.at_offset(*offset),
            _ => issue,
        }
    }

    /// Attach a byte offset.
    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach a section index.
    pub fn in_section(mut self, section: usize) -> Self {
        self.section = Some(section);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(section) = self.section {
            write!(f, " (section {})", section)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " (offset {})", offset)?;
        }
        Ok(())
    }
}

/// A value produced by a decode stage, with the issues it recovered from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// The (possibly partial) value
    pub value: T,

    /// Problems recovered from while producing it
    pub issues: Vec<Issue>,
}

impl<T> Decoded<T> {
    /// A value with no issues.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
        }
    }

    /// A value with issues.
    pub fn with_issues(value: T, issues: Vec<Issue>) -> Self {
        Self { value, issues }
    }

    /// Check whether any problem was recorded.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Move the issues into `sink` and return the value.
    pub fn drain_into(self, sink: &mut Vec<Issue>) -> T {
        sink.extend(self.issues);
        self.value
    }

    /// Transform the value, keeping the issues.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            issues: self.issues,
        }
    }
}
