//! JSON report of a decode: the document fields at the top level, followed by
//! the issues recovered while decoding it.

use serde::Serialize;

use crate::error::{Error, Issue, Result};
use crate::model::Document;

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

impl JsonFormat {
    fn encode<T: Serialize>(self, value: &T) -> serde_json::Result<String> {
        match self {
            JsonFormat::Pretty => serde_json::to_string_pretty(value),
            JsonFormat::Compact => serde_json::to_string(value),
        }
    }
}

#[derive(Serialize)]
struct DecodeReport<'a> {
    #[serde(flatten)]
    document: &'a Document,
    issues: &'a [Issue],
}

/// Serialize a decoded document together with its issues.
pub fn to_json(document: &Document, issues: &[Issue], format: JsonFormat) -> Result<String> {
    format
        .encode(&DecodeReport { document, issues })
        .map_err(|e| Error::Render(format!("JSON report of {} nodes: {}", document.nodes.len(), e)))
}
