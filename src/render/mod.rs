//! Rendering module for converting documents to output formats.

mod json;
mod options;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use text::{normalize_nfc, to_text};
