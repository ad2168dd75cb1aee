//! Embedded binary data (images stored under `BinData`).

use serde::{Deserialize, Serialize};

/// File extensions recognised as images, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// An image extracted from the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Raw (inflated when possible) image bytes
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type inferred from the file extension
    pub mime_type: String,

    /// Stream name (e.g. `BIN0001.jpg`)
    pub name: String,
}

impl Image {
    /// Create an image, inferring the MIME type from the name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_from_extension(&name).to_string();
        Self {
            data,
            mime_type,
            name,
        }
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lowercase file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Listing entry for an image, without its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Position among the document's images
    pub index: usize,

    /// Full container path
    pub path: String,

    /// MIME type inferred from the file extension
    pub mime_type: String,
}

/// MIME type for a file name, by extension. Unknown extensions map to `image/png`.
pub fn mime_from_extension(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    }
}

/// Check whether a stream name carries one of [`IMAGE_EXTENSIONS`].
pub fn is_image_name(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
