//! Document model types for decoded HWP content.
//!
//! The model is built once per decode and never mutated afterwards. Style
//! references held by paragraphs and runs are indices into the
//! [`StyleCatalog`]; each one either resolves or is `None`.

mod document;
mod node;
mod paragraph;
mod resource;
mod style;
mod table;

pub use document::{Document, FileHeader};
pub use node::{DocumentNode, TextBox};
pub use paragraph::{Paragraph, TextRun};
pub use resource::{is_image_name, mime_from_extension, Image, ImageInfo, IMAGE_EXTENSIONS};
pub use style::{
    Alignment, Border, BorderFill, CharShape, FaceName, Language, ParaShape, Style, StyleCatalog,
    StyleKind,
};
pub use table::{Margin, Table, TableCell};
