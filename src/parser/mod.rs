//! HWP stream parsing: records, styles, document model and text recovery.

pub mod builder;
pub mod extract;
pub mod fields;
mod hwp_parser;
mod options;
mod reader;
pub mod record;
pub mod styles;
pub mod tags;

pub use builder::{build_section, border_fill_class, BuilderState, DocumentBuilder};
pub use extract::extract_text;
pub use hwp_parser::{HwpParser, BIN_DATA, BODY_TEXT, DOC_INFO, FILE_HEADER};
pub use options::{CancelToken, DecodeLimits, DecodeOptions, Deadline};
pub use reader::ByteReader;
pub use record::{encode_record, parse_records, parse_records_with, Record, RecordFields, RecordHeader};
pub use styles::resolve_styles;
