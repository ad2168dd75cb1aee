//! Text Extractor: degraded plain-text recovery from raw BodyText bytes.
//!
//! Independent of the record parser. Never fails; the worst case is an
//! empty or garbled string.

use byteorder::{ByteOrder, LE};

use crate::inflate::Decompressor;

const HANGUL_SYLLABLES: std::ops::RangeInclusive<u16> = 0xAC00..=0xD7A3;
const PRINTABLE_ASCII: std::ops::RangeInclusive<u16> = 0x20..=0x7E;

/// Recover text from a BodyText stream.
///
/// Inflated data is read as UTF-16LE units keeping printable ASCII and
/// Hangul syllables, with CR and LF as newlines. When inflation fails the
/// raw bytes are scanned for printable ASCII instead.
pub fn extract_text(raw: &[u8], decompressor: &dyn Decompressor) -> String {
    match decompressor.decompress(raw) {
        Ok(data) => units_to_text(&data),
        Err(e) => {
            log::debug!("Text extractor falling back to raw bytes: {}", e);
            ascii_bytes(raw)
        }
    }
}

/// Keep printable ASCII and Hangul syllables from UTF-16LE data.
///
/// A trailing odd byte is read as a unit on its own.
pub fn units_to_text(data: &[u8]) -> String {
    data.chunks(2)
        .map(|c| if c.len() == 2 { LE::read_u16(c) } else { u16::from(c[0]) })
        .filter_map(|unit| match unit {
            0x0A | 0x0D => Some('\n'),
            u if PRINTABLE_ASCII.contains(&u) || HANGUL_SYLLABLES.contains(&u) => {
                char::from_u32(u as u32)
            }
            _ => None,
        })
        .collect()
}

/// Keep printable ASCII bytes.
pub fn ascii_bytes(raw: &[u8]) -> String {
    raw.iter()
        .filter(|b| (0x20..=0x7E).contains(*b))
        .map(|&b| b as char)
        .collect()
}
