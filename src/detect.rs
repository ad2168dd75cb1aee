//! HWP format detection and FileHeader decoding.

use crate::error::{Error, Result};
use crate::model::FileHeader;
use byteorder::{ByteOrder, LE};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Compound file magic bytes: D0 CF 11 E0 A1 B1 1A E1
pub const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Signature at the start of the FileHeader stream.
pub const HWP_SIGNATURE: &str = "HWP Document File";

const SIGNATURE_LEN: usize = 32;
const VERSION_OFFSET: usize = 32;
const PROPERTIES_OFFSET: usize = 36;

/// FileHeader property bits.
const PROP_COMPRESSED: u32 = 0x01;
const PROP_ENCRYPTED: u32 = 0x02;
const PROP_DISTRIBUTABLE: u32 = 0x04;

/// Check whether bytes start with the compound file magic.
pub fn is_compound_bytes(data: &[u8]) -> bool {
    data.starts_with(CFB_MAGIC)
}

/// Check whether a file starts with the compound file magic.
pub fn is_compound_file<P: AsRef<Path>>(path: P) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut header = [0u8; 8];
    BufReader::new(file).read_exact(&mut header).is_ok() && is_compound_bytes(&header)
}

/// Verify the compound file magic, failing with [`Error::UnknownFormat`].
pub fn detect_format_from_bytes(data: &[u8]) -> Result<()> {
    if is_compound_bytes(data) {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check whether a decoded signature names an HWP document.
pub fn is_hwp_signature(signature: &str) -> bool {
    signature.starts_with(HWP_SIGNATURE)
}

/// Decode the FileHeader stream.
///
/// The first 32 bytes are a NUL-padded signature, followed by a 4-byte
/// little-endian version word (`0xMMnnPPrr`) and, in full headers, a 4-byte
/// property word. Returns `None` when the stream is shorter than
/// signature + version.
pub fn parse_file_header(data: &[u8]) -> Option<FileHeader> {
    let signature_bytes = data.get(..SIGNATURE_LEN)?;
    let version = LE::read_u32(data.get(VERSION_OFFSET..VERSION_OFFSET + 4)?);

    let end = signature_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(SIGNATURE_LEN);
    let signature = String::from_utf8_lossy(&signature_bytes[..end]).to_string();

    let properties = data
        .get(PROPERTIES_OFFSET..PROPERTIES_OFFSET + 4)
        .map(LE::read_u32);

    Some(FileHeader {
        signature,
        version: format_version(version),
        compressed: properties.map(|p| p & PROP_COMPRESSED != 0),
        encrypted: properties.is_some_and(|p| p & PROP_ENCRYPTED != 0),
        distributable: properties.is_some_and(|p| p & PROP_DISTRIBUTABLE != 0),
    })
}

/// Format a version word as `major.minor.build.revision`.
fn format_version(version: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (version >> 24) & 0xFF,
        (version >> 16) & 0xFF,
        (version >> 8) & 0xFF,
        version & 0xFF
    )
}
