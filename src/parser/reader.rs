//! Little-endian cursor over a record payload.
//!
//! Every read returns `None` instead of failing when the payload is too
//! short, so decoders can default missing trailing fields.

use std::io::{self, Cursor};

use byteorder::{ByteOrder, ReadBytesExt, LE};

/// Forward-only little-endian reader.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    /// Create a reader at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current position.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn data(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data().len().saturating_sub(self.position())
    }

    /// Check if every byte was consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `n` raw bytes.
    pub fn bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let start = self.position();
        let end = start.checked_add(n)?;
        let slice = self.data().get(start..end)?;
        self.seek(end);
        Some(slice)
    }

    /// Skip `n` bytes; the reader is exhausted if fewer remain.
    pub fn skip(&mut self, n: usize) {
        self.seek(self.position().saturating_add(n));
    }

    /// Move to an absolute position; the reader is exhausted if past the end.
    pub fn seek(&mut self, pos: usize) {
        let pos = pos.min(self.data().len());
        self.cursor.set_position(pos as u64);
    }

    /// Run one read; a short read leaves the position unchanged.
    fn read<T>(&mut self, f: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>) -> Option<T> {
        let start = self.cursor.position();
        let value = f(&mut self.cursor).ok();
        if value.is_none() {
            self.cursor.set_position(start);
        }
        value
    }

    /// Read a `u8`.
    pub fn u8(&mut self) -> Option<u8> {
        self.read(|c| c.read_u8())
    }

    /// Read an `i8`.
    pub fn i8(&mut self) -> Option<i8> {
        self.read(|c| c.read_i8())
    }

    /// Read a `u16`.
    pub fn u16(&mut self) -> Option<u16> {
        self.read(|c| c.read_u16::<LE>())
    }

    /// Read an `i16`.
    pub fn i16(&mut self) -> Option<i16> {
        self.read(|c| c.read_i16::<LE>())
    }

    /// Read a `u32`.
    pub fn u32(&mut self) -> Option<u32> {
        self.read(|c| c.read_u32::<LE>())
    }

    /// Read an `i32`.
    pub fn i32(&mut self) -> Option<i32> {
        self.read(|c| c.read_i32::<LE>())
    }

    /// Read `units` UTF-16LE code units as a string, replacing invalid sequences.
    pub fn utf16(&mut self, units: usize) -> Option<String> {
        let bytes = self.bytes(units.checked_mul(2)?)?;
        Some(utf16_lossy(bytes))
    }

    /// Read a `u16` length followed by that many UTF-16LE code units.
    pub fn wstring(&mut self) -> Option<String> {
        let len = self.u16()? as usize;
        self.utf16(len)
    }
}

/// Decode whole UTF-16LE code units; a trailing odd byte is ignored.
pub fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    let mut units = vec![0u16; bytes.len() / 2];
    LE::read_u16_into(&bytes[..units.len() * 2], &mut units);
    units
}

/// Decode UTF-16LE bytes, replacing invalid sequences.
pub fn utf16_lossy(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}
