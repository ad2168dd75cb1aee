//! Tag-specific payload decoders for BodyText records.
//!
//! Decoders are total: a short payload yields zero/`None` for the fields it
//! does not cover instead of an error.

use byteorder::{ByteOrder, LE};
use serde::{Deserialize, Serialize};

use crate::model::Margin;

use super::reader::{utf16_units, ByteReader};

/// Build a control id from its four ASCII characters.
pub const fn ctrl_id(chars: &[u8; 4]) -> u32 {
    ((chars[0] as u32) << 24) | ((chars[1] as u32) << 16) | ((chars[2] as u32) << 8) | chars[3] as u32
}

/// Table control.
pub const CTRL_TABLE: u32 = ctrl_id(b"tbl ");
/// Generic drawing object control.
pub const CTRL_DRAWING: u32 = ctrl_id(b"gso ");
/// Header control.
pub const CTRL_HEADER: u32 = ctrl_id(b"head");
/// Footer control.
pub const CTRL_FOOTER: u32 = ctrl_id(b"foot");
/// Footnote control.
pub const CTRL_FOOTNOTE: u32 = ctrl_id(b"fn  ");
/// Endnote control.
pub const CTRL_ENDNOTE: u32 = ctrl_id(b"en  ");

const LINE_SEG_SIZE: usize = 36;
const LIST_HEADER_SIZE: usize = 8;

/// Decoded `PARA_HEADER`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaHeader {
    /// Text length in code units (top bit masked off)
    pub char_count: u32,

    /// Bit mask of control kinds present in the paragraph
    pub control_mask: u32,

    /// ParaShape id
    pub para_shape_id: Option<u16>,

    /// Style id
    pub style_id: Option<u8>,
}

impl ParaHeader {
    /// Decode from a payload.
    pub fn decode(payload: &[u8]) -> Self {
        let mut r = ByteReader::new(payload);
        let char_count = r.u32().unwrap_or(0) & 0x7FFF_FFFF;
        let control_mask = r.u32().unwrap_or(0);
        let para_shape_id = r.u16();
        let style_id = r.u8();
        Self {
            char_count,
            control_mask,
            para_shape_id,
            style_id,
        }
    }
}

/// Decoded `CTRL_HEADER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtrlHeader {
    /// Four-character control id
    pub ctrl_id: u32,

    /// Object width in HWPUNIT (object controls only)
    pub width: Option<u32>,

    /// Object height in HWPUNIT (object controls only)
    pub height: Option<u32>,
}

impl CtrlHeader {
    /// Decode from a payload.
    pub fn decode(payload: &[u8]) -> Self {
        let mut r = ByteReader::new(payload);
        let ctrl_id = r.u32().unwrap_or(0);
        let mut header = Self {
            ctrl_id,
            ..Default::default()
        };
        if header.is_object() {
            // attribute, vertical offset, horizontal offset
            r.skip(12);
            header.width = r.u32();
            header.height = r.u32();
        }
        header
    }

    /// Table control.
    pub fn is_table(&self) -> bool {
        self.ctrl_id == CTRL_TABLE
    }

    /// Drawing object control (shapes, text boxes).
    pub fn is_drawing(&self) -> bool {
        self.ctrl_id == CTRL_DRAWING
    }

    /// Header or footer control.
    pub fn is_header_footer(&self) -> bool {
        self.ctrl_id == CTRL_HEADER || self.ctrl_id == CTRL_FOOTER
    }

    /// Footnote or endnote control.
    pub fn is_note(&self) -> bool {
        self.ctrl_id == CTRL_FOOTNOTE || self.ctrl_id == CTRL_ENDNOTE
    }

    /// Controls whose paragraph list sits outside the body flow.
    pub fn is_sub_list(&self) -> bool {
        self.is_header_footer() || self.is_note()
    }

    /// Controls that carry the common object geometry block.
    pub fn is_object(&self) -> bool {
        self.is_table() || self.is_drawing() || self.ctrl_id == ctrl_id(b"eqed")
    }

    /// The control id as text, e.g. `"tbl "`.
    pub fn id_str(&self) -> String {
        self.ctrl_id
            .to_be_bytes()
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect()
    }
}

/// Decoded `PARA_LINE_SEG`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSeg {
    /// Vertical position of the first line
    pub start_line: Option<i32>,

    /// Number of line segments
    pub segments: usize,
}

impl LineSeg {
    /// Decode from a payload.
    pub fn decode(payload: &[u8]) -> Self {
        let mut r = ByteReader::new(payload);
        // text start position
        r.skip(4);
        Self {
            start_line: r.i32(),
            segments: payload.len() / LINE_SEG_SIZE,
        }
    }
}

/// Decoded `TABLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table attribute bits
    pub attribute: u32,

    /// Row count
    pub rows: u16,

    /// Column count
    pub cols: u16,

    /// Spacing between cells
    pub cell_spacing: u16,

    /// Inner padding
    pub padding: Margin,

    /// Number of cells in each row
    pub row_sizes: Vec<u16>,

    /// Border fill id
    pub border_fill_id: Option<u16>,
}

impl TableInfo {
    /// Decode from a payload.
    pub fn decode(payload: &[u8]) -> Self {
        let mut r = ByteReader::new(payload);
        let attribute = r.u32().unwrap_or(0);
        let rows = r.u16().unwrap_or(0);
        let cols = r.u16().unwrap_or(0);
        let cell_spacing = r.u16().unwrap_or(0);
        let padding = read_margin(&mut r);

        let row_sizes: Vec<u16> = (0..rows).map_while(|_| r.u16()).collect();
        let border_fill_id = if row_sizes.len() == rows as usize {
            r.u16()
        } else {
            None
        };

        Self {
            attribute,
            rows,
            cols,
            cell_spacing,
            padding,
            row_sizes,
            border_fill_id,
        }
    }

    /// Grid size, computed without overflow.
    pub fn cell_total(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// What a `LIST_HEADER` belongs to. The builder supplies this; it is not
/// recoverable from the record alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListContext {
    /// A table cell: the header carries an address block
    TableCell,
    /// A text box: paragraph count only
    TextBox,
}

/// Decoded `LIST_HEADER`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHeader {
    /// Paragraphs in the list, when present
    pub paragraph_count: Option<u16>,

    /// List attribute bits
    pub attribute: u32,

    /// Cell block (table context only, when present)
    pub cell: Option<CellAttributes>,
}

impl ListHeader {
    /// Decode from a payload in the given context.
    pub fn decode(payload: &[u8], context: ListContext) -> Self {
        let mut r = ByteReader::new(payload);
        let paragraph_count = r.u16();
        r.skip(2);
        let attribute = r.u32().unwrap_or(0);

        let cell = match context {
            ListContext::TableCell if payload.len() > LIST_HEADER_SIZE => {
                Some(CellAttributes::decode(&mut r))
            }
            _ => None,
        };

        Self {
            paragraph_count,
            attribute,
            cell,
        }
    }
}

/// Cell block of a table-context `LIST_HEADER`. Missing fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAttributes {
    /// Column address
    pub col: u16,
    /// Row address
    pub row: u16,
    /// Columns spanned
    pub col_span: u16,
    /// Rows spanned
    pub row_span: u16,
    /// Width in HWPUNIT
    pub width: u32,
    /// Height in HWPUNIT
    pub height: u32,
    /// Inner margin
    pub margin: Margin,
    /// Border fill id
    pub border_fill_id: Option<u16>,
}

impl CellAttributes {
    fn decode(r: &mut ByteReader<'_>) -> Self {
        Self {
            col: r.u16().unwrap_or(0),
            row: r.u16().unwrap_or(0),
            col_span: r.u16().unwrap_or(0),
            row_span: r.u16().unwrap_or(0),
            width: r.u32().unwrap_or(0),
            height: r.u32().unwrap_or(0),
            margin: read_margin(r),
            border_fill_id: r.u16(),
        }
    }
}

fn read_margin(r: &mut ByteReader<'_>) -> Margin {
    Margin {
        left: r.u16().unwrap_or(0),
        right: r.u16().unwrap_or(0),
        top: r.u16().unwrap_or(0),
        bottom: r.u16().unwrap_or(0),
    }
}

/// One `PARA_CHAR_SHAPE` entry: the shape applies from `position` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharShapeRef {
    /// Code-unit position in the raw paragraph text
    pub position: u32,
    /// CharShape id
    pub char_shape_id: u32,
}

/// Decode a `PARA_CHAR_SHAPE` payload.
pub fn decode_char_shape_refs(payload: &[u8]) -> Vec<CharShapeRef> {
    payload
        .chunks_exact(8)
        .map(|c| CharShapeRef {
            position: LE::read_u32(&c[..4]),
            char_shape_id: LE::read_u32(&c[4..]),
        })
        .collect()
}

/// Decoded `PARA_TEXT`: visible UTF-16 units, each tagged with its position
/// in the raw text so char shape boundaries can be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaText {
    units: Vec<u16>,
    positions: Vec<u32>,
}

impl ParaText {
    /// Decode from a payload, resolving control characters.
    pub fn decode(payload: &[u8]) -> Self {
        let raw = utf16_units(payload);

        let mut text = Self::default();
        let mut i = 0;
        while i < raw.len() {
            let code = raw[i];
            let pos = i as u32;
            i += 1;
            match code {
                // Tab is an 8-unit inline control.
                9 => {
                    text.push('\t' as u16, pos);
                    i += 7;
                }
                10 => text.push('\n' as u16, pos),
                // Hyphen.
                24 => text.push('-' as u16, pos),
                // Non-breaking and fixed-width spaces.
                30 | 31 => text.push(' ' as u16, pos),
                // Inline and extended controls span 8 units.
                1..=8 | 11 | 12 | 14..=23 => i += 7,
                0..=31 => {}
                _ => text.push(code, pos),
            }
        }
        text
    }

    fn push(&mut self, unit: u16, pos: u32) {
        self.units.push(unit);
        self.positions.push(pos);
    }

    /// Visible text.
    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Check if no visible text remains.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Split the text at char shape boundaries.
    ///
    /// Text before the first boundary gets `None`.
    pub fn split_runs(&self, refs: &[CharShapeRef]) -> Vec<(String, Option<u32>)> {
        if refs.is_empty() {
            return vec![(self.text(), None)];
        }

        let mut runs = Vec::with_capacity(refs.len() + 1);
        let mut start = 0;
        let mut shape = None;
        for r in refs {
            let end = self.positions.partition_point(|&p| p < r.position).max(start);
            if end > start {
                runs.push((String::from_utf16_lossy(&self.units[start..end]), shape));
            }
            start = end;
            shape = Some(r.char_shape_id);
        }
        if start < self.units.len() {
            runs.push((String::from_utf16_lossy(&self.units[start..]), shape));
        }
        runs
    }
}
