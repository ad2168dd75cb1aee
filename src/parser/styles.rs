//! Style Catalog Resolver.
//!
//! Turns DocInfo records into the five catalogs of a [`StyleCatalog`]. Each
//! catalog is one pass over the records of its tag, indexed by parse order.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Decoded, Issue, IssueKind};
use crate::model::{
    Alignment, Border, BorderFill, CharShape, FaceName, Language, ParaShape, Style, StyleCatalog,
    StyleKind,
};
use crate::units::{
    border_style, border_width_mm, centipoints_to_pt, colorref_to_rgb, hwpunit_to_px,
    para_spacing_to_pt, BorderStyle,
};

use super::reader::ByteReader;
use super::record::Record;
use super::tags;

/// Face names that are sans-serif when the record has no type info.
static SANS_FACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(gothic|sans|dotum|gulim|arial|helvetica|malgun|verdana|tahoma|고딕|돋움|굴림|맑은)")
        .expect("valid regex")
});

const FACE_HAS_ALTERNATE: u8 = 0x80;
const FACE_HAS_TYPE_INFO: u8 = 0x40;
const FACE_TYPE_INFO_SIZE: usize = 10;

const FILL_SOLID: u32 = 0x1;
const UNSET_COLOR: u32 = 0xFFFF_FFFF;
const WHITE: u32 = 0x00FF_FFFF;

/// Resolve every catalog from a DocInfo record list.
pub fn resolve_styles(records: &[Record]) -> Decoded<StyleCatalog> {
    let mut issues = Vec::new();

    let face_offsets = resolve_face_offsets(records);
    let face_names: Vec<FaceName> = of_tag(records, tags::FACE_NAME).map(decode_face_name).collect();
    let char_shapes: Vec<CharShape> = of_tag(records, tags::CHAR_SHAPE)
        .map(|r| decode_char_shape(r, &face_offsets, face_names.len()))
        .collect();
    let para_shapes: Vec<ParaShape> = of_tag(records, tags::PARA_SHAPE).map(decode_para_shape).collect();
    let border_fills: Vec<BorderFill> = of_tag(records, tags::BORDER_FILL).map(decode_border_fill).collect();

    let styles = of_tag(records, tags::STYLE)
        .enumerate()
        .map(|(index, record)| {
            let style = decode_style(record);
            if style.char_shape < char_shapes.len() && style.para_shape < para_shapes.len() {
                Some(style)
            } else {
                issues.push(
                    Issue::new(
                        IssueKind::UnresolvedStyleReference,
                        format!(
                            "style {} '{}' references char shape {} / para shape {}",
                            index, style.name, style.char_shape, style.para_shape
                        ),
                    )
                    .at_offset(record.offset),
                );
                None
            }
        })
        .collect();

    let catalog = StyleCatalog {
        face_names,
        char_shapes,
        para_shapes,
        border_fills,
        styles,
    };
    log::debug!(
        "Resolved styles: {} faces, {} char shapes, {} para shapes, {} border fills, {} styles",
        catalog.face_names.len(),
        catalog.char_shapes.len(),
        catalog.para_shapes.len(),
        catalog.border_fills.len(),
        catalog.styles.len()
    );
    Decoded::with_issues(catalog, issues)
}

fn of_tag(records: &[Record], tag: u16) -> impl Iterator<Item = &Record> {
    records.iter().filter(move |r| r.tag == tag)
}

/// First global FaceName index of each language.
///
/// `ID_MAPPINGS` counts: bin data, then fonts per language in
/// [`Language::ALL`] order. Without the record every offset is zero.
fn resolve_face_offsets(records: &[Record]) -> [usize; 7] {
    let mut offsets = [0usize; 7];
    let Some(record) = of_tag(records, tags::ID_MAPPINGS).next() else {
        return offsets;
    };
    let mut r = record.reader();
    // bin data count
    r.skip(4);
    let mut next = 0usize;
    for offset in offsets.iter_mut() {
        *offset = next;
        let count = r.i32().unwrap_or(0).max(0) as usize;
        next = next.saturating_add(count);
    }
    offsets
}

fn decode_face_name(record: &Record) -> FaceName {
    let mut r = record.reader();
    let attr = r.u8().unwrap_or(0);
    let name = r.wstring().unwrap_or_default();

    let mut alternate = None;
    if attr & FACE_HAS_ALTERNATE != 0 {
        // substitute font kind
        r.skip(1);
        alternate = r.wstring().filter(|s| !s.is_empty());
    }

    let mut serif_style = None;
    if attr & FACE_HAS_TYPE_INFO != 0 {
        if let Some(info) = r.bytes(FACE_TYPE_INFO_SIZE) {
            serif_style = Some(info[1]);
        }
    }

    let serif = match serif_style {
        // PANOSE: 2..=10 serif variants, 11..=15 sans variants
        Some(2..=10) => true,
        Some(11..=15) => false,
        _ => !SANS_FACE.is_match(&name),
    };

    FaceName {
        name,
        alternate,
        serif,
    }
}

fn decode_char_shape(record: &Record, face_offsets: &[usize; 7], face_count: usize) -> CharShape {
    let mut r = record.reader();

    let mut shape = CharShape::default();
    for (lang, offset) in Language::ALL.iter().zip(face_offsets) {
        let Some(id) = r.u16() else { break };
        let index = offset + id as usize;
        if index < face_count {
            shape.faces.insert(*lang, index);
        }
    }

    // ratios, spacings, relative sizes, offsets: 7 bytes each
    r.seek(42);
    shape.font_size = centipoints_to_pt(r.i32().unwrap_or(1000));

    let attr = r.u32().unwrap_or(0);
    shape.italic = attr & 0x1 != 0;
    shape.bold = attr & 0x2 != 0;
    shape.underline = (attr >> 2) & 0x3 != 0;
    shape.underline_style = if shape.underline {
        match border_style(((attr >> 4) & 0xF) as u8) {
            BorderStyle::None => BorderStyle::Solid,
            style => style,
        }
    } else {
        BorderStyle::None
    };
    shape.superscript = attr & (1 << 15) != 0;
    shape.subscript = attr & (1 << 16) != 0;
    shape.strikethrough = (attr >> 18) & 0x7 != 0;

    // shadow gaps
    r.skip(2);
    shape.color = colorref_to_rgb(r.u32().unwrap_or(0));
    shape.underline_color = colorref_to_rgb(r.u32().unwrap_or(0));
    shape.shade_color = r
        .u32()
        .filter(|&c| c != UNSET_COLOR && c != WHITE)
        .map(colorref_to_rgb);

    shape
}

fn decode_para_shape(record: &Record) -> ParaShape {
    let mut r = record.reader();
    let attr1 = r.u32().unwrap_or(0);
    let margin_left = r.i32().unwrap_or(0);
    let margin_right = r.i32().unwrap_or(0);
    let indent = r.i32().unwrap_or(0);
    let before = r.i32().unwrap_or(0);
    let after = r.i32().unwrap_or(0);
    let legacy_spacing = r.i32().unwrap_or(0);
    // tab def, numbering
    r.skip(4);
    let border_fill_id = r.u16();

    // Newer documents carry a 5-bit spacing type in attr3 and a second
    // spacing value; older ones only the 2-bit type in attr1.
    r.seek(46);
    let (spacing_type, spacing) = match (r.u32(), r.u32()) {
        (Some(attr3), Some(value)) => (attr3 & 0x1F, value as i32),
        _ => (attr1 & 0x3, legacy_spacing),
    };

    ParaShape {
        alignment: Alignment::from_code((attr1 >> 2) & 0x7),
        line_spacing: (spacing_type == 0).then_some(spacing as f32),
        spacing_before: para_spacing_to_pt(before),
        spacing_after: para_spacing_to_pt(after),
        indent: hwpunit_to_px(indent),
        margin_left: hwpunit_to_px(margin_left),
        margin_right: hwpunit_to_px(margin_right),
        border_fill_id: border_fill_id.filter(|&id| id != 0),
    }
}

fn read_border(r: &mut ByteReader<'_>) -> Border {
    let style = border_style(r.u8().unwrap_or(0));
    let width = border_width_mm(r.u8().unwrap_or(0), style);
    let color = colorref_to_rgb(r.u32().unwrap_or(0));
    Border {
        style,
        width,
        color,
    }
}

fn decode_border_fill(record: &Record) -> BorderFill {
    let mut r = record.reader();
    // attribute
    r.skip(2);
    let left = read_border(&mut r);
    let right = read_border(&mut r);
    let top = read_border(&mut r);
    let bottom = read_border(&mut r);
    let diagonal = read_border(&mut r);

    let background = match r.u32() {
        Some(fill) if fill & FILL_SOLID != 0 => r.u32().map(colorref_to_rgb),
        _ => None,
    };

    BorderFill {
        left,
        right,
        top,
        bottom,
        diagonal,
        background,
    }
}

fn decode_style(record: &Record) -> Style {
    let mut r = record.reader();
    let name = r.wstring().unwrap_or_default();
    let english_name = r.wstring().unwrap_or_default();
    let kind = match r.u8().unwrap_or(0) & 0x7 {
        1 => StyleKind::Character,
        _ => StyleKind::Paragraph,
    };
    let next_style = r.u8().unwrap_or(0);
    // language id
    r.skip(2);
    // A missing id cannot resolve.
    let para_shape = r.u16().map_or(usize::MAX, usize::from);
    let char_shape = r.u16().map_or(usize::MAX, usize::from);

    Style {
        name,
        english_name,
        kind,
        next_style,
        char_shape,
        para_shape,
    }
}
