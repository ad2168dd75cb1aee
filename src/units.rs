//! Unit conversion and lookup tables for HWP numeric style values.
//!
//! HWP stores lengths in HWPUNIT (1/7200 inch), font sizes in 1/100 pt and
//! colours as `0x00BBGGRR` words. Everything here is a pure function of its
//! arguments.

use serde::{Deserialize, Serialize};

/// HWPUNIT per inch.
pub const HWPUNIT_PER_INCH: f32 = 7200.0;

/// Native units per device pixel for indents and margins.
pub const HWPUNIT_PER_PX: f32 = HWPUNIT_PER_INCH / 96.0;

/// Paragraph spacing is stored at twice its point value, in 1/100 pt.
pub const PARA_SPACING_DIVISOR: f32 = 200.0;

/// Border widths in millimetres, indexed by the 4-bit width code.
pub const BORDER_WIDTHS_MM: [f32; 16] = [
    0.1, 0.12, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0,
];

/// Border line styles, indexed by the 4-bit line type code.
pub const BORDER_STYLES: [BorderStyle; 16] = [
    BorderStyle::None,
    BorderStyle::Solid,
    BorderStyle::Dashed,
    BorderStyle::Dotted,
    BorderStyle::Dashed,
    BorderStyle::Dashed,
    BorderStyle::Dashed,
    BorderStyle::Dotted,
    BorderStyle::Double,
    BorderStyle::Double,
    BorderStyle::Double,
    BorderStyle::Double,
    BorderStyle::Solid,
    BorderStyle::Double,
    BorderStyle::Solid,
    BorderStyle::Solid,
];

/// Normalised border line style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No border
    #[default]
    None,
    /// Solid line
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Double line
    Double,
}

impl BorderStyle {
    /// CSS keyword for this style.
    pub fn as_css(&self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
        }
    }
}

/// Map a border line type code to a style. Codes outside the table are `None`.
pub fn border_style(code: u8) -> BorderStyle {
    BORDER_STYLES
        .get(code as usize)
        .copied()
        .unwrap_or(BorderStyle::None)
}

/// Map a border width code to millimetres, doubled for double lines.
///
/// Codes outside the table resolve to the thinnest width.
pub fn border_width_mm(code: u8, style: BorderStyle) -> f32 {
    let base = BORDER_WIDTHS_MM
        .get(code as usize)
        .copied()
        .unwrap_or(BORDER_WIDTHS_MM[0]);
    if style == BorderStyle::Double {
        base * 2.0
    } else {
        base
    }
}

/// Convert a size in 1/100 pt to points.
pub fn centipoints_to_pt(value: i32) -> f32 {
    value as f32 / 100.0
}

/// Convert stored paragraph spacing to points.
pub fn para_spacing_to_pt(value: i32) -> f32 {
    value as f32 / PARA_SPACING_DIVISOR
}

/// Convert HWPUNIT to device pixels.
pub fn hwpunit_to_px(value: i32) -> f32 {
    value as f32 / HWPUNIT_PER_PX
}

/// Split a `0x00BBGGRR` colour word into its channels.
pub fn colorref_channels(color: u32) -> (u8, u8, u8) {
    (
        (color & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        ((color >> 16) & 0xFF) as u8,
    )
}

/// Format a `0x00BBGGRR` colour word as `rgb(r,g,b)`.
pub fn colorref_to_rgb(color: u32) -> String {
    let (r, g, b) = colorref_channels(color);
    format!("rgb({},{},{})", r, g, b)
}
