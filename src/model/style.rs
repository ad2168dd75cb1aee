//! Resolved style catalogs from the DocInfo stream.
//!
//! Each catalog is indexed by the 0-based position of its record in
//! DocInfo. Lookups never panic: an index outside a catalog yields `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::BorderStyle;

/// The five DocInfo catalogs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleCatalog {
    /// Font faces, all languages concatenated
    pub face_names: Vec<FaceName>,

    /// Character shapes
    pub char_shapes: Vec<CharShape>,

    /// Paragraph shapes
    pub para_shapes: Vec<ParaShape>,

    /// Border/fill definitions
    pub border_fills: Vec<BorderFill>,

    /// Named styles; `None` where an entry referenced a missing shape
    pub styles: Vec<Option<Style>>,
}

impl StyleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a face name.
    pub fn face_name(&self, index: usize) -> Option<&FaceName> {
        self.face_names.get(index)
    }

    /// Look up a char shape.
    pub fn char_shape(&self, index: usize) -> Option<&CharShape> {
        self.char_shapes.get(index)
    }

    /// Look up a paragraph shape.
    pub fn para_shape(&self, index: usize) -> Option<&ParaShape> {
        self.para_shapes.get(index)
    }

    /// Look up a border fill.
    pub fn border_fill(&self, index: usize) -> Option<&BorderFill> {
        self.border_fills.get(index)
    }

    /// Look up a style. Dropped entries resolve to `None`.
    pub fn style(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)?.as_ref()
    }

    /// CSS font-family list for a char shape.
    ///
    /// Uses the Hangul face, then the Latin face, and appends the generic
    /// family of the first face found.
    pub fn font_family(&self, char_shape: usize) -> Option<String> {
        let shape = self.char_shape(char_shape)?;
        let faces: Vec<&FaceName> = [Language::Hangul, Language::Latin]
            .iter()
            .filter_map(|lang| shape.faces.get(lang))
            .filter_map(|&i| self.face_name(i))
            .collect();
        let first = faces.first()?;

        let mut names: Vec<String> = Vec::new();
        for face in &faces {
            let quoted = format!("'{}'", face.name);
            if !names.contains(&quoted) {
                names.push(quoted);
            }
        }
        names.push(first.generic_family().to_string());
        Some(names.join(", "))
    }

    /// Total number of entries across all catalogs.
    pub fn len(&self) -> usize {
        self.face_names.len()
            + self.char_shapes.len()
            + self.para_shapes.len()
            + self.border_fills.len()
            + self.styles.len()
    }

    /// Check if every catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Script a font face applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Hangul
    Hangul,
    /// Latin
    Latin,
    /// Hanja (CJK ideographs)
    Hanja,
    /// Japanese
    Japanese,
    /// Other scripts
    Other,
    /// Symbols
    Symbol,
    /// User-defined
    User,
}

impl Language {
    /// All languages in record order.
    pub const ALL: [Language; 7] = [
        Language::Hangul,
        Language::Latin,
        Language::Hanja,
        Language::Japanese,
        Language::Other,
        Language::Symbol,
        Language::User,
    ];
}

/// A font face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceName {
    /// Family name
    pub name: String,

    /// Substitute family name
    pub alternate: Option<String>,

    /// Whether the face has serifs
    pub serif: bool,
}

impl FaceName {
    /// Generic CSS family for this face.
    pub fn generic_family(&self) -> &'static str {
        if self.serif {
            "serif"
        } else {
            "sans-serif"
        }
    }
}

/// Character formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharShape {
    /// Font size in points
    pub font_size: f32,

    /// Text colour as `rgb(r,g,b)`
    pub color: String,

    /// Underline colour as `rgb(r,g,b)`
    pub underline_color: String,

    /// Shade (highlight) colour, absent when white or unset
    pub shade_color: Option<String>,

    /// Bold
    pub bold: bool,

    /// Italic
    pub italic: bool,

    /// Underline present
    pub underline: bool,

    /// Underline line shape
    pub underline_style: BorderStyle,

    /// Strikethrough
    pub strikethrough: bool,

    /// Superscript
    pub superscript: bool,

    /// Subscript
    pub subscript: bool,

    /// FaceName catalog index per language
    pub faces: BTreeMap<Language, usize>,
}

/// Paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParaShape {
    /// Horizontal alignment
    pub alignment: Alignment,

    /// Line spacing in percent, when the spacing basis is a percentage
    pub line_spacing: Option<f32>,

    /// Space before the paragraph in points
    pub spacing_before: f32,

    /// Space after the paragraph in points
    pub spacing_after: f32,

    /// First-line indent in pixels
    pub indent: f32,

    /// Left margin in pixels
    pub margin_left: f32,

    /// Right margin in pixels
    pub margin_right: f32,

    /// Paragraph border fill id
    pub border_fill_id: Option<u16>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Justified alignment (HWP default)
    #[default]
    Justify,
    /// Left alignment
    Left,
    /// Right alignment
    Right,
    /// Center alignment
    Center,
    /// Distributed across the line
    Distribute,
}

impl Alignment {
    /// Map the 3-bit alignment code of a ParaShape.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Alignment::Left,
            2 => Alignment::Right,
            3 => Alignment::Center,
            4 | 5 => Alignment::Distribute,
            _ => Alignment::Justify,
        }
    }

    /// CSS `text-align` value.
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Justify | Alignment::Distribute => "justify",
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

/// One border line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Line style
    pub style: BorderStyle,

    /// Width in millimetres
    pub width: f32,

    /// Colour as `rgb(r,g,b)`
    pub color: String,
}

impl Border {
    /// CSS shorthand, e.g. `0.12mm solid rgb(0,0,0)`.
    pub fn to_css(&self) -> String {
        if self.style == BorderStyle::None {
            return "none".to_string();
        }
        format!("{}mm {} {}", self.width, self.style.as_css(), self.color)
    }
}

/// Border and background definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderFill {
    /// Left border
    pub left: Border,

    /// Right border
    pub right: Border,

    /// Top border
    pub top: Border,

    /// Bottom border
    pub bottom: Border,

    /// Diagonal line
    pub diagonal: Border,

    /// Solid background colour as `rgb(r,g,b)`
    pub background: Option<String>,
}

/// Kind of named style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Applies to whole paragraphs
    #[default]
    Paragraph,
    /// Applies to character runs
    Character,
}

/// A named composite style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Local name
    pub name: String,

    /// English name
    pub english_name: String,

    /// Style kind
    pub kind: StyleKind,

    /// Style to apply to the following paragraph
    pub next_style: u8,

    /// CharShape catalog index (always in bounds)
    pub char_shape: usize,

    /// ParaShape catalog index (always in bounds)
    pub para_shape: usize,
}
