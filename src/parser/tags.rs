//! Record tag ids (HWP 5.0 format, `HWPTAG_BEGIN` = 0x10).

#![allow(missing_docs)]

pub const BEGIN: u16 = 0x010;

// DocInfo stream
pub const DOCUMENT_PROPERTIES: u16 = BEGIN;
pub const ID_MAPPINGS: u16 = BEGIN + 1;
pub const BIN_DATA: u16 = BEGIN + 2;
pub const FACE_NAME: u16 = BEGIN + 3;
pub const BORDER_FILL: u16 = BEGIN + 4;
pub const CHAR_SHAPE: u16 = BEGIN + 5;
pub const TAB_DEF: u16 = BEGIN + 6;
pub const NUMBERING: u16 = BEGIN + 7;
pub const BULLET: u16 = BEGIN + 8;
pub const PARA_SHAPE: u16 = BEGIN + 9;
pub const STYLE: u16 = BEGIN + 10;
pub const DOC_DATA: u16 = BEGIN + 11;
pub const DISTRIBUTE_DOC_DATA: u16 = BEGIN + 12;
pub const COMPATIBLE_DOCUMENT: u16 = BEGIN + 14;
pub const LAYOUT_COMPATIBILITY: u16 = BEGIN + 15;
pub const TRACKCHANGE: u16 = BEGIN + 16;
pub const MEMO_SHAPE: u16 = BEGIN + 76;
pub const FORBIDDEN_CHAR: u16 = BEGIN + 78;
pub const TRACK_CHANGE: u16 = BEGIN + 80;
pub const TRACK_CHANGE_AUTHOR: u16 = BEGIN + 81;

// BodyText sections
pub const PARA_HEADER: u16 = BEGIN + 50;
pub const PARA_TEXT: u16 = BEGIN + 51;
pub const PARA_CHAR_SHAPE: u16 = BEGIN + 52;
pub const PARA_LINE_SEG: u16 = BEGIN + 53;
pub const PARA_RANGE_TAG: u16 = BEGIN + 54;
pub const CTRL_HEADER: u16 = BEGIN + 55;
pub const LIST_HEADER: u16 = BEGIN + 56;
pub const PAGE_DEF: u16 = BEGIN + 57;
pub const FOOTNOTE_SHAPE: u16 = BEGIN + 58;
pub const PAGE_BORDER_FILL: u16 = BEGIN + 59;
pub const SHAPE_COMPONENT: u16 = BEGIN + 60;
pub const TABLE: u16 = BEGIN + 61;
pub const SHAPE_COMPONENT_LINE: u16 = BEGIN + 62;
pub const SHAPE_COMPONENT_RECTANGLE: u16 = BEGIN + 63;
pub const SHAPE_COMPONENT_ELLIPSE: u16 = BEGIN + 64;
pub const SHAPE_COMPONENT_ARC: u16 = BEGIN + 65;
pub const SHAPE_COMPONENT_POLYGON: u16 = BEGIN + 66;
pub const SHAPE_COMPONENT_CURVE: u16 = BEGIN + 67;
pub const SHAPE_COMPONENT_OLE: u16 = BEGIN + 68;
pub const SHAPE_COMPONENT_PICTURE: u16 = BEGIN + 69;
pub const SHAPE_COMPONENT_CONTAINER: u16 = BEGIN + 70;
pub const CTRL_DATA: u16 = BEGIN + 71;
pub const EQEDIT: u16 = BEGIN + 72;
pub const SHAPE_COMPONENT_TEXTART: u16 = BEGIN + 74;
pub const FORM_OBJECT: u16 = BEGIN + 75;
pub const MEMO_LIST: u16 = BEGIN + 77;
pub const CHART_DATA: u16 = BEGIN + 79;
pub const VIDEO_DATA: u16 = BEGIN + 82;
pub const SHAPE_COMPONENT_UNKNOWN: u16 = BEGIN + 83;

/// Check whether a tag id is defined by the format.
pub fn is_known(tag: u16) -> bool {
    matches!(
        tag,
        DOCUMENT_PROPERTIES..=DISTRIBUTE_DOC_DATA
            | COMPATIBLE_DOCUMENT..=TRACKCHANGE
            | PARA_HEADER..=EQEDIT
            | SHAPE_COMPONENT_TEXTART..=SHAPE_COMPONENT_UNKNOWN
    )
}

/// Short name for diagnostics.
pub fn name(tag: u16) -> &'static str {
    match tag {
        DOCUMENT_PROPERTIES => "DOCUMENT_PROPERTIES",
        ID_MAPPINGS => "ID_MAPPINGS",
        BIN_DATA => "BIN_DATA",
        FACE_NAME => "FACE_NAME",
        BORDER_FILL => "BORDER_FILL",
        CHAR_SHAPE => "CHAR_SHAPE",
        PARA_SHAPE => "PARA_SHAPE",
        STYLE => "STYLE",
        PARA_HEADER => "PARA_HEADER",
        PARA_TEXT => "PARA_TEXT",
        PARA_CHAR_SHAPE => "PARA_CHAR_SHAPE",
        PARA_LINE_SEG => "PARA_LINE_SEG",
        CTRL_HEADER => "CTRL_HEADER",
        LIST_HEADER => "LIST_HEADER",
        SHAPE_COMPONENT => "SHAPE_COMPONENT",
        TABLE => "TABLE",
        _ if is_known(tag) => "OTHER",
        _ => "UNKNOWN",
    }
}
