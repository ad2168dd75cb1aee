//! End-to-end decoding of compound files written to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::DeflateEncoder;
use flate2::Compression;
use tempfile::TempDir;

use unhwp::parser::{encode_record, tags};
use unhwp::{
    extract_text, parse_bytes, parse_file, to_json, Alignment, DecodeOptions, DocumentNode, Error,
    Hwp, IssueKind, JsonFormat, Unhwp,
};

const CTRL_TABLE: u32 = u32::from_be_bytes(*b"tbl ");

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn utf16(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn wstring(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out = (units.len() as u16).to_le_bytes().to_vec();
    out.extend(units.iter().flat_map(|u| u.to_le_bytes()));
    out
}

fn file_header(properties: u32) -> Vec<u8> {
    let mut data = vec![0u8; 32];
    data[..17].copy_from_slice(b"HWP Document File");
    data.extend_from_slice(&0x0500_0102u32.to_le_bytes());
    data.extend_from_slice(&properties.to_le_bytes());
    data
}

/// One char shape (12pt bold), one centered para shape, one style "Body".
fn doc_info() -> Vec<u8> {
    let mut char_shape: Vec<u8> = vec![0u8; 14];
    char_shape.extend_from_slice(&[100u8; 7]);
    char_shape.extend_from_slice(&[0u8; 7]);
    char_shape.extend_from_slice(&[100u8; 7]);
    char_shape.extend_from_slice(&[0u8; 7]);
    char_shape.extend_from_slice(&1200i32.to_le_bytes());
    char_shape.extend_from_slice(&0x2u32.to_le_bytes());
    char_shape.extend_from_slice(&[0u8; 2]);
    char_shape.extend_from_slice(&0u32.to_le_bytes());
    char_shape.extend_from_slice(&0u32.to_le_bytes());
    char_shape.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());

    let mut para_shape = (3u32 << 2).to_le_bytes().to_vec();
    para_shape.extend_from_slice(&[0u8; 20]);
    para_shape.extend_from_slice(&160i32.to_le_bytes());
    para_shape.extend_from_slice(&[0u8; 6]);

    let mut style = wstring("Body");
    style.extend(wstring("Body"));
    style.extend_from_slice(&[0, 0, 0x12, 0x04]);
    style.extend_from_slice(&0u16.to_le_bytes());
    style.extend_from_slice(&0u16.to_le_bytes());

    let mut data = encode_record(tags::CHAR_SHAPE, 0, &char_shape);
    data.extend(encode_record(tags::PARA_SHAPE, 0, &para_shape));
    data.extend(encode_record(tags::STYLE, 0, &style));
    data
}

fn para_header(level: u16, styled: bool) -> Vec<u8> {
    let mut payload = vec![0u8; 8];
    if styled {
        payload.extend_from_slice(&0u16.to_le_bytes());
        payload.push(0);
    }
    encode_record(tags::PARA_HEADER, level, &payload)
}

fn para(level: u16, text: &str) -> Vec<u8> {
    let mut data = para_header(level, false);
    data.extend(encode_record(tags::PARA_TEXT, level + 1, &utf16(text)));
    data
}

fn table(level: u16, cells: &[[&str; 2]; 2]) -> Vec<u8> {
    let mut ctrl = CTRL_TABLE.to_le_bytes().to_vec();
    ctrl.extend_from_slice(&[0u8; 12]);
    ctrl.extend_from_slice(&30000u32.to_le_bytes());
    ctrl.extend_from_slice(&5000u32.to_le_bytes());

    let mut info = 0u32.to_le_bytes().to_vec();
    info.extend_from_slice(&2u16.to_le_bytes());
    info.extend_from_slice(&2u16.to_le_bytes());
    info.extend_from_slice(&[0u8; 10]);
    info.extend_from_slice(&2u16.to_le_bytes());
    info.extend_from_slice(&2u16.to_le_bytes());
    info.extend_from_slice(&0u16.to_le_bytes());

    let mut data = encode_record(tags::CTRL_HEADER, level + 1, &ctrl);
    data.extend(encode_record(tags::TABLE, level + 2, &info));
    for (row, line) in cells.iter().enumerate() {
        for (col, text) in line.iter().enumerate() {
            let mut list = 1u16.to_le_bytes().to_vec();
            list.extend_from_slice(&[0u8; 6]);
            list.extend_from_slice(&(col as u16).to_le_bytes());
            list.extend_from_slice(&(row as u16).to_le_bytes());
            list.extend_from_slice(&1u16.to_le_bytes());
            list.extend_from_slice(&1u16.to_le_bytes());
            list.extend_from_slice(&15000u32.to_le_bytes());
            list.extend_from_slice(&2500u32.to_le_bytes());
            list.extend_from_slice(&[0u8; 8]);
            list.extend_from_slice(&0u16.to_le_bytes());
            data.extend(encode_record(tags::LIST_HEADER, level + 2, &list));
            data.extend(para(level + 2, text));
        }
    }
    data
}

fn section0() -> Vec<u8> {
    let mut data = para_header(0, true);
    data.extend(encode_record(tags::PARA_TEXT, 1, &utf16("제목 Title")));
    let mut refs = 0u32.to_le_bytes().to_vec();
    refs.extend_from_slice(&0u32.to_le_bytes());
    data.extend(encode_record(tags::PARA_CHAR_SHAPE, 1, &refs));

    data.extend(para_header(0, false));
    data.extend(table(0, &[["이름", "값"], ["a", "1"]]));
    data.extend(para(0, "끝"));
    data
}

fn write_hwp(dir: &Path, compressed: bool) -> PathBuf {
    let pack = |data: Vec<u8>| if compressed { deflate(&data) } else { data };
    let path = dir.join("sample.hwp");
    let mut comp = cfb::create(&path).unwrap();
    comp.create_stream("/FileHeader")
        .unwrap()
        .write_all(&file_header(compressed as u32))
        .unwrap();
    comp.create_stream("/DocInfo")
        .unwrap()
        .write_all(&pack(doc_info()))
        .unwrap();
    comp.create_storage("/BodyText").unwrap();
    comp.create_stream("/BodyText/Section1")
        .unwrap()
        .write_all(&pack(para(0, "둘째 구역")))
        .unwrap();
    comp.create_stream("/BodyText/Section0")
        .unwrap()
        .write_all(&pack(section0()))
        .unwrap();
    comp.create_storage("/BinData").unwrap();
    comp.create_stream("/BinData/BIN0001.png")
        .unwrap()
        .write_all(&deflate(b"\x89PNG fake"))
        .unwrap();
    comp.flush().unwrap();
    path
}

#[test]
fn test_parse_file_structure() {
    let dir = TempDir::new().unwrap();
    let hwp = parse_file(write_hwp(dir.path(), true)).unwrap();

    assert!(hwp.issues().is_empty(), "{:?}", hwp.issues());
    let doc = hwp.document();
    assert_eq!(doc.section_count, 2);
    assert_eq!(doc.table_count(), 1);

    let title = doc.nodes[0].as_paragraph().unwrap();
    assert_eq!(title.plain_text(), "제목 Title");
    assert_eq!(title.para_shape, Some(0));
    assert_eq!(title.style, Some(0));
    assert_eq!(title.runs[0].char_shape, Some(0));

    let table = doc
        .nodes
        .iter()
        .find_map(DocumentNode::as_table)
        .unwrap();
    assert_eq!((table.rows, table.cols), (2, 2));
    assert_eq!(table.width, 30000);
    assert_eq!(table.plain_text(), "이름\t값\na\t1");

    let last = doc.nodes.last().unwrap();
    assert_eq!(last.plain_text(), "둘째 구역");
}

#[test]
fn test_styles_resolved() {
    let dir = TempDir::new().unwrap();
    let hwp = Hwp::open(write_hwp(dir.path(), true)).unwrap();
    let styles = hwp.styles();

    assert_eq!(styles.char_shapes[0].font_size, 12.0);
    assert!(styles.char_shapes[0].bold);
    assert_eq!(styles.para_shapes[0].alignment, Alignment::Center);
    assert_eq!(styles.para_shapes[0].line_spacing, Some(160.0));
    assert_eq!(styles.style(0).map(|s| s.name.as_str()), Some("Body"));
}

#[test]
fn test_uncompressed_document() {
    let dir = TempDir::new().unwrap();
    let hwp = parse_file(write_hwp(dir.path(), false)).unwrap();
    assert!(hwp.issues().is_empty());
    assert_eq!(hwp.header().unwrap().compressed, Some(false));
    assert!(hwp.text().starts_with("제목 Title"));
}

#[test]
fn test_extract_text_and_json() {
    let dir = TempDir::new().unwrap();
    let path = write_hwp(dir.path(), true);

    let text = extract_text(&path).unwrap();
    assert!(text.contains("이름\t값"));
    assert!(text.ends_with("둘째 구역"));

    let json = to_json(&path, JsonFormat::Compact).unwrap();
    assert!(json.contains("\"type\":\"table\""));
    assert!(json.contains("\"version\":\"5.0.1.2\""));
}

#[test]
fn test_images_from_file() {
    let dir = TempDir::new().unwrap();
    let hwp = parse_file(write_hwp(dir.path(), true)).unwrap();

    assert_eq!(hwp.attachment_count(), 1);
    let images = hwp.images();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].mime_type, "image/png");
    assert_eq!(hwp.image(0).unwrap().data, b"\x89PNG fake");
}

#[test]
fn test_builder_and_bytes_agree() {
    let dir = TempDir::new().unwrap();
    let path = write_hwp(dir.path(), true);
    let bytes = std::fs::read(&path).unwrap();

    let from_bytes = parse_bytes(&bytes).unwrap();
    let from_builder = Unhwp::new().normalized().parse(&path).unwrap();
    assert_eq!(from_bytes.document(), from_builder.document());
    assert_eq!(from_bytes.text(), from_builder.text());
}

#[test]
fn test_body_text_stream_without_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flat.hwp");
    let mut comp = cfb::create(&path).unwrap();
    comp.create_stream("/FileHeader")
        .unwrap()
        .write_all(&file_header(1))
        .unwrap();
    comp.create_stream("/BodyText")
        .unwrap()
        .write_all(&deflate(&para(0, "flat body")))
        .unwrap();
    comp.flush().unwrap();

    let hwp = parse_file(&path).unwrap();
    assert_eq!(hwp.text(), "flat body");
    let kinds: Vec<IssueKind> = hwp.issues().iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![IssueKind::ContainerMissingStream]);
}

#[test]
fn test_container_without_body() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.hwp");
    let mut comp = cfb::create(&path).unwrap();
    comp.create_stream("/FileHeader")
        .unwrap()
        .write_all(&file_header(1))
        .unwrap();
    comp.flush().unwrap();

    let result = Hwp::open_with_options(&path, DecodeOptions::new());
    assert!(matches!(result, Err(Error::MissingStream(_))));
}
