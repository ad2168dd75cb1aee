//! Record stream and document builder tests through the public API.

use unhwp::model::StyleCatalog;
use unhwp::parser::{
    build_section, encode_record, parse_records, parse_records_with, tags, DecodeLimits, Deadline,
    RecordFields,
};
use unhwp::{ContainerListing, DecodeOptions, Hwp, IssueKind};

fn utf16(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Deterministic byte noise (xorshift).
fn noise(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        })
        .collect()
}

#[test]
fn test_records_decode_fields() {
    let mut data = encode_record(tags::PARA_HEADER, 0, &[3, 0, 0, 0, 0, 0, 0, 0]);
    data.extend(encode_record(tags::PARA_TEXT, 1, &utf16("hi\r")));
    data.extend(encode_record(tags::PAGE_DEF, 1, &[0; 40]));

    let decoded = parse_records(&data);
    assert!(!decoded.has_issues());
    let records = decoded.value;
    assert_eq!(records.len(), 3);

    assert!(matches!(records[0].fields, RecordFields::ParaHeader(_)));
    match &records[1].fields {
        RecordFields::ParaText(text) => assert_eq!(text.text(), "hi"),
        other => panic!("unexpected fields {:?}", other),
    }
    assert!(matches!(records[2].fields, RecordFields::Raw));
    assert_eq!(records[1].offset, 12);
    assert_eq!(records[1].level, 1);
}

#[test]
fn test_large_record_uses_extended_size() {
    let payload = utf16(&"가".repeat(3000));
    let data = encode_record(tags::PARA_TEXT, 1, &payload);
    assert_eq!(data.len(), 8 + payload.len());

    let records = parse_records(&data).value;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].payload.len(), 6000);
}

#[test]
fn test_truncated_stream_keeps_prefix() {
    let mut data = encode_record(tags::PARA_HEADER, 0, &[0; 8]);
    data.extend(encode_record(tags::PARA_TEXT, 1, &utf16("complete")));
    let full = data.len();
    data.extend(encode_record(tags::PARA_TEXT, 1, &utf16("cut off")));
    data.truncate(full + 6);

    let decoded = parse_records(&data);
    assert_eq!(decoded.value.len(), 2);
    assert_eq!(decoded.issues.len(), 1);
    assert_eq!(decoded.issues[0].kind, IssueKind::MalformedRecord);
    assert_eq!(decoded.issues[0].offset, Some(full));

    let nodes = build_section(&decoded.value, &StyleCatalog::new()).value;
    assert_eq!(nodes[0].plain_text(), "complete");
}

#[test]
fn test_record_limit() {
    let mut data = Vec::new();
    for _ in 0..10 {
        data.extend(encode_record(tags::PARA_HEADER, 0, &[0; 8]));
    }
    let limits = DecodeLimits {
        max_records: 4,
        ..Default::default()
    };
    let decoded = parse_records_with(&data, &limits, &Deadline::none());
    assert_eq!(decoded.value.len(), 4);
    assert_eq!(decoded.issues[0].kind, IssueKind::LimitExceeded);
}

#[test]
fn test_noise_never_panics() {
    let catalog = StyleCatalog::new();
    for seed in 1..200u32 {
        let data = noise(seed, 64 + seed as usize * 7);
        let records = parse_records(&data).value;
        let _ = build_section(&records, &catalog);
    }
}

#[test]
fn test_noise_in_container_never_panics() {
    for seed in 1..50u32 {
        let listing = ContainerListing::new()
            .with_entry("FileHeader", noise(seed, 40))
            .with_entry("DocInfo", noise(seed + 1000, 300))
            .with_entry("BodyText/Section0", noise(seed + 2000, 500))
            .with_entry("BinData/BIN0001.bmp", noise(seed + 3000, 20));
        let hwp = Hwp::from_listing(listing, DecodeOptions::default()).unwrap();
        let _ = hwp.text();
        let _ = hwp.image(0);
    }
}

#[test]
fn test_fallback_text_is_printable_ascii() {
    let listing = ContainerListing::new().with_entry("BodyText", b"\xFF\xFEsome\x00 bytes\x90".to_vec());
    let hwp = Hwp::from_listing(listing, DecodeOptions::default()).unwrap();
    let text = hwp.text();
    assert_eq!(text, "some bytes");
    assert!(text.bytes().all(|b| (0x20..=0x7E).contains(&b)));
}
