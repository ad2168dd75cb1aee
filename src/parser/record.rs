//! Record Stream Parser.
//!
//! A stream is a flat sequence of records. Each record starts with a packed
//! 32-bit little-endian header:
//!
//! | bits  | field |
//! |-------|-------|
//! | 0-9   | tag id |
//! | 10-19 | level |
//! | 20-31 | payload size |
//!
//! A saturated size (`0xFFF`) means the real size follows as a `u32`.

use std::collections::BTreeSet;

use crate::error::{Decoded, Error, Issue, IssueKind};

use super::fields::{
    decode_char_shape_refs, CharShapeRef, CtrlHeader, LineSeg, ListContext, ListHeader,
    ParaHeader, ParaText, TableInfo,
};
use super::options::{DecodeLimits, Deadline};
use super::reader::ByteReader;
use super::tags;

/// Size of the packed record header.
pub const HEADER_SIZE: usize = 4;

/// Size field value announcing an extended size.
pub const SIZE_SATURATED: u32 = 0xFFF;

const DEADLINE_INTERVAL: usize = 64;

/// Unpacked record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Tag id
    pub tag: u16,
    /// Nesting level
    pub level: u16,
    /// Payload size from the packed field (may be saturated)
    pub size: u32,
}

impl RecordHeader {
    /// Unpack a header word.
    pub fn unpack(word: u32) -> Self {
        Self {
            tag: (word & 0x3FF) as u16,
            level: ((word >> 10) & 0x3FF) as u16,
            size: word >> 20,
        }
    }

    /// Pack into a header word; sizes that do not fit are saturated.
    pub fn pack(&self) -> u32 {
        let size = self.size.min(SIZE_SATURATED);
        (self.tag as u32 & 0x3FF) | ((self.level as u32 & 0x3FF) << 10) | (size << 20)
    }

    /// Whether an extended size word follows.
    pub fn is_extended(&self) -> bool {
        self.size == SIZE_SATURATED
    }
}

/// Tag-specific decoded view of a record payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFields {
    /// `PARA_HEADER`
    ParaHeader(ParaHeader),
    /// `PARA_TEXT`
    ParaText(ParaText),
    /// `PARA_CHAR_SHAPE`
    ParaCharShape(Vec<CharShapeRef>),
    /// `PARA_LINE_SEG`
    ParaLineSeg(LineSeg),
    /// `CTRL_HEADER`
    CtrlHeader(CtrlHeader),
    /// `TABLE`
    Table(TableInfo),
    /// A known tag decoded elsewhere or by the caller (e.g. `LIST_HEADER`,
    /// DocInfo records)
    Raw,
    /// A tag the format does not define; kept opaque
    Unknown,
}

/// One parsed record. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Tag id
    pub tag: u16,

    /// Nesting level
    pub level: u16,

    /// Byte offset of the header within the stream
    pub offset: usize,

    /// Payload bytes, unchanged
    pub payload: Vec<u8>,

    /// Decoded fields
    pub fields: RecordFields,
}

impl Record {
    /// Build a record and decode its payload.
    pub fn new(tag: u16, level: u16, offset: usize, payload: Vec<u8>) -> Self {
        let fields = match tag {
            tags::PARA_HEADER => RecordFields::ParaHeader(ParaHeader::decode(&payload)),
            tags::PARA_TEXT => RecordFields::ParaText(ParaText::decode(&payload)),
            tags::PARA_CHAR_SHAPE => RecordFields::ParaCharShape(decode_char_shape_refs(&payload)),
            tags::PARA_LINE_SEG => RecordFields::ParaLineSeg(LineSeg::decode(&payload)),
            tags::CTRL_HEADER => RecordFields::CtrlHeader(CtrlHeader::decode(&payload)),
            tags::TABLE => RecordFields::Table(TableInfo::decode(&payload)),
            t if tags::is_known(t) => RecordFields::Raw,
            _ => RecordFields::Unknown,
        };
        Self {
            tag,
            level,
            offset,
            payload,
            fields,
        }
    }

    /// A reader over the payload.
    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(&self.payload)
    }

    /// Decode the payload as a `LIST_HEADER` in the caller's context.
    pub fn list_header(&self, context: ListContext) -> ListHeader {
        ListHeader::decode(&self.payload, context)
    }

    /// Check if the tag is not defined by the format.
    pub fn is_unknown(&self) -> bool {
        matches!(self.fields, RecordFields::Unknown)
    }
}

/// Parse a whole stream with default limits and no deadline.
pub fn parse_records(data: &[u8]) -> Decoded<Vec<Record>> {
    parse_records_with(data, &DecodeLimits::default(), &Deadline::none())
}

/// Parse a stream into records.
///
/// Stops at the first truncated header or payload and returns every record
/// decoded before it, with a `MalformedRecord` issue.
pub fn parse_records_with(
    data: &[u8],
    limits: &DecodeLimits,
    deadline: &Deadline,
) -> Decoded<Vec<Record>> {
    let mut records = Vec::new();
    let mut issues = Vec::new();

    if data.len() < HEADER_SIZE {
        issues.push(
            Issue::new(
                IssueKind::MalformedRecord,
                format!("stream of {} bytes is shorter than a record header", data.len()),
            )
            .at_offset(0),
        );
        return Decoded::with_issues(records, issues);
    }

    let mut unknown_tags = BTreeSet::new();
    let mut pos = 0;
    while pos < data.len() {
        if records.len() % DEADLINE_INTERVAL == 0 {
            if let Err(e) = deadline.check() {
                issues.push(Issue::from_error(&e).at_offset(pos));
                break;
            }
        }
        if records.len() >= limits.max_records {
            let e = Error::LimitExceeded(format!("more than {} records", limits.max_records));
            issues.push(Issue::from_error(&e).at_offset(pos));
            break;
        }

        let record = match next_record(data, pos) {
            Ok(record) => record,
            Err(e) => {
                issues.push(Issue::from_error(&e));
                break;
            }
        };
        pos = record.end;

        if !tags::is_known(record.tag) && unknown_tags.insert(record.tag) {
            issues.push(
                Issue::new(
                    IssueKind::UnsupportedTag,
                    format!("tag {} kept opaque", record.tag),
                )
                .at_offset(record.offset),
            );
        }

        records.push(Record::new(
            record.tag,
            record.level,
            record.offset,
            data[record.start..record.end].to_vec(),
        ));
    }

    log::debug!(
        "Parsed {} records from {} bytes ({} issues)",
        records.len(),
        data.len(),
        issues.len()
    );
    Decoded::with_issues(records, issues)
}

struct Span {
    tag: u16,
    level: u16,
    offset: usize,
    start: usize,
    end: usize,
}

fn next_record(data: &[u8], offset: usize) -> Result<Span, Error> {
    let malformed = |reason: String| Error::MalformedRecord { offset, reason };

    let mut r = ByteReader::new(data);
    r.seek(offset);
    let word = r
        .u32()
        .ok_or_else(|| malformed(format!("truncated header, {} bytes left", r.remaining())))?;
    let header = RecordHeader::unpack(word);

    let size = if header.is_extended() {
        r.u32()
            .ok_or_else(|| malformed("truncated extended size".to_string()))?
    } else {
        header.size
    } as usize;

    let start = r.position();
    if size > r.remaining() {
        return Err(malformed(format!(
            "tag {} declares {} payload bytes, {} left",
            header.tag,
            size,
            r.remaining()
        )));
    }

    Ok(Span {
        tag: header.tag,
        level: header.level,
        offset,
        start,
        end: start + size,
    })
}

/// Encode one record, using the extended size form when needed.
pub fn encode_record(tag: u16, level: u16, payload: &[u8]) -> Vec<u8> {
    let header = RecordHeader {
        tag,
        level,
        size: u32::try_from(payload.len()).unwrap_or(u32::MAX),
    };
    let mut out = Vec::with_capacity(payload.len() + 2 * HEADER_SIZE);
    out.extend_from_slice(&header.pack().to_le_bytes());
    if header.size >= SIZE_SATURATED {
        out.extend_from_slice(&header.size.to_le_bytes());
    }
    out.extend_from_slice(payload);
    out
}
