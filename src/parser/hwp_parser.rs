//! HWP document parser: stream lookup and section orchestration.

use std::sync::LazyLock;

use regex::Regex;

use crate::container::{CompoundFileReader, ContainerListing, ContainerReader, Entry};
use crate::detect::{is_hwp_signature, parse_file_header};
use crate::error::{Decoded, Error, Issue, IssueKind, Result};
use crate::inflate::{Decompressor, RawDeflate};
use crate::model::{is_image_name, Document, FileHeader, Image, ImageInfo, StyleCatalog};

use super::builder::DocumentBuilder;
use super::extract::extract_text;
use super::options::{DecodeOptions, Deadline};
use super::record::parse_records_with;
use super::styles::resolve_styles;

/// Stream holding the file signature and properties.
pub const FILE_HEADER: &str = "FileHeader";
/// Stream holding the style catalogs.
pub const DOC_INFO: &str = "DocInfo";
/// Body stream, or storage of `SectionN` streams.
pub const BODY_TEXT: &str = "BodyText";
/// Storage of embedded binary data.
pub const BIN_DATA: &str = "BinData";

static SECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Section(\d+)$").expect("valid regex"));

/// HWP document parser over a container listing.
#[derive(Debug)]
pub struct HwpParser {
    listing: ContainerListing,
    options: DecodeOptions,
    decompressor: RawDeflate,
}

impl HwpParser {
    /// Read the container from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, DecodeOptions::default())
    }

    /// Read the container from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<Self> {
        let listing = CompoundFileReader::new().read(data)?;
        Ok(Self::from_listing(listing, options))
    }

    /// Wrap an already-read container listing.
    pub fn from_listing(listing: ContainerListing, options: DecodeOptions) -> Self {
        let decompressor = RawDeflate::with_limit(options.limits.max_inflated_size);
        Self {
            listing,
            options,
            decompressor,
        }
    }

    /// The container listing.
    pub fn listing(&self) -> &ContainerListing {
        &self.listing
    }

    /// The decode options.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode the FileHeader stream.
    ///
    /// An absent stream, a short stream or a foreign signature is an issue.
    /// An empty stream yields no header and no issue.
    pub fn header(&self) -> Decoded<Option<FileHeader>> {
        let Some(entry) = self.listing.find(FILE_HEADER) else {
            return Decoded::with_issues(None, vec![missing(FILE_HEADER)]);
        };
        if entry.data.is_empty() {
            return Decoded::clean(None);
        }

        let Some(header) = parse_file_header(&entry.data) else {
            let issue = Issue::new(
                IssueKind::MalformedRecord,
                format!("FileHeader is {} bytes, expected at least 36", entry.data.len()),
            );
            return Decoded::with_issues(None, vec![issue]);
        };

        let mut issues = Vec::new();
        if !is_hwp_signature(&header.signature) {
            issues.push(Issue::new(
                IssueKind::MalformedRecord,
                format!("unexpected signature '{}'", header.signature),
            ));
        }
        if header.encrypted {
            issues.push(Issue::new(
                IssueKind::DecompressionFailure,
                "document is password-protected; body streams are encrypted",
            ));
        }
        if header.distributable {
            issues.push(Issue::new(
                IssueKind::DecompressionFailure,
                "distribution document; body text is stored encrypted",
            ));
        }
        Decoded::with_issues(Some(header), issues)
    }

    /// Decode the whole document.
    ///
    /// Fails only when neither a `BodyText` stream nor a `BodyText` storage
    /// exists. Everything else degrades to issues.
    pub fn parse(&self) -> Result<Decoded<Document>> {
        let deadline = self.options.deadline();
        let mut issues = Vec::new();

        let sections = self.body_sections()?;
        let header = self.header().drain_into(&mut issues);
        let compressed = header.as_ref().and_then(|h| h.compressed);

        let styles = self
            .parse_styles(compressed, &deadline)
            .drain_into(&mut issues);

        let mut document = Document {
            header,
            styles,
            ..Default::default()
        };

        let builder = DocumentBuilder::new(&document.styles)
            .with_limits(self.options.limits)
            .with_deadline(deadline.clone());

        let mut nodes = Vec::new();
        for (index, entry) in sections.iter().enumerate() {
            if let Err(e) = deadline.check() {
                issues.push(Issue::from_error(&e).in_section(index));
                break;
            }
            let Some(data) = self.stream_data(entry, compressed, &mut issues, Some(index)) else {
                continue;
            };
            if data.is_empty() {
                continue;
            }

            let records = parse_records_with(&data, &self.options.limits, &deadline);
            let records = in_section(records, index).drain_into(&mut issues);
            let section_nodes = builder.build_section(&records, index).drain_into(&mut issues);
            nodes.extend(section_nodes);
        }
        document.nodes = nodes;
        document.section_count = sections.len();

        log::debug!(
            "Decoded {} sections into {} nodes with {} issues",
            document.section_count,
            document.nodes.len(),
            issues.len()
        );
        Ok(Decoded::with_issues(document, issues))
    }

    /// Degraded plain text from the body streams, via the Text Extractor.
    pub fn fallback_text(&self) -> String {
        let Ok(sections) = self.body_sections() else {
            return String::new();
        };
        sections
            .iter()
            .map(|entry| extract_text(&entry.data, &self.decompressor))
            .collect()
    }

    /// BodyText streams in section order.
    pub fn body_sections(&self) -> Result<Vec<&Entry>> {
        if let Some(entry) = self.listing.get(BODY_TEXT) {
            return Ok(vec![entry]);
        }
        if !self.listing.has_folder(BODY_TEXT) {
            return Err(Error::MissingStream(BODY_TEXT.to_string()));
        }

        let mut sections: Vec<(u32, &Entry)> = self
            .listing
            .entries_in(BODY_TEXT)
            .filter_map(|e| {
                let caps = SECTION_NAME.captures(&e.name)?;
                Some((caps[1].parse().ok()?, e))
            })
            .collect();
        sections.sort_by_key(|(n, _)| *n);
        Ok(sections.into_iter().map(|(_, e)| e).collect())
    }

    fn parse_styles(&self, compressed: Option<bool>, deadline: &Deadline) -> Decoded<StyleCatalog> {
        let mut issues = Vec::new();
        let Some(entry) = self.listing.find(DOC_INFO) else {
            return Decoded::with_issues(StyleCatalog::new(), vec![missing(DOC_INFO)]);
        };
        let Some(data) = self.stream_data(entry, compressed, &mut issues, None) else {
            return Decoded::with_issues(StyleCatalog::new(), issues);
        };
        if data.is_empty() {
            return Decoded::with_issues(StyleCatalog::new(), issues);
        }

        let records = parse_records_with(&data, &self.options.limits, deadline).drain_into(&mut issues);
        let catalog = resolve_styles(&records).drain_into(&mut issues);
        Decoded::with_issues(catalog, issues)
    }

    /// Stream bytes, inflated unless the header says the document is
    /// uncompressed. `None` when inflation fails.
    fn stream_data(
        &self,
        entry: &Entry,
        compressed: Option<bool>,
        issues: &mut Vec<Issue>,
        section: Option<usize>,
    ) -> Option<Vec<u8>> {
        if compressed == Some(false) || entry.data.is_empty() {
            return Some(entry.data.clone());
        }
        match self.decompressor.decompress(&entry.data) {
            Ok(data) => Some(data),
            Err(e) => {
                let mut issue = Issue::from_error(&e);
                issue.message = format!("{}: {}", entry.path, issue.message);
                if let Some(section) = section {
                    issue = issue.in_section(section);
                }
                issues.push(issue);
                None
            }
        }
    }

    /// Count the streams under `BinData`.
    pub fn attachment_count(&self) -> usize {
        self.listing.entries_in(BIN_DATA).count()
    }

    fn image_entries(&self) -> impl Iterator<Item = &Entry> {
        self.listing
            .entries_in(BIN_DATA)
            .filter(|e| is_image_name(&e.name))
    }

    /// List the images under `BinData`, in container order.
    pub fn images(&self) -> Vec<ImageInfo> {
        self.image_entries()
            .enumerate()
            .map(|(index, e)| ImageInfo {
                index,
                path: e.path.clone(),
                mime_type: crate::model::mime_from_extension(&e.name).to_string(),
            })
            .collect()
    }

    /// Get the nth image, inflated when possible.
    pub fn image(&self, index: usize) -> Option<Image> {
        let entry = self.image_entries().nth(index)?;
        let data = self
            .decompressor
            .decompress(&entry.data)
            .unwrap_or_else(|_| entry.data.clone());
        Some(Image::new(entry.name.clone(), data))
    }
}

fn missing(name: &str) -> Issue {
    Issue::from_error(&Error::MissingStream(name.to_string()))
}

fn in_section<T>(mut decoded: Decoded<T>, section: usize) -> Decoded<T> {
    for issue in &mut decoded.issues {
        issue.section = Some(section);
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::HWP_SIGNATURE;
    use crate::parser::record::encode_record;
    use crate::parser::tags;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn file_header(properties: Option<u32>) -> Vec<u8> {
        let mut data = vec![0u8; 32];
        data[..HWP_SIGNATURE.len()].copy_from_slice(HWP_SIGNATURE.as_bytes());
        data.extend_from_slice(&0x0500_0101u32.to_le_bytes());
        if let Some(p) = properties {
            data.extend_from_slice(&p.to_le_bytes());
        }
        data
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn section(text: &str) -> Vec<u8> {
        let mut data = encode_record(tags::PARA_HEADER, 0, &[0; 8]);
        let payload: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        data.extend(encode_record(tags::PARA_TEXT, 1, &payload));
        data
    }

    #[test]
    fn test_sections_in_numeric_order() {
        let listing = ContainerListing::new()
            .with_entry(FILE_HEADER, file_header(Some(0)))
            .with_entry(DOC_INFO, Vec::new())
            .with_entry("BodyText/Section10", section("third"))
            .with_entry("BodyText/Section2", section("second"))
            .with_entry("BodyText/Section0", section("first"));
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());

        let decoded = parser.parse().unwrap();
        assert!(!decoded.has_issues());
        assert_eq!(decoded.value.section_count, 3);
        assert_eq!(decoded.value.plain_text(), "first\nsecond\nthird");
    }

    #[test]
    fn test_compressed_flag() {
        let listing = ContainerListing::new()
            .with_entry(FILE_HEADER, file_header(Some(1)))
            .with_entry(DOC_INFO, deflate(&[]))
            .with_entry("BodyText/Section0", deflate(&section("packed")));
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        let decoded = parser.parse().unwrap();
        assert_eq!(decoded.value.plain_text(), "packed");
        assert_eq!(decoded.value.header.unwrap().compressed, Some(true));
    }

    #[test]
    fn test_missing_body_text() {
        let listing = ContainerListing::new().with_entry(FILE_HEADER, file_header(None));
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        assert!(matches!(parser.parse(), Err(Error::MissingStream(_))));
        assert_eq!(parser.fallback_text(), "");
    }

    #[test]
    fn test_missing_doc_info_is_an_issue() {
        let listing = ContainerListing::new()
            .with_entry(FILE_HEADER, file_header(Some(0)))
            .with_entry(BODY_TEXT, section("x"));
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        let decoded = parser.parse().unwrap();
        assert_eq!(decoded.value.plain_text(), "x");
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].kind, IssueKind::ContainerMissingStream);
    }

    #[test]
    fn test_empty_body_stream() {
        let listing = ContainerListing::new()
            .with_entry(FILE_HEADER, file_header(Some(1)))
            .with_entry(DOC_INFO, Vec::new())
            .with_entry(BODY_TEXT, Vec::new());
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        let decoded = parser.parse().unwrap();
        assert!(decoded.value.is_empty());
        assert!(!decoded.has_issues());
    }

    #[test]
    fn test_corrupt_section_skipped() {
        let listing = ContainerListing::new()
            .with_entry(FILE_HEADER, file_header(Some(1)))
            .with_entry(DOC_INFO, Vec::new())
            .with_entry(BODY_TEXT, vec![0xFF, b'H', b'i']);
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        let decoded = parser.parse().unwrap();
        assert!(decoded.value.is_empty());
        assert_eq!(decoded.issues[0].kind, IssueKind::DecompressionFailure);
        assert_eq!(decoded.issues[0].section, Some(0));
        assert_eq!(parser.fallback_text(), "Hi");
    }

    #[test]
    fn test_header_flags() {
        let listing = ContainerListing::new().with_entry(FILE_HEADER, file_header(Some(0b11)));
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());
        let decoded = parser.header();
        let header = decoded.value.as_ref().unwrap();
        assert!(header.encrypted);
        assert_eq!(header.version, "5.0.1.1");
        assert_eq!(decoded.issues.len(), 1);

        let short = ContainerListing::new().with_entry(FILE_HEADER, vec![0; 10]);
        let parser = HwpParser::from_listing(short, DecodeOptions::default());
        assert_eq!(parser.header().issues[0].kind, IssueKind::MalformedRecord);
    }

    #[test]
    fn test_images() {
        let listing = ContainerListing::new()
            .with_entry(BODY_TEXT, Vec::new())
            .with_entry("BinData/BIN0001.JPG", deflate(b"jpeg-bytes"))
            .with_entry("BinData/BIN0002.ole", vec![1, 2, 3])
            .with_entry("BinData/BIN0003.png", b"\xFFraw-png".to_vec());
        let parser = HwpParser::from_listing(listing, DecodeOptions::default());

        assert_eq!(parser.attachment_count(), 3);
        let images = parser.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].path, "BinData/BIN0003.png");

        let first = parser.image(0).unwrap();
        assert_eq!(first.data, b"jpeg-bytes");
        assert_eq!(first.mime_type, "image/jpeg");

        let second = parser.image(1).unwrap();
        assert_eq!(second.data, b"\xFFraw-png");
        assert_eq!(second.mime_type, "image/png");

        assert!(parser.image(2).is_none());
    }
}
