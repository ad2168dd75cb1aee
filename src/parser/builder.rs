//! Document Model Builder.
//!
//! Walks the records of one BodyText section in order and reconstructs
//! paragraphs, tables, cells and text boxes.
//!
//! Open tables and text boxes live on a stack. A cell or text box list
//! declares how many paragraphs it owns ("owed" paragraphs); each following
//! `PARA_HEADER` fills the next slot until the count reaches zero. A
//! structural record whose level is below a container's content level, or a
//! `PARA_HEADER` arriving when nothing is owed, closes the container. Closed
//! containers are attached to their host cell or text box, or emitted when
//! they have no host.
//!
//! A `LIST_HEADER` opens a cell only at the table's content level. Lists of
//! headers, footers and notes, or any list nested deeper than the open
//! container's content, open a sub-list whose paragraphs are consumed and
//! dropped so they never leak into the body or a neighbouring cell.
//!
//! Geometry for a table comes from the control header and line segment that
//! precede it. Both are stored in a pending slot and consumed by the next
//! `TABLE` record.

use std::collections::BTreeSet;

use crate::error::{Decoded, Error, Issue, IssueKind, Result};
use crate::model::{DocumentNode, Paragraph, StyleCatalog, Table, TableCell, TextBox, TextRun};

use super::fields::{CharShapeRef, CtrlHeader, ListContext, ParaHeader, ParaText, TableInfo};
use super::options::{DecodeLimits, Deadline};
use super::record::{Record, RecordFields};
use super::tags;

/// Where the builder currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// No container open; paragraphs are top-level
    InParagraph,
    /// A table is open and no cell owes paragraphs
    InTable,
    /// A table cell owes paragraphs
    InCell,
    /// A text box is open
    InTextBox,
    /// A header, footer or note list is open
    InSubList,
}

/// Style class name for a border fill id.
pub fn border_fill_class(id: u16) -> String {
    format!("hwp-border-fill-{}", id)
}

/// Builds document nodes from section records.
#[derive(Debug, Clone)]
pub struct DocumentBuilder<'a> {
    catalog: &'a StyleCatalog,
    limits: DecodeLimits,
    deadline: Deadline,
}

impl<'a> DocumentBuilder<'a> {
    /// Create a builder resolving references against `catalog`.
    pub fn new(catalog: &'a StyleCatalog) -> Self {
        Self {
            catalog,
            limits: DecodeLimits::default(),
            deadline: Deadline::none(),
        }
    }

    /// Set the allocation limits.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the deadline checked before each record.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Build the top-level nodes of one section.
    ///
    /// A failure partway through keeps the nodes already emitted and drops
    /// whatever was still open.
    pub fn build_section(&self, records: &[Record], section: usize) -> Decoded<Vec<DocumentNode>> {
        let mut walker = SectionWalker::new(self.catalog, &self.limits, section);

        for record in records {
            let step = self.deadline.check().and_then(|_| walker.step(record));
            if let Err(e) = step {
                walker
                    .issues
                    .push(Issue::from_error(&e).at_offset(record.offset).in_section(section));
                log::debug!(
                    "Section {} truncated at offset {} ({} nodes kept)",
                    section,
                    record.offset,
                    walker.output.len()
                );
                return Decoded::with_issues(walker.output, walker.issues);
            }
        }

        walker.finish();
        log::debug!(
            "Section {}: {} records -> {} nodes",
            section,
            records.len(),
            walker.output.len()
        );
        Decoded::with_issues(walker.output, walker.issues)
    }
}

/// Build one section with default limits.
pub fn build_section(records: &[Record], catalog: &StyleCatalog) -> Decoded<Vec<DocumentNode>> {
    DocumentBuilder::new(catalog).build_section(records, 0)
}

#[derive(Debug, Default)]
struct PendingGeometry {
    ctrl: Option<CtrlHeader>,
    start_line: Option<i32>,
}

#[derive(Debug, Clone, Copy)]
enum Target {
    TopLevel,
    Cell {
        depth: usize,
        row: usize,
        col: usize,
        index: usize,
    },
    TextBox {
        depth: usize,
        index: usize,
    },
    Discard,
}

#[derive(Debug)]
struct OpenParagraph {
    paragraph: Paragraph,
    text: Option<ParaText>,
    target: Target,
}

#[derive(Debug)]
enum ContainerNode {
    Table {
        table: Table,
        cell: Option<(usize, usize)>,
    },
    TextBox {
        text_box: TextBox,
        listed: bool,
    },
    SubList,
}

#[derive(Debug)]
struct OpenContainer {
    node: ContainerNode,
    /// Level of the records that belong to this container
    level: u16,
    owed: usize,
    next_slot: usize,
}

impl OpenContainer {
    fn paragraph_slot(&mut self, target: Target) -> Option<&mut Paragraph> {
        match (&mut self.node, target) {
            (ContainerNode::Table { table, .. }, Target::Cell { row, col, index, .. }) => table
                .slot_mut(row, col)?
                .as_mut()?
                .paragraphs
                .get_mut(index),
            (ContainerNode::TextBox { text_box, .. }, Target::TextBox { index, .. }) => {
                text_box.paragraphs.get_mut(index)
            }
            _ => None,
        }
    }

    fn nested_sink(&mut self) -> Option<&mut Vec<DocumentNode>> {
        match &mut self.node {
            ContainerNode::Table {
                table,
                cell: Some((row, col)),
            } => Some(&mut table.slot_mut(*row, *col)?.as_mut()?.nested),
            ContainerNode::Table { cell: None, .. } => None,
            ContainerNode::TextBox { text_box, .. } => Some(&mut text_box.nested),
            ContainerNode::SubList => None,
        }
    }

    fn into_node(self) -> Option<DocumentNode> {
        match self.node {
            ContainerNode::Table { table, .. } => Some(DocumentNode::Table(table)),
            ContainerNode::TextBox { text_box, listed } => {
                listed.then_some(DocumentNode::TextBox(text_box))
            }
            ContainerNode::SubList => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum StyleRef {
    ParaShape,
    Style,
    CharShape,
}

struct SectionWalker<'a> {
    catalog: &'a StyleCatalog,
    limits: &'a DecodeLimits,
    section: usize,
    paragraph: Option<OpenParagraph>,
    containers: Vec<OpenContainer>,
    pending: PendingGeometry,
    output: Vec<DocumentNode>,
    issues: Vec<Issue>,
    unresolved: BTreeSet<(StyleRef, usize)>,
    /// Paragraph slots allocated so far
    slots: usize,
}

impl<'a> SectionWalker<'a> {
    fn new(catalog: &'a StyleCatalog, limits: &'a DecodeLimits, section: usize) -> Self {
        Self {
            catalog,
            limits,
            section,
            paragraph: None,
            containers: Vec::new(),
            pending: PendingGeometry::default(),
            output: Vec::new(),
            issues: Vec::new(),
            unresolved: BTreeSet::new(),
            slots: 0,
        }
    }

    fn state(&self) -> BuilderState {
        match self.containers.last() {
            None => BuilderState::InParagraph,
            Some(OpenContainer {
                node: ContainerNode::Table { cell: Some(_), .. },
                owed,
                ..
            }) if *owed > 0 => BuilderState::InCell,
            Some(OpenContainer {
                node: ContainerNode::Table { .. },
                ..
            }) => BuilderState::InTable,
            Some(OpenContainer {
                node: ContainerNode::TextBox { .. },
                ..
            }) => BuilderState::InTextBox,
            Some(OpenContainer {
                node: ContainerNode::SubList,
                ..
            }) => BuilderState::InSubList,
        }
    }

    fn issue(&mut self, kind: IssueKind, message: String, offset: usize) {
        self.issues
            .push(Issue::new(kind, message).at_offset(offset).in_section(self.section));
    }

    fn step(&mut self, record: &Record) -> Result<()> {
        if matches!(
            record.tag,
            tags::PARA_HEADER | tags::CTRL_HEADER | tags::TABLE | tags::LIST_HEADER
        ) {
            self.close_outer(record.level);
        }

        match (&record.fields, self.state()) {
            (RecordFields::ParaHeader(header), _) => self.on_para_header(header, record.offset),
            (RecordFields::ParaText(text), _) => self.on_para_text(text),
            (RecordFields::ParaCharShape(refs), _) => self.on_char_shapes(refs, record.offset),
            (RecordFields::ParaLineSeg(seg), _) => self.pending.start_line = seg.start_line,
            (RecordFields::CtrlHeader(ctrl), _) => self.on_ctrl_header(ctrl, record.level),
            (RecordFields::Table(info), _) => self.on_table(info, record)?,
            (_, state) if record.tag == tags::LIST_HEADER => self.on_list_header(state, record)?,
            _ => {}
        }
        Ok(())
    }

    /// Route a `LIST_HEADER` by state and by its level against the open
    /// container's content level.
    fn on_list_header(&mut self, state: BuilderState, record: &Record) -> Result<()> {
        if let Some(ctrl) = self.pending.ctrl.filter(CtrlHeader::is_sub_list) {
            self.pending.ctrl = None;
            self.open_sub_list(Some(ctrl), record);
            return Ok(());
        }

        let Some(top) = self.containers.last() else {
            log::debug!("LIST_HEADER at offset {} has no open container", record.offset);
            return Ok(());
        };
        let content_level = top.level;
        let unlisted_box = matches!(top.node, ContainerNode::TextBox { listed: false, .. });

        match state {
            BuilderState::InTable | BuilderState::InCell if record.level == content_level => {
                self.on_cell_list(record)
            }
            BuilderState::InTextBox if unlisted_box => self.on_text_box_list(record),
            _ if record.level > content_level => {
                self.open_sub_list(None, record);
                Ok(())
            }
            state => {
                log::debug!(
                    "LIST_HEADER at offset {} (level {}) does not fit {:?}",
                    record.offset,
                    record.level,
                    state
                );
                Ok(())
            }
        }
    }

    /// Close containers the record at `level` lies outside of.
    fn close_outer(&mut self, level: u16) {
        while self.containers.last().is_some_and(|c| level < c.level) {
            self.commit_paragraph(true);
            self.close_container();
        }
    }

    fn close_container(&mut self) {
        let Some(container) = self.containers.pop() else {
            return;
        };
        let Some(node) = container.into_node() else {
            return;
        };
        match self.containers.last_mut() {
            Some(parent) => match parent.nested_sink() {
                Some(sink) => sink.push(node),
                None => log::debug!("Dropped nested object without a host cell"),
            },
            None => self.output.push(node),
        }
    }

    fn on_para_header(&mut self, header: &ParaHeader, offset: usize) {
        self.commit_paragraph(true);
        self.pending = PendingGeometry::default();

        while self.containers.last().is_some_and(|c| c.owed == 0) {
            self.close_container();
        }

        let depth = self.containers.len().saturating_sub(1);
        let target = match self.containers.last_mut() {
            None => Target::TopLevel,
            Some(top) => {
                top.owed -= 1;
                let index = top.next_slot;
                top.next_slot += 1;
                match &top.node {
                    ContainerNode::Table {
                        cell: Some((row, col)),
                        ..
                    } => Target::Cell {
                        depth,
                        row: *row,
                        col: *col,
                        index,
                    },
                    ContainerNode::Table { cell: None, .. } | ContainerNode::SubList => {
                        Target::Discard
                    }
                    ContainerNode::TextBox { .. } => Target::TextBox { depth, index },
                }
            }
        };

        let para_shape = header
            .para_shape_id
            .and_then(|id| self.resolve(StyleRef::ParaShape, id as usize, offset));
        let style = header
            .style_id
            .and_then(|id| self.resolve(StyleRef::Style, id as usize, offset));

        self.paragraph = Some(OpenParagraph {
            paragraph: Paragraph {
                para_shape,
                style,
                ..Default::default()
            },
            text: None,
            target,
        });
    }

    fn on_para_text(&mut self, text: &ParaText) {
        let Some(open) = self.paragraph.as_mut() else {
            return;
        };
        if let Some(previous) = open.text.replace(text.clone()) {
            open.paragraph.add_run(TextRun::new(previous.text()));
        }
    }

    fn on_char_shapes(&mut self, refs: &[CharShapeRef], offset: usize) {
        let Some(mut open) = self.paragraph.take() else {
            return;
        };
        if let Some(text) = open.text.take() {
            for (run, shape) in text.split_runs(refs) {
                let shape = shape.and_then(|id| self.resolve(StyleRef::CharShape, id as usize, offset));
                open.paragraph.add_run(TextRun::styled(run, shape));
            }
        }
        self.paragraph = Some(open);
    }

    fn on_ctrl_header(&mut self, ctrl: &CtrlHeader, level: u16) {
        self.pending.ctrl = Some(*ctrl);
        if ctrl.is_drawing() {
            self.commit_paragraph(false);
            self.containers.push(OpenContainer {
                node: ContainerNode::TextBox {
                    text_box: TextBox {
                        width: ctrl.width.unwrap_or(0),
                        height: ctrl.height.unwrap_or(0),
                        ..Default::default()
                    },
                    listed: false,
                },
                level: level.saturating_add(1),
                owed: 0,
                next_slot: 0,
            });
        }
    }

    fn on_table(&mut self, info: &TableInfo, record: &Record) -> Result<()> {
        self.commit_paragraph(false);

        let cells = info.cell_total();
        if cells > self.limits.max_table_cells {
            return Err(Error::LimitExceeded(format!(
                "table of {}x{} cells exceeds {}",
                info.rows, info.cols, self.limits.max_table_cells
            )));
        }

        let mut table = Table::with_grid(info.rows as usize, info.cols as usize);
        let pending = std::mem::take(&mut self.pending);
        if let Some(ctrl) = pending.ctrl {
            table.width = ctrl.width.unwrap_or(0);
            table.height = ctrl.height.unwrap_or(0);
        }
        table.start_line = pending.start_line;
        table.cell_spacing = info.cell_spacing;
        table.padding = info.padding;
        table.row_sizes = info.row_sizes.clone();
        table.border_fill_id = info.border_fill_id;

        self.containers.push(OpenContainer {
            node: ContainerNode::Table { table, cell: None },
            level: record.level,
            owed: 0,
            next_slot: 0,
        });
        Ok(())
    }

    fn on_cell_list(&mut self, record: &Record) -> Result<()> {
        self.commit_paragraph(true);
        let header = record.list_header(ListContext::TableCell);
        let attrs = header.cell.unwrap_or_default();
        let slots = self.slot_count(header.paragraph_count, record.offset);
        self.reserve_slots(slots)?;

        let Some(top) = self.containers.last_mut() else {
            return Ok(());
        };
        let ContainerNode::Table { table, cell } = &mut top.node else {
            return Ok(());
        };

        let (row, col) = (attrs.row as usize, attrs.col as usize);
        let (rows, cols) = (table.rows, table.cols);
        top.owed = slots;
        top.next_slot = 0;
        match table.slot_mut(row, col) {
            Some(slot) => {
                // A cell listed twice keeps only its last list.
                let mut target = TableCell::at(attrs.row, attrs.col);
                target.row_span = attrs.row_span;
                target.col_span = attrs.col_span;
                target.width = attrs.width;
                target.height = attrs.height;
                target.margin = attrs.margin;
                target.classes.extend(attrs.border_fill_id.map(border_fill_class));
                target.paragraphs.resize_with(slots, Paragraph::default);
                *slot = Some(target);
                *cell = Some((row, col));
            }
            None => {
                *cell = None;
                self.issue(
                    IssueKind::MalformedRecord,
                    format!("cell ({}, {}) outside {}x{} table", row, col, rows, cols),
                    record.offset,
                );
            }
        }
        Ok(())
    }

    fn on_text_box_list(&mut self, record: &Record) -> Result<()> {
        self.commit_paragraph(true);
        let header = record.list_header(ListContext::TextBox);
        let slots = self.slot_count(header.paragraph_count, record.offset);
        self.reserve_slots(slots)?;

        let Some(top) = self.containers.last_mut() else {
            return Ok(());
        };
        let ContainerNode::TextBox { text_box, listed } = &mut top.node else {
            return Ok(());
        };
        *listed = true;
        top.level = record.level;
        top.owed = slots;
        top.next_slot = 0;
        text_box.paragraphs.clear();
        text_box.paragraphs.resize_with(slots, Paragraph::default);
        Ok(())
    }

    /// Open a list whose paragraphs are consumed without being kept.
    fn open_sub_list(&mut self, ctrl: Option<CtrlHeader>, record: &Record) {
        self.commit_paragraph(false);
        let header = record.list_header(ListContext::TextBox);
        let owed = self.slot_count(header.paragraph_count, record.offset);
        log::debug!(
            "Skipping {} list of {} paragraphs at offset {}",
            ctrl.map_or_else(|| "nested".to_string(), |c| c.id_str()),
            owed,
            record.offset
        );
        self.containers.push(OpenContainer {
            node: ContainerNode::SubList,
            level: record.level,
            owed,
            next_slot: 0,
        });
    }

    /// Charge `slots` paragraph slots against the section budget.
    fn reserve_slots(&mut self, slots: usize) -> Result<()> {
        let total = self.slots.saturating_add(slots);
        if total > self.limits.max_paragraph_slots {
            return Err(Error::LimitExceeded(format!(
                "section lists more than {} paragraphs",
                self.limits.max_paragraph_slots
            )));
        }
        self.slots = total;
        Ok(())
    }

    fn slot_count(&mut self, declared: Option<u16>, offset: usize) -> usize {
        let declared = declared.map_or(0, usize::from);
        let max = self.limits.max_list_paragraphs;
        if declared > max {
            self.issue(
                IssueKind::LimitExceeded,
                format!("list declares {} paragraphs, keeping {}", declared, max),
                offset,
            );
        }
        declared.min(max)
    }

    /// Validate a catalog reference; unresolved ones become `None`.
    fn resolve(&mut self, kind: StyleRef, index: usize, offset: usize) -> Option<usize> {
        let found = match kind {
            StyleRef::ParaShape => self.catalog.para_shape(index).is_some(),
            StyleRef::Style => self.catalog.style(index).is_some(),
            StyleRef::CharShape => self.catalog.char_shape(index).is_some(),
        };
        if found {
            return Some(index);
        }
        if self.unresolved.insert((kind, index)) {
            self.issue(
                IssueKind::UnresolvedStyleReference,
                format!("{:?} {} is not in the catalog", kind, index),
                offset,
            );
        }
        None
    }

    /// Move the open paragraph to its target.
    ///
    /// Empty top-level paragraphs are dropped unless `keep_empty` is set.
    fn commit_paragraph(&mut self, keep_empty: bool) {
        let Some(OpenParagraph {
            mut paragraph,
            text,
            target,
        }) = self.paragraph.take()
        else {
            return;
        };
        if let Some(text) = text {
            paragraph.add_run(TextRun::new(text.text()));
        }

        match target {
            Target::TopLevel => {
                if keep_empty || !paragraph.is_empty() {
                    self.output.push(DocumentNode::Paragraph(paragraph));
                }
            }
            Target::Cell { depth, .. } | Target::TextBox { depth, .. } => {
                if let Some(slot) = self
                    .containers
                    .get_mut(depth)
                    .and_then(|c| c.paragraph_slot(target))
                {
                    *slot = paragraph;
                }
            }
            Target::Discard => {}
        }
    }

    fn finish(&mut self) {
        self.commit_paragraph(true);
        while !self.containers.is_empty() {
            self.close_container();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CharShape, Margin, ParaShape};
    use crate::parser::fields::{ctrl_id, CTRL_DRAWING, CTRL_FOOTER, CTRL_FOOTNOTE, CTRL_TABLE};

    fn rec(tag: u16, level: u16, payload: Vec<u8>) -> Record {
        Record::new(tag, level, 0, payload)
    }

    fn para(level: u16) -> Record {
        rec(tags::PARA_HEADER, level, vec![0; 8])
    }

    fn styled_para(level: u16, para_shape: u16, style: u8) -> Record {
        let mut payload = vec![0; 8];
        payload.extend_from_slice(&para_shape.to_le_bytes());
        payload.push(style);
        rec(tags::PARA_HEADER, level, payload)
    }

    fn text(level: u16, s: &str) -> Record {
        let payload = s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        rec(tags::PARA_TEXT, level, payload)
    }

    fn ctrl(level: u16, id: u32, width: u32, height: u32) -> Record {
        let mut payload = id.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0; 12]);
        payload.extend_from_slice(&width.to_le_bytes());
        payload.extend_from_slice(&height.to_le_bytes());
        rec(tags::CTRL_HEADER, level, payload)
    }

    fn line_seg(level: u16, vertical: i32) -> Record {
        let mut payload = vec![0; 36];
        payload[4..8].copy_from_slice(&vertical.to_le_bytes());
        rec(tags::PARA_LINE_SEG, level, payload)
    }

    fn table(level: u16, rows: u16, cols: u16) -> Record {
        let mut payload = 0u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&rows.to_le_bytes());
        payload.extend_from_slice(&cols.to_le_bytes());
        payload.extend_from_slice(&[0; 10]);
        for _ in 0..rows {
            payload.extend_from_slice(&cols.to_le_bytes());
        }
        payload.extend_from_slice(&1u16.to_le_bytes());
        rec(tags::TABLE, level, payload)
    }

    fn cell(level: u16, row: u16, col: u16, paragraphs: u16) -> Record {
        let mut payload = paragraphs.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0; 6]);
        payload.extend_from_slice(&col.to_le_bytes());
        payload.extend_from_slice(&row.to_le_bytes());
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&3000u32.to_le_bytes());
        payload.extend_from_slice(&1000u32.to_le_bytes());
        for side in [140u16, 140, 80, 80] {
            payload.extend_from_slice(&side.to_le_bytes());
        }
        payload.extend_from_slice(&4u16.to_le_bytes());
        rec(tags::LIST_HEADER, level, payload)
    }

    fn text_box_list(level: u16, paragraphs: u16) -> Record {
        let mut payload = paragraphs.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0; 6]);
        rec(tags::LIST_HEADER, level, payload)
    }

    /// Top-level host paragraph followed by a 2x2 table with one paragraph per cell.
    fn table_section() -> Vec<Record> {
        let mut records = vec![
            para(0),
            line_seg(1, 720),
            ctrl(1, CTRL_TABLE, 20000, 4000),
            table(2, 2, 2),
        ];
        for (r, c, s) in [(0, 0, "a"), (0, 1, "b"), (1, 0, "c"), (1, 1, "d")] {
            records.push(cell(2, r, c, 1));
            records.push(para(2));
            records.push(text(3, s));
        }
        records.push(para(0));
        records.push(text(1, "after"));
        records
    }

    #[test]
    fn test_paragraphs() {
        let records = vec![para(0), text(1, "one"), para(0), text(1, "two")];
        let decoded = build_section(&records, &StyleCatalog::new());
        let texts: Vec<String> = decoded.value.iter().map(DocumentNode::plain_text).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert!(!decoded.has_issues());
    }

    #[test]
    fn test_table_grid_complete() {
        let decoded = build_section(&table_section(), &StyleCatalog::new());
        let nodes = decoded.value;
        assert_eq!(nodes.len(), 2);

        let table = nodes[0].as_table().unwrap();
        assert_eq!(table.cell_count(), 4);
        assert_eq!(table.plain_text(), "a\tb\nc\td");
        for row in 0..2 {
            for col in 0..2 {
                let cell = table.cell(row, col).unwrap();
                assert_eq!((cell.row as usize, cell.col as usize), (row, col));
                assert_eq!(cell.paragraphs.len(), 1);
                assert_eq!(cell.classes, vec![border_fill_class(4)]);
                assert_eq!(cell.margin, Margin::new(140, 140, 80, 80));
            }
        }
        assert_eq!(nodes[1].plain_text(), "after");
    }

    #[test]
    fn test_table_geometry_from_pending_slot() {
        let decoded = build_section(&table_section(), &StyleCatalog::new());
        let table = decoded.value[0].as_table().unwrap();
        assert_eq!((table.width, table.height), (20000, 4000));
        assert_eq!(table.start_line, Some(720));
        assert_eq!(table.row_sizes, vec![2, 2]);
        assert_eq!(table.border_fill_id, Some(1));
    }

    #[test]
    fn test_list_headers_without_paragraphs() {
        let mut records = vec![para(0), ctrl(1, CTRL_TABLE, 0, 0), table(2, 2, 2)];
        for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            records.push(cell(2, r, c, 0));
        }
        let decoded = build_section(&records, &StyleCatalog::new());
        let table = decoded.value[0].as_table().unwrap();
        assert_eq!(table.cell_count(), 4);
        assert!(table.cells.iter().flatten().all(Option::is_some));
    }

    #[test]
    fn test_list_header_missing_margin_defaults_to_zero() {
        let mut short = 1u16.to_le_bytes().to_vec();
        short.extend_from_slice(&[0; 6]);
        short.extend_from_slice(&1u16.to_le_bytes()); // col
        short.extend_from_slice(&0u16.to_le_bytes()); // row

        let records = vec![
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 2),
            rec(tags::LIST_HEADER, 2, short),
            para(2),
            text(3, "x"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        assert!(!decoded.has_issues());
        let cell = decoded.value[0].as_table().unwrap().cell(0, 1).unwrap();
        assert!(cell.margin.is_zero());
        assert_eq!((cell.width, cell.height, cell.row_span), (0, 0, 0));
        assert!(cell.classes.is_empty());
        assert_eq!(cell.plain_text(), "x");
    }

    #[test]
    fn test_cell_outside_grid_is_dropped() {
        let records = vec![
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 1),
            cell(2, 5, 5, 1),
            para(2),
            text(3, "lost"),
            para(0),
            text(1, "kept"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        assert_eq!(decoded.issues[0].kind, IssueKind::MalformedRecord);
        let table = decoded.value[0].as_table().unwrap();
        assert!(table.is_empty());
        assert_eq!(decoded.value[1].plain_text(), "kept");
    }

    #[test]
    fn test_oversized_table_truncates_section() {
        let records = vec![
            para(0),
            text(1, "before"),
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1000, 1000),
            cell(2, 0, 0, 1),
            para(2),
            para(0),
            text(1, "never"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.value[0].plain_text(), "before");
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].kind, IssueKind::LimitExceeded);
        assert_eq!(decoded.issues[0].section, Some(0));
    }

    #[test]
    fn test_nested_table_attaches_to_cell() {
        let records = vec![
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 2),
            cell(2, 0, 0, 1),
            para(2),
            text(3, "outer"),
            ctrl(3, CTRL_TABLE, 0, 0),
            table(4, 1, 1),
            cell(4, 0, 0, 1),
            para(4),
            text(5, "inner"),
            cell(2, 0, 1, 1),
            para(2),
            text(3, "right"),
            para(0),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        let nodes = decoded.value;
        assert_eq!(nodes.len(), 2);

        let outer = nodes[0].as_table().unwrap();
        let host = outer.cell(0, 0).unwrap();
        assert_eq!(host.paragraphs[0].plain_text(), "outer");
        assert_eq!(host.nested.len(), 1);
        let inner = host.nested[0].as_table().unwrap();
        assert_eq!(inner.plain_text(), "inner");
        assert_eq!(outer.cell(0, 1).unwrap().plain_text(), "right");
    }

    #[test]
    fn test_footnote_in_cell_stays_in_host_cell() {
        for list_level in [3, 4] {
            let records = vec![
                para(0),
                ctrl(1, CTRL_TABLE, 0, 0),
                table(2, 1, 2),
                cell(2, 0, 0, 1),
                para(2),
                text(3, "left"),
                cell(2, 0, 1, 2),
                para(2),
                text(3, "right1"),
                ctrl(3, CTRL_FOOTNOTE, 0, 0),
                text_box_list(list_level, 1),
                para(list_level),
                text(list_level + 1, "note"),
                para(2),
                text(3, "right2"),
                para(0),
                text(1, "after"),
            ];
            let decoded = build_section(&records, &StyleCatalog::new());
            assert!(!decoded.has_issues());
            let nodes = decoded.value;
            assert_eq!(nodes.len(), 2);

            let table = nodes[0].as_table().unwrap();
            let left = table.cell(0, 0).unwrap();
            assert_eq!(left.width, 3000);
            assert_eq!(left.plain_text(), "left");
            let right = table.cell(0, 1).unwrap();
            assert_eq!(right.paragraphs.len(), 2);
            assert_eq!(right.plain_text(), "right1 right2");
            assert_eq!(nodes[1].plain_text(), "after");
        }
    }

    #[test]
    fn test_header_footer_lists_leave_body() {
        let records = vec![
            para(0),
            text(1, "body"),
            para(0),
            ctrl(1, CTRL_FOOTER, 0, 0),
            text_box_list(2, 2),
            para(2),
            text(3, "page"),
            para(2),
            text(3, "footer"),
            para(0),
            text(1, "end"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        let texts: Vec<String> = decoded.value.iter().map(DocumentNode::plain_text).collect();
        assert_eq!(texts, vec!["body", "end"]);
    }

    #[test]
    fn test_deeper_list_in_cell_is_skipped() {
        let records = vec![
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 1),
            cell(2, 0, 0, 2),
            para(2),
            text(3, "one"),
            ctrl(3, ctrl_id(b"tcmt"), 0, 0),
            text_box_list(4, 1),
            para(4),
            text(5, "comment"),
            para(2),
            text(3, "two"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        let table = decoded.value[0].as_table().unwrap();
        assert_eq!(table.cell(0, 0).unwrap().plain_text(), "one two");
    }

    #[test]
    fn test_relisted_cell_replaces_paragraphs() {
        let records = vec![
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 1),
            cell(2, 0, 0, 2),
            para(2),
            text(3, "old1"),
            para(2),
            text(3, "old2"),
            cell(2, 0, 0, 1),
            para(2),
            text(3, "new"),
            para(0),
            text(1, "after"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        let nodes = decoded.value;
        let cell = nodes[0].as_table().unwrap().cell(0, 0).unwrap();
        assert_eq!(cell.paragraphs.len(), 1);
        assert_eq!(cell.plain_text(), "new");
        assert_eq!(cell.classes, vec![border_fill_class(4)]);
        assert_eq!(nodes[1].plain_text(), "after");
    }

    #[test]
    fn test_paragraph_slot_budget_truncates_section() {
        let records = vec![
            para(0),
            text(1, "before"),
            para(0),
            ctrl(1, CTRL_TABLE, 0, 0),
            table(2, 1, 2),
            cell(2, 0, 0, 6),
            cell(2, 0, 1, 6),
            para(0),
            text(1, "never"),
        ];
        let catalog = StyleCatalog::new();
        let decoded = DocumentBuilder::new(&catalog)
            .with_limits(DecodeLimits {
                max_paragraph_slots: 10,
                ..Default::default()
            })
            .build_section(&records, 0);
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.value[0].plain_text(), "before");
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].kind, IssueKind::LimitExceeded);
    }

    #[test]
    fn test_repeated_cell_lists_hit_default_budget() {
        let mut records = vec![para(0), ctrl(1, CTRL_TABLE, 0, 0), table(2, 1, 1)];
        records.extend((0..40).map(|_| cell(2, 0, 0, u16::MAX)));
        let decoded = build_section(&records, &StyleCatalog::new());
        assert!(decoded.value.is_empty());
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].kind, IssueKind::LimitExceeded);
    }

    #[test]
    fn test_text_box() {
        let records = vec![
            para(0),
            text(1, "host"),
            ctrl(1, CTRL_DRAWING, 5000, 2000),
            rec(tags::SHAPE_COMPONENT, 2, vec![0; 8]),
            text_box_list(3, 2),
            para(3),
            text(4, "one"),
            para(3),
            text(4, "two"),
            para(0),
            ctrl(1, CTRL_DRAWING, 100, 100),
            para(0),
            text(1, "end"),
        ];
        let decoded = build_section(&records, &StyleCatalog::new());
        let nodes = decoded.value;
        let texts: Vec<String> = nodes.iter().map(DocumentNode::plain_text).collect();
        // The picture without a list is dropped; its empty host paragraph too.
        assert_eq!(texts, vec!["host", "one\ntwo", "end"]);

        let DocumentNode::TextBox(text_box) = &nodes[1] else {
            panic!("expected a text box");
        };
        assert_eq!((text_box.width, text_box.height), (5000, 2000));
        assert_eq!(text_box.paragraphs.len(), 2);
    }

    #[test]
    fn test_stray_list_header_ignored() {
        let records = vec![para(0), text(1, "a"), text_box_list(1, 3), para(0), text(1, "b")];
        let decoded = build_section(&records, &StyleCatalog::new());
        assert!(!decoded.has_issues());
        let texts: Vec<String> = decoded.value.iter().map(DocumentNode::plain_text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_unresolved_style_references() {
        let mut catalog = StyleCatalog::new();
        catalog.para_shapes.push(ParaShape::default());

        let records = vec![styled_para(0, 0, 0), styled_para(0, 9, 0), styled_para(0, 9, 0)];
        let decoded = build_section(&records, &catalog);
        let paragraphs: Vec<&Paragraph> =
            decoded.value.iter().filter_map(DocumentNode::as_paragraph).collect();
        assert_eq!(paragraphs[0].para_shape, Some(0));
        assert_eq!(paragraphs[1].para_shape, None);
        assert_eq!(paragraphs[0].style, None);

        // para shape 9 and style 0, each reported once
        assert_eq!(decoded.issues.len(), 2);
        assert!(decoded
            .issues
            .iter()
            .all(|i| i.kind == IssueKind::UnresolvedStyleReference));
    }

    #[test]
    fn test_char_shape_runs() {
        let mut catalog = StyleCatalog::new();
        catalog.char_shapes.push(CharShape::default());
        catalog.char_shapes.push(CharShape::default());

        let mut refs = Vec::new();
        for (pos, id) in [(0u32, 0u32), (3, 1)] {
            refs.extend_from_slice(&pos.to_le_bytes());
            refs.extend_from_slice(&id.to_le_bytes());
        }
        let records = vec![para(0), text(1, "boldtext"), rec(tags::PARA_CHAR_SHAPE, 1, refs)];
        let decoded = build_section(&records, &catalog);
        let paragraph = decoded.value[0].as_paragraph().unwrap();
        assert_eq!(paragraph.runs.len(), 2);
        assert_eq!(paragraph.runs[0].text, "bol");
        assert_eq!(paragraph.runs[0].char_shape, Some(0));
        assert_eq!(paragraph.runs[1].text, "dtext");
        assert_eq!(paragraph.runs[1].char_shape, Some(1));
    }

    #[test]
    fn test_expired_deadline_truncates() {
        let records = vec![para(0), text(1, "x")];
        let catalog = StyleCatalog::new();
        let decoded = DocumentBuilder::new(&catalog)
            .with_deadline(Deadline::after(std::time::Duration::ZERO))
            .build_section(&records, 2);
        assert!(decoded.value.is_empty());
        assert_eq!(decoded.issues[0].kind, IssueKind::Cancelled);
        assert_eq!(decoded.issues[0].section, Some(2));
    }
}
