//! Table types.

use super::{DocumentNode, Paragraph};
use serde::{Deserialize, Serialize};

/// A table with a fixed `rows` x `cols` grid.
///
/// Grid slots start empty and are filled by cell list headers; slots covered
/// by a merged neighbour stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Row count
    pub rows: usize,

    /// Column count
    pub cols: usize,

    /// Cell grid, `cells[row][col]`
    pub cells: Vec<Vec<Option<TableCell>>>,

    /// Object width in HWPUNIT
    pub width: u32,

    /// Object height in HWPUNIT
    pub height: u32,

    /// Vertical position of the host line, when known
    pub start_line: Option<i32>,

    /// Spacing between cells in HWPUNIT
    pub cell_spacing: u16,

    /// Inner padding in HWPUNIT
    pub padding: Margin,

    /// Number of cells in each row
    pub row_sizes: Vec<u16>,

    /// Table border fill id
    pub border_fill_id: Option<u16>,
}

impl Table {
    /// Create a table with an empty grid.
    pub fn with_grid(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: (0..rows).map(|_| vec![None; cols]).collect(),
            ..Default::default()
        }
    }

    /// Get the cell at an address.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Get the grid slot at an address, if it lies inside the grid.
    pub fn slot_mut(&mut self, row: usize, col: usize) -> Option<&mut Option<TableCell>> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    /// Number of filled grid slots.
    pub fn cell_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Check if the table has no filled cells.
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Check if any cell spans more than one row or column.
    pub fn has_merged_cells(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .any(TableCell::is_merged)
    }

    /// Get plain text: cells separated by tabs, rows by newlines.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .flatten()
                    .map(TableCell::plain_text)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Four-sided margin in HWPUNIT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    /// Left
    pub left: u16,
    /// Right
    pub right: u16,
    /// Top
    pub top: u16,
    /// Bottom
    pub bottom: u16,
}

impl Margin {
    /// Create a margin from its four sides.
    pub fn new(left: u16, right: u16, top: u16, bottom: u16) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Check if every side is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Row address
    pub row: u16,

    /// Column address
    pub col: u16,

    /// Rows spanned
    pub row_span: u16,

    /// Columns spanned
    pub col_span: u16,

    /// Width in HWPUNIT
    pub width: u32,

    /// Height in HWPUNIT
    pub height: u32,

    /// Inner margin in HWPUNIT
    pub margin: Margin,

    /// Style class names derived from border fills
    pub classes: Vec<String>,

    /// Paragraph slots; the length is the declared paragraph count
    pub paragraphs: Vec<Paragraph>,

    /// Tables and text boxes anchored inside the cell
    pub nested: Vec<DocumentNode>,
}

impl TableCell {
    /// Create an empty cell at an address.
    pub fn at(row: u16, col: u16) -> Self {
        Self {
            row,
            col,
            ..Default::default()
        }
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<String> = self.paragraphs.iter().map(Paragraph::plain_text).collect();
        parts.extend(self.nested.iter().map(DocumentNode::plain_text));
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}
