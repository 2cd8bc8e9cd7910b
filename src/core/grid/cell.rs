//! Cell types: span declarations as read from the table, and resolved grid cells

use std::fmt;

use crate::data::constants::{FILL_GROUP_KEYWORD, FILL_ROW_KEYWORD, MAX_COLSPAN, MAX_ROWSPAN};

/// Declared column span of a source cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSpan {
    /// A plain number of columns (>= 1)
    Cells(usize),
    /// Expand to the widest row seen so far
    FillRow,
    /// Expand to the end of the current band
    FillGroup,
}

impl ColumnSpan {
    /// Parse a `colspan` attribute value
    ///
    /// Missing or non-numeric values fall back to a span of 1; the two keywords
    /// are matched case-insensitively.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return ColumnSpan::Cells(1);
        };
        let keyword = raw.trim();
        if keyword.eq_ignore_ascii_case(FILL_ROW_KEYWORD) {
            ColumnSpan::FillRow
        } else if keyword.eq_ignore_ascii_case(FILL_GROUP_KEYWORD) {
            ColumnSpan::FillGroup
        } else {
            ColumnSpan::Cells(parse_span(raw).min(MAX_COLSPAN))
        }
    }

    /// Whether this span is one of the fill keywords
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, ColumnSpan::Cells(_))
    }

    /// Number of columns this declaration counts for before placement
    pub fn declared_width(&self) -> usize {
        match self {
            ColumnSpan::Cells(n) => (*n).max(1),
            ColumnSpan::FillRow | ColumnSpan::FillGroup => 1,
        }
    }
}

impl Default for ColumnSpan {
    fn default() -> Self {
        ColumnSpan::Cells(1)
    }
}

/// Parse a `rowspan` attribute value, floored at 1
pub fn parse_row_span(raw: Option<&str>) -> usize {
    raw.map(parse_span).unwrap_or(1).min(MAX_ROWSPAN)
}

/// Leading-integer parse with a floor of 1
///
/// Leading whitespace and a `+` sign are skipped and trailing garbage is
/// ignored, so `" 3px"` reads as 3. Negative, zero and non-numeric values read
/// as 1.
pub fn parse_span(raw: &str) -> usize {
    let s = raw.trim_start();
    if s.starts_with('-') {
        return 1;
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<usize>() {
        Ok(n) => n.max(1),
        // Overflowing digit runs are absurdly large spans; the caller caps them
        Err(_) if !digits.is_empty() => usize::MAX,
        Err(_) => 1,
    }
}

/// A cell as read from the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCell<H> {
    /// Handle of the underlying element
    pub element: H,
    /// Declared column span
    pub colspan: ColumnSpan,
    /// Declared row span (>= 1)
    pub rowspan: usize,
}

impl<H> SourceCell<H> {
    /// A 1x1 cell
    pub fn new(element: H) -> Self {
        SourceCell {
            element,
            colspan: ColumnSpan::Cells(1),
            rowspan: 1,
        }
    }

    pub fn with_span(element: H, colspan: ColumnSpan, rowspan: usize) -> Self {
        SourceCell {
            element,
            colspan,
            rowspan: rowspan.max(1),
        }
    }
}

/// A row as read from the source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow<H> {
    /// Handle of the row element
    pub element: H,
    /// Cells in document order
    pub cells: Vec<SourceCell<H>>,
}

impl<H> SourceRow<H> {
    pub fn new(element: H, cells: Vec<SourceCell<H>>) -> Self {
        SourceRow { element, cells }
    }
}

/// The table structure the grid is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable<H> {
    pub rows: Vec<SourceRow<H>>,
}

impl<H> SourceTable<H> {
    pub fn new(rows: Vec<SourceRow<H>>) -> Self {
        SourceTable { rows }
    }

    /// Total number of source cells
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }
}

impl<H> Default for SourceTable<H> {
    fn default() -> Self {
        SourceTable { rows: Vec::new() }
    }
}

/// Index of a cell in a grid's cell arena
///
/// Two grid positions hold the same cell exactly when they hold the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A placed cell: one per source cell, referenced by every position it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell<H> {
    /// Source element, `None` for vacant filler cells
    pub element: Option<H>,
    /// 0-based top row
    pub row: usize,
    /// 0-based left column
    pub column: usize,
    /// Resolved column span (>= 1)
    pub colspan: usize,
    /// Resolved row span (>= 1)
    pub rowspan: usize,
    /// Whether the colspan came from a fill keyword
    pub span_was_sentinel: bool,
}

impl<H> GridCell<H> {
    /// Whether this is a builder-created filler for a ragged row
    pub fn is_vacant(&self) -> bool {
        self.element.is_none()
    }

    /// 0-based last column covered (inclusive)
    pub fn last_column(&self) -> usize {
        self.column + self.colspan - 1
    }

    /// 0-based last row covered (inclusive)
    pub fn last_row(&self) -> usize {
        self.row + self.rowspan - 1
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.row..=self.last_row()).contains(&row)
            && (self.column..=self.last_column()).contains(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_span_leading_integer() {
        assert_eq!(parse_span("3"), 3);
        assert_eq!(parse_span(" 4px"), 4);
        assert_eq!(parse_span("+2"), 2);
    }

    #[test]
    fn test_parse_span_floor() {
        assert_eq!(parse_span("0"), 1);
        assert_eq!(parse_span("-3"), 1);
        assert_eq!(parse_span("wide"), 1);
        assert_eq!(parse_span(""), 1);
    }

    #[test]
    fn test_column_span_keywords() {
        assert_eq!(ColumnSpan::parse(Some("row")), ColumnSpan::FillRow);
        assert_eq!(ColumnSpan::parse(Some(" GROUP ")), ColumnSpan::FillGroup);
        assert_eq!(ColumnSpan::parse(Some("2")), ColumnSpan::Cells(2));
        assert_eq!(ColumnSpan::parse(None), ColumnSpan::Cells(1));
        assert!(ColumnSpan::FillRow.is_sentinel());
        assert!(!ColumnSpan::Cells(3).is_sentinel());
    }

    #[test]
    fn test_spans_are_capped() {
        assert_eq!(
            ColumnSpan::parse(Some("99999999999999999999999")),
            ColumnSpan::Cells(MAX_COLSPAN)
        );
        assert_eq!(parse_row_span(Some("70000")), MAX_ROWSPAN);
        assert_eq!(parse_row_span(None), 1);
    }

    #[test]
    fn test_grid_cell_extent() {
        let cell = GridCell {
            element: Some(1u32),
            row: 1,
            column: 2,
            colspan: 3,
            rowspan: 2,
            span_was_sentinel: false,
        };
        assert_eq!(cell.last_column(), 4);
        assert_eq!(cell.last_row(), 2);
        assert!(cell.contains(2, 4));
        assert!(!cell.contains(3, 2));
        assert!(!cell.is_vacant());
    }
}
