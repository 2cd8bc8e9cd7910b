//! The built grid: a dense cell arena with row and column views

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::band::BandId;
use super::cell::{CellId, GridCell};

/// One grid row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow<H> {
    /// Cell at each column
    pub children: Vec<CellId>,
    /// Originating source row, `None` for phantom rows
    pub source: Option<H>,
}

impl<H> GridRow<H> {
    pub fn is_phantom(&self) -> bool {
        self.source.is_none()
    }
}

/// One grid column, a transpose of the rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridColumn {
    /// Cell at each row
    pub children: Vec<CellId>,
    /// Band this column was expanded from, `None` past the last band
    pub band: Option<BandId>,
}

/// Resolved placement of one cell, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub colspan: usize,
    pub rowspan: usize,
}

/// A dense, fully populated placement grid
///
/// Built fresh by [`build_grid`](super::build_grid) and immutable afterwards.
/// Every position in `[0, row_count) x [0, column_count)` holds exactly one
/// [`CellId`], and `columns[c].children[r] == rows[r].children[c]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<H> {
    pub(crate) cells: Vec<GridCell<H>>,
    pub(crate) rows: Vec<GridRow<H>>,
    pub(crate) columns: Vec<GridColumn>,
}

impl<H> Grid<H> {
    pub fn rows(&self) -> &[GridRow<H>] {
        &self.rows
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    /// Every cell in the arena, vacant fillers included
    pub fn cells(&self) -> &[GridCell<H>] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &GridCell<H> {
        &self.cells[id.0]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Highest 0-based column index, `None` for an empty grid
    pub fn max_column_index(&self) -> Option<usize> {
        self.columns.len().checked_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Cell id at a position
    pub fn id_at(&self, row: usize, column: usize) -> Option<CellId> {
        self.rows.get(row)?.children.get(column).copied()
    }

    /// Cell at a position
    pub fn at(&self, row: usize, column: usize) -> Option<&GridCell<H>> {
        self.id_at(row, column).map(|id| self.cell(id))
    }

    /// Cells backed by a source element, in placement order
    pub fn source_cells(&self) -> impl Iterator<Item = (CellId, &GridCell<H>)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_vacant())
            .map(|(idx, cell)| (CellId(idx), cell))
    }

    /// Placements of the source-backed cells, in placement order
    pub fn placements(&self) -> Vec<Placement> {
        self.source_cells()
            .map(|(_, cell)| Placement {
                row: cell.row,
                column: cell.column,
                colspan: cell.colspan,
                rowspan: cell.rowspan,
            })
            .collect()
    }
}

impl<H: PartialEq> Grid<H> {
    /// Find the placed cell for a source element
    pub fn find(&self, element: &H) -> Option<&GridCell<H>> {
        self.cells
            .iter()
            .find(|cell| cell.element.as_ref() == Some(element))
    }
}

impl<H> Default for Grid<H> {
    fn default() -> Self {
        Grid {
            cells: Vec::new(),
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }
}

/// Renders the grid as a map of cell ids, vacant cells as `--`
impl<H> fmt::Display for Grid<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let labels: Vec<String> = row
                .children
                .iter()
                .map(|id| {
                    if self.cell(*id).is_vacant() {
                        "--".to_string()
                    } else {
                        id.to_string()
                    }
                })
                .collect();
            let marker = if row.is_phantom() { " ~" } else { "" };
            writeln!(f, "{}{}", labels.join(" "), marker)?;
        }
        Ok(())
    }
}
