//! Table Grid Builder
//!
//! Turns a table of rows and cells, some spanning several rows or columns,
//! into a dense placement grid for a CSS-grid layout.
//!
//! This module handles:
//! - `colspan` / `rowspan` declarations, shortened on conflict
//! - The `row` and `group` colspan keywords (fill to the widest row, fill to
//!   the end of the current band)
//! - Phantom rows for cells spanning past the last source row
//! - Vacant filler cells for ragged rows
//!
//! # Architecture
//!
//! ```text
//! Source table + bands -> Seed -> Place -> Extend row fills -> Fill vacancies -> Grid
//! ```
//!
//! # Example
//!
//! ```
//! use tablegrid::core::grid::{build_grid, Band, ColumnSpan, SourceCell, SourceRow, SourceTable};
//!
//! let table = SourceTable::new(vec![
//!     SourceRow::new(0u32, vec![SourceCell::with_span(1, ColumnSpan::FillGroup, 1)]),
//!     SourceRow::new(2, vec![SourceCell::new(3), SourceCell::new(4), SourceCell::new(5)]),
//! ]);
//! let grid = build_grid(&table, &[Band::new(2), Band::new(1)]);
//! assert_eq!(grid.find(&1).map(|cell| cell.colspan), Some(2));
//! ```

mod band;
mod builder;
mod cell;
mod layout;


// Re-export public API
pub use band::{expand_bands, Band, BandId, BandSpec};
pub use builder::{build_grid, GridBuilder};
pub use cell::{
    parse_row_span, parse_span, CellId, ColumnSpan, GridCell, SourceCell, SourceRow, SourceTable,
};
pub use layout::{Grid, GridColumn, GridRow, Placement};
