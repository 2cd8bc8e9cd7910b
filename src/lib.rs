//! # tablegrid
//!
//! Span-aware table to CSS-grid placement, kept in sync with a live table.
//!
//! ## Features
//!
//! - **Dense placement**: every grid position holds exactly one cell
//! - **Spans**: `colspan`/`rowspan`, shortened instead of overlapping
//! - **Fill keywords**: `colspan="row"` stretches to the widest row,
//!   `colspan="group"` to the end of the current column band
//! - **Annotation**: resolved row, column and spans written back onto cells
//! - **Observation**: rebuilds on structural and band changes, re-measures on
//!   size changes
//! - **WASM Support**: plain-data entry point for browser components
//!
//! ## Usage Examples
//!
//! ### Building a grid
//!
//! ```rust
//! use tablegrid::{layout_table, Band, Document};
//!
//! let mut doc = Document::new();
//! let table = doc.create_table();
//! let header = doc.append_row(table).unwrap();
//! doc.append_cell_with_span(header, "group", "1").unwrap();
//! let body = doc.append_row(table).unwrap();
//! for _ in 0..3 {
//!     doc.append_cell(body).unwrap();
//! }
//!
//! let grid = layout_table(&mut doc, table, &[Band::new(2), Band::new(1)]).unwrap();
//! assert_eq!(grid.column_count(), 3);
//! assert_eq!(grid.at(0, 0).map(|cell| cell.colspan), Some(2));
//! ```
//!
//! ### Observing a table
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tablegrid::{ChangeObserver, Document, ObserverOptions};
//!
//! let doc = Rc::new(RefCell::new(Document::new()));
//! let (table, row) = {
//!     let mut d = doc.borrow_mut();
//!     let table = d.create_table();
//!     let row = d.append_row(table).unwrap();
//!     (table, row)
//! };
//!
//! let widths = Rc::new(RefCell::new(0));
//! let seen = Rc::clone(&widths);
//! let mut observer = ChangeObserver::observe(
//!     Rc::clone(&doc),
//!     table,
//!     None,
//!     move |grid| *seen.borrow_mut() = grid.column_count(),
//!     |_geometry| {},
//!     ObserverOptions::default(),
//! )
//! .unwrap();
//!
//! doc.borrow_mut().append_cell(row).unwrap();
//! doc.borrow_mut().append_cell(row).unwrap();
//! observer.pump();
//! assert_eq!(*widths.borrow(), 2);
//! ```

/// Core grid modules
pub mod core;

/// Data layer - attribute names and keywords
pub mod data;

/// Feature modules - element tree the grid runs against
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core types and functions
pub use core::annotate::{annotate, AnnotationSink, CellAnnotation};
pub use core::grid::{
    build_grid, expand_bands, Band, BandId, BandSpec, CellId, ColumnSpan, Grid, GridBuilder,
    GridCell, GridColumn, GridRow, Placement, SourceCell, SourceRow, SourceTable,
};
pub use core::observer::{
    BandStream, ChangeObserver, Channel, Geometry, Notification, ObserverOptions, ObserverState,
    ResizeScope,
};
pub use core::reader::{count_columns_in_row, count_columns_in_table, read_table};

// Re-export the element tree
pub use features::document::{Document, ElementId, ElementKind, SubscriptionId};

// Re-export utilities
pub use utils::error::{GridError, GridResult};

/// Read and build the grid of a table without touching it
pub fn grid_for_table(
    doc: &Document,
    table: ElementId,
    bands: &[Band],
) -> GridResult<Grid<ElementId>> {
    Ok(build_grid(&read_table(doc, table)?, bands))
}

/// Read, build and annotate the grid of a table
pub fn layout_table(
    doc: &mut Document,
    table: ElementId,
    bands: &[Band],
) -> GridResult<Grid<ElementId>> {
    let grid = grid_for_table(doc, table, bands)?;
    annotate(&grid, doc);
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::constants::{ATTR_GRID_COLUMN, ATTR_GRID_ROW};

    fn sample(doc: &mut Document) -> (ElementId, ElementId) {
        let table = doc.create_table();
        let first = doc.append_row(table).unwrap();
        let tall = doc.append_cell_with_span(first, "1", "2").unwrap();
        doc.append_cell(first).unwrap();
        let second = doc.append_row(table).unwrap();
        doc.append_cell(second).unwrap();
        (table, tall)
    }

    #[test]
    fn test_grid_for_table_leaves_document_alone() {
        let mut doc = Document::new();
        let (table, tall) = sample(&mut doc);

        let grid = grid_for_table(&doc, table, &[]).unwrap();
        assert_eq!(grid.to_string(), "c0 c1\nc0 c2\n");
        assert_eq!(doc.attribute(tall, ATTR_GRID_ROW), None);
    }

    #[test]
    fn test_layout_table_annotates() {
        let mut doc = Document::new();
        let (table, tall) = sample(&mut doc);

        layout_table(&mut doc, table, &[]).unwrap();
        assert_eq!(doc.attribute(tall, ATTR_GRID_ROW), Some("1"));
        assert_eq!(doc.attribute(tall, ATTR_GRID_COLUMN), Some("1"));
    }

    #[test]
    fn test_layout_unknown_table() {
        let mut doc = Document::new();
        let missing = ElementId::from_raw(9);
        assert_eq!(
            layout_table(&mut doc, missing, &[]).unwrap_err(),
            GridError::UnknownElement(missing)
        );
    }
}
