//! Core grid modules
//!
//! This module contains the grid pipeline:
//! - `reader`: reads span declarations from a table element
//! - `grid`: builds the dense placement grid
//! - `annotate`: writes placements back onto the elements
//! - `observer`: re-runs the pipeline on structural, size and band changes

pub mod annotate;
pub mod grid;
pub mod observer;
pub mod reader;

// Re-export main types and functions
pub use annotate::{annotate, AnnotationSink, CellAnnotation};
pub use grid::{
    build_grid, Band, BandId, BandSpec, CellId, ColumnSpan, Grid, GridBuilder, GridCell,
    GridColumn, GridRow, Placement, SourceCell, SourceRow, SourceTable,
};
pub use observer::{
    BandStream, ChangeObserver, Geometry, ObserverOptions, ObserverState, ResizeScope,
};
pub use reader::{count_columns_in_row, count_columns_in_table, read_table};
