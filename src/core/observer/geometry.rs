//! Geometry reading: resolved track sizes of the rendered grid

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::grid::Grid;
use crate::data::constants::{COMPUTED_COLUMNS, COMPUTED_ROWS};
use crate::features::document::{Document, ElementId};
use crate::utils::error::GridResult;
use crate::utils::tracks::parse_track_list;

/// Resolved pixel sizes of the grid tracks
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Geometry {
    pub computed_column_widths: Vec<f64>,
    pub computed_row_heights: Vec<f64>,
}

/// Read the table's resolved track sizes
pub fn read_geometry(doc: &Document, table: ElementId) -> GridResult<Geometry> {
    let columns = doc.computed_style(table, COMPUTED_COLUMNS).unwrap_or("");
    let rows = doc.computed_style(table, COMPUTED_ROWS).unwrap_or("");
    Ok(Geometry {
        computed_column_widths: parse_track_list(columns)?,
        computed_row_heights: parse_track_list(rows)?,
    })
}

/// Elements whose size changes can move the tracks
///
/// The table container, the last source cell of the first grid row and the
/// last source cell of the first grid column. Duplicates collapse, so a
/// single-cell table yields two targets.
pub fn representative_targets(grid: &Grid<ElementId>, table: ElementId) -> Vec<ElementId> {
    let mut targets = vec![table];

    let first_row = grid.rows().first().and_then(|row| {
        row.children
            .iter()
            .rev()
            .find_map(|id| grid.cell(*id).element)
    });
    let first_column = grid.columns().first().and_then(|column| {
        column
            .children
            .iter()
            .rev()
            .find_map(|id| grid.cell(*id).element)
    });

    for element in [first_row, first_column].into_iter().flatten() {
        if !targets.contains(&element) {
            targets.push(element);
        }
    }
    targets
}
