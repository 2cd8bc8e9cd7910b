//! WASM bindings for tablegrid
//!
//! This module lets a browser-side table component hand over its structure as
//! plain data and get placements back, without mirroring its DOM into a
//! [`Document`](crate::features::document::Document).

use wasm_bindgen::prelude::*;

use serde::{Deserialize, Serialize};

use crate::core::grid::{
    build_grid, parse_row_span, Band, BandSpec, ColumnSpan, SourceCell, SourceRow, SourceTable,
};

/// Span attributes of one cell, as raw attribute strings
#[derive(Serialize, Deserialize, Default)]
pub struct CellInput {
    #[serde(default)]
    pub colspan: Option<String>,
    #[serde(default)]
    pub rowspan: Option<String>,
}

/// Table structure: rows of cells in document order
#[derive(Serialize, Deserialize, Default)]
pub struct TableInput {
    #[serde(default)]
    pub rows: Vec<Vec<CellInput>>,
}

/// Placement of one cell, 1-based like the annotations
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellPlacement {
    /// Source row index
    pub source_row: usize,
    /// Cell index within the source row
    pub source_cell: usize,
    pub grid_row: usize,
    pub grid_column: usize,
    pub colspan: usize,
    pub rowspan: usize,
    /// Numeric span a fill keyword resolved to
    pub resolved_colspan: Option<usize>,
}

/// Grid result with additional metadata
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GridOutput {
    pub row_count: usize,
    pub column_count: usize,
    pub cells: Vec<CellPlacement>,
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn source_table(input: &TableInput) -> SourceTable<(usize, usize)> {
    SourceTable::new(
        input
            .rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                let cells = cells
                    .iter()
                    .enumerate()
                    .map(|(c, cell)| SourceCell {
                        element: (r, c),
                        colspan: ColumnSpan::parse(cell.colspan.as_deref()),
                        rowspan: parse_row_span(cell.rowspan.as_deref()),
                    })
                    .collect();
                // Row handles never collide with cell handles
                SourceRow::new((r, usize::MAX), cells)
            })
            .collect(),
    )
}

/// Build the grid for a plain table description
pub fn grid_output(input: &TableInput, bands: &[Band]) -> GridOutput {
    let grid = build_grid(&source_table(input), bands);
    let cells = grid
        .source_cells()
        .filter_map(|(_, cell)| {
            let (source_row, source_cell) = cell.element?;
            Some(CellPlacement {
                source_row,
                source_cell,
                grid_row: cell.row + 1,
                grid_column: cell.column + 1,
                colspan: cell.colspan,
                rowspan: cell.rowspan,
                resolved_colspan: cell.span_was_sentinel.then_some(cell.colspan),
            })
        })
        .collect();

    GridOutput {
        row_count: grid.row_count(),
        column_count: grid.column_count(),
        cells,
    }
}

/// Build the grid for `table` (`{ rows: [[{ colspan, rowspan }]] }`) and
/// optional `bands` (a count or a list of `{ span, width, style }`)
#[wasm_bindgen(js_name = buildGrid)]
pub fn build_grid_js(table: JsValue, bands: JsValue) -> Result<JsValue, JsValue> {
    let input: TableInput = serde_wasm_bindgen::from_value(table)
        .map_err(|e| JsValue::from_str(&format!("invalid table: {}", e)))?;
    let bands = if bands.is_undefined() || bands.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value::<BandSpec>(bands)
            .map_err(|e| JsValue::from_str(&format!("invalid bands: {}", e)))?
            .into_bands()
    };

    serde_wasm_bindgen::to_value(&grid_output(&input, &bands))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Declared column count of the widest row
#[wasm_bindgen(js_name = countColumns)]
pub fn count_columns_js(table: JsValue) -> Result<usize, JsValue> {
    let input: TableInput = serde_wasm_bindgen::from_value(table)
        .map_err(|e| JsValue::from_str(&format!("invalid table: {}", e)))?;
    Ok(source_table(&input)
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.colspan.declared_width()).sum::<usize>())
        .max()
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(colspan: &str, rowspan: &str) -> CellInput {
        CellInput {
            colspan: Some(colspan.to_string()),
            rowspan: Some(rowspan.to_string()),
        }
    }

    #[test]
    fn test_grid_output() {
        let input = TableInput {
            rows: vec![
                vec![cell("row", "1")],
                vec![CellInput::default(), CellInput::default()],
            ],
        };
        let output = grid_output(&input, &[]);

        assert_eq!(output.row_count, 2);
        assert_eq!(output.column_count, 2);
        assert_eq!(
            output.cells[0],
            CellPlacement {
                source_row: 0,
                source_cell: 0,
                grid_row: 1,
                grid_column: 1,
                colspan: 2,
                rowspan: 1,
                resolved_colspan: Some(2),
            }
        );
        assert_eq!(output.cells[2].grid_column, 2);
    }
}
