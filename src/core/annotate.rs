//! Metadata annotator: writes resolved placements back onto elements

use fxhash::FxHashSet;

use crate::core::grid::{CellId, Grid};
use crate::data::constants::{
    ATTR_GRID_COLUMN, ATTR_GRID_ROW, ATTR_RESOLVED_COLSPAN, PROP_COLSPAN, PROP_COLUMN, PROP_ROW,
    PROP_ROWSPAN,
};
use crate::features::document::{Document, ElementId};

/// Placement of one cell as written onto its element (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAnnotation {
    pub row: usize,
    pub column: usize,
    pub colspan: usize,
    pub rowspan: usize,
    /// Numeric span a fill keyword resolved to
    pub resolved_colspan: Option<usize>,
}

/// Receiver of annotations, usually the element tree the grid was read from
pub trait AnnotationSink<H> {
    fn annotate_cell(&mut self, element: H, annotation: &CellAnnotation);

    fn annotate_row(&mut self, element: H, row: usize);
}

/// Stamp every distinct source cell and every sourced row of `grid`
///
/// Vacant filler cells are skipped. Writing the same grid twice writes the same
/// values.
pub fn annotate<H: Copy>(grid: &Grid<H>, sink: &mut impl AnnotationSink<H>) {
    let mut visited: FxHashSet<CellId> = FxHashSet::default();

    for (r, row) in grid.rows().iter().enumerate() {
        if let Some(source) = row.source {
            sink.annotate_row(source, r + 1);
        }

        for id in &row.children {
            if !visited.insert(*id) {
                continue;
            }
            let cell = grid.cell(*id);
            let Some(element) = cell.element else {
                continue;
            };
            sink.annotate_cell(
                element,
                &CellAnnotation {
                    row: cell.row + 1,
                    column: cell.column + 1,
                    colspan: cell.colspan,
                    rowspan: cell.rowspan,
                    resolved_colspan: cell.span_was_sentinel.then_some(cell.colspan),
                },
            );
        }
    }

    log::debug!("annotated {} grid cells", visited.len());
}

impl AnnotationSink<ElementId> for Document {
    fn annotate_cell(&mut self, element: ElementId, annotation: &CellAnnotation) {
        let writes = [
            self.set_attribute(element, ATTR_GRID_ROW, &annotation.row.to_string()),
            self.set_attribute(element, ATTR_GRID_COLUMN, &annotation.column.to_string()),
            self.set_style_property(element, PROP_ROW, &annotation.row.to_string()),
            self.set_style_property(element, PROP_COLUMN, &annotation.column.to_string()),
            self.set_style_property(element, PROP_COLSPAN, &annotation.colspan.to_string()),
            self.set_style_property(element, PROP_ROWSPAN, &annotation.rowspan.to_string()),
            match annotation.resolved_colspan {
                Some(span) => self.set_attribute(element, ATTR_RESOLVED_COLSPAN, &span.to_string()),
                None => self.remove_attribute(element, ATTR_RESOLVED_COLSPAN),
            },
        ];
        if let Some(Err(err)) = writes.into_iter().find(Result::is_err) {
            log::warn!("could not annotate cell: {}", err);
        }
    }

    fn annotate_row(&mut self, element: ElementId, row: usize) {
        let result = self
            .set_row_index(element, row)
            .and_then(|_| self.set_attribute(element, ATTR_GRID_ROW, &row.to_string()));
        if let Err(err) = result {
            log::warn!("could not annotate row: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::build_grid;
    use crate::core::reader::read_table;

    /// Records every write, to check de-duplication
    #[derive(Default)]
    struct Recorder {
        cells: Vec<(u32, CellAnnotation)>,
        rows: Vec<(u32, usize)>,
    }

    impl AnnotationSink<u32> for Recorder {
        fn annotate_cell(&mut self, element: u32, annotation: &CellAnnotation) {
            self.cells.push((element, *annotation));
        }

        fn annotate_row(&mut self, element: u32, row: usize) {
            self.rows.push((element, row));
        }
    }

    #[test]
    fn test_each_cell_written_once() {
        use crate::core::grid::{ColumnSpan, SourceCell, SourceRow, SourceTable};

        let table = SourceTable::new(vec![
            SourceRow::new(10, vec![SourceCell::with_span(1, ColumnSpan::Cells(2), 2)]),
            SourceRow::new(11, vec![SourceCell::new(2)]),
        ]);
        let grid = build_grid(&table, &[]);
        let mut recorder = Recorder::default();
        annotate(&grid, &mut recorder);

        assert_eq!(recorder.rows, vec![(10, 1), (11, 2)]);
        assert_eq!(recorder.cells.len(), 2);
        assert_eq!(
            recorder.cells[0],
            (
                1,
                CellAnnotation {
                    row: 1,
                    column: 1,
                    colspan: 2,
                    rowspan: 2,
                    resolved_colspan: None,
                }
            )
        );
        assert_eq!(recorder.cells[1].1.column, 3);
    }

    #[test]
    fn test_document_annotation() {
        let mut doc = Document::new();
        let table = doc.create_table();
        let first = doc.append_row(table).unwrap();
        let fill = doc.append_cell_with_span(first, "row", "1").unwrap();
        let second = doc.append_row(table).unwrap();
        doc.append_cell(second).unwrap();
        let last = doc.append_cell(second).unwrap();

        let grid = build_grid(&read_table(&doc, table).unwrap(), &[]);
        annotate(&grid, &mut doc);

        assert_eq!(doc.attribute(fill, ATTR_RESOLVED_COLSPAN), Some("2"));
        assert_eq!(doc.style_property(fill, PROP_COLSPAN), Some("2"));
        assert_eq!(doc.attribute(last, ATTR_GRID_COLUMN), Some("2"));
        assert_eq!(doc.attribute(last, ATTR_GRID_ROW), Some("2"));
        assert_eq!(doc.attribute(last, ATTR_RESOLVED_COLSPAN), None);
        assert_eq!(doc.row_index(second), Some(2));

        // Idempotent
        annotate(&grid, &mut doc);
        assert_eq!(doc.style_property(last, PROP_ROW), Some("2"));
        assert_eq!(doc.style_property(fill, PROP_COLSPAN), Some("2"));
    }
}
