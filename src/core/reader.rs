//! Table reader: flattens a table element into rows of span declarations

use crate::core::grid::{parse_row_span, ColumnSpan, SourceCell, SourceRow, SourceTable};
use crate::data::constants::{ATTR_COLSPAN, ATTR_ROWSPAN};
use crate::features::document::{Document, ElementId, ElementKind};
use crate::utils::error::{GridError, GridResult};

/// Rows of a table in document order, looking through row groups
pub fn table_rows(doc: &Document, table: ElementId) -> GridResult<Vec<ElementId>> {
    if doc.kind(table)? != ElementKind::Table {
        return Err(GridError::NotATable(table));
    }

    let mut rows = Vec::new();
    for child in doc.children(table)? {
        match doc.kind(*child)? {
            ElementKind::Row => rows.push(*child),
            ElementKind::Section => {
                for row in doc.children(*child)? {
                    if doc.kind(*row)? == ElementKind::Row {
                        rows.push(*row);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(rows)
}

/// Cells of a row in document order
pub fn row_cells(doc: &Document, row: ElementId) -> GridResult<Vec<ElementId>> {
    let mut cells = Vec::new();
    for child in doc.children(row)? {
        if doc.kind(*child)? == ElementKind::Cell {
            cells.push(*child);
        }
    }
    Ok(cells)
}

/// Span declarations of one cell element
pub fn read_cell(doc: &Document, cell: ElementId) -> SourceCell<ElementId> {
    SourceCell {
        element: cell,
        colspan: ColumnSpan::parse(doc.attribute(cell, ATTR_COLSPAN)),
        rowspan: parse_row_span(doc.attribute(cell, ATTR_ROWSPAN)),
    }
}

/// Read the current structure of a table
pub fn read_table(doc: &Document, table: ElementId) -> GridResult<SourceTable<ElementId>> {
    let rows = table_rows(doc, table)?
        .into_iter()
        .map(|row| {
            let cells = row_cells(doc, row)?
                .into_iter()
                .map(|cell| read_cell(doc, cell))
                .collect();
            Ok(SourceRow::new(row, cells))
        })
        .collect::<GridResult<Vec<_>>>()?;
    Ok(SourceTable::new(rows))
}

/// Declared column count of a row: integer spans summed, keywords counting 1
pub fn count_columns_in_row(doc: &Document, row: ElementId) -> GridResult<usize> {
    Ok(row_cells(doc, row)?
        .into_iter()
        .map(|cell| read_cell(doc, cell).colspan.declared_width())
        .sum())
}

/// Declared column count of the widest row
pub fn count_columns_in_table(doc: &Document, table: ElementId) -> GridResult<usize> {
    table_rows(doc, table)?
        .into_iter()
        .map(|row| count_columns_in_row(doc, row))
        .try_fold(0, |widest, count| Ok(widest.max(count?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_through_sections() {
        let mut doc = Document::new();
        let table = doc.create_table();
        let head = doc.append_section(table).unwrap();
        let head_row = doc.append_row(head).unwrap();
        let title = doc.append_cell_with_span(head_row, "row", "1").unwrap();
        let loose_row = doc.append_row(table).unwrap();
        let a = doc.append_cell_with_span(loose_row, "2", "x").unwrap();
        let b = doc.append_cell(loose_row).unwrap();

        let source = read_table(&doc, table).unwrap();
        assert_eq!(source.rows.len(), 2);
        assert_eq!(source.rows[0].element, head_row);
        assert_eq!(source.rows[0].cells[0].element, title);
        assert_eq!(source.rows[0].cells[0].colspan, ColumnSpan::FillRow);
        assert_eq!(source.rows[1].cells[0], SourceCell::with_span(a, ColumnSpan::Cells(2), 1));
        assert_eq!(source.rows[1].cells[1], SourceCell::new(b));
    }

    #[test]
    fn test_read_rejects_non_table() {
        let mut doc = Document::new();
        let table = doc.create_table();
        let row = doc.append_row(table).unwrap();
        assert_eq!(read_table(&doc, row).unwrap_err(), GridError::NotATable(row));
    }

    #[test]
    fn test_count_columns() {
        let mut doc = Document::new();
        let table = doc.create_table();
        let first = doc.append_row(table).unwrap();
        doc.append_cell_with_span(first, "3", "1").unwrap();
        doc.append_cell_with_span(first, "group", "1").unwrap();
        let second = doc.append_row(table).unwrap();
        doc.append_cell_with_span(second, "0", "1").unwrap();

        assert_eq!(count_columns_in_row(&doc, first).unwrap(), 4);
        assert_eq!(count_columns_in_row(&doc, second).unwrap(), 1);
        assert_eq!(count_columns_in_table(&doc, table).unwrap(), 4);
    }
}
