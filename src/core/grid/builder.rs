//! Span-aware grid builder
//!
//! Places source cells into a dense grid, resolving fill keywords against the
//! bands and the widest row seen so far, and shortening any span that would
//! run into a cell an earlier row already placed.

use super::band::{expand_bands, Band, BandId};
use super::cell::{CellId, ColumnSpan, GridCell, SourceCell, SourceTable};
use super::layout::{Grid, GridColumn, GridRow};
use crate::data::constants::{MAX_COLSPAN, MAX_ROWSPAN};

/// Growable placement arena
///
/// Rows and columns grow past their seeded length as spanning cells demand;
/// `width` is the high-water mark of columns in use.
struct GridArena<H> {
    /// Cell at each position, `None` while free
    slots: Vec<Vec<Option<CellId>>>,
    /// Originating source row per grid row
    sources: Vec<Option<H>>,
    /// Band identity per seeded column
    bands: Vec<BandId>,
    width: usize,
    cells: Vec<GridCell<H>>,
}

impl<H: Copy> GridArena<H> {
    fn new(bands: &[Band]) -> Self {
        let bands = expand_bands(bands);
        GridArena {
            slots: Vec::new(),
            sources: Vec::new(),
            width: bands.len(),
            bands,
            cells: Vec::new(),
        }
    }

    fn push_row(&mut self, source: Option<H>) {
        self.slots.push(Vec::new());
        self.sources.push(source);
    }

    fn ensure_rows(&mut self, count: usize) {
        while self.slots.len() < count {
            self.push_row(None);
        }
    }

    fn is_free(&self, row: usize, column: usize) -> bool {
        self.slots
            .get(row)
            .and_then(|slots| slots.get(column))
            .map_or(true, |slot| slot.is_none())
    }

    /// First free column at or after `column`
    fn next_free(&self, row: usize, mut column: usize) -> usize {
        while !self.is_free(row, column) {
            column += 1;
        }
        column
    }

    /// Free columns starting at `column` in `row`, up to `limit`
    fn free_run(&self, row: usize, column: usize, limit: usize) -> usize {
        (0..limit)
            .take_while(|offset| self.is_free(row, column + offset))
            .count()
    }

    /// Rows starting at `row` whose columns `column..column + colspan` are all
    /// free, up to `limit`
    fn free_rows(&self, row: usize, column: usize, colspan: usize, limit: usize) -> usize {
        (0..limit)
            .take_while(|offset| {
                (column..column + colspan).all(|c| self.is_free(row + offset, c))
            })
            .count()
    }

    /// Index of the last column sharing `column`'s band
    fn group_end(&self, column: usize) -> Option<usize> {
        let band = *self.bands.get(column)?;
        let run = self.bands[column..]
            .iter()
            .take_while(|other| **other == band)
            .count();
        Some(column + run - 1)
    }

    fn stamp(&mut self, id: CellId, rows: std::ops::Range<usize>, columns: std::ops::Range<usize>) {
        self.ensure_rows(rows.end);
        for row in rows {
            let slots = &mut self.slots[row];
            if slots.len() < columns.end {
                slots.resize(columns.end, None);
            }
            for column in columns.clone() {
                slots[column] = Some(id);
            }
        }
        self.width = self.width.max(columns.end);
    }

    fn place(&mut self, cell: GridCell<H>) -> CellId {
        let id = CellId(self.cells.len());
        let rows = cell.row..cell.row + cell.rowspan;
        let columns = cell.column..cell.column + cell.colspan;
        self.cells.push(cell);
        self.stamp(id, rows, columns);
        id
    }

    /// Fill every run of free positions with a vacant cell and freeze the grid
    fn into_grid(mut self) -> Grid<H> {
        let width = self.width;
        let mut rows = Vec::with_capacity(self.slots.len());
        let slots = std::mem::take(&mut self.slots);

        for (row, (row_slots, source)) in slots.into_iter().zip(self.sources.iter()).enumerate() {
            let mut children = Vec::with_capacity(width);
            let mut column = 0;
            while column < width {
                match row_slots.get(column).copied().flatten() {
                    Some(id) => {
                        children.push(id);
                        column += 1;
                    }
                    None => {
                        let run = (column..width)
                            .take_while(|c| row_slots.get(*c).copied().flatten().is_none())
                            .count();
                        let id = CellId(self.cells.len());
                        self.cells.push(GridCell {
                            element: None,
                            row,
                            column,
                            colspan: run,
                            rowspan: 1,
                            span_was_sentinel: false,
                        });
                        log::trace!("vacant run at row {} columns {}..{}", row, column, column + run);
                        children.extend(std::iter::repeat(id).take(run));
                        column += run;
                    }
                }
            }
            rows.push(GridRow {
                children,
                source: *source,
            });
        }

        let columns = (0..width)
            .map(|column| GridColumn {
                children: rows.iter().map(|row| row.children[column]).collect(),
                band: self.bands.get(column).copied(),
            })
            .collect();

        Grid {
            cells: self.cells,
            rows,
            columns,
        }
    }
}

/// Builds a [`Grid`] from a source table and its bands
pub struct GridBuilder<H> {
    arena: GridArena<H>,
    /// Highest column index reached so far, seeded by the bands
    widest: Option<usize>,
    /// Trailing `FillRow` cells, one per row at most
    row_fills: Vec<CellId>,
}

impl<H: Copy> GridBuilder<H> {
    /// Seed the columns from the bands
    pub fn new(bands: &[Band]) -> Self {
        let arena = GridArena::new(bands);
        let widest = arena.width.checked_sub(1);
        GridBuilder {
            arena,
            widest,
            row_fills: Vec::new(),
        }
    }

    /// Run the placement and return the finished grid
    pub fn build(mut self, table: &SourceTable<H>) -> Grid<H> {
        // One grid row per source row; a row without cells hosts nothing of
        // its own and is left unsourced, like a phantom row
        for row in &table.rows {
            self.arena
                .push_row((!row.cells.is_empty()).then_some(row.element));
        }

        for (row, source) in table.rows.iter().enumerate() {
            self.place_row(row, &source.cells);
        }

        self.extend_row_fills();

        let grid = self.arena.into_grid();
        log::debug!(
            "built grid: {} rows x {} columns, {} cells",
            grid.row_count(),
            grid.column_count(),
            grid.cells().len()
        );
        grid
    }

    fn place_row(&mut self, row: usize, cells: &[SourceCell<H>]) {
        let mut cursor = 0;
        let mut trailing = None;

        for source in cells {
            cursor = self.arena.next_free(row, cursor);

            let wanted = self.resolve_span(source.colspan, cursor);
            let colspan = self.arena.free_run(row, cursor, wanted).max(1);
            if colspan < wanted {
                log::debug!(
                    "row {}: span {} at column {} shortened to {}",
                    row,
                    wanted,
                    cursor,
                    colspan
                );
            }
            let rowspan = self
                .arena
                .free_rows(row, cursor, colspan, source.rowspan.clamp(1, MAX_ROWSPAN))
                .max(1);

            let id = self.arena.place(GridCell {
                element: Some(source.element),
                row,
                column: cursor,
                colspan,
                rowspan,
                span_was_sentinel: source.colspan.is_sentinel(),
            });
            log::trace!(
                "placed {} at ({}, {}) span {}x{}",
                id,
                row,
                cursor,
                colspan,
                rowspan
            );

            let last = cursor + colspan - 1;
            if self.widest.map_or(true, |widest| last > widest) {
                self.widest = Some(last);
            }

            trailing = Some((id, source.colspan));
            cursor += colspan;
        }

        if let Some((id, ColumnSpan::FillRow)) = trailing {
            self.row_fills.push(id);
        }
    }

    /// Resolve a declared column span at the cursor, before clamping
    fn resolve_span(&self, declared: ColumnSpan, cursor: usize) -> usize {
        match declared {
            ColumnSpan::Cells(n) => n.clamp(1, MAX_COLSPAN),
            ColumnSpan::FillRow => match self.widest {
                Some(widest) if widest >= cursor => widest + 1 - cursor,
                _ => 1,
            },
            ColumnSpan::FillGroup => match self.arena.group_end(cursor) {
                Some(end) => end + 1 - cursor,
                None => {
                    log::debug!("column {} has no band, group fill spans 1", cursor);
                    1
                }
            },
        }
    }

    /// Stretch trailing `FillRow` cells to the final grid width
    fn extend_row_fills(&mut self) {
        let width = self.arena.width;
        for id in std::mem::take(&mut self.row_fills) {
            let cell = &self.arena.cells[id.0];
            let (row, rowspan, start) = (cell.row, cell.rowspan, cell.last_column() + 1);
            if start >= width {
                continue;
            }

            let extra = (start..width)
                .take_while(|column| self.arena.free_rows(row, *column, 1, rowspan) == rowspan)
                .count();
            if extra == 0 {
                continue;
            }

            self.arena.cells[id.0].colspan += extra;
            self.arena.stamp(id, row..row + rowspan, start..start + extra);
            log::trace!("extended row fill {} by {} columns", id, extra);
        }
    }
}

/// Build a grid from a source table and bands
pub fn build_grid<H: Copy>(table: &SourceTable<H>, bands: &[Band]) -> Grid<H> {
    GridBuilder::new(bands).build(table)
}
