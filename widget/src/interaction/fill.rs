//! Fill handle drag.
//!
//! Dragging the handle at the active cell's corner picks an end row above or
//! below the source; releasing copies the source value into every row
//! strictly between the source and the end row, inclusive of the end row,
//! in the source column.

use datagrid_core::CellCoords;
use datagrid_engine::ops::fill_cells;
use datagrid_engine::DragState;

use crate::grid::DataGrid;

impl DataGrid {
    pub(crate) fn begin_fill_drag(&mut self) -> bool {
        let Some(source) = self.state.active_cell() else {
            return false;
        };
        if !self.fill_handle_visible() {
            return false;
        }
        let started = self.state.begin_drag(DragState::Fill { source, end_row: source.row });
        if started {
            verbose!(self, "fill drag started at ({}, {})", source.row, source.col);
        }
        started
    }

    /// Track the pointer's row; positions past either end clamp to the
    /// first or last row.
    pub(crate) fn update_fill_drag(&mut self, source: CellCoords, end_row: usize, y: f32) -> bool {
        let rows = self.state.row_count();
        if rows == 0 {
            return false;
        }
        let row = match self.dims.row_at_content_y(&self.state, y) {
            Some(row) => row,
            None if y < self.dims.header_height() => 0,
            None => rows - 1,
        };
        if row == end_row {
            return false;
        }
        self.state.update_drag(DragState::Fill { source, end_row: row })
    }

    pub(crate) fn finish_fill(&mut self, source: CellCoords, end_row: usize) -> bool {
        let targets: Vec<CellCoords> = fill_target_rows(source.row, end_row)
            .map(|row| CellCoords::new(row, source.col))
            .collect();
        if targets.is_empty() {
            return false;
        }
        let batch = fill_cells(&mut self.state, source, targets);
        verbose!(
            self,
            "fill from ({}, {}) to row {}: {} cells written",
            source.row,
            source.col,
            end_row,
            batch.cell_count()
        );
        self.emit_changes(batch)
    }
}

/// Rows on the far side of `source_row`, up to and including `end_row`.
fn fill_target_rows(source_row: usize, end_row: usize) -> std::ops::RangeInclusive<usize> {
    if end_row > source_row {
        source_row + 1..=end_row
    } else if end_row < source_row {
        end_row..=source_row - 1
    } else {
        // Empty
        1..=0
    }
}
