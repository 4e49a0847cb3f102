//! Cell, row and column selection.

use std::collections::BTreeSet;

use datagrid_core::{CellCoords, SelectionRange};
use datagrid_engine::DragState;

use crate::grid::DataGrid;
use crate::input::Modifiers;

impl DataGrid {
    /// Pointer-down on a data cell.
    ///
    /// Shift extends the range from the active cell, ctrl/cmd just moves the
    /// active cell, and a plain press starts a range-selection drag.
    pub(crate) fn click_cell(&mut self, cell: CellCoords, modifiers: Modifiers) -> bool {
        if modifiers.shift && self.state.active_cell().is_some() {
            return self.extend_selection_to(cell);
        }
        if modifiers.command() {
            return self.state.select_single_cell(cell);
        }
        self.begin_range_drag(cell)
    }

    /// Set the active cell with no range.
    pub fn select_cell(&mut self, cell: CellCoords) -> bool {
        if self.state.check_cell(cell.row, cell.col).is_err() {
            log::warn!("select_cell: ({}, {}) is outside the grid", cell.row, cell.col);
            return false;
        }
        self.state.select_single_cell(cell)
    }

    /// Range from the active cell to `cell`.
    pub(crate) fn extend_selection_to(&mut self, cell: CellCoords) -> bool {
        let Some(anchor) = self.state.active_cell() else {
            return false;
        };
        self.state.set_selection_range(Some(SelectionRange::new(anchor, cell)))
    }

    /// Row-number gutter click.
    ///
    /// - plain: exactly that row
    /// - ctrl/cmd: toggle membership
    /// - shift with a previous click: the inclusive span from that row
    pub(crate) fn click_row_header(&mut self, row: usize, modifiers: Modifiers) -> bool {
        let rows = match (modifiers.shift, modifiers.command(), self.state.last_clicked_row()) {
            (true, _, Some(last)) => (last.min(row)..=last.max(row)).collect(),
            (_, true, _) => {
                let mut rows = self.state.selected_rows().clone();
                if !rows.remove(&row) {
                    rows.insert(row);
                }
                rows
            }
            _ => BTreeSet::from([row]),
        };
        // Shift keeps the original anchor so repeated shift-clicks pivot on it
        let last_clicked = match (modifiers.shift, self.state.last_clicked_row()) {
            (true, Some(last)) => Some(last),
            _ => Some(row),
        };
        self.state.set_selected_rows(rows, last_clicked)
    }

    pub(crate) fn click_column_header(&mut self, col: usize) -> bool {
        self.state.set_selected_column(Some(col))
    }

    pub fn select_all(&mut self) -> bool {
        let (rows, cols) = (self.state.row_count(), self.state.col_count());
        if rows == 0 || cols == 0 {
            return false;
        }
        let start = CellCoords::new(0, 0);
        let mut changed = self.state.set_active_cell(Some(start));
        changed |= self
            .state
            .set_selection_range(Some(SelectionRange::new(start, CellCoords::new(rows - 1, cols - 1))));
        changed
    }

    /// Pointer-down without modifiers: active cell plus a zero-size range,
    /// and a range drag anchored there.
    pub(crate) fn begin_range_drag(&mut self, cell: CellCoords) -> bool {
        if !self.state.begin_drag(DragState::RangeSelect { start: cell, end: cell }) {
            return false;
        }
        let mut changed = self.state.set_active_cell(Some(cell));
        changed |= self.state.set_selection_range(Some(SelectionRange::single(cell)));
        verbose!(self, "range drag started at ({}, {})", cell.row, cell.col);
        changed
    }
}
