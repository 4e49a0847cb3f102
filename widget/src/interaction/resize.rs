//! Column and row border drags.
//!
//! Each move applies the delta since the *last* pointer position and then
//! re-captures it. When the size is pinned at a bound, moving back starts
//! shrinking or growing immediately instead of first undoing the overshoot.

use datagrid_engine::DragState;

use crate::grid::DataGrid;

impl DataGrid {
    pub(crate) fn begin_column_resize(&mut self, col: usize, x: f32) -> bool {
        let started = self.state.begin_drag(DragState::ColumnResize { col, last_x: x });
        if started {
            verbose!(self, "column {} resize started at x={}", col, x);
        }
        started
    }

    pub(crate) fn begin_row_resize(&mut self, row: usize, y: f32) -> bool {
        let started = self.state.begin_drag(DragState::RowResize { row, last_y: y });
        if started {
            verbose!(self, "row {} resize started at y={}", row, y);
        }
        started
    }

    pub(crate) fn update_column_resize(&mut self, col: usize, last_x: f32, x: f32) -> bool {
        let Some(width) = self.state.column_width(col) else {
            return false;
        };
        let width = self.settings.clamp_column_width(width + (x - last_x));
        let changed = self.state.set_column_width(col, width).unwrap_or(false);
        self.state.update_drag(DragState::ColumnResize { col, last_x: x });
        changed
    }

    pub(crate) fn update_row_resize(&mut self, row: usize, last_y: f32, y: f32) -> bool {
        let Some(height) = self.state.row_height(row) else {
            return false;
        };
        let height = self.settings.clamp_row_height(height + (y - last_y));
        let changed = self.state.set_row_height(row, height).unwrap_or(false);
        self.state.update_drag(DragState::RowResize { row, last_y: y });
        changed
    }
}
