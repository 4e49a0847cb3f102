//! Range-selection drag, edge auto-scroll and drag completion.

use std::time::Instant;

use datagrid_core::{CellCoords, SelectionRange};
use datagrid_engine::DragState;

use crate::grid::DataGrid;
use crate::input::PointerEvent;

impl DataGrid {
    /// Move the range end to the cell under the pointer. The start stays
    /// fixed; pointers off the data leave the range unchanged.
    pub(crate) fn update_range_drag(&mut self, start: CellCoords, end: CellCoords, event: PointerEvent) -> bool {
        let (Some(row), Some(col)) = (
            self.dims.row_at_content_y(&self.state, event.y),
            self.dims.col_at_content_x(&self.state, event.x),
        ) else {
            return false;
        };
        let cell = CellCoords::new(row, col);
        if cell == end {
            return false;
        }
        self.state.update_drag(DragState::RangeSelect { start, end: cell });
        self.state.set_selection_range(Some(SelectionRange::new(start, cell)))
    }

    /// Scroll one step toward the pointer when it is past the body edge.
    pub(crate) fn auto_scroll(&mut self, event: PointerEvent) -> bool {
        let vp = self.viewport.metrics();
        let (gutter, header) = (self.dims.gutter_width(), self.dims.header_height());
        let (view_x, view_y) = (event.x - vp.scroll_left, event.y - vp.scroll_top);

        let mut left = vp.scroll_left;
        let mut top = vp.scroll_top;
        if view_x > vp.width && self.viewport.can_scroll_right() {
            left += self.settings.default_column_width;
        } else if view_x < gutter && self.viewport.can_scroll_left() {
            left = (left - self.settings.default_column_width).max(0.0);
        }
        if view_y > vp.height && self.viewport.can_scroll_down() {
            top += self.settings.default_row_height;
        } else if view_y < header && self.viewport.can_scroll_up() {
            top = (top - self.settings.default_row_height).max(0.0);
        }

        if left == vp.scroll_left && top == vp.scroll_top {
            return false;
        }
        self.scroll_to(left, top);
        true
    }

    /// Complete whatever drag is in progress.
    pub(crate) fn finish_drag(&mut self) -> bool {
        match self.state.end_drag() {
            DragState::Idle => false,
            DragState::Fill { source, end_row } => {
                self.finish_fill(source, end_row);
                true
            }
            DragState::RangeSelect { start, end } => {
                verbose!(self, "range drag ended ({}, {})..({}, {})", start.row, start.col, end.row, end.col);
                true
            }
            DragState::ColumnResize { col, .. } => {
                verbose!(self, "column {} resized to {:?}", col, self.state.column_width(col));
                true
            }
            DragState::RowResize { row, .. } => {
                verbose!(self, "row {} resized to {:?}", row, self.state.row_height(row));
                true
            }
        }
    }

    /// Abandon the drag without committing a fill.
    pub fn cancel_drag(&mut self) -> bool {
        let drag = self.state.end_drag();
        if !drag.is_idle() {
            verbose!(self, "{} drag cancelled", drag.name());
        }
        !drag.is_idle()
    }

    pub(crate) fn scroll_to(&mut self, left: f32, top: f32) {
        let window = self.scroll_settle_window();
        self.interaction.suppress_scroll(Instant::now(), window);
        self.viewport.set_scroll_left(left);
        self.viewport.set_scroll_top(top);
    }
}
