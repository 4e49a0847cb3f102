//! Active-cell movement.
//!
//! Enter/Tab navigation wraps across columns, skips disabled cells and
//! reopens the editor at the destination. Running off the first or last row
//! closes the editor and leaves no active cell. Arrow keys move or extend
//! the selection one cell at a time, clamped to the grid.

use datagrid_core::{CellCoords, SelectionRange};
use datagrid_engine::GridEvent;

use crate::grid::DataGrid;

impl DataGrid {
    /// Commit any open edit, move the active cell by `(dr, dc)` and open the
    /// editor there.
    pub fn navigate(&mut self, dr: isize, dc: isize) -> bool {
        let Some(current) = self.state.active_cell() else {
            return false;
        };
        let mut changed = self.commit_editor(true);

        match self.find_navigation_target(current, dr, dc) {
            Some(target) => {
                changed |= self.state.select_single_cell(target);
                self.scroll_cell_into_view(target);
                changed |= self.activate_editor(target);
                changed
            }
            None => {
                verbose!(self, "navigation from ({}, {}) left the grid", current.row, current.col);
                self.state.set_active_cell(None) | changed
            }
        }
    }

    /// Navigation target, appending a row first when `auto_add_row` allows
    /// running off the bottom. The appended row is announced only if the
    /// target lands in it; otherwise it is dropped again.
    fn find_navigation_target(&mut self, from: CellCoords, dr: isize, dc: isize) -> Option<CellCoords> {
        let mut appended = None;
        let target = self.search_navigation_target(from, dr, dc, &mut appended);
        if let Some(row_index) = appended {
            if target.is_some() {
                self.emit(GridEvent::RowAdded { row_index });
            } else {
                self.state.pop_row();
                verbose!(self, "appended row {} has no enabled cell, dropped", row_index);
            }
        }
        target
    }

    /// Raw target with column wrap-around, then a linear search in the
    /// direction of travel for a cell that is not disabled. The search is
    /// bounded by rows x columns steps.
    fn search_navigation_target(
        &mut self,
        from: CellCoords,
        dr: isize,
        dc: isize,
        appended: &mut Option<usize>,
    ) -> Option<CellCoords> {
        let cols = self.state.col_count() as isize;
        if cols == 0 || (dr == 0 && dc == 0) {
            return None;
        }
        let step = |row: isize, col: isize, dr: isize, dc: isize| {
            let col = col + dc;
            (row + dr + col.div_euclid(cols), col.rem_euclid(cols))
        };
        let (unit_dr, unit_dc) = if dc != 0 { (0, dc.signum()) } else { (dr.signum(), 0) };

        let (mut row, mut col) = step(from.row as isize, from.col as isize, dr, dc);
        let mut remaining = self.state.row_count() * cols as usize;

        loop {
            if row < 0 {
                return None;
            }
            if row as usize >= self.state.row_count() {
                let can_append =
                    self.settings.auto_add_row && appended.is_none() && row as usize == self.state.row_count();
                if !can_append {
                    return None;
                }
                *appended = Some(self.state.append_row(None));
                remaining += cols as usize;
            }

            let (r, c) = (row as usize, col as usize);
            if !self.state.is_cell_disabled(r, c) {
                return Some(CellCoords::new(r, c));
            }

            remaining = remaining.checked_sub(1)?;
            if remaining == 0 {
                return None;
            }
            (row, col) = step(row, col, unit_dr, unit_dc);
        }
    }

    /// Arrow key: move one cell, clamped, no wrap, no editor.
    pub fn move_active(&mut self, dr: isize, dc: isize) -> bool {
        let Some(current) = self.state.active_cell() else {
            return false;
        };
        let Some(target) = self.clamped_offset(current, dr, dc) else {
            return false;
        };
        let changed = self.state.select_single_cell(target);
        self.scroll_cell_into_view(target);
        changed
    }

    /// Shift+Arrow: move the range end, keeping the active cell as anchor.
    pub fn extend_active(&mut self, dr: isize, dc: isize) -> bool {
        let Some(anchor) = self.state.active_cell() else {
            return false;
        };
        let end = self.state.selection_range().map_or(anchor, |r| r.end);
        let Some(target) = self.clamped_offset(end, dr, dc) else {
            return false;
        };
        let changed = self.state.set_selection_range(Some(SelectionRange::new(anchor, target)));
        self.scroll_cell_into_view(target);
        changed
    }

    fn clamped_offset(&self, from: CellCoords, dr: isize, dc: isize) -> Option<CellCoords> {
        let (rows, cols) = (self.state.row_count(), self.state.col_count());
        if rows == 0 || cols == 0 {
            return None;
        }
        let row = (from.row as isize + dr).clamp(0, rows as isize - 1) as usize;
        let col = (from.col as isize + dc).clamp(0, cols as isize - 1) as usize;
        Some(CellCoords::new(row, col))
    }

    /// Scroll the minimum distance that brings `cell` fully into the body.
    /// The scroll event this produces is ignored by `handle_scroll`.
    pub fn scroll_cell_into_view(&mut self, cell: CellCoords) -> bool {
        let Some(rect) = self.dims.cell_rect(&self.state, cell.row, cell.col) else {
            return false;
        };
        let vp = self.viewport.metrics();
        let (gutter, header) = (self.dims.gutter_width(), self.dims.header_height());

        let mut left = vp.scroll_left;
        if rect.x < left + gutter {
            left = rect.x - gutter;
        } else if rect.right() > left + vp.width {
            left = rect.right() - vp.width;
        }
        let mut top = vp.scroll_top;
        if rect.y < top + header {
            top = rect.y - header;
        } else if rect.bottom() > top + vp.height {
            top = rect.bottom() - vp.height;
        }
        let (left, top) = (left.max(0.0), top.max(0.0));

        if left == vp.scroll_left && top == vp.scroll_top {
            return false;
        }
        self.scroll_to(left, top);
        true
    }
}
