//! Input → state transitions.
//!
//! Each state machine lives in its own file as an `impl DataGrid` block:
//! - `selection`: cell click, shift-click, row/column header selection, select all
//! - `drag`: range-selection drag, edge auto-scroll, drag completion/cancel
//! - `resize`: column and row border drags
//! - `fill`: fill handle drag and commit
//! - `clipboard`: copy, paste, clear cells, delete rows
//! - `navigation`: Enter/Tab and arrow movement, scroll-into-view
//! - `hit_test`: pointer position → target
//!
//! Only one pointer drag can be in progress (`DragState`); every
//! `begin_*` refuses to start while another drag is active.

pub mod clipboard;
pub mod drag;
pub mod fill;
pub mod navigation;
pub mod resize;
pub mod selection;

use std::time::{Duration, Instant};

use datagrid_engine::DragState;

use crate::grid::DataGrid;
use crate::input::{Key, Modifiers, PointerEvent};
use crate::viewport::Cursor;
use hit_test::HitTarget;

/// Interaction bookkeeping that is not part of the shared grid state:
/// debounce timestamps and the last cursor shape sent to the viewport.
#[derive(Debug, Default)]
pub struct InteractionManager {
    last_paste: Option<Instant>,
    suppress_scroll_until: Option<Instant>,
    cursor: Cursor,
}

impl InteractionManager {
    /// Accept a paste unless one was accepted less than `window` ago.
    pub fn accept_paste(&mut self, now: Instant, window: Duration) -> bool {
        if let Some(last) = self.last_paste {
            if now.saturating_duration_since(last) < window {
                return false;
            }
        }
        self.last_paste = Some(now);
        true
    }

    /// Ignore scroll events until `now + window`; they come from our own scrolling.
    pub fn suppress_scroll(&mut self, now: Instant, window: Duration) {
        self.suppress_scroll_until = Some(now + window);
    }

    pub fn is_scroll_suppressed(&self, now: Instant) -> bool {
        self.suppress_scroll_until.is_some_and(|until| now < until)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns true when the cursor shape changed.
    pub fn set_cursor(&mut self, cursor: Cursor) -> bool {
        if self.cursor == cursor {
            return false;
        }
        self.cursor = cursor;
        true
    }
}

impl DataGrid {
    // =========================================================================
    // Pointer dispatch
    // =========================================================================

    /// Returns true when the grid needs a redraw.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if !self.state.drag().is_idle() {
            return false;
        }
        let hit = self.hit_test(event.x, event.y);

        // Clicking anywhere but the edited cell commits the editor
        let on_editor = matches!(hit, HitTarget::Cell(cell) if self.editor.active_cell() == Some(cell));
        let mut changed = false;
        if self.editor.is_active() && !on_editor {
            changed |= self.commit_editor(true);
        }

        changed
            | match hit {
                HitTarget::ColumnBorder(col) => self.begin_column_resize(col, event.x),
                HitTarget::RowBorder(row) => self.begin_row_resize(row, event.y),
                HitTarget::Header(col) => self.click_column_header(col),
                HitTarget::Gutter(row) => self.click_row_header(row, event.modifiers),
                HitTarget::FillHandle => self.begin_fill_drag(),
                HitTarget::Cell(cell) => self.click_cell(cell, event.modifiers),
                HitTarget::Corner | HitTarget::None => false,
            }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        match self.state.drag().clone() {
            DragState::Idle => {
                self.update_hover(event.x, event.y);
                false
            }
            DragState::RangeSelect { start, end } => {
                let scrolled = self.auto_scroll(event);
                self.update_range_drag(start, end, event) | scrolled
            }
            DragState::Fill { source, end_row } => {
                let scrolled = self.auto_scroll(event);
                self.update_fill_drag(source, end_row, event.y) | scrolled
            }
            DragState::ColumnResize { col, last_x } => self.update_column_resize(col, last_x, event.x),
            DragState::RowResize { row, last_y } => self.update_row_resize(row, last_y, event.y),
        }
    }

    /// Ends any drag. Hosts call this for releases outside the widget too.
    pub fn pointer_up(&mut self, event: PointerEvent) -> bool {
        let changed = self.finish_drag();
        self.update_hover(event.x, event.y);
        changed
    }

    pub fn double_click(&mut self, event: PointerEvent) -> bool {
        match self.hit_test(event.x, event.y) {
            HitTarget::Cell(cell) => {
                let changed = self.state.select_single_cell(cell);
                self.activate_editor(cell) | changed
            }
            _ => false,
        }
    }

    /// Host scroll notification.
    pub fn handle_scroll(&mut self) -> bool {
        self.handle_scroll_at(Instant::now())
    }

    /// Scroll events inside the settle window after our own scroll-into-view
    /// are ignored. A user scroll hides the editor's dropdown.
    pub fn handle_scroll_at(&mut self, now: Instant) -> bool {
        if self.interaction.is_scroll_suppressed(now) {
            return false;
        }
        if self.editor.is_active() {
            self.editor.hide_dropdown();
        }
        true
    }

    fn update_hover(&mut self, x: f32, y: f32) {
        let cursor = match self.hit_test(x, y) {
            HitTarget::ColumnBorder(_) => Cursor::ColResize,
            HitTarget::RowBorder(_) => Cursor::RowResize,
            HitTarget::FillHandle => Cursor::Crosshair,
            _ => Cursor::Default,
        };
        if self.interaction.set_cursor(cursor) {
            self.viewport.set_cursor(cursor);
        }
    }

    // =========================================================================
    // Keyboard dispatch
    // =========================================================================

    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let editing = self.editor.is_active();

        match key {
            Key::Enter if editing => self.navigate(if modifiers.shift { -1 } else { 1 }, 0),
            Key::Enter => match self.state.active_cell() {
                Some(cell) => self.activate_editor(cell),
                None => false,
            },
            Key::Tab => self.navigate(0, if modifiers.shift { -1 } else { 1 }),
            Key::Escape => {
                let mut changed = self.cancel_drag();
                if editing {
                    self.editor.hide_dropdown();
                    changed |= self.commit_editor(false);
                }
                changed
            }
            _ if editing => false,
            Key::Char(c) if modifiers.command() => match c.to_ascii_lowercase() {
                'c' => self.copy(),
                'v' => self.paste(),
                'a' => self.select_all(),
                'z' if modifiers.shift => self.redo(),
                'z' => self.undo(),
                'y' => self.redo(),
                _ => false,
            },
            Key::Delete | Key::Backspace => {
                if self.state.selected_rows().is_empty() {
                    self.clear_selected_cells()
                } else {
                    self.delete_selected_rows()
                }
            }
            _ => match key.arrow_delta() {
                Some((dr, dc)) if modifiers.shift => self.extend_active(dr, dc),
                Some((dr, dc)) => self.move_active(dr, dc),
                None => false,
            },
        }
    }

    pub(crate) fn paste_window(&self) -> Duration {
        Duration::from_millis(self.settings.paste_debounce_ms)
    }

    pub(crate) fn scroll_settle_window(&self) -> Duration {
        Duration::from_millis(self.settings.scroll_settle_ms)
    }
}
