//! The `DataGrid` controller and its public API.
//!
//! Input handling lives in `interaction/*`, split by state machine; this file
//! holds construction, the programmatic operations, change emission and
//! undo/redo.

use std::collections::BTreeSet;

use serde_json::Value;

use datagrid_config::{GridSettings, Theme};
use datagrid_core::{CellCoords, RowData, Schema, Size};
use datagrid_engine::ops::{self, fill_cells};
use datagrid_engine::{
    CellWrite, ChangeBatch, DeletedRow, DimensionCalculator, DisabledPredicate, GridError, GridEvent,
    StateManager, VisibleRange,
};

use crate::config::GridConfig;
use crate::editing::{EditingManager, NoopEditor, PendingEdit};
use crate::history::{History, HistoryManager};
use crate::interaction::InteractionManager;
use crate::renderer::{Frame, Renderer, Surface};
use crate::viewport::ViewportAdapter;

pub type EventListener = Box<dyn FnMut(&GridEvent)>;

pub struct DataGrid {
    pub(crate) state: StateManager,
    pub(crate) dims: DimensionCalculator,
    pub(crate) renderer: Renderer,
    pub(crate) settings: GridSettings,
    pub(crate) interaction: InteractionManager,
    pub(crate) editor: Box<dyn EditingManager>,
    pub(crate) history: Box<dyn HistoryManager>,
    pub(crate) viewport: Box<dyn ViewportAdapter>,
    listeners: Vec<EventListener>,
    /// Set while undo/redo replays history so the replay is not re-recorded.
    replaying: bool,
}

/// Log structural misuse and pass the result through.
fn warn_on_err<T>(op: &str, result: Result<T, GridError>) -> Result<T, GridError> {
    if let Err(e) = &result {
        log::warn!("{op}: {e}");
    }
    result
}

impl DataGrid {
    pub fn new(schema: Schema, config: GridConfig, viewport: Box<dyn ViewportAdapter>) -> Self {
        let GridConfig { settings, theme, disabled } = config;
        let state = StateManager::new(
            schema,
            settings.default_column_width,
            settings.default_row_height,
            disabled,
        );
        Self {
            state,
            dims: DimensionCalculator::new(settings.header_height, settings.row_number_width),
            renderer: Renderer::new(theme, settings.date_format.clone()),
            settings,
            interaction: InteractionManager::default(),
            editor: Box::new(NoopEditor),
            history: Box::new(History::new()),
            viewport,
            listeners: Vec::new(),
            replaying: false,
        }
    }

    pub fn with_editor(mut self, editor: Box<dyn EditingManager>) -> Self {
        self.set_editor(editor);
        self
    }

    pub fn with_history(mut self, history: Box<dyn HistoryManager>) -> Self {
        self.history = history;
        self
    }

    /// Wire the editor after construction. Any open editor is discarded.
    pub fn set_editor(&mut self, editor: Box<dyn EditingManager>) {
        self.editor.deactivate(false);
        self.editor = editor;
    }

    /// Receive change, row-added and row-deletion notifications.
    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn schema(&self) -> &Schema {
        self.state.schema()
    }

    pub fn row_count(&self) -> usize {
        self.state.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.state.col_count()
    }

    pub fn active_cell(&self) -> Option<CellCoords> {
        self.state.active_cell()
    }

    pub fn total_size(&self) -> Size {
        self.dims.calculate_total_size(&self.state)
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.dims.calculate_visible_range(&self.state, &self.viewport.metrics())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.renderer.set_theme(theme);
    }

    pub fn set_disabled_predicate(&mut self, predicate: Option<DisabledPredicate>) {
        self.state.set_disabled_predicate(predicate);
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the dataset and scroll back to the origin.
    pub fn load_data(&mut self, rows: Vec<RowData>) {
        self.editor.deactivate(false);
        self.state.load_data(rows);
        self.history.clear();
        self.scroll_to(0.0, 0.0);
        verbose!(self, "loaded {} rows", self.state.row_count());
    }

    /// The dataset without internal disabled/error state.
    pub fn data(&self) -> Vec<RowData> {
        self.state.data()
    }

    pub fn cell_value(&self, row: usize, key: &str) -> Option<&Value> {
        let col = self.state.schema().index_of(key)?;
        self.state.get_cell_value(row, col)
    }

    /// Validated single-cell write. A rejected value leaves an error overlay
    /// on the cell and is reported as `CellWrite::Rejected`.
    pub fn update_cell(&mut self, row: usize, key: &str, value: Value) -> Result<CellWrite, GridError> {
        let col = warn_on_err(
            "update_cell",
            self.state.schema().index_of(key).ok_or_else(|| GridError::UnknownColumn(key.to_string())),
        )?;
        let write = warn_on_err("update_cell", self.state.write_validated(row, col, value))?;

        if let CellWrite::Written { previous } = &write {
            let mut batch = ChangeBatch::new();
            batch.record(row, key, previous.clone());
            ops::refresh_rows(&mut self.state, &batch);
            self.emit_changes(batch);
        }
        Ok(write)
    }

    /// Copy `source`'s value into `targets`, skipping disabled cells and
    /// cells of a different column type.
    pub fn fill(&mut self, source: CellCoords, targets: &[CellCoords]) -> bool {
        let batch = fill_cells(&mut self.state, source, targets.iter().copied());
        self.emit_changes(batch)
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    pub fn column_width(&self, col: usize) -> Option<f32> {
        self.state.column_width(col)
    }

    /// Set a column width, clamped to the configured bounds.
    pub fn set_column_width(&mut self, col: usize, width: f32) -> Result<bool, GridError> {
        let width = self.settings.clamp_column_width(width);
        warn_on_err("set_column_width", self.state.set_column_width(col, width))
    }

    pub fn row_height(&self, row: usize) -> Option<f32> {
        self.state.row_height(row)
    }

    pub fn set_row_height(&mut self, row: usize, height: f32) -> Result<bool, GridError> {
        let height = self.settings.clamp_row_height(height);
        warn_on_err("set_row_height", self.state.set_row_height(row, height))
    }

    // =========================================================================
    // Rows
    // =========================================================================

    pub fn add_row(&mut self, data: Option<RowData>) -> usize {
        let row_index = self.state.append_row(data);
        self.emit(GridEvent::RowAdded { row_index });
        row_index
    }

    pub fn insert_row(&mut self, at: usize, data: Option<RowData>) -> Result<usize, GridError> {
        if at < self.state.row_count() {
            self.commit_editor(true);
        }
        let row_index = warn_on_err("insert_row", self.state.insert_row(at, data))?;
        if row_index + 1 < self.state.row_count() {
            // Recorded history refers to the old indices
            self.history.clear();
        }
        self.emit(GridEvent::RowAdded { row_index });
        Ok(row_index)
    }

    /// Delete rows by index. Listeners see the rows before indices shift.
    pub fn delete_rows(&mut self, indices: &[usize]) -> Result<Vec<DeletedRow>, GridError> {
        let rows = self.state.row_count();
        if let Some(&row) = indices.iter().find(|&&i| i >= rows) {
            return warn_on_err("delete_rows", Err(GridError::RowOutOfRange { row, rows }));
        }
        if indices.is_empty() {
            return Ok(Vec::new());
        }

        self.commit_editor(true);
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        let snapshot: Vec<DeletedRow> = unique
            .iter()
            .filter_map(|&row_index| {
                let row_data = self.state.row(row_index)?.clone();
                Some(DeletedRow { row_index, row_data })
            })
            .collect();
        self.emit(GridEvent::RowsDeleted(snapshot));

        let removed = warn_on_err("delete_rows", self.state.remove_rows(indices))?;
        self.history.clear();
        self.clamp_scroll_to_content();
        verbose!(self, "deleted {} rows, {} remain", removed.len(), self.state.row_count());
        Ok(removed)
    }

    /// Pull the scroll offsets back inside the content after it shrank.
    fn clamp_scroll_to_content(&mut self) {
        let size = self.total_size();
        let vp = self.viewport.metrics();
        let left = vp.scroll_left.min((size.width - vp.width).max(0.0));
        let top = vp.scroll_top.min((size.height - vp.height).max(0.0));
        if left != vp.scroll_left || top != vp.scroll_top {
            verbose!(self, "scroll clamped to ({}, {})", left, top);
            self.scroll_to(left, top);
        }
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        let values = entry.changes.iter().rev().map(|c| (c.row, c.key.as_str(), &c.old_value));
        let batch = ops::apply_values(&mut self.state, values);
        self.replay(batch)
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        let values = entry.changes.iter().map(|c| (c.row, c.key.as_str(), &c.new_value));
        let batch = ops::apply_values(&mut self.state, values);
        self.replay(batch)
    }

    fn replay(&mut self, batch: ChangeBatch) -> bool {
        self.replaying = true;
        let changed = self.emit_changes(batch);
        self.replaying = false;
        changed
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render(&self, surface: &mut dyn Surface) {
        let editor_cell = if self.editor.is_active() { self.editor.active_cell() } else { None };
        let frame = Frame {
            state: &self.state,
            dims: &self.dims,
            viewport: self.viewport.metrics(),
            editor_cell,
            fill_handle_size: self.settings.fill_handle_size,
        };
        self.renderer.render(surface, &frame);
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    pub(crate) fn emit(&mut self, event: GridEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Record and broadcast a batch. Returns false for an empty batch.
    pub(crate) fn emit_changes(&mut self, batch: ChangeBatch) -> bool {
        if batch.is_empty() {
            return false;
        }
        let records = batch.finish(&self.state);
        if !self.replaying && !self.history.is_parent_app_update() {
            self.history.record_changes(&records);
        }
        self.emit(GridEvent::CellsChanged(records));
        true
    }

    /// Close the editor, committing its value when `save` is set.
    pub(crate) fn commit_editor(&mut self, save: bool) -> bool {
        if !self.editor.is_active() {
            return false;
        }
        let pending = self.editor.deactivate(save);
        match pending {
            Some(edit) if save => self.commit_pending(edit),
            _ => true,
        }
    }

    fn commit_pending(&mut self, edit: PendingEdit) -> bool {
        let PendingEdit { cell, value } = edit;
        match warn_on_err("commit_edit", self.state.write_validated(cell.row, cell.col, value)) {
            Ok(CellWrite::Written { previous }) => {
                let key = self.state.schema().columns()[cell.col].key.clone();
                let mut batch = ChangeBatch::new();
                batch.record(cell.row, &key, previous);
                ops::refresh_rows(&mut self.state, &batch);
                self.emit_changes(batch);
                true
            }
            Ok(CellWrite::Rejected(err)) => {
                verbose!(self, "edit at ({}, {}) rejected: {}", cell.row, cell.col, err);
                true
            }
            Ok(CellWrite::Unchanged) | Err(_) => true,
        }
    }

    /// Open the editor on `cell` unless it is disabled.
    pub(crate) fn activate_editor(&mut self, cell: CellCoords) -> bool {
        if self.state.is_cell_disabled(cell.row, cell.col) {
            return false;
        }
        let (Some(value), Some(column)) = (
            self.state.get_cell_value(cell.row, cell.col),
            self.state.column(cell.col),
        ) else {
            return false;
        };
        self.editor.activate(cell, value, column);
        true
    }
}
