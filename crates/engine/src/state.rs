//! The authoritative mutable grid state.
//!
//! `StateManager` owns the dataset, the per-cell disabled/error caches, the
//! selection families, the drag state, the copy buffer and the row/column
//! size tracks. Every mutator that can affect what is drawn reports whether
//! anything actually changed so callers can skip redundant redraws.
//!
//! Selection families are mutually exclusive: the active cell (with its
//! optional range), the selected rows, and the selected column. Setting a
//! non-empty value in one family clears the other two.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;

use datagrid_core::value::{empty_row, is_blank};
use datagrid_core::{CellCoords, ColumnDef, ColumnType, RowData, Schema, SelectionRange};

use crate::error::GridError;
use crate::events::DeletedRow;
use crate::sizes::SizeTrack;
use crate::validation::{validate, ValidationError};

/// Caller-supplied `(row_index, column_key, row_data) -> disabled`.
pub type DisabledPredicate = Box<dyn Fn(usize, &str, &RowData) -> bool>;

static NULL: Value = Value::Null;

/// A validation message attached to one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellError {
    pub message: String,
    /// Sticky errors survive new paste operations; only a successful write
    /// to the cell clears them.
    pub sticky: bool,
}

impl CellError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self { message: message.into(), sticky: false }
    }

    pub fn sticky(message: impl Into<String>) -> Self {
        Self { message: message.into(), sticky: true }
    }
}

/// The single in-progress pointer drag. Only one can exist at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Fill handle drag from `source`; `end_row` may be above or below it.
    Fill { source: CellCoords, end_row: usize },
    /// Column border drag; `last_x` is the last captured pointer x.
    ColumnResize { col: usize, last_x: f32 },
    /// Row border drag; `last_y` is the last captured pointer y.
    RowResize { row: usize, last_y: f32 },
    /// Range selection drag; `start` is fixed.
    RangeSelect { start: CellCoords, end: CellCoords },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, DragState::ColumnResize { .. } | DragState::RowResize { .. })
    }

    pub fn is_filling(&self) -> bool {
        matches!(self, DragState::Fill { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Fill { .. } => "fill",
            DragState::ColumnResize { .. } => "column-resize",
            DragState::RowResize { .. } => "row-resize",
            DragState::RangeSelect { .. } => "range-select",
        }
    }

    fn same_kind(&self, other: &DragState) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Values captured by copy.
#[derive(Debug, Clone, PartialEq)]
pub enum CopyBuffer {
    Single {
        value: Value,
        column_type: ColumnType,
        source: CellCoords,
    },
    Range {
        /// Row-major values of the normalized source range.
        matrix: Vec<Vec<Value>>,
        /// Source column type per matrix column.
        column_types: Vec<ColumnType>,
        source: SelectionRange,
    },
}

impl CopyBuffer {
    /// The copied cells, for the dashed outline.
    pub fn source_range(&self) -> SelectionRange {
        match self {
            CopyBuffer::Single { source, .. } => SelectionRange::single(*source),
            CopyBuffer::Range { source, .. } => source.normalized(),
        }
    }
}

/// Outcome of a validated single-cell write.
#[derive(Debug, Clone, PartialEq)]
pub enum CellWrite {
    Written { previous: Value },
    /// Value equal to the stored one; nothing to record.
    Unchanged,
    /// Refused; the cell now carries an error overlay.
    Rejected(ValidationError),
}

struct GridRow {
    data: RowData,
    disabled: Vec<bool>,
    errors: Vec<Option<CellError>>,
}

impl GridRow {
    fn new(data: RowData, cols: usize) -> Self {
        Self { data, disabled: vec![false; cols], errors: vec![None; cols] }
    }
}

pub struct StateManager {
    schema: Schema,
    rows: Vec<GridRow>,
    predicate: Option<DisabledPredicate>,

    active_cell: Option<CellCoords>,
    selection_range: Option<SelectionRange>,
    selected_rows: BTreeSet<usize>,
    last_clicked_row: Option<usize>,
    selected_column: Option<usize>,

    drag: DragState,
    copy_buffer: Option<CopyBuffer>,

    column_widths: SizeTrack,
    row_heights: SizeTrack,
}

impl fmt::Debug for StateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("columns", &self.schema.len())
            .field("rows", &self.rows.len())
            .field("active_cell", &self.active_cell)
            .field("selection_range", &self.selection_range)
            .field("selected_rows", &self.selected_rows)
            .field("selected_column", &self.selected_column)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl StateManager {
    pub fn new(
        schema: Schema,
        default_column_width: f32,
        default_row_height: f32,
        predicate: Option<DisabledPredicate>,
    ) -> Self {
        let cols = schema.len();
        Self {
            schema,
            rows: Vec::new(),
            predicate,
            active_cell: None,
            selection_range: None,
            selected_rows: BTreeSet::new(),
            last_clicked_row: None,
            selected_column: None,
            drag: DragState::Idle,
            copy_buffer: None,
            column_widths: SizeTrack::new(default_column_width, cols),
            row_heights: SizeTrack::new(default_row_height, 0),
        }
    }

    // =========================================================================
    // Schema / bounds
    // =========================================================================

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column(&self, col: usize) -> Option<&ColumnDef> {
        self.schema.column(col)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.schema.len()
    }

    pub fn check_cell(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.rows.len() {
            return Err(GridError::RowOutOfRange { row, rows: self.rows.len() });
        }
        if col >= self.schema.len() {
            return Err(GridError::ColumnOutOfRange { col, cols: self.schema.len() });
        }
        Ok(())
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the dataset. Rebuilds every disabled flag, drops all cell
    /// errors and resets selection, drag, copy buffer and row heights.
    /// Column widths persist.
    pub fn load_data(&mut self, rows: Vec<RowData>) {
        let cols = self.schema.len();
        self.rows = rows.into_iter().map(|data| GridRow::new(data, cols)).collect();
        self.row_heights.reset(self.rows.len());
        self.clear_interaction_state();
        self.rebuild_disabled_cache();
    }

    /// Current dataset without internal caches.
    pub fn data(&self) -> Vec<RowData> {
        self.rows.iter().map(|r| r.data.clone()).collect()
    }

    pub fn row(&self, row: usize) -> Option<&RowData> {
        self.rows.get(row).map(|r| &r.data)
    }

    /// `None` when out of range; a missing key reads as null.
    pub fn get_cell_value(&self, row: usize, col: usize) -> Option<&Value> {
        let key = &self.schema.column(col)?.key;
        let data = &self.rows.get(row)?.data;
        Some(data.get(key).unwrap_or(&NULL))
    }

    /// Write a value without validation and return the previous one.
    ///
    /// Clears the cell's error. The disabled cache is not refreshed; callers
    /// must run [`Self::update_disabled_states_for_row`] before relying on it.
    pub fn update_cell_internal(&mut self, row: usize, col: usize, value: Value) -> Result<Value, GridError> {
        self.check_cell(row, col)?;
        let key = self.schema.columns()[col].key.clone();
        let grid_row = &mut self.rows[row];
        grid_row.errors[col] = None;
        let previous = grid_row.data.insert(key, value).unwrap_or(Value::Null);
        Ok(previous)
    }

    /// Validate then write.
    ///
    /// On failure the cell gets a transient error, or a sticky one when a
    /// required value is missing and the cell was already empty.
    pub fn write_validated(&mut self, row: usize, col: usize, value: Value) -> Result<CellWrite, GridError> {
        self.check_cell(row, col)?;
        let column = &self.schema.columns()[col];
        let current = self.rows[row].data.get(&column.key).unwrap_or(&NULL);

        if let Err(err) = validate(column, &value) {
            let error = if err.is_required_empty() && is_blank(current) {
                CellError::sticky(err.to_string())
            } else {
                CellError::transient(err.to_string())
            };
            self.rows[row].errors[col] = Some(error);
            return Ok(CellWrite::Rejected(err));
        }

        if *current == value {
            self.rows[row].errors[col] = None;
            return Ok(CellWrite::Unchanged);
        }

        let previous = self.update_cell_internal(row, col, value)?;
        Ok(CellWrite::Written { previous })
    }

    // =========================================================================
    // Disabled cache
    // =========================================================================

    pub fn is_cell_disabled(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.disabled.get(col).copied())
            .unwrap_or(false)
    }

    /// Re-evaluate the predicate for every column of `row`.
    /// Returns true if any flag flipped.
    pub fn update_disabled_states_for_row(&mut self, row: usize) -> bool {
        let Some(predicate) = self.predicate.as_ref() else {
            return false;
        };
        let Some(grid_row) = self.rows.get_mut(row) else {
            return false;
        };

        let mut changed = false;
        for (col, column) in self.schema.columns().iter().enumerate() {
            let disabled = predicate(row, &column.key, &grid_row.data);
            if grid_row.disabled[col] != disabled {
                grid_row.disabled[col] = disabled;
                changed = true;
            }
        }
        changed
    }

    pub fn rebuild_disabled_cache(&mut self) {
        for row in 0..self.rows.len() {
            if self.predicate.is_none() {
                self.rows[row].disabled.fill(false);
            } else {
                self.update_disabled_states_for_row(row);
            }
        }
    }

    pub fn set_disabled_predicate(&mut self, predicate: Option<DisabledPredicate>) {
        self.predicate = predicate;
        self.rebuild_disabled_cache();
    }

    // =========================================================================
    // Error overlays
    // =========================================================================

    pub fn cell_error(&self, row: usize, col: usize) -> Option<&CellError> {
        self.rows.get(row)?.errors.get(col)?.as_ref()
    }

    pub fn set_cell_error(&mut self, row: usize, col: usize, error: CellError) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.errors.get_mut(col)) {
            Some(slot) if slot.as_ref() != Some(&error) => {
                *slot = Some(error);
                true
            }
            _ => false,
        }
    }

    pub fn clear_cell_error(&mut self, row: usize, col: usize) -> bool {
        self.rows
            .get_mut(row)
            .and_then(|r| r.errors.get_mut(col))
            .and_then(Option::take)
            .is_some()
    }

    /// Drop every non-sticky error.
    pub fn clear_transient_errors(&mut self) -> bool {
        let mut changed = false;
        for slot in self.rows.iter_mut().flat_map(|r| r.errors.iter_mut()) {
            if slot.as_ref().is_some_and(|e| !e.sticky) {
                *slot = None;
                changed = true;
            }
        }
        changed
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn active_cell(&self) -> Option<CellCoords> {
        self.active_cell
    }

    pub fn selection_range(&self) -> Option<SelectionRange> {
        self.selection_range
    }

    pub fn selected_rows(&self) -> &BTreeSet<usize> {
        &self.selected_rows
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selected_rows.contains(&row)
    }

    pub fn last_clicked_row(&self) -> Option<usize> {
        self.last_clicked_row
    }

    pub fn selected_column(&self) -> Option<usize> {
        self.selected_column
    }

    fn clear_row_family(&mut self) -> bool {
        let changed = !self.selected_rows.is_empty() || self.last_clicked_row.is_some();
        self.selected_rows.clear();
        self.last_clicked_row = None;
        changed
    }

    fn clear_cell_family(&mut self) -> bool {
        let changed = self.active_cell.is_some() || self.selection_range.is_some();
        self.active_cell = None;
        self.selection_range = None;
        changed
    }

    fn clear_column_family(&mut self) -> bool {
        self.selected_column.take().is_some()
    }

    /// Setting a cell clears rows and column; `None` also drops the range.
    pub fn set_active_cell(&mut self, cell: Option<CellCoords>) -> bool {
        match cell {
            Some(cell) => {
                let mut changed = self.active_cell != Some(cell);
                self.active_cell = Some(cell);
                changed |= self.clear_row_family();
                changed |= self.clear_column_family();
                changed
            }
            None => self.clear_cell_family(),
        }
    }

    /// Active cell with no range.
    pub fn select_single_cell(&mut self, cell: CellCoords) -> bool {
        let changed = self.set_active_cell(Some(cell));
        changed | self.selection_range.take().is_some()
    }

    pub fn set_selection_range(&mut self, range: Option<SelectionRange>) -> bool {
        let mut changed = self.selection_range != range;
        if range.is_some() {
            changed |= self.clear_row_family();
            changed |= self.clear_column_family();
        }
        self.selection_range = range;
        changed
    }

    /// Replace the row selection. An empty set only clears the row family.
    pub fn set_selected_rows(&mut self, rows: BTreeSet<usize>, last_clicked: Option<usize>) -> bool {
        let mut changed = self.selected_rows != rows || self.last_clicked_row != last_clicked;
        if !rows.is_empty() {
            changed |= self.clear_cell_family();
            changed |= self.clear_column_family();
        }
        self.selected_rows = rows;
        self.last_clicked_row = last_clicked;
        changed
    }

    pub fn set_selected_column(&mut self, col: Option<usize>) -> bool {
        let mut changed = self.selected_column != col;
        if col.is_some() {
            changed |= self.clear_cell_family();
            changed |= self.clear_row_family();
        }
        self.selected_column = col;
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let mut changed = self.clear_cell_family();
        changed |= self.clear_row_family();
        changed |= self.clear_column_family();
        changed
    }

    pub fn get_normalized_selection_range(&self) -> Option<SelectionRange> {
        self.selection_range.map(|r| r.normalized())
    }

    // =========================================================================
    // Drag / copy buffer
    // =========================================================================

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Start a drag. Refused unless no other drag is in progress.
    pub fn begin_drag(&mut self, drag: DragState) -> bool {
        if !self.drag.is_idle() || drag.is_idle() {
            return false;
        }
        self.drag = drag;
        true
    }

    /// Replace the in-progress drag with an updated one of the same kind.
    pub fn update_drag(&mut self, drag: DragState) -> bool {
        if !self.drag.same_kind(&drag) || self.drag == drag {
            return false;
        }
        self.drag = drag;
        true
    }

    /// End the drag, returning its final state.
    pub fn end_drag(&mut self) -> DragState {
        std::mem::take(&mut self.drag)
    }

    pub fn copy_buffer(&self) -> Option<&CopyBuffer> {
        self.copy_buffer.as_ref()
    }

    pub fn set_copy_buffer(&mut self, buffer: Option<CopyBuffer>) -> bool {
        if self.copy_buffer == buffer {
            return false;
        }
        self.copy_buffer = buffer;
        true
    }

    /// Clear selection, drag and copy buffer.
    pub fn clear_interaction_state(&mut self) -> bool {
        let mut changed = self.clear_selection();
        changed |= !self.end_drag().is_idle();
        changed |= self.copy_buffer.take().is_some();
        changed
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    pub fn column_widths(&self) -> &SizeTrack {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &SizeTrack {
        &self.row_heights
    }

    pub fn column_width(&self, col: usize) -> Option<f32> {
        self.column_widths.get(col)
    }

    pub fn row_height(&self, row: usize) -> Option<f32> {
        self.row_heights.get(row)
    }

    /// Store an already-clamped width. Returns whether it changed.
    pub fn set_column_width(&mut self, col: usize, width: f32) -> Result<bool, GridError> {
        if col >= self.column_widths.len() {
            return Err(GridError::ColumnOutOfRange { col, cols: self.column_widths.len() });
        }
        Ok(self.column_widths.set(col, width))
    }

    pub fn set_row_height(&mut self, row: usize, height: f32) -> Result<bool, GridError> {
        if row >= self.row_heights.len() {
            return Err(GridError::RowOutOfRange { row, rows: self.row_heights.len() });
        }
        Ok(self.row_heights.set(row, height))
    }

    // =========================================================================
    // Row structure
    // =========================================================================

    /// Insert a row at `at` (`at == row_count()` appends). Missing data
    /// becomes an empty row with every schema key set to null.
    ///
    /// Inserting before existing rows shifts their indices, so selection,
    /// drag and copy buffer are cleared in that case.
    pub fn insert_row(&mut self, at: usize, data: Option<RowData>) -> Result<usize, GridError> {
        if at > self.rows.len() {
            return Err(GridError::RowOutOfRange { row: at, rows: self.rows.len() });
        }
        let data = data.unwrap_or_else(|| empty_row(self.schema.keys()));
        let shifts = at < self.rows.len();

        self.rows.insert(at, GridRow::new(data, self.schema.len()));
        if shifts {
            self.row_heights.insert(at);
            self.clear_interaction_state();
        } else {
            self.row_heights.push();
        }
        self.update_disabled_states_for_row(at);
        Ok(at)
    }

    pub fn append_row(&mut self, data: Option<RowData>) -> usize {
        let at = self.rows.len();
        self.rows.push(GridRow::new(data.unwrap_or_else(|| empty_row(self.schema.keys())), self.schema.len()));
        self.row_heights.push();
        self.update_disabled_states_for_row(at);
        at
    }

    /// Drop the last row without touching selection or the copy buffer.
    /// Undoes an `append_row` that turned out to be unneeded.
    pub fn pop_row(&mut self) -> Option<RowData> {
        let grid_row = self.rows.pop()?;
        self.row_heights.remove(self.rows.len());
        Some(grid_row.data)
    }

    /// Remove rows by index. Duplicates are ignored; any out-of-range index
    /// rejects the whole call.
    ///
    /// Rows are removed in descending order so pending indices stay valid.
    /// Returns the removed rows in ascending original-index order.
    pub fn remove_rows(&mut self, indices: &[usize]) -> Result<Vec<DeletedRow>, GridError> {
        if let Some(&row) = indices.iter().find(|&&i| i >= self.rows.len()) {
            return Err(GridError::RowOutOfRange { row, rows: self.rows.len() });
        }
        let unique: BTreeSet<usize> = indices.iter().copied().collect();

        let mut removed = Vec::with_capacity(unique.len());
        for &row_index in unique.iter().rev() {
            let grid_row = self.rows.remove(row_index);
            self.row_heights.remove(row_index);
            removed.push(DeletedRow { row_index, row_data: grid_row.data });
        }
        removed.reverse();

        if !removed.is_empty() {
            self.clear_interaction_state();
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("name", ColumnType::Text).with_label("Name").required(),
            ColumnDef::new("locked", ColumnType::Boolean),
            ColumnDef::new("qty", ColumnType::Number),
        ])
        .unwrap()
    }

    fn row(v: serde_json::Value) -> RowData {
        serde_json::from_value(v).unwrap()
    }

    /// `qty` is disabled whenever `locked` is true.
    fn locked_predicate() -> DisabledPredicate {
        Box::new(|_, key, data| key == "qty" && data.get("locked") == Some(&json!(true)))
    }

    fn state_with_rows(n: usize) -> StateManager {
        let mut state = StateManager::new(schema(), 100.0, 28.0, Some(locked_predicate()));
        let rows = (0..n)
            .map(|i| row(json!({"name": format!("r{i}"), "locked": false, "qty": i})))
            .collect();
        state.load_data(rows);
        state
    }

    fn families_set(state: &StateManager) -> usize {
        let cell = state.active_cell().is_some() || state.selection_range().is_some();
        let rows = !state.selected_rows().is_empty();
        let col = state.selected_column().is_some();
        [cell, rows, col].iter().filter(|b| **b).count()
    }

    #[test]
    fn test_update_cell_returns_previous() {
        let mut state = state_with_rows(2);
        let prev = state.update_cell_internal(1, 2, json!(10)).unwrap();
        assert_eq!(prev, json!(1));
        assert_eq!(state.get_cell_value(1, 2), Some(&json!(10)));
        assert!(state.update_cell_internal(5, 0, json!(1)).is_err());
        assert!(state.update_cell_internal(0, 9, json!(1)).is_err());
    }

    #[test]
    fn test_missing_key_reads_null() {
        let mut state = StateManager::new(schema(), 100.0, 28.0, None);
        state.load_data(vec![row(json!({"name": "x"}))]);
        assert_eq!(state.get_cell_value(0, 2), Some(&Value::Null));
        assert_eq!(state.get_cell_value(1, 0), None);
    }

    #[test]
    fn test_disabled_cache_refresh() {
        let mut state = state_with_rows(2);
        assert!(!state.is_cell_disabled(0, 2));

        state.update_cell_internal(0, 1, json!(true)).unwrap();
        // Not recomputed lazily
        assert!(!state.is_cell_disabled(0, 2));
        assert!(state.update_disabled_states_for_row(0));
        assert!(state.is_cell_disabled(0, 2));
        assert!(!state.is_cell_disabled(0, 0));
        assert!(!state.update_disabled_states_for_row(0));
    }

    #[test]
    fn test_write_validated_errors() {
        let mut state = state_with_rows(1);

        // Required cleared on a non-empty cell: transient
        match state.write_validated(0, 0, Value::Null).unwrap() {
            CellWrite::Rejected(err) => assert!(err.is_required_empty()),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(state.get_cell_value(0, 0), Some(&json!("r0")));
        assert!(!state.cell_error(0, 0).unwrap().sticky);
        assert_eq!(state.cell_error(0, 0).unwrap().message, "Name is required");

        // Successful write clears it
        assert_eq!(
            state.write_validated(0, 0, json!("ok")).unwrap(),
            CellWrite::Written { previous: json!("r0") }
        );
        assert!(state.cell_error(0, 0).is_none());
        assert_eq!(state.write_validated(0, 0, json!("ok")).unwrap(), CellWrite::Unchanged);
    }

    #[test]
    fn test_sticky_error_survives_transient_clear() {
        let mut state = StateManager::new(schema(), 100.0, 28.0, None);
        state.load_data(vec![row(json!({"name": null})), row(json!({"name": "b"}))]);

        state.write_validated(0, 0, json!("")).unwrap();
        state.write_validated(1, 0, json!("")).unwrap();
        assert!(state.cell_error(0, 0).unwrap().sticky);
        assert!(!state.cell_error(1, 0).unwrap().sticky);

        assert!(state.clear_transient_errors());
        assert!(state.cell_error(0, 0).is_some());
        assert!(state.cell_error(1, 0).is_none());

        state.write_validated(0, 0, json!("filled")).unwrap();
        assert!(state.cell_error(0, 0).is_none());
    }

    #[test]
    fn test_selection_exclusivity() {
        let mut state = state_with_rows(3);
        assert!(state.set_active_cell(Some(CellCoords::new(1, 1))));
        assert!(state.set_selection_range(Some(SelectionRange::new((1, 1).into(), (2, 2).into()))));
        assert_eq!(families_set(&state), 1);

        assert!(state.set_selected_rows([0, 2].into_iter().collect(), Some(2)));
        assert!(state.active_cell().is_none());
        assert!(state.selection_range().is_none());
        assert_eq!(families_set(&state), 1);

        assert!(state.set_selected_column(Some(1)));
        assert!(state.selected_rows().is_empty());
        assert!(state.last_clicked_row().is_none());
        assert!(!state.set_selected_column(Some(1)));

        assert!(state.set_active_cell(Some(CellCoords::new(0, 0))));
        assert!(state.selected_column().is_none());
        assert!(state.clear_selection());
        assert!(!state.clear_selection());
    }

    #[test]
    fn test_normalized_range() {
        let mut state = state_with_rows(3);
        assert!(state.get_normalized_selection_range().is_none());
        state.set_selection_range(Some(SelectionRange::new((2, 2).into(), (0, 1).into())));
        let n = state.get_normalized_selection_range().unwrap();
        assert_eq!(n.start, CellCoords::new(0, 1));
        assert_eq!(n.end, CellCoords::new(2, 2));
        // Stored form is untouched
        assert_eq!(state.selection_range().unwrap().start, CellCoords::new(2, 2));
    }

    #[test]
    fn test_drag_exclusive() {
        let mut state = state_with_rows(3);
        let fill = DragState::Fill { source: CellCoords::new(0, 0), end_row: 0 };
        assert!(state.begin_drag(fill.clone()));
        assert!(!state.begin_drag(DragState::ColumnResize { col: 0, last_x: 10.0 }));
        assert!(!state.update_drag(DragState::RowResize { row: 0, last_y: 1.0 }));
        assert!(!state.update_drag(fill.clone()));
        assert!(state.update_drag(DragState::Fill { source: CellCoords::new(0, 0), end_row: 2 }));
        assert_eq!(state.end_drag(), DragState::Fill { source: CellCoords::new(0, 0), end_row: 2 });
        assert!(state.drag().is_idle());
        assert!(!state.begin_drag(DragState::Idle));
    }

    #[test]
    fn test_remove_rows_descending() {
        let mut state = state_with_rows(3);
        state.set_row_height(2, 50.0).unwrap();
        state.set_selected_rows([0, 2].into_iter().collect(), Some(2));

        let removed = state.remove_rows(&[2, 0, 2]).unwrap();
        assert_eq!(removed.iter().map(|d| d.row_index).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(removed[1].row_data["name"], json!("r2"));
        assert_eq!(state.row_count(), 1);
        assert_eq!(state.row(0).unwrap()["name"], json!("r1"));
        assert_eq!(state.row_heights().len(), 1);
        assert_eq!(state.row_height(0), Some(28.0));
        assert!(state.selected_rows().is_empty());

        assert!(state.remove_rows(&[0, 4]).is_err());
        assert_eq!(state.row_count(), 1);
    }

    #[test]
    fn test_insert_row_keeps_heights_aligned() {
        let mut state = state_with_rows(2);
        state.set_row_height(1, 60.0).unwrap();
        state.set_active_cell(Some(CellCoords::new(1, 0)));

        assert_eq!(state.insert_row(0, None).unwrap(), 0);
        assert_eq!(state.row_count(), 3);
        assert_eq!(state.row(0).unwrap()["name"], Value::Null);
        assert_eq!(state.row_height(2), Some(60.0));
        assert!(state.active_cell().is_none());

        let at = state.append_row(Some(row(json!({"name": "tail", "locked": true}))));
        assert_eq!(at, 3);
        assert!(state.is_cell_disabled(3, 2));
        assert!(state.insert_row(9, None).is_err());
    }

    #[test]
    fn test_load_data_resets_interaction() {
        let mut state = state_with_rows(3);
        state.set_active_cell(Some(CellCoords::new(0, 0)));
        state.set_copy_buffer(Some(CopyBuffer::Single {
            value: json!("x"),
            column_type: ColumnType::Text,
            source: CellCoords::new(0, 0),
        }));
        state.set_row_height(0, 99.0).unwrap();
        state.set_column_width(1, 150.0).unwrap();

        state.load_data(vec![row(json!({"name": "a", "locked": true}))]);
        assert!(state.active_cell().is_none());
        assert!(state.copy_buffer().is_none());
        assert_eq!(state.row_height(0), Some(28.0));
        assert_eq!(state.column_width(1), Some(150.0));
        assert!(state.is_cell_disabled(0, 2));
    }

    #[derive(Debug, Clone)]
    enum SelOp {
        Cell(usize, usize),
        Range(usize, usize, usize, usize),
        Rows(Vec<usize>),
        Column(usize),
        ClearCell,
        Clear,
    }

    fn sel_op() -> impl Strategy<Value = SelOp> {
        prop_oneof![
            (0usize..5, 0usize..3).prop_map(|(r, c)| SelOp::Cell(r, c)),
            (0usize..5, 0usize..3, 0usize..5, 0usize..3).prop_map(|(a, b, c, d)| SelOp::Range(a, b, c, d)),
            proptest::collection::vec(0usize..5, 0..4).prop_map(SelOp::Rows),
            (0usize..3).prop_map(SelOp::Column),
            Just(SelOp::ClearCell),
            Just(SelOp::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_selection_families_exclusive(ops in proptest::collection::vec(sel_op(), 1..30)) {
            let mut state = state_with_rows(5);
            for op in ops {
                match op {
                    SelOp::Cell(r, c) => { state.set_active_cell(Some(CellCoords::new(r, c))); }
                    SelOp::Range(a, b, c, d) => {
                        state.set_active_cell(Some(CellCoords::new(a, b)));
                        state.set_selection_range(Some(SelectionRange::new((a, b).into(), (c, d).into())));
                    }
                    SelOp::Rows(rows) => {
                        let last = rows.last().copied();
                        state.set_selected_rows(rows.into_iter().collect(), last);
                    }
                    SelOp::Column(c) => { state.set_selected_column(Some(c)); }
                    SelOp::ClearCell => { state.set_active_cell(None); }
                    SelOp::Clear => { state.clear_selection(); }
                }
                prop_assert!(families_set(&state) <= 1);
            }
        }

        #[test]
        fn prop_disabled_cache_matches_predicate(
            writes in proptest::collection::vec((0usize..4, any::<bool>()), 1..20)
        ) {
            let mut state = state_with_rows(4);
            for (r, locked) in writes {
                state.update_cell_internal(r, 1, json!(locked)).unwrap();
                state.update_disabled_states_for_row(r);
                for c in 0..state.col_count() {
                    let key = state.column(c).unwrap().key.clone();
                    let expected = key == "qty" && locked;
                    prop_assert_eq!(state.is_cell_disabled(r, c), expected);
                }
            }
        }
    }
}
