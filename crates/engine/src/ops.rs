//! Bulk cell operations shared by fill, paste, clear and undo.
//!
//! Each operation writes every value first, then refreshes the disabled
//! cache once per affected row, and hands back the [`ChangeBatch`] for the
//! caller to turn into one change notification.

use serde_json::Value;

use datagrid_core::{CellCoords, ColumnType};

use crate::coerce::coerce_from_type;
use crate::events::ChangeBatch;
use crate::state::{CellWrite, StateManager};

/// What happened to one pasted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteCell {
    Written,
    Unchanged,
    SkippedDisabled,
    SkippedType,
    Rejected,
    OutOfBounds,
}

/// Per-operation tally, used for the debug trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasteReport {
    pub written: usize,
    pub unchanged: usize,
    pub disabled: usize,
    pub incompatible: usize,
    pub rejected: usize,
}

impl PasteReport {
    pub fn add(&mut self, outcome: PasteCell) {
        match outcome {
            PasteCell::Written => self.written += 1,
            PasteCell::Unchanged => self.unchanged += 1,
            PasteCell::SkippedDisabled => self.disabled += 1,
            PasteCell::SkippedType => self.incompatible += 1,
            PasteCell::Rejected => self.rejected += 1,
            PasteCell::OutOfBounds => {}
        }
    }
}

/// Copy the source cell's value into each target.
///
/// A target is skipped when it is the source itself, out of range, disabled,
/// or in a column whose type differs from the source column's. Values are
/// written without validation.
pub fn fill_cells(
    state: &mut StateManager,
    source: CellCoords,
    targets: impl IntoIterator<Item = CellCoords>,
) -> ChangeBatch {
    let mut batch = ChangeBatch::new();
    let (Some(value), Some(source_type)) = (
        state.get_cell_value(source.row, source.col).cloned(),
        state.column(source.col).map(|c| c.column_type),
    ) else {
        return batch;
    };

    for target in targets {
        if target == source || state.is_cell_disabled(target.row, target.col) {
            continue;
        }
        match state.column(target.col) {
            Some(col) if col.column_type == source_type => {}
            _ => continue,
        }
        if state.get_cell_value(target.row, target.col) == Some(&value) {
            continue;
        }
        if let Ok(previous) = state.update_cell_internal(target.row, target.col, value.clone()) {
            let key = state.schema().columns()[target.col].key.clone();
            batch.record(target.row, &key, previous);
        }
    }

    refresh_rows(state, &batch);
    batch
}

/// Paste one value into `target`: skip disabled cells, coerce across column
/// types, then validate and write. Does not refresh the disabled cache.
pub fn paste_value(
    state: &mut StateManager,
    target: CellCoords,
    value: &Value,
    source_type: ColumnType,
    source_col: Option<usize>,
    batch: &mut ChangeBatch,
) -> PasteCell {
    if state.check_cell(target.row, target.col).is_err() {
        return PasteCell::OutOfBounds;
    }
    if state.is_cell_disabled(target.row, target.col) {
        return PasteCell::SkippedDisabled;
    }

    let schema = state.schema();
    let target_col = &schema.columns()[target.col];
    let source_def = source_col.and_then(|c| schema.column(c));
    let Some(coerced) = coerce_from_type(value, source_type, source_def, target_col) else {
        return PasteCell::SkippedType;
    };
    let key = target_col.key.clone();

    match state.write_validated(target.row, target.col, coerced) {
        Ok(CellWrite::Written { previous }) => {
            batch.record(target.row, &key, previous);
            PasteCell::Written
        }
        Ok(CellWrite::Unchanged) => PasteCell::Unchanged,
        Ok(CellWrite::Rejected(_)) => PasteCell::Rejected,
        Err(_) => PasteCell::OutOfBounds,
    }
}

/// Write null to every non-disabled target.
pub fn clear_cells(state: &mut StateManager, targets: impl IntoIterator<Item = CellCoords>) -> ChangeBatch {
    let mut batch = ChangeBatch::new();
    for target in targets {
        if state.is_cell_disabled(target.row, target.col) {
            continue;
        }
        match state.get_cell_value(target.row, target.col) {
            Some(Value::Null) | None => continue,
            Some(_) => {}
        }
        if let Ok(previous) = state.update_cell_internal(target.row, target.col, Value::Null) {
            let key = state.schema().columns()[target.col].key.clone();
            batch.record(target.row, &key, previous);
        }
    }
    refresh_rows(state, &batch);
    batch
}

/// Write `(row, column key, value)` triples as-is, used to replay history.
/// Unknown rows or keys are skipped.
pub fn apply_values<'a>(
    state: &mut StateManager,
    values: impl IntoIterator<Item = (usize, &'a str, &'a Value)>,
) -> ChangeBatch {
    let mut batch = ChangeBatch::new();
    for (row, key, value) in values {
        let Some(col) = state.schema().index_of(key) else {
            log::debug!("replay skipped unknown column '{}'", key);
            continue;
        };
        match state.update_cell_internal(row, col, value.clone()) {
            Ok(previous) => batch.record(row, key, previous),
            Err(e) => log::debug!("replay skipped: {}", e),
        }
    }
    refresh_rows(state, &batch);
    batch
}

/// Re-run the disabled predicate once for each row in the batch.
pub fn refresh_rows(state: &mut StateManager, batch: &ChangeBatch) {
    for row in batch.rows() {
        state.update_disabled_states_for_row(row);
    }
}
