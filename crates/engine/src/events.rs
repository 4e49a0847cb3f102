//! Change notifications emitted after committed writes.
//!
//! Every interactive bulk operation (fill, paste, clear, undo) collects its
//! writes into one [`ChangeBatch`] and emits a single ordered list of
//! [`ChangeRecord`]s once all disabled-state caches are refreshed.

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;

use datagrid_core::RowData;

use crate::state::StateManager;

/// One row touched by a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub row_index: usize,
    /// Affected column keys, in write order.
    pub columns: Vec<String>,
    /// Full row data after the batch.
    pub row_data: RowData,
    /// Values of the affected keys before the batch.
    pub previous: RowData,
}

/// A row removed by deletion, captured before indices are renumbered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedRow {
    pub row_index: usize,
    pub row_data: RowData,
}

/// Serialized as `{"type": ..., "data": ...}` for hosts that forward events
/// out of process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GridEvent {
    CellsChanged(Vec<ChangeRecord>),
    RowsDeleted(Vec<DeletedRow>),
    #[serde(rename_all = "camelCase")]
    RowAdded { row_index: usize },
}

/// Accumulates writes; rows keep first-touch order, keys keep the earliest
/// previous value so repeated writes to one cell still undo to the original.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    rows: Vec<(usize, Vec<(String, Value)>)>,
    index: FxHashMap<usize, usize>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: usize, key: &str, previous: Value) {
        let slot = *self.index.entry(row).or_insert_with(|| {
            self.rows.push((row, Vec::new()));
            self.rows.len() - 1
        });
        let cells = &mut self.rows[slot].1;
        if !cells.iter().any(|(k, _)| k == key) {
            cells.push((key.to_string(), previous));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct cells written.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|(_, cells)| cells.len()).sum()
    }

    /// Affected rows in first-touch order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(|(row, _)| *row)
    }

    /// Snapshot current row data into change records.
    pub fn finish(self, state: &StateManager) -> Vec<ChangeRecord> {
        self.rows
            .into_iter()
            .filter_map(|(row_index, cells)| {
                let row_data = state.row(row_index)?.clone();
                let columns = cells.iter().map(|(k, _)| k.clone()).collect();
                let previous = cells.into_iter().collect();
                Some(ChangeRecord { row_index, columns, row_data, previous })
            })
            .collect()
    }
}

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsChanged batches.
    pub fn change_batches(&self) -> Vec<&[ChangeRecord]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::CellsChanged(c) => Some(c.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Filter to only RowsDeleted batches.
    pub fn deletions(&self) -> Vec<&[DeletedRow]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::RowsDeleted(d) => Some(d.as_slice()),
                _ => None,
            })
            .collect()
    }
}
