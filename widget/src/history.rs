//! Undo/Redo history for grid edits

use serde_json::Value;

use datagrid_engine::ChangeRecord;

/// The history collaborator. Receives every batched change notification.
pub trait HistoryManager {
    fn record_changes(&mut self, batch: &[ChangeRecord]);

    /// True while the host is applying its own non-interactive update;
    /// changes made meanwhile are not recorded.
    fn is_parent_app_update(&self) -> bool;

    fn undo(&mut self) -> Option<HistoryEntry> {
        None
    }

    fn redo(&mut self) -> Option<HistoryEntry> {
        None
    }

    /// Drop all entries, e.g. after the dataset is replaced.
    fn clear(&mut self) {}
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellChange {
    pub row: usize,
    pub key: String,
    pub old_value: Value,
    pub new_value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub changes: Vec<CellChange>,
}

impl HistoryEntry {
    pub fn from_records(records: &[ChangeRecord]) -> Self {
        let changes = records
            .iter()
            .flat_map(|record| {
                record.columns.iter().map(move |key| CellChange {
                    row: record.row_index,
                    key: key.clone(),
                    old_value: record.previous.get(key).cloned().unwrap_or(Value::Null),
                    new_value: record.row_data.get(key).cloned().unwrap_or(Value::Null),
                })
            })
            .filter(|c| c.old_value != c.new_value)
            .collect();
        Self { changes }
    }
}

pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: usize,
    parent_app_update: bool,
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: 100,
            parent_app_update: false,
        }
    }

    /// Record multiple cell changes as a single undoable operation
    pub fn record_batch(&mut self, changes: Vec<CellChange>) {
        if changes.is_empty() {
            return;
        }

        let entry = HistoryEntry { changes };
        self.push_entry(entry);
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    pub fn set_parent_app_update(&mut self, active: bool) {
        self.parent_app_update = active;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager for History {
    fn record_changes(&mut self, batch: &[ChangeRecord]) {
        self.record_batch(HistoryEntry::from_records(batch).changes);
    }

    fn is_parent_app_update(&self) -> bool {
        self.parent_app_update
    }

    /// Pop the last entry for undo, returns the changes to revert
    fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Pop from redo stack, returns the changes to re-apply
    fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
