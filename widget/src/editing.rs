//! The inline editor collaborator.
//!
//! The editor widget itself (text input, dropdown) lives in the host. The
//! grid only drives its lifecycle. Deactivation hands the pending value back
//! instead of writing it, so the editor never holds a reference to the grid.

use serde_json::Value;

use datagrid_core::{CellCoords, ColumnDef};

/// Value typed into the editor, not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub cell: CellCoords,
    pub value: Value,
}

pub trait EditingManager {
    fn is_active(&self) -> bool;

    /// Cell the editor is covering, if open.
    fn active_cell(&self) -> Option<CellCoords>;

    /// Open the editor over `cell`, seeded with its current value.
    fn activate(&mut self, cell: CellCoords, value: &Value, column: &ColumnDef);

    /// Close the editor. With `save`, returns the edited value for the grid
    /// to validate and commit; `None` when nothing was open or it is discarded.
    fn deactivate(&mut self, save: bool) -> Option<PendingEdit>;

    fn hide_dropdown(&mut self);
}

/// Editor stand-in for hosts without inline editing.
#[derive(Debug, Default)]
pub struct NoopEditor;

impl EditingManager for NoopEditor {
    fn is_active(&self) -> bool {
        false
    }

    fn active_cell(&self) -> Option<CellCoords> {
        None
    }

    fn activate(&mut self, _cell: CellCoords, _value: &Value, _column: &ColumnDef) {}

    fn deactivate(&mut self, _save: bool) -> Option<PendingEdit> {
        None
    }

    fn hide_dropdown(&mut self) {}
}
