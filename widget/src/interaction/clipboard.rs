//! Copy, paste, clear and row deletion.
//!
//! The copy buffer is internal: either one value or a rectangular matrix,
//! each tagged with the source column type(s) so paste can coerce across
//! column types.

use std::time::Instant;

use serde_json::Value;

use datagrid_core::{CellCoords, ColumnType, SelectionRange};
use datagrid_engine::ops::{clear_cells, paste_value, refresh_rows, PasteReport};
use datagrid_engine::{ChangeBatch, CopyBuffer};

use crate::grid::DataGrid;

/// One value headed for one target cell.
struct PasteItem {
    target: CellCoords,
    value: Value,
    source_type: ColumnType,
    source_col: usize,
}

impl DataGrid {
    /// Copy the selected range, or the active cell when there is no range.
    pub fn copy(&mut self) -> bool {
        if let Some(range) = self.multi_cell_range() {
            let rows = range.min_row()..=range.max_row();
            let cols: Vec<usize> = (range.min_col()..=range.max_col()).collect();

            let matrix: Vec<Vec<Value>> = rows
                .map(|r| {
                    cols.iter()
                        .map(|&c| self.state.get_cell_value(r, c).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            let column_types: Vec<ColumnType> = cols
                .iter()
                .filter_map(|&c| self.state.column(c).map(|def| def.column_type))
                .collect();

            if column_types.windows(2).any(|w| w[0] != w[1]) {
                let names: Vec<&str> = column_types.iter().map(ColumnType::as_str).collect();
                log::warn!("copied range mixes column types: {}", names.join(", "));
            }

            verbose!(self, "copied {}x{} range", matrix.len(), cols.len());
            return self.state.set_copy_buffer(Some(CopyBuffer::Range { matrix, column_types, source: range }));
        }

        let Some(cell) = self.state.active_cell() else {
            return false;
        };
        let (Some(value), Some(column)) = (self.state.get_cell_value(cell.row, cell.col), self.state.column(cell.col))
        else {
            return false;
        };
        let buffer = CopyBuffer::Single { value: value.clone(), column_type: column.column_type, source: cell };
        self.state.set_copy_buffer(Some(buffer))
    }

    pub fn paste(&mut self) -> bool {
        self.paste_at(Instant::now())
    }

    /// Paste the copy buffer into the current selection.
    ///
    /// Repeated pastes within the debounce window are dropped. Disabled
    /// targets and values that cannot be coerced are skipped; values that
    /// fail validation leave an error on the cell instead of being written.
    pub fn paste_at(&mut self, now: Instant) -> bool {
        let window = self.paste_window();
        if !self.interaction.accept_paste(now, window) {
            verbose!(self, "paste ignored inside debounce window");
            return false;
        }
        let Some(buffer) = self.state.copy_buffer().cloned() else {
            return false;
        };

        let mut changed = self.state.clear_transient_errors();
        let mut batch = ChangeBatch::new();
        let mut report = PasteReport::default();
        for item in self.paste_plan(&buffer) {
            let outcome = paste_value(
                &mut self.state,
                item.target,
                &item.value,
                item.source_type,
                Some(item.source_col),
                &mut batch,
            );
            report.add(outcome);
        }
        refresh_rows(&mut self.state, &batch);

        verbose!(
            self,
            "paste: {} written, {} unchanged, {} disabled, {} incompatible, {} rejected",
            report.written,
            report.unchanged,
            report.disabled,
            report.incompatible,
            report.rejected
        );
        changed |= report.rejected > 0;
        self.emit_changes(batch) | changed
    }

    /// Resolve target cells for the buffer:
    /// - range buffer + range selection: tile the matrix over the selection
    /// - range buffer + active cell: anchor the matrix there, clipped to the grid
    /// - single value: every cell of the range, or just the active cell
    fn paste_plan(&self, buffer: &CopyBuffer) -> Vec<PasteItem> {
        let (rows, cols) = (self.state.row_count(), self.state.col_count());
        let target_range = self.multi_cell_range().and_then(|r| r.clamp_to(rows, cols));
        let active = self.state.active_cell();

        match buffer {
            CopyBuffer::Range { matrix, column_types, source } => {
                let src_rows = matrix.len();
                let src_cols = column_types.len();
                if src_rows == 0 || src_cols == 0 {
                    return Vec::new();
                }
                let source_left = source.min_col();
                let item = |target: CellCoords, sr: usize, sc: usize| PasteItem {
                    target,
                    value: matrix[sr].get(sc).cloned().unwrap_or(Value::Null),
                    source_type: column_types[sc],
                    source_col: source_left + sc,
                };

                if let Some(range) = target_range {
                    range
                        .cells()
                        .map(|cell| {
                            let sr = (cell.row - range.min_row()) % src_rows;
                            let sc = (cell.col - range.min_col()) % src_cols;
                            item(cell, sr, sc)
                        })
                        .collect()
                } else if let Some(anchor) = active {
                    let mut items = Vec::new();
                    for sr in 0..src_rows {
                        for sc in 0..src_cols {
                            let target = CellCoords::new(anchor.row + sr, anchor.col + sc);
                            if target.row < rows && target.col < cols {
                                items.push(item(target, sr, sc));
                            }
                        }
                    }
                    items
                } else {
                    Vec::new()
                }
            }
            CopyBuffer::Single { value, column_type, source } => {
                let targets: Vec<CellCoords> = match (target_range, active) {
                    (Some(range), _) => range.cells().collect(),
                    (None, Some(cell)) => vec![cell],
                    (None, None) => Vec::new(),
                };
                targets
                    .into_iter()
                    .map(|target| PasteItem {
                        target,
                        value: value.clone(),
                        source_type: *column_type,
                        source_col: source.col,
                    })
                    .collect()
            }
        }
    }

    /// Write null into the selected cells (range, active cell or column).
    pub fn clear_selected_cells(&mut self) -> bool {
        let (rows, cols) = (self.state.row_count(), self.state.col_count());
        let targets: Vec<CellCoords> = if let Some(col) = self.state.selected_column() {
            (0..rows).map(|row| CellCoords::new(row, col)).collect()
        } else if let Some(range) = self.state.get_normalized_selection_range().and_then(|r| r.clamp_to(rows, cols)) {
            range.cells().collect()
        } else if let Some(cell) = self.state.active_cell() {
            vec![cell]
        } else {
            return false;
        };
        let batch = clear_cells(&mut self.state, targets);
        self.emit_changes(batch)
    }

    /// Delete every selected row.
    pub fn delete_selected_rows(&mut self) -> bool {
        let indices: Vec<usize> = self.state.selected_rows().iter().copied().collect();
        if indices.is_empty() {
            return false;
        }
        self.delete_rows(&indices).is_ok()
    }

    /// The selection range when it spans more than one cell.
    fn multi_cell_range(&self) -> Option<SelectionRange> {
        self.state.get_normalized_selection_range().filter(|r| !r.is_single())
    }
}
