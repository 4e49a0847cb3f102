//! Recording collaborators and fixtures shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use datagrid_config::GridSettings;
use datagrid_core::{CellCoords, ColumnDef, ColumnType, Rect, RowData, Schema, SelectOption};
use datagrid_engine::{ChangeRecord, EventCollector};
use datagrid_widget::{
    Cursor, DataGrid, EditingManager, GridConfig, HistoryManager, PendingEdit, PointerEvent, ViewportAdapter,
};
use serde_json::{json, Value};

// Default layout: header 32, gutter 50, columns 100 wide, rows 28 tall.
pub const HEADER: f32 = 32.0;
pub const GUTTER: f32 = 50.0;
pub const COL_W: f32 = 100.0;
pub const ROW_H: f32 = 28.0;

// ============================================================================
// Viewport
// ============================================================================

#[derive(Debug)]
pub struct ViewportLog {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub width: f32,
    pub height: f32,
    pub max_scroll_left: f32,
    pub max_scroll_top: f32,
    pub cursors: Vec<Cursor>,
}

#[derive(Clone)]
pub struct MockViewport(pub Rc<RefCell<ViewportLog>>);

impl MockViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Rc::new(RefCell::new(ViewportLog {
            scroll_left: 0.0,
            scroll_top: 0.0,
            width,
            height,
            max_scroll_left: 10_000.0,
            max_scroll_top: 10_000.0,
            cursors: Vec::new(),
        })))
    }
}

impl ViewportAdapter for MockViewport {
    fn scroll_left(&self) -> f32 {
        self.0.borrow().scroll_left
    }
    fn scroll_top(&self) -> f32 {
        self.0.borrow().scroll_top
    }
    fn set_scroll_left(&mut self, x: f32) {
        let mut log = self.0.borrow_mut();
        log.scroll_left = x.clamp(0.0, log.max_scroll_left);
    }
    fn set_scroll_top(&mut self, y: f32) {
        let mut log = self.0.borrow_mut();
        log.scroll_top = y.clamp(0.0, log.max_scroll_top);
    }
    fn bounding_rect(&self) -> Rect {
        let log = self.0.borrow();
        Rect::new(0.0, 0.0, log.width, log.height)
    }
    fn set_cursor(&mut self, cursor: Cursor) {
        self.0.borrow_mut().cursors.push(cursor);
    }
    fn can_scroll_left(&self) -> bool {
        self.0.borrow().scroll_left > 0.0
    }
    fn can_scroll_right(&self) -> bool {
        let log = self.0.borrow();
        log.scroll_left < log.max_scroll_left
    }
    fn can_scroll_up(&self) -> bool {
        self.0.borrow().scroll_top > 0.0
    }
    fn can_scroll_down(&self) -> bool {
        let log = self.0.borrow();
        log.scroll_top < log.max_scroll_top
    }
}

// ============================================================================
// Editor
// ============================================================================

#[derive(Debug, Default)]
pub struct EditorLog {
    pub active: Option<CellCoords>,
    /// Value the "user" typed; handed back on a saving deactivate.
    pub typed: Option<Value>,
    pub activations: Vec<CellCoords>,
    pub deactivations: Vec<bool>,
    pub dropdown_hidden: usize,
}

#[derive(Clone, Default)]
pub struct MockEditor(pub Rc<RefCell<EditorLog>>);

impl MockEditor {
    pub fn type_value(&self, value: Value) {
        self.0.borrow_mut().typed = Some(value);
    }

    pub fn active(&self) -> Option<CellCoords> {
        self.0.borrow().active
    }
}

impl EditingManager for MockEditor {
    fn is_active(&self) -> bool {
        self.0.borrow().active.is_some()
    }
    fn active_cell(&self) -> Option<CellCoords> {
        self.0.borrow().active
    }
    fn activate(&mut self, cell: CellCoords, _value: &Value, _column: &ColumnDef) {
        let mut log = self.0.borrow_mut();
        log.active = Some(cell);
        log.typed = None;
        log.activations.push(cell);
    }
    fn deactivate(&mut self, save: bool) -> Option<PendingEdit> {
        let mut log = self.0.borrow_mut();
        log.deactivations.push(save);
        let cell = log.active.take()?;
        let typed = log.typed.take();
        if save {
            typed.map(|value| PendingEdit { cell, value })
        } else {
            None
        }
    }
    fn hide_dropdown(&mut self) {
        self.0.borrow_mut().dropdown_hidden += 1;
    }
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Default)]
pub struct HistoryLog {
    pub batches: Vec<Vec<ChangeRecord>>,
    pub parent_update: bool,
}

#[derive(Clone, Default)]
pub struct MockHistory(pub Rc<RefCell<HistoryLog>>);

impl HistoryManager for MockHistory {
    fn record_changes(&mut self, batch: &[ChangeRecord]) {
        self.0.borrow_mut().batches.push(batch.to_vec());
    }
    fn is_parent_app_update(&self) -> bool {
        self.0.borrow().parent_update
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// name (required text), done (boolean), qty (number), email, status (select)
pub fn sample_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("name", ColumnType::Text).with_label("Name").required(),
        ColumnDef::new("done", ColumnType::Boolean).with_label("Done"),
        ColumnDef::new("qty", ColumnType::Number).with_label("Qty"),
        ColumnDef::new("email", ColumnType::Email).with_label("Email"),
        ColumnDef::new("status", ColumnType::Select)
            .with_label("Status")
            .with_options(vec![SelectOption::new("open", "Open"), SelectOption::new("closed", "Closed")]),
    ])
    .unwrap()
}

pub fn sample_rows(n: usize) -> Vec<RowData> {
    (0..n)
        .map(|i| {
            row(json!({
                "name": format!("row{i}"),
                "done": false,
                "qty": i,
                "email": null,
                "status": "open",
            }))
        })
        .collect()
}

pub fn row(value: Value) -> RowData {
    serde_json::from_value(value).unwrap()
}

/// All-text schema with `cols` columns named c0, c1, ...
pub fn text_schema(cols: usize) -> Schema {
    Schema::new((0..cols).map(|c| ColumnDef::new(format!("c{c}"), ColumnType::Text)).collect()).unwrap()
}

pub fn text_rows(rows: usize, cols: usize) -> Vec<RowData> {
    (0..rows)
        .map(|r| (0..cols).map(|c| (format!("c{c}"), json!(format!("r{r}c{c}")))).collect())
        .collect()
}

pub struct Harness {
    pub grid: DataGrid,
    pub viewport: MockViewport,
    pub editor: MockEditor,
    pub events: Rc<RefCell<EventCollector>>,
}

impl Harness {
    pub fn new(schema: Schema, rows: Vec<RowData>, config: GridConfig) -> Self {
        Self::build(schema, rows, config, None)
    }

    /// Grid whose history collaborator is `history` instead of the built-in one.
    pub fn with_history(schema: Schema, rows: Vec<RowData>, history: MockHistory) -> Self {
        Self::build(schema, rows, GridConfig::new(), Some(history))
    }

    fn build(schema: Schema, rows: Vec<RowData>, config: GridConfig, history: Option<MockHistory>) -> Self {
        let viewport = MockViewport::new(800.0, 600.0);
        let editor = MockEditor::default();
        let mut grid = DataGrid::new(schema, config, Box::new(viewport.clone())).with_editor(Box::new(editor.clone()));
        if let Some(history) = history {
            grid = grid.with_history(Box::new(history));
        }
        grid.load_data(rows);

        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = events.clone();
        grid.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));

        Self { grid, viewport, editor, events }
    }

    pub fn sample(rows: usize) -> Self {
        Self::new(sample_schema(), sample_rows(rows), GridConfig::new())
    }

    pub fn with_settings(schema: Schema, rows: Vec<RowData>, settings: GridSettings) -> Self {
        Self::new(schema, rows, GridConfig::new().with_settings(settings))
    }

    pub fn value(&self, row: usize, col: usize) -> Value {
        self.grid.state().get_cell_value(row, col).cloned().unwrap_or(Value::Null)
    }

    pub fn change_batches(&self) -> usize {
        self.events.borrow().change_batches().len()
    }

    pub fn click(&mut self, row: usize, col: usize) -> bool {
        let (x, y) = cell_center(row, col);
        let changed = self.grid.pointer_down(PointerEvent::new(x, y));
        self.grid.pointer_up(PointerEvent::new(x, y));
        changed
    }
}

/// Center of a data cell in content coordinates (default sizes, no scroll).
pub fn cell_center(row: usize, col: usize) -> (f32, f32) {
    (
        GUTTER + col as f32 * COL_W + COL_W / 2.0,
        HEADER + row as f32 * ROW_H + ROW_H / 2.0,
    )
}

pub fn gutter_point(row: usize) -> (f32, f32) {
    (GUTTER / 2.0, HEADER + row as f32 * ROW_H + ROW_H / 2.0)
}

pub fn header_point(col: usize) -> (f32, f32) {
    (GUTTER + col as f32 * COL_W + COL_W / 2.0, HEADER / 2.0)
}
