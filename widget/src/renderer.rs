//! Frame drawing.
//!
//! The renderer only reads state. Draw order is fixed: background, header,
//! row-number gutter, cells, grid lines, then the overlays (copy outline,
//! active cell outline with fill handle, drag rectangle). Everything below
//! the header and right of the gutter is clipped to the body area.

use datagrid_config::{Color, FontSpec, Theme};
use datagrid_core::{CellCoords, ColumnType, Point, Rect, SelectionRange};
use datagrid_engine::format::format_cell;
use datagrid_engine::{DimensionCalculator, DragState, StateManager, ViewportMetrics, VisibleRange};

const CELL_PADDING: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// The 2D drawing target. Coordinates are viewport-relative.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32, style: LineStyle);
    fn line(&mut self, from: Point, to: Point, color: Color, width: f32);
    fn text(&mut self, text: &str, rect: Rect, font: &FontSpec, color: Color, align: TextAlign);
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);
}

/// Inputs for one frame.
pub struct Frame<'a> {
    pub state: &'a StateManager,
    pub dims: &'a DimensionCalculator,
    pub viewport: ViewportMetrics,
    /// Cell under the open editor, if any.
    pub editor_cell: Option<CellCoords>,
    pub fill_handle_size: f32,
}

impl Frame<'_> {
    fn to_view(&self, rect: Rect) -> Rect {
        rect.translate(-self.viewport.scroll_left, -self.viewport.scroll_top)
    }

    fn body(&self) -> Rect {
        let (gutter, header) = (self.dims.gutter_width(), self.dims.header_height());
        Rect::new(gutter, header, self.viewport.width - gutter, self.viewport.height - header)
    }
}

/// Bounding rectangle of a range, in content coordinates.
pub fn range_rect(state: &StateManager, dims: &DimensionCalculator, range: &SelectionRange) -> Option<Rect> {
    let range = range.normalized();
    let top_left = dims.cell_rect(state, range.start.row, range.start.col)?;
    let bottom_right = dims.cell_rect(state, range.end.row, range.end.col)?;
    Some(Rect::new(
        top_left.x,
        top_left.y,
        bottom_right.right() - top_left.x,
        bottom_right.bottom() - top_left.y,
    ))
}

/// Fill handle square centered on the cell's bottom-right corner, in content coordinates.
pub fn fill_handle_rect(state: &StateManager, dims: &DimensionCalculator, cell: CellCoords, size: f32) -> Option<Rect> {
    let rect = dims.cell_rect(state, cell.row, cell.col)?;
    Some(Rect::new(rect.right() - size / 2.0, rect.bottom() - size / 2.0, size, size))
}

pub struct Renderer {
    theme: Theme,
    date_format: String,
}

impl Renderer {
    pub fn new(theme: Theme, date_format: impl Into<String>) -> Self {
        Self { theme, date_format: date_format.into() }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn render(&self, surface: &mut dyn Surface, frame: &Frame) {
        let vp = frame.viewport;
        let visible = frame.dims.calculate_visible_range(frame.state, &vp);

        surface.fill_rect(Rect::new(0.0, 0.0, vp.width, vp.height), self.theme.colors.background);
        self.draw_header(surface, frame, &visible);
        self.draw_gutter(surface, frame, &visible);

        surface.push_clip(frame.body());
        self.draw_cells(surface, frame, &visible);
        self.draw_grid_lines(surface, frame, &visible);
        self.draw_overlays(surface, frame);
        surface.pop_clip();
    }

    fn draw_header(&self, surface: &mut dyn Surface, frame: &Frame, visible: &VisibleRange) {
        let colors = &self.theme.colors;
        let (gutter, header) = (frame.dims.gutter_width(), frame.dims.header_height());
        let strip = Rect::new(gutter, 0.0, frame.viewport.width - gutter, header);

        surface.fill_rect(Rect::new(0.0, 0.0, gutter, header), colors.header_bg);
        surface.fill_rect(strip, colors.header_bg);

        let Some(cols) = visible.cols else { return };
        surface.push_clip(strip);
        for col in cols.iter() {
            let (Some(def), Some(width)) = (frame.state.column(col), frame.state.column_width(col)) else {
                continue;
            };
            let x = frame.dims.column_left(frame.state, col) - frame.viewport.scroll_left;
            let rect = Rect::new(x, 0.0, width, header);
            if frame.state.selected_column() == Some(col) {
                surface.fill_rect(rect, colors.selected_column_bg);
            }
            surface.text(&def.label, rect.inflate(-CELL_PADDING), &self.theme.fonts.header, colors.header_text, TextAlign::Left);
            surface.line(Point::new(rect.right(), 0.0), Point::new(rect.right(), header), colors.gridline, 1.0);
        }
        surface.pop_clip();
        surface.line(Point::new(0.0, header), Point::new(frame.viewport.width, header), colors.gridline, 1.0);
    }

    fn draw_gutter(&self, surface: &mut dyn Surface, frame: &Frame, visible: &VisibleRange) {
        let colors = &self.theme.colors;
        let (gutter, header) = (frame.dims.gutter_width(), frame.dims.header_height());
        let strip = Rect::new(0.0, header, gutter, frame.viewport.height - header);
        surface.fill_rect(strip, colors.gutter_bg);

        let Some(rows) = visible.rows else { return };
        surface.push_clip(strip);
        for row in rows.iter() {
            let Some(height) = frame.state.row_height(row) else { continue };
            let y = frame.dims.row_top(frame.state, row) - frame.viewport.scroll_top;
            let rect = Rect::new(0.0, y, gutter, height);
            if frame.state.is_row_selected(row) {
                surface.fill_rect(rect, colors.selected_row_bg);
            }
            let label = (row + 1).to_string();
            surface.text(&label, rect, &self.theme.fonts.row_number, colors.gutter_text, TextAlign::Center);
            surface.line(Point::new(0.0, rect.bottom()), Point::new(gutter, rect.bottom()), colors.gridline, 1.0);
        }
        surface.pop_clip();
        surface.line(Point::new(gutter, header), Point::new(gutter, frame.viewport.height), colors.gridline, 1.0);
    }

    fn draw_cells(&self, surface: &mut dyn Surface, frame: &Frame, visible: &VisibleRange) {
        let (Some(rows), Some(cols)) = (visible.rows, visible.cols) else { return };
        let colors = &self.theme.colors;
        let state = frame.state;
        let range = state.get_normalized_selection_range().filter(|r| !r.is_single());

        for row in rows.iter() {
            for col in cols.iter() {
                let cell = CellCoords::new(row, col);
                if frame.editor_cell == Some(cell) {
                    continue;
                }
                let (Some(rect), Some(def)) = (frame.dims.cell_rect(state, row, col), state.column(col)) else {
                    continue;
                };
                let rect = frame.to_view(rect);

                if state.is_cell_disabled(row, col) {
                    surface.fill_rect(rect, colors.disabled_bg);
                } else if state.is_row_selected(row) {
                    surface.fill_rect(rect, colors.selected_row_bg);
                } else if state.selected_column() == Some(col) {
                    surface.fill_rect(rect, colors.selected_column_bg);
                }
                if range.is_some_and(|r| r.contains(row, col)) {
                    surface.fill_rect(rect, colors.selection_fill);
                }

                if let Some(value) = state.get_cell_value(row, col) {
                    let text = format_cell(def, value, &self.date_format);
                    if !text.is_empty() {
                        let align = match def.column_type {
                            ColumnType::Number => TextAlign::Right,
                            _ => TextAlign::Left,
                        };
                        surface.text(&text, rect.inflate(-CELL_PADDING), &self.theme.fonts.cell, colors.cell_text, align);
                    }
                }

                if state.cell_error(row, col).is_some() {
                    surface.fill_rect(rect, colors.error_overlay);
                    surface.stroke_rect(rect.inflate(-1.0), colors.error_border, 1.0, LineStyle::Solid);
                }
            }
        }
    }

    fn draw_grid_lines(&self, surface: &mut dyn Surface, frame: &Frame, visible: &VisibleRange) {
        let (Some(rows), Some(cols)) = (visible.rows, visible.cols) else { return };
        let color = self.theme.colors.gridline;
        let state = frame.state;
        let vp = frame.viewport;

        let left = frame.dims.column_left(state, cols.first) - vp.scroll_left;
        let right = frame.dims.column_left(state, cols.last + 1) - vp.scroll_left;
        let top = frame.dims.row_top(state, rows.first) - vp.scroll_top;
        let bottom = frame.dims.row_top(state, rows.last + 1) - vp.scroll_top;

        for col in cols.iter() {
            let x = frame.dims.column_left(state, col + 1) - vp.scroll_left;
            surface.line(Point::new(x, top), Point::new(x, bottom), color, 1.0);
        }
        for row in rows.iter() {
            let y = frame.dims.row_top(state, row + 1) - vp.scroll_top;
            surface.line(Point::new(left, y), Point::new(right, y), color, 1.0);
        }
    }

    fn draw_overlays(&self, surface: &mut dyn Surface, frame: &Frame) {
        let colors = &self.theme.colors;
        let state = frame.state;

        if let Some(buffer) = state.copy_buffer() {
            if let Some(rect) = range_rect(state, frame.dims, &buffer.source_range()) {
                surface.stroke_rect(frame.to_view(rect), colors.copy_outline, 1.0, LineStyle::Dashed);
            }
        }

        if let Some(active) = state.active_cell() {
            if let Some(rect) = frame.dims.cell_rect(state, active.row, active.col) {
                surface.stroke_rect(frame.to_view(rect), colors.active_border, 2.0, LineStyle::Solid);
            }
            if frame.editor_cell.is_none() && state.drag().is_idle() {
                if let Some(handle) = fill_handle_rect(state, frame.dims, active, frame.fill_handle_size) {
                    surface.fill_rect(frame.to_view(handle), colors.fill_handle);
                }
            }
        }

        let drag_range = match state.drag() {
            DragState::RangeSelect { start, end } => Some(SelectionRange::new(*start, *end)),
            DragState::Fill { source, end_row } => Some(SelectionRange::new(
                *source,
                CellCoords::new(*end_row, source.col),
            )),
            _ => None,
        };
        if let Some(rect) = drag_range.and_then(|r| range_rect(state, frame.dims, &r)) {
            surface.stroke_rect(frame.to_view(rect), colors.drag_outline, 1.0, LineStyle::Dashed);
        }
    }
}
