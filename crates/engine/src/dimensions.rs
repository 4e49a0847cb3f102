//! Virtualization math.
//!
//! All positions here are content coordinates: the origin is the top-left of
//! the whole scrollable content, with the header strip above row 0 and the
//! row-number gutter left of column 0.

use datagrid_core::{Rect, Size};

use crate::sizes::SizeTrack;
use crate::state::StateManager;

/// Scroll offsets and viewport extent, as reported by the viewport adapter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub width: f32,
    pub height: f32,
}

/// Inclusive index window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpan {
    pub first: usize,
    pub last: usize,
}

impl IndexSpan {
    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub rows: Option<IndexSpan>,
    pub cols: Option<IndexSpan>,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.rows.is_none() || self.cols.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionCalculator {
    header_height: f32,
    gutter_width: f32,
}

impl DimensionCalculator {
    pub fn new(header_height: f32, gutter_width: f32) -> Self {
        Self { header_height, gutter_width }
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn gutter_width(&self) -> f32 {
        self.gutter_width
    }

    /// Gutter plus every column; header plus every row.
    pub fn calculate_total_size(&self, state: &StateManager) -> Size {
        Size {
            width: self.gutter_width + state.column_widths().total(),
            height: self.header_height + state.row_heights().total(),
        }
    }

    /// Rows and columns intersecting the body area (viewport minus the
    /// sticky header and gutter), with one extra trailing item of overscan.
    pub fn calculate_visible_range(&self, state: &StateManager, viewport: &ViewportMetrics) -> VisibleRange {
        VisibleRange {
            rows: visible_span(
                state.row_heights(),
                viewport.scroll_top,
                viewport.height - self.header_height,
            ),
            cols: visible_span(
                state.column_widths(),
                viewport.scroll_left,
                viewport.width - self.gutter_width,
            ),
        }
    }

    pub fn column_left(&self, state: &StateManager, col: usize) -> f32 {
        self.gutter_width + state.column_widths().offset(col)
    }

    pub fn row_top(&self, state: &StateManager, row: usize) -> f32 {
        self.header_height + state.row_heights().offset(row)
    }

    pub fn cell_rect(&self, state: &StateManager, row: usize, col: usize) -> Option<Rect> {
        let width = state.column_width(col)?;
        let height = state.row_height(row)?;
        Some(Rect::new(self.column_left(state, col), self.row_top(state, row), width, height))
    }

    /// Row under a content y, ignoring the header.
    pub fn row_at_content_y(&self, state: &StateManager, y: f32) -> Option<usize> {
        state.row_heights().index_at(y - self.header_height)
    }

    /// Column under a content x, ignoring the gutter.
    pub fn col_at_content_x(&self, state: &StateManager, x: f32) -> Option<usize> {
        state.column_widths().index_at(x - self.gutter_width)
    }
}

fn visible_span(track: &SizeTrack, scroll: f32, extent: f32) -> Option<IndexSpan> {
    if track.is_empty() || extent <= 0.0 {
        return None;
    }
    let scroll = scroll.max(0.0);
    // Scrolled past the end (content shrank): keep the last item in view
    let first = track.index_at(scroll).unwrap_or(track.len() - 1);
    let end = scroll + extent;
    let last = match track.index_at(end) {
        Some(i) if track.offset(i) < end => i,
        Some(i) => i.saturating_sub(1).max(first),
        None => track.len() - 1,
    };
    let last = (last + 1).min(track.len() - 1);
    Some(IndexSpan { first, last })
}
