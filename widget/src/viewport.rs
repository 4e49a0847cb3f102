//! The scroll container the grid is drawn into.

use datagrid_core::Rect;
use datagrid_engine::ViewportMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    ColResize,
    RowResize,
    Crosshair,
}

pub trait ViewportAdapter {
    fn scroll_left(&self) -> f32;
    fn scroll_top(&self) -> f32;
    fn set_scroll_left(&mut self, x: f32);
    fn set_scroll_top(&mut self, y: f32);

    /// On-screen rectangle of the viewport; only its size is used.
    fn bounding_rect(&self) -> Rect;

    fn set_cursor(&mut self, cursor: Cursor);

    fn can_scroll_left(&self) -> bool;
    fn can_scroll_right(&self) -> bool;
    fn can_scroll_up(&self) -> bool;
    fn can_scroll_down(&self) -> bool;

    fn metrics(&self) -> ViewportMetrics {
        let rect = self.bounding_rect();
        ViewportMetrics {
            scroll_left: self.scroll_left(),
            scroll_top: self.scroll_top(),
            width: rect.width,
            height: rect.height,
        }
    }
}
