//! Virtualized, editable data grid.
//!
//! [`DataGrid`] is the top-level controller. It owns the engine's
//! [`StateManager`](datagrid_engine::StateManager), translates normalized
//! pointer and keyboard input into state transitions (the `interaction`
//! module), and draws frames through a host-supplied [`Surface`].
//!
//! Host integration points are traits: [`ViewportAdapter`] for the scroll
//! container, [`EditingManager`] for the inline editor and
//! [`HistoryManager`] for undo storage.

/// Debug trace gated on `GridSettings::verbose_logging`.
macro_rules! verbose {
    ($grid:expr, $($arg:tt)+) => {
        if $grid.settings.verbose_logging {
            log::debug!($($arg)+);
        }
    };
}

pub mod config;
pub mod editing;
pub mod grid;
pub mod history;
pub mod input;
pub mod interaction;
pub mod renderer;
pub mod viewport;

pub use config::GridConfig;
pub use editing::{EditingManager, NoopEditor, PendingEdit};
pub use grid::{DataGrid, EventListener};
pub use history::{CellChange, History, HistoryEntry, HistoryManager};
pub use input::{Key, Modifiers, PointerEvent};
pub use interaction::hit_test::HitTarget;
pub use renderer::{Frame, LineStyle, Renderer, Surface, TextAlign};
pub use viewport::{Cursor, ViewportAdapter};
