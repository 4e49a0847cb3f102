//! Everything needed to construct a grid.

use datagrid_config::{GridSettings, Theme};
use datagrid_core::RowData;
use datagrid_engine::DisabledPredicate;

#[derive(Default)]
pub struct GridConfig {
    pub settings: GridSettings,
    pub theme: Theme,
    /// `(row_index, column_key, row_data) -> disabled`; not serializable, so
    /// it is only ever supplied in code.
    pub disabled: Option<DisabledPredicate>,
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: GridSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_disabled<F>(mut self, predicate: F) -> Self
    where
        F: Fn(usize, &str, &RowData) -> bool + 'static,
    {
        self.disabled = Some(Box::new(predicate));
        self
    }
}
