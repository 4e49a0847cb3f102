// Grid settings
// Loaded from a JSON (`//` comment lines allowed) or TOML file, or built in code.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    // Default sizes
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: f32,

    #[serde(rename = "grid.defaultRowHeight")]
    pub default_row_height: f32,

    #[serde(rename = "grid.headerHeight")]
    pub header_height: f32,

    #[serde(rename = "grid.rowNumberWidth")]
    pub row_number_width: f32,

    // Resize bounds
    #[serde(rename = "resize.minColumnWidth")]
    pub min_column_width: f32,

    #[serde(rename = "resize.maxColumnWidth")]
    pub max_column_width: f32,

    #[serde(rename = "resize.minRowHeight")]
    pub min_row_height: f32,

    #[serde(rename = "resize.maxRowHeight")]
    pub max_row_height: f32,

    /// Half-width of the hit band around a column/row border
    #[serde(rename = "resize.tolerance")]
    pub resize_tolerance: f32,

    // Fill handle
    #[serde(rename = "fill.handleSize")]
    pub fill_handle_size: f32,

    // Behavior
    #[serde(rename = "behavior.autoAddRow")]
    pub auto_add_row: bool,

    #[serde(rename = "behavior.pasteDebounceMs")]
    pub paste_debounce_ms: u64,

    /// How long self-initiated scroll events are ignored after scroll-into-view
    #[serde(rename = "behavior.scrollSettleMs")]
    pub scroll_settle_ms: u64,

    // Display
    /// chrono format string for date cells
    #[serde(rename = "display.dateFormat")]
    pub date_format: String,

    // Diagnostics
    #[serde(rename = "log.verbose")]
    pub verbose_logging: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            // Sizes
            default_column_width: 100.0,
            default_row_height: 28.0,
            header_height: 32.0,
            row_number_width: 50.0,
            // Resize
            min_column_width: 40.0,
            max_column_width: 600.0,
            min_row_height: 20.0,
            max_row_height: 200.0,
            resize_tolerance: 5.0,
            // Fill
            fill_handle_size: 8.0,
            // Behavior
            auto_add_row: false,
            paste_debounce_ms: 1000,
            scroll_settle_ms: 50,
            // Display
            date_format: "%m/%d/%Y".to_string(),
            // Diagnostics
            verbose_logging: false,
        }
    }
}

impl GridSettings {
    /// Parse JSON settings. Lines starting with `//` are treated as comments.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let cleaned: String = input
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: GridSettings = serde_json::from_str(&cleaned)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: GridSettings = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from disk, picking the parser by file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("toml") => Self::from_toml(&contents),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string())),
        }
    }

    /// Load settings, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Error loading grid settings: {}", e);
                log::warn!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid.defaultColumnWidth", self.default_column_width),
            ("grid.defaultRowHeight", self.default_row_height),
            ("resize.minColumnWidth", self.min_column_width),
            ("resize.minRowHeight", self.min_row_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.header_height < 0.0 || self.row_number_width < 0.0 || self.resize_tolerance < 0.0 {
            return Err(ConfigError::Invalid("header, gutter and tolerance sizes must not be negative".into()));
        }
        if self.min_column_width > self.max_column_width {
            return Err(ConfigError::Invalid(format!(
                "resize.minColumnWidth ({}) exceeds resize.maxColumnWidth ({})",
                self.min_column_width, self.max_column_width
            )));
        }
        if self.min_row_height > self.max_row_height {
            return Err(ConfigError::Invalid(format!(
                "resize.minRowHeight ({}) exceeds resize.maxRowHeight ({})",
                self.min_row_height, self.max_row_height
            )));
        }
        Ok(())
    }

    pub fn clamp_column_width(&self, width: f32) -> f32 {
        width.max(self.min_column_width).min(self.max_column_width)
    }

    pub fn clamp_row_height(&self, height: f32) -> f32 {
        height.max(self.min_row_height).min(self.max_row_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_with_comments_and_partial_keys() {
        let json = r#"{
            // sizes
            "grid.defaultColumnWidth": 120,
            "behavior.autoAddRow": true
        }"#;
        let settings = GridSettings::from_json(json).unwrap();
        assert_eq!(settings.default_column_width, 120.0);
        assert!(settings.auto_add_row);
        assert_eq!(settings.default_row_height, 28.0);
    }

    #[test]
    fn test_toml() {
        let toml = r#"
"resize.minColumnWidth" = 30.0
"resize.maxColumnWidth" = 300.0
"log.verbose" = true
"#;
        let settings = GridSettings::from_toml(toml).unwrap();
        assert_eq!(settings.min_column_width, 30.0);
        assert!(settings.verbose_logging);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let json = r#"{ "resize.minRowHeight": 50, "resize.maxRowHeight": 10 }"#;
        assert!(matches!(GridSettings::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, r#"{{ "grid.headerHeight": 40 }}"#).unwrap();

        let settings = GridSettings::load(&path).unwrap();
        assert_eq!(settings.header_height, 40.0);

        let bad = dir.path().join("grid.yaml");
        std::fs::write(&bad, "x: 1").unwrap();
        assert!(matches!(GridSettings::load(&bad), Err(ConfigError::UnsupportedFormat(_))));
        assert_eq!(GridSettings::load_or_default(&bad), GridSettings::default());
    }

    #[test]
    fn test_clamp() {
        let settings = GridSettings::default();
        assert_eq!(settings.clamp_column_width(5.0), settings.min_column_width);
        assert_eq!(settings.clamp_column_width(10_000.0), settings.max_column_width);
        assert_eq!(settings.clamp_row_height(33.0), 33.0);
    }
}
