// Theme configuration
// Built-in dark/light themes plus JSON themes with hex colors.

use crate::Color;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Font used for one visual element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Empty = surface default
    #[serde(default)]
    pub family: String,
    pub size: f32,
    #[serde(default)]
    pub bold: bool,
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self { family: String::new(), size, bold: false }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeFonts {
    pub header: FontSpec,
    pub cell: FontSpec,
    pub row_number: FontSpec,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            header: FontSpec::new(13.0).bold(),
            cell: FontSpec::new(13.0),
            row_number: FontSpec::new(12.0),
        }
    }
}

/// Runtime theme colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: Color,
    pub header_bg: Color,
    pub header_text: Color,
    pub gutter_bg: Color,
    pub gutter_text: Color,
    pub selected_row_bg: Color,
    pub selected_column_bg: Color,
    pub cell_text: Color,
    pub disabled_bg: Color,
    pub gridline: Color,
    pub active_border: Color,
    pub selection_fill: Color,
    pub drag_outline: Color,
    pub copy_outline: Color,
    pub fill_handle: Color,
    pub error_overlay: Color,
    pub error_border: Color,
}

impl ThemeColors {
    /// Built-in dark theme
    pub fn dark() -> Self {
        let accent = Color::from_rgb(0.231, 0.510, 0.965); // #3b82f6
        ThemeColors {
            background: Color::from_rgb(0.059, 0.090, 0.165),      // #0f172a
            header_bg: Color::from_rgb(0.118, 0.161, 0.231),       // #1e293b
            header_text: Color::from_rgb(0.945, 0.961, 0.976),     // #f1f5f9
            gutter_bg: Color::from_rgb(0.118, 0.161, 0.231),       // #1e293b
            gutter_text: Color::from_rgb(0.392, 0.439, 0.529),    // #64748b
            selected_row_bg: accent.with_alpha(0.25),
            selected_column_bg: accent.with_alpha(0.15),
            cell_text: Color::from_rgb(0.945, 0.961, 0.976),       // #f1f5f9
            disabled_bg: Color::from_rgb(0.086, 0.118, 0.188),     // #161e30
            gridline: Color::from_rgb(0.200, 0.255, 0.333),        // #334155
            active_border: accent,
            selection_fill: accent.with_alpha(0.2),
            drag_outline: accent,
            copy_outline: Color::from_rgb(0.133, 0.773, 0.369),    // #22c55e
            fill_handle: accent,
            error_overlay: Color::from_rgba(0.937, 0.267, 0.267, 0.25),
            error_border: Color::from_rgb(0.937, 0.267, 0.267),    // #ef4444
        }
    }

    /// Built-in light theme
    pub fn light() -> Self {
        let accent = Color::from_rgb(0.231, 0.510, 0.965); // #3b82f6
        ThemeColors {
            background: Color::from_rgb(1.0, 1.0, 1.0),
            header_bg: Color::from_rgb(0.945, 0.961, 0.976),       // #f1f5f9
            header_text: Color::from_rgb(0.059, 0.090, 0.165),     // #0f172a
            gutter_bg: Color::from_rgb(0.945, 0.961, 0.976),       // #f1f5f9
            gutter_text: Color::from_rgb(0.278, 0.333, 0.412),     // #475569
            selected_row_bg: accent.with_alpha(0.2),
            selected_column_bg: accent.with_alpha(0.12),
            cell_text: Color::from_rgb(0.059, 0.090, 0.165),       // #0f172a
            disabled_bg: Color::from_rgb(0.945, 0.945, 0.945),     // #f1f1f1
            gridline: Color::from_rgb(0.796, 0.835, 0.882),        // #cbd5e1
            active_border: accent,
            selection_fill: accent.with_alpha(0.15),
            drag_outline: accent,
            copy_outline: Color::from_rgb(0.086, 0.639, 0.290),    // #16a34a
            fill_handle: accent,
            error_overlay: Color::from_rgba(0.863, 0.149, 0.149, 0.18),
            error_border: Color::from_rgb(0.863, 0.149, 0.149),    // #dc2626
        }
    }

    /// Create ThemeColors from a JSON theme, falling back per color to the built-in base
    pub fn from_config(config: &ThemeColorsConfig, is_dark: bool) -> Self {
        let base = if is_dark { Self::dark() } else { Self::light() };
        let pick = |hex: &Option<String>, fallback: Color| {
            hex.as_deref().and_then(Color::parse_hex).unwrap_or(fallback)
        };

        let accent = pick(&config.accent, base.active_border);
        let background = pick(&config.background, base.background);
        let header_bg = pick(&config.header_background, base.header_bg);
        let foreground = pick(&config.foreground, base.cell_text);
        let muted = pick(&config.foreground_muted, base.gutter_text);

        ThemeColors {
            background,
            header_bg,
            header_text: foreground,
            gutter_bg: header_bg,
            gutter_text: muted,
            selected_row_bg: accent.with_alpha(config.selection_alpha + 0.05),
            selected_column_bg: accent.with_alpha(config.selection_alpha * 0.75),
            cell_text: foreground,
            disabled_bg: pick(&config.disabled_background, base.disabled_bg),
            gridline: pick(&config.gridline, base.gridline),
            active_border: accent,
            selection_fill: accent.with_alpha(config.selection_alpha),
            drag_outline: accent,
            copy_outline: pick(&config.copy_outline, base.copy_outline),
            fill_handle: accent,
            error_overlay: pick(&config.error, base.error_border).with_alpha(0.25),
            error_border: pick(&config.error, base.error_border),
        }
    }
}

/// JSON-serializable theme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    #[serde(default)]
    pub is_dark: bool,
    pub colors: ThemeColorsConfig,
    #[serde(default)]
    pub fonts: Option<ThemeFonts>,
}

/// JSON color definitions (hex strings); missing entries use the built-in base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub foreground_muted: Option<String>,
    pub gridline: Option<String>,
    pub header_background: Option<String>,
    pub disabled_background: Option<String>,
    pub accent: Option<String>,
    pub copy_outline: Option<String>,
    pub error: Option<String>,
    #[serde(default = "default_selection_alpha")]
    pub selection_alpha: f32,
}

fn default_selection_alpha() -> f32 { 0.2 }

/// Colors and fonts for every visual element.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
}

impl Theme {
    pub fn dark() -> Self {
        Self { name: "Dark".into(), colors: ThemeColors::dark(), fonts: ThemeFonts::default() }
    }

    pub fn light() -> Self {
        Self { name: "Light".into(), colors: ThemeColors::light(), fonts: ThemeFonts::default() }
    }

    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            name: config.name.clone(),
            colors: ThemeColors::from_config(&config.colors, config.is_dark),
            fonts: config.fonts.clone().unwrap_or_default(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: ThemeConfig = serde_json::from_str(input)?;
        Ok(Self::from_config(&config))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
