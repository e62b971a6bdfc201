//! Canvas engine configuration.
//!
//! Configuration is organized into logical sections:
//! - Capabilities (which layers and gestures a page enables)
//! - Interaction tolerances (lasso, hit radii, rotate step)
//! - Viewport limits and culling margin
//! - Tooltip layout constants
//! - Theme colours
//!
//! Every section uses `#[serde(default)]` so partial files load cleanly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult, SettingsResult};
use crate::theme::Theme;

/// How much a device tooltip shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipDetailLevel {
    /// Title only.
    Minimal,
    /// Category and lock state.
    #[default]
    Standard,
    /// Everything, including position, orientation and containing zones.
    Detailed,
}

impl fmt::Display for TooltipDetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimal => write!(f, "minimal"),
            Self::Standard => write!(f, "standard"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}

/// Feature switches for one canvas instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Render zones and allow the draw/edit modes.
    pub show_zones: bool,
    /// Render person markers.
    pub show_people: bool,
    /// Tooltip verbosity.
    pub tooltip_detail_level: TooltipDetailLevel,
    /// Allow device drags in move mode.
    pub allow_device_move: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            show_zones: true,
            show_people: false,
            tooltip_detail_level: TooltipDetailLevel::Standard,
            allow_device_move: true,
        }
    }
}

/// Pointer tolerances, all in pixels unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Lasso rectangle grows by this much before hit-testing.
    pub lasso_tolerance_px: f64,
    /// Lasso releases smaller than this on both axes are clicks.
    pub min_drag_px: f64,
    pub vertex_hit_radius_px: f64,
    pub device_hit_radius_px: f64,
    /// A polygon click this close to the first vertex closes the ring.
    pub polygon_close_radius_px: f64,
    pub rotate_step_degrees: f64,
    /// Wheel zoom factor per 100 units of delta.
    pub wheel_zoom_base: f64,
    /// Minimum zone area in normalized units (fraction of the map).
    pub min_zone_area: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            lasso_tolerance_px: 5.0,
            min_drag_px: 5.0,
            vertex_hit_radius_px: 8.0,
            device_hit_radius_px: 12.0,
            polygon_close_radius_px: 10.0,
            rotate_step_degrees: 90.0,
            wheel_zoom_base: 1.1,
            min_zone_area: 1e-4,
        }
    }
}

/// Scale limits and culling margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub min_scale: f64,
    pub max_scale: f64,
    pub cull_padding_px: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            cull_padding_px: 200.0,
        }
    }
}

/// Tooltip layout constants, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    pub max_width: f64,
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub header_height: f64,
    pub divider_height: f64,
    pub padding: f64,
    /// Sub-list entries shown before the "+k more" line.
    pub sub_list_cap: usize,
    /// Gap between the anchor and the box.
    pub offset: f64,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            max_width: 240.0,
            font_size: 12.0,
            line_height: 1.4,
            header_height: 24.0,
            divider_height: 9.0,
            padding: 8.0,
            sub_list_cap: 3,
            offset: 12.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub capabilities: Capabilities,
    pub interaction: InteractionSettings,
    pub viewport: ViewportSettings,
    pub tooltip: TooltipSettings,
    pub theme: Theme,
}

impl EngineConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style capability override.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Load configuration from a `.json` or `.toml` file.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(
                    ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into(),
                )
            }
        };

        config.validate()?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(
                    ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into(),
                )
            }
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let vp = &self.viewport;
        if !(vp.min_scale > 0.0) {
            return Err(out_of_range("viewport.min_scale", vp.min_scale));
        }
        if !(vp.max_scale > vp.min_scale) {
            return Err(out_of_range("viewport.max_scale", vp.max_scale));
        }
        if vp.cull_padding_px < 0.0 {
            return Err(out_of_range("viewport.cull_padding_px", vp.cull_padding_px));
        }

        let ix = &self.interaction;
        for (key, value) in [
            ("interaction.lasso_tolerance_px", ix.lasso_tolerance_px),
            ("interaction.min_drag_px", ix.min_drag_px),
            ("interaction.vertex_hit_radius_px", ix.vertex_hit_radius_px),
            ("interaction.device_hit_radius_px", ix.device_hit_radius_px),
            ("interaction.polygon_close_radius_px", ix.polygon_close_radius_px),
            ("interaction.min_zone_area", ix.min_zone_area),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(out_of_range(key, value));
            }
        }
        if !(ix.wheel_zoom_base > 1.0) {
            return Err(out_of_range("interaction.wheel_zoom_base", ix.wheel_zoom_base));
        }

        let tt = &self.tooltip;
        if !(tt.font_size > 0.0) {
            return Err(out_of_range("tooltip.font_size", tt.font_size));
        }
        if tt.max_width < tt.font_size {
            return Err(out_of_range("tooltip.max_width", tt.max_width));
        }

        if !(0.0..=1.0).contains(&self.theme.zone_fill_alpha) {
            return Err(out_of_range("theme.zone_fill_alpha", self.theme.zone_fill_alpha));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &str, value: f64) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
