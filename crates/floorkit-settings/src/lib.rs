//! FloorKit Settings Crate
//!
//! Configuration for the canvas engine: capability flags that replace the
//! per-page engine forks, interaction tolerances, viewport limits, tooltip
//! layout constants and the injected theme. Supports JSON and TOML files.

pub mod config;
pub mod error;
pub mod persistence;
pub mod theme;

pub use config::{
    Capabilities, EngineConfig, InteractionSettings, TooltipDetailLevel, TooltipSettings,
    ViewportSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::{default_config_path, load_or_default};
pub use theme::{Color, Theme};
