//! Failures from loading, saving and validating engine configuration.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    /// No per-user config directory could be resolved.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed JSON, or a value serde rejected (bad colour, unknown enum).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// The file parsed but its values are unusable.
    #[error("Invalid engine config: {0}")]
    Config(#[from] ConfigError),
}

/// Problems found by `EngineConfig::validate` and format detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.toml` and `.json` are understood.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// `key` is the dotted path, e.g. `viewport.max_scale`.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    #[error("Invalid colour '{value}' for '{key}'")]
    InvalidColor { key: String, value: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
