//! Settings Persistence
//!
//! Locates the per-user configuration file and loads it with a safe
//! fallback: a broken or missing file never stops the canvas from starting.

use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::error::{SettingsError, SettingsResult};

const CONFIG_DIR_NAME: &str = "floorkit";
const CONFIG_FILE_NAME: &str = "canvas.toml";

/// Platform config location, e.g. `~/.config/floorkit/canvas.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })
}

/// Loads `path` if it exists, otherwise returns defaults.
///
/// Read or validation failures are logged and also fall back to defaults.
pub fn load_or_default(path: &Path) -> EngineConfig {
    if !path.exists() {
        tracing::info!(
            "No config at {}, using default engine settings",
            path.display()
        );
        return EngineConfig::default();
    }

    match EngineConfig::load_from_file(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Ignoring config at {}: {}. Using defaults",
                path.display(),
                e
            );
            EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TooltipDetailLevel;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_toml_and_json() {
        let dir = tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.capabilities.show_people = true;
        config.capabilities.tooltip_detail_level = TooltipDetailLevel::Minimal;
        config.viewport.cull_padding_px = 50.0;

        for name in ["canvas.toml", "canvas.json"] {
            let path = dir.path().join("nested").join(name);
            config.save_to_file(&path).unwrap();
            let loaded = EngineConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canvas.yaml");
        let err = EngineConfig::default().save_to_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }

    #[test]
    fn test_load_or_default_on_missing_and_invalid() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(load_or_default(&missing), EngineConfig::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[viewport]\nmin_scale = -3.0\n").unwrap();
        assert_eq!(load_or_default(&broken), EngineConfig::default());
    }
}
