//! Configuration loading for the Pathway CLI.
//!
//! Looks for `--config PATH` first, then `<config dir>/pathway/config.json`,
//! and falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pathway_core::PathwayConfig;

/// Location of the per-user config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pathway").join("config.json"))
}

/// Load and validate the configuration.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<PathwayConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.is_file()),
    };
    let Some(path) = path else {
        tracing::debug!("No config file, using defaults");
        return Ok(PathwayConfig::default());
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PathwayConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
