//! Configuration module for settly
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;

/// Load settings from the first settings file found, or use defaults
///
/// Runs before logging is set up; `Settings::source` records which file won.
pub fn load_settings() -> Result<Settings> {
    // Check environment variable first
    if let Ok(path) = std::env::var("SETTLY_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let paths = [
        PathBuf::from("settly.yml"),
        PathBuf::from("config/settly.yml"),
        dirs::config_dir()
            .map(|p| p.join("settly/settly.yml"))
            .unwrap_or_default(),
    ];

    for path in paths.iter() {
        if path.is_file() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
