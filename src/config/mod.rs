//! Configuration management for epguide-rename

mod settings;

pub use settings::*;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("epguide-rename")
}

/// Get the default configuration file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load configuration from `path` or create it with defaults
pub fn load_or_create_default(path: &Path) -> Result<Settings> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{:?}: {}", path, e)))
    } else {
        let settings = Settings::default();
        save(&settings, path)?;
        Ok(settings)
    }
}

/// Save configuration to `path`
pub fn save(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(settings).map_err(|e| Error::Config(e.to_string()))?;
    fs::write(path, content)?;

    Ok(())
}
