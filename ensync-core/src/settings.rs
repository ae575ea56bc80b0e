//! Application settings.
//!
//! Settings live in `~/.config/ensync/settings.toml` (or the platform's
//! equivalent config directory). A missing file means defaults; a present
//! but malformed file is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger::Channel;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Canonical path to the settings file: `~/.config/ensync/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("ensync").join("settings.toml")
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path of the SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ensync.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Channels forwarded to the `log` crate.
    pub channels: Vec<Channel>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            channels: vec![Channel::Error, Channel::Warning, Channel::Information],
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load from [`settings_path`], falling back to defaults if the file
    /// does not exist.
    pub fn load_default() -> Result<Self, SettingsError> {
        let path = settings_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}
