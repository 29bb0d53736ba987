//! User configuration.
//!
//! Stored as TOML at `~/.config/nier-audio-search/config.toml` (or the XDG
//! equivalent). Every key is optional.
//!
//! # Example Configuration
//!
//! ```toml
//! root = "/data/nier_json"
//! extension = "json"
//!
//! [asset_path]
//! strip_prefix = "nier_audio_json/"
//! field = "wav"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::asset_path::AssetPathRule;
use crate::search::scanner::{DEFAULT_EXTENSION, ScanOptions};

/// Directory searched when neither the command line nor the config file
/// names one. Resolved against the working directory.
pub const DEFAULT_ROOT_DIR: &str = "nier_json";

const APP_DIR: &str = "nier-audio-search";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default search root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Data file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Asset path derivation for matched records.
    #[serde(default)]
    pub asset_path: AssetPathRule,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            extension: default_extension(),
            asset_path: AssetPathRule::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.validate()?;
        config.asset_path.extension = config.extension.clone();

        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Get the default configuration file path.
    ///
    /// - Primary: `$XDG_CONFIG_HOME/nier-audio-search/config.toml`
    /// - Fallback: platform-specific config dir
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Ok(PathBuf::from(xdg_config).join(APP_DIR).join(CONFIG_FILE));
        }

        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.is_empty() {
            return Err(ConfigError::Validation("extension cannot be empty".into()));
        }
        if self.extension.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "extension '{}' must not start with a dot",
                self.extension
            )));
        }
        if self.asset_path.field.is_empty() {
            return Err(ConfigError::Validation(
                "asset_path.field cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Pick the search root: explicit override, then config, then
    /// [`DEFAULT_ROOT_DIR`].
    pub fn resolve_root(&self, override_root: Option<PathBuf>) -> PathBuf {
        override_root
            .or_else(|| self.root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extension: self.extension.clone(),
        }
    }

    pub fn asset_rule(&self) -> AssetPathRule {
        AssetPathRule {
            extension: self.extension.clone(),
            ..self.asset_path.clone()
        }
    }
}
