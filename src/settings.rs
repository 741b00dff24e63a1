//! Loader settings persistence.
//!
//! Persists loader options to `config/cobalt/loader.toml`. The file is
//! optional; a missing or broken one falls back to defaults so the loader
//! never blocks a launch over its own configuration.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::addons::DEFAULT_CONFIG_ROOT;
use crate::env::Environment;
use crate::logging::LogConfig;

/// Maximum file size for the settings file (64KB).
const MAX_FILE_SIZE: u64 = 64 * 1024;

/// Settings file name under the configuration root.
pub const SETTINGS_FILE: &str = "loader.toml";

/// Settings storage errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// File too large.
    #[error("File too large (max {MAX_FILE_SIZE} bytes)")]
    FileTooLarge,
}

/// Options controlling the prelaunch loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Configuration root of the Cobalt install.
    pub config_root: PathBuf,
    /// Addon directory override; defaults to `addons` under the root.
    pub addons_dir: Option<PathBuf>,
    /// Environment override; defaults to what the host reports.
    pub environment: Option<Environment>,
    /// Logging options.
    pub log: LogConfig,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            config_root: PathBuf::from(DEFAULT_CONFIG_ROOT),
            addons_dir: None,
            environment: None,
            log: LogConfig::default(),
        }
    }
}

impl LoaderSettings {
    /// Returns the resolved addon directory.
    #[must_use]
    pub fn addons_path(&self) -> PathBuf {
        self.addons_dir
            .clone()
            .unwrap_or_else(|| self.config_root.join("addons"))
    }

    /// Returns the directory log files are written to.
    #[must_use]
    pub fn logs_path(&self) -> PathBuf {
        self.config_root.join("logs")
    }

    /// Returns the default settings file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Path::new(DEFAULT_CONFIG_ROOT).join(SETTINGS_FILE)
    }

    /// Loads settings from `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        // Check file size
        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(SettingsError::FileTooLarge);
        }

        // Read and parse
        let content = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Loads settings from the default path, falling back to defaults when
    /// the file is unreadable.
    #[must_use]
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Cannot load {:?}, using defaults: {}", path, err);
                Self::default()
            }
        }
    }

    /// Saves settings to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}
