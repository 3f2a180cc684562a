//! Configuration management for logscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`ScanningConfig::concurrent_archives`].
pub const ENV_CONCURRENCY: &str = "LOGSCAN_CONCURRENCY";
/// Environment variable overriding [`ScanningConfig::output_root`].
pub const ENV_OUTPUT_ROOT: &str = "LOGSCAN_OUTPUT_ROOT";
/// Environment variable overriding [`ScanningConfig::indicator_dir`].
pub const ENV_INDICATOR_DIR: &str = "LOGSCAN_INDICATOR_DIR";

/// Main application configuration.
///
/// This is loaded from `~/.config/logscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
}

impl AppConfig {
    /// Load configuration from the XDG config path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// Supports the following environment variables:
    /// - `LOGSCAN_CONCURRENCY`: number of archives processed in parallel
    /// - `LOGSCAN_OUTPUT_ROOT`: top-level directory for extracted artifacts
    /// - `LOGSCAN_INDICATOR_DIR`: directory receiving the `_all_done.txt` file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_CONCURRENCY) {
            if let Ok(workers) = val.trim().parse() {
                self.scanning.concurrent_archives = workers;
                tracing::debug!("Override concurrent_archives from env: {}", workers);
            }
        }

        if let Some(val) = lookup(ENV_OUTPUT_ROOT) {
            if !val.is_empty() {
                tracing::debug!("Override output_root from env: {}", val);
                self.scanning.output_root = PathBuf::from(val);
            }
        }

        if let Some(val) = lookup(ENV_INDICATOR_DIR) {
            if !val.is_empty() {
                tracing::debug!("Override indicator_dir from env: {}", val);
                self.scanning.indicator_dir = PathBuf::from(val);
            }
        }
    }

    /// Check that every value is usable by a scan.
    pub fn validate(&self) -> ConfigResult<()> {
        self.scanning.validate()
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/logscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "logscan", "logscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of archives processed concurrently
    pub concurrent_archives: usize,
    /// Top-level directory under which per-root extracts are mirrored
    pub output_root: PathBuf,
    /// File extension identifying compressed input archives (without dot)
    pub archive_extension: String,
    /// File extension given to extracted artifacts (without dot)
    pub artifact_extension: String,
    /// Directory receiving the `<root>_all_done.txt` indicator file
    pub indicator_dir: PathBuf,
}

impl ScanningConfig {
    /// Check that every value is usable by a scan.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrent_archives == 0 {
            return Err(invalid(
                "scanning.concurrent_archives",
                "must be at least 1",
            ));
        }
        if self.archive_extension.trim_start_matches('.').is_empty() {
            return Err(invalid("scanning.archive_extension", "must not be empty"));
        }
        if self.artifact_extension.trim_start_matches('.').is_empty() {
            return Err(invalid("scanning.artifact_extension", "must not be empty"));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(invalid("scanning.output_root", "must not be empty"));
        }
        Ok(())
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrent_archives: 5,
            output_root: PathBuf::from("path_processed"),
            archive_extension: "gz".to_string(),
            artifact_extension: "txt".to_string(),
            indicator_dir: PathBuf::from("."),
        }
    }
}
