//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME};
use crate::services::packetizer::{PacketizerConfig, DEFAULT_GAP, DEFAULT_MAX_LEN};

/// Stream framing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Bytes per full frame
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Quiet period in milliseconds that ends a frame
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

fn default_gap_ms() -> u64 {
    DEFAULT_GAP.as_millis() as u64
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
            gap_ms: default_gap_ms(),
        }
    }
}

impl StreamConfig {
    /// Framing constants for the packetizer.
    #[must_use]
    pub const fn packetizer_config(&self) -> PacketizerConfig {
        PacketizerConfig::new(self.max_len, Duration::from_millis(self.gap_ms))
    }
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Default layout description used when `--layout` is not given
    pub layout: Option<PathBuf>,
}

/// Transport defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransportConfig {
    /// Default socket address for `listen --tcp` (e.g. "127.0.0.1:3000")
    pub host: Option<String>,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/bitscope/config.toml`
/// - macOS: `~/Library/Application Support/bitscope/config.toml`
/// - Windows: `%APPDATA%\bitscope\config.toml`
///
/// The directory can be overridden with the `BITSCOPE_CONFIG_DIR` environment
/// variable.
///
/// # Validation
///
/// - `stream.max_len` must be at least 1
/// - `paths.layout` must exist if set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Stream framing settings
    #[serde(default)]
    pub stream: StreamConfig,
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Transport defaults
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path, honouring `BITSCOPE_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        self.stream
            .packetizer_config()
            .validate()
            .context("Invalid [stream] configuration")?;

        if let Some(layout) = &self.paths.layout {
            if !layout.exists() {
                anyhow::bail!("Layout file does not exist: {}", layout.display());
            }
        }

        Ok(())
    }
}
