//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/scrawl/config.toml)
//! 3. Environment variables (SCRAWL_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "SCRAWL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db, active-user file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default page size for listings
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Whether listings compute the filtered total by default
    #[serde(default = "default_show_totals")]
    pub show_totals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_limit: default_limit(),
            show_totals: default_show_totals(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SCRAWL_DATA_DIR, SCRAWL_DEFAULT_LIMIT, SCRAWL_SHOW_TOTALS)
    /// 2. Config file (~/.config/scrawl/config.toml or SCRAWL_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SCRAWL_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SCRAWL_DEFAULT_LIMIT (silently ignored when not a positive integer)
        if let Ok(val) = std::env::var(format!("{}_DEFAULT_LIMIT", ENV_PREFIX)) {
            if let Ok(limit) = val.parse::<u32>() {
                if limit > 0 {
                    self.default_limit = limit;
                }
            }
        }

        // SCRAWL_SHOW_TOTALS
        if let Ok(val) = std::env::var(format!("{}_SHOW_TOTALS", ENV_PREFIX)) {
            self.show_totals = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SCRAWL_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scrawl")
            .join("config.toml")
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("scrawl.db")
    }

    /// Get the path to the active-user file
    pub fn active_user_path(&self) -> PathBuf {
        self.data_dir.join("active_user")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrawl")
}

fn default_limit() -> u32 {
    crate::query::page::DEFAULT_LIMIT
}

fn default_show_totals() -> bool {
    true
}
