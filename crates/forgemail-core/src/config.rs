//! Configuration management for forgemail.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Command-line flags take precedence
//! over everything loaded here.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/forgemail/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Network and request behavior settings
    pub network: NetworkConfig,
    /// Target platform endpoints and address rules
    pub platform: PlatformConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicitly provided path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here: the
    /// caller asked for this file specifically.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `FORGEMAIL_TIMEOUT_SECS`: Override the per-request timeout
    /// - `FORGEMAIL_MAX_CONCURRENT`: Override the simultaneous fetch cap
    /// - `FORGEMAIL_USER_AGENT`: Override the client signature header
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("FORGEMAIL_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.network.timeout_secs = secs;
                tracing::debug!("Override timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("FORGEMAIL_MAX_CONCURRENT") {
            if let Ok(max) = val.parse() {
                config.network.max_concurrent = max;
                tracing::debug!("Override max_concurrent from env: {}", max);
            }
        }

        if let Ok(val) = std::env::var("FORGEMAIL_USER_AGENT") {
            config.network.user_agent = val;
        }

        Ok(config)
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/forgemail/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "forgemail", "forgemail").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Network and request behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Response bodies are truncated beyond this many bytes
    pub max_body_bytes: usize,
    /// Number of simultaneous in-flight fetches allowed
    pub max_concurrent: usize,
    /// User agent string; the platform rejects requests without one
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_body_bytes: 2 * 1024 * 1024,
            max_concurrent: 4,
            user_agent: "Mozilla/5.0 (KHTML, like Gecko) Safari/537.36".to_string(),
        }
    }
}

/// Target platform endpoints and address rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base URL of the human-facing web pages
    pub web_base: String,
    /// Base URL of the rate-limited API service
    pub api_base: String,
    /// Addresses ending in this suffix are auto-generated placeholders,
    /// never user-controlled contact points
    pub noreply_suffix: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            web_base: "https://github.com".to_string(),
            api_base: "https://api.github.com".to_string(),
            noreply_suffix: "@users.noreply.github.com".to_string(),
        }
    }
}
