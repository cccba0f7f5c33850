#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for vouch
//!
//! This crate handles loading configuration from:
//! - Default values (hard-coded protocol constants)
//! - Configuration file (TOML)
//!
//! The defaults are the production endpoints and limits; tests override the
//! base URLs to point at mock servers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use vouch_errors::{ConfigError, Error};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub flathub: FlathubConfig,

    #[serde(default)]
    pub snapcraft: SnapcraftConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Flathub verified-app collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlathubConfig {
    #[serde(default = "default_flathub_base_url")]
    pub base_url: String,
    /// Items per collection page; the client caps this at 250 regardless.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Runaway-protection ceiling on page requests per bulk fetch.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_bulk_timeout")]
    pub timeout_secs: u64,
}

/// Snap store info endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapcraftConfig {
    #[serde(default = "default_snapcraft_base_url")]
    pub base_url: String,
    /// Value for the mandatory `Snap-Device-Series` header.
    #[serde(default = "default_device_series")]
    pub device_series: String,
    #[serde(default = "default_item_timeout")]
    pub timeout_secs: u64,
    /// Per-item lookups per concurrent batch; batches run sequentially.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_flathub_base_url() -> String {
    "https://flathub.org/api/v2".to_string()
}

fn default_snapcraft_base_url() -> String {
    "https://api.snapcraft.io/v2".to_string()
}

fn default_per_page() -> u32 {
    250
}

fn default_max_pages() -> u32 {
    10
}

fn default_bulk_timeout() -> u64 {
    10
}

fn default_item_timeout() -> u64 {
    5
}

fn default_device_series() -> String {
    "16".to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("vouch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FlathubConfig {
    fn default() -> Self {
        Self {
            base_url: default_flathub_base_url(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            timeout_secs: default_bulk_timeout(),
        }
    }
}

impl Default for SnapcraftConfig {
    fn default() -> Self {
        Self {
            base_url: default_snapcraft_base_url(),
            device_series: default_device_series(),
            timeout_secs: default_item_timeout(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional path, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error only when an explicit path was given and is unusable;
    /// a missing optional config degrades to defaults with a debug log.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::load(p).await,
            None => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is zero or a base URL is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if self.flathub.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "flathub.base_url".to_string(),
                value: String::new(),
            }
            .into());
        }
        if self.snapcraft.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "snapcraft.base_url".to_string(),
                value: String::new(),
            }
            .into());
        }
        if self.flathub.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "flathub.max_pages".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.snapcraft.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "snapcraft.batch_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Timeout for one bulk collection page request
    #[must_use]
    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.flathub.timeout_secs)
    }

    /// Timeout for one per-item info request
    #[must_use]
    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.snapcraft.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = Config::default();
        assert_eq!(config.flathub.per_page, 250);
        assert_eq!(config.flathub.max_pages, 10);
        assert_eq!(config.flathub.timeout_secs, 10);
        assert_eq!(config.snapcraft.timeout_secs, 5);
        assert_eq!(config.snapcraft.batch_size, 5);
        assert_eq!(config.snapcraft.device_series, "16");
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn load_merges_partial_file_with_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[flathub]\nbase_url = \"http://localhost:9999/api/v2\"\n",
        )
        .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.flathub.base_url, "http://localhost:9999/api/v2");
        assert_eq!(config.flathub.per_page, 250);
        assert_eq!(config.snapcraft.batch_size, 5);
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let err = Config::load(Path::new("/nonexistent/vouch.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_values_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[snapcraft]\nbatch_size = 0\n").unwrap();

        let err = Config::load(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
