//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub reddit: RedditConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Reddit application credentials.
///
/// These belong to a "script" type application; the listing API is only
/// reachable with an OAuth token obtained through the password grant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,

    /// User-Agent sent on every feed request. Reddit throttles generic
    /// agents, so a descriptive one is required.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Flat directory all media files are written into.
    #[serde(default = "default_download_directory")]
    pub download_directory: PathBuf,

    /// Stop a run after this many consecutive already-downloaded items.
    /// 0 disables the circuit breaker.
    #[serde(default)]
    pub consecutive_skip_limit: u32,

    /// Seconds to wait between download cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: default_download_directory(),
            consecutive_skip_limit: 0,
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_user_agent() -> String {
    format!("reddit-saver/{} (saved posts archiver)", env!("CARGO_PKG_VERSION"))
}

fn default_download_directory() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_poll_interval() -> u64 {
    3600
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reddit: RedditConfig {
                user_agent: default_user_agent(),
                ..Default::default()
            },
            options: OptionsConfig::default(),
        }
    }
}
