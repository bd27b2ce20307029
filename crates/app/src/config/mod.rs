//! Application configuration loaded from `config.toml`.

mod persistence;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use crate::launcher::config::LauncherConfig;

/// Root application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub launcher: LauncherConfig,
    /// Watch config.toml for changes and hot-reload (requires restart to change).
    pub watch_config: bool,
    /// Rescan applications when desktop entries change (requires restart to change).
    pub watch_applications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            launcher: LauncherConfig::default(),
            watch_config: true,
            watch_applications: true,
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> anyhow::Result<PathBuf> {
        persistence::config_path()
    }

    /// Load the config from disk, falling back to defaults on any error.
    pub fn load() -> Config {
        match Self::path().and_then(|path| persistence::load(&path)) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", err);
                Config::default()
            }
        }
    }

    /// Reload the config from disk. Returns `None` if it cannot be read, so
    /// the running config stays in place.
    pub fn reload() -> Option<Config> {
        match Self::path().and_then(|path| persistence::load(&path)) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to reload config from disk: {:#}", err);
                None
            }
        }
    }
}
