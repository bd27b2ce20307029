use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};

use super::Config;

const APP_DIR: &str = "shell-launcher";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> anyhow::Result<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE));
    }

    Err(anyhow!(
        "Unable to determine config path (XDG_CONFIG_HOME/HOME not set)"
    ))
}

/// Load the config at `path`, writing defaults there first if it is missing.
pub fn load(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        let config = Config::default();
        save(path, &config)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let parsed = toml::from_str::<Config>(&raw)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(parsed)
}

pub fn save(path: &Path, config: &Config) -> anyhow::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        anyhow!(
            "Invalid config path has no parent directory: {}",
            path.display()
        )
    })?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;

    let encoded = toml::to_string_pretty(config).context("Failed to encode config as TOML")?;
    fs::write(path, encoded)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}
