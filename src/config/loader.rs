use crate::config::Config;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const CONFIG_ENV: &str = "POWERPROMPT_CONFIG";

/// Load configuration with priority: CLI path > `POWERPROMPT_CONFIG` > config
/// files > built-in theme. An explicitly requested file must load.
pub async fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = config_path {
        return load_config_file(&path).await;
    }

    if let Some(path) = env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        let path = PathBuf::from(path);
        match load_config_file(&path).await {
            Ok(config) => return Ok(config),
            Err(e) => log::warn!("{CONFIG_ENV} points at an unusable config: {e:#}"),
        }
    }

    load_config_from_default_locations().await
}

/// Load configuration from default locations
async fn load_config_from_default_locations() -> Result<Config> {
    for path in get_config_search_paths() {
        if !path.exists() {
            continue;
        }
        match load_config_file(&path).await {
            Ok(config) => return Ok(config),
            Err(e) => log::warn!("Failed to load config from {}: {e:#}", path.display()),
        }
    }

    log::debug!("no config file found, using the built-in theme");
    Ok(Config::builtin())
}

/// Get list of paths to search for configuration files
pub fn get_config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".powerprompt.json")];

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("powerprompt").join("config.json"));
        paths.push(home.join(".powerprompt.json"));
    }

    paths
}

/// Load configuration from a specific file
pub async fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
