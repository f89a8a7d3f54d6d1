// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::FileConfig;

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[
    ".simplelog.json",
    ".simplelog.yaml",
    ".simplelog/config.json",
    "simplelog.config.json",
];

/// Local config file name (for per-machine overrides).
pub const LOCAL_CONFIG_FILE: &str = ".simplelog.local.json";

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".simplelog";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Get the global config directory path.
pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

/// Load global configuration from `config.json` inside `global_dir`.
pub fn load_global_config_from(global_dir: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let path = global_dir.join(GLOBAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the workspace root.
///
/// The first file in [`CONFIG_FILES`] that exists wins.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<FileConfig>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load local configuration from .simplelog.local.json.
pub fn load_local_config(workspace_root: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load a configuration file (JSON or YAML, chosen by extension).
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Write a config file into the workspace root.
///
/// Refuses to overwrite an existing file.
pub fn init_config(
    workspace_root: &Path,
    config: Option<FileConfig>,
) -> Result<PathBuf, ConfigError> {
    let path = workspace_root.join(CONFIG_FILES[0]);
    if path.exists() {
        return Err(ConfigError::InvalidFormat(format!(
            "{} already exists",
            path.display()
        )));
    }

    let config = config.unwrap_or_else(get_example_config);
    let content = serde_json::to_string_pretty(&config)?;
    std::fs::write(&path, content)?;

    Ok(path)
}

/// Find the workspace root by searching for config files.
///
/// Walks up the directory tree from `start` until it finds a directory
/// containing a config file or reaches the filesystem root.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if CONFIG_FILES
            .iter()
            .chain(std::iter::once(&LOCAL_CONFIG_FILE))
            .any(|filename| current.join(filename).exists())
        {
            return Some(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Get an example configuration.
pub fn get_example_config() -> FileConfig {
    FileConfig {
        host: Some("127.0.0.1".to_string()),
        port: Some(5080),
        service_name: Some("SimpleLog.Api".to_string()),
        environment: Some("Development".to_string()),
        log_level: Some("debug".to_string()),
        log_dir: Some(PathBuf::from("logs")),
        log_retention: Some(14),
        ..Default::default()
    }
}
