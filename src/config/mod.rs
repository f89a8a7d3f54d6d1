// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for the SimpleLog service.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.simplelog/config.json (or an injected directory)
//! - Workspace config: .simplelog.json, .simplelog.yaml, .simplelog/config.json, or simplelog.config.json
//! - Local config: .simplelog.local.json (gitignored, for per-machine overrides)
//! - CLI options: command-line arguments and their environment variables
//!
//! Configuration is merged with precedence (CLI > local > workspace > global > defaults).

mod loader;
mod merger;
mod types;

pub use loader::{
    find_workspace_root, get_example_config, get_global_config_dir, init_config, load_config_file,
    load_global_config_from, load_local_config, load_workspace_config,
    CONFIG_FILES, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{default_config, merge_config, CliOptions};

pub use types::{
    FileConfig, ServerConfig, DEFAULT_ENVIRONMENT, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SERVICE_NAME,
};

use crate::error::ConfigError;
use std::path::Path;

/// Load, merge and validate all configuration sources for a workspace.
///
/// This is the main entry point for configuration loading.
pub fn load_config(
    workspace_root: &Path,
    cli_options: CliOptions,
) -> Result<ServerConfig, ConfigError> {
    let global_dir = get_global_config_dir();
    load_config_with_global(global_dir.as_deref(), workspace_root, cli_options)
}

/// Like [`load_config`], reading the global config from `global_dir`.
///
/// `None` skips the global layer.
pub fn load_config_with_global(
    global_dir: Option<&Path>,
    workspace_root: &Path,
    cli_options: CliOptions,
) -> Result<ServerConfig, ConfigError> {
    let global = match global_dir {
        Some(dir) => load_global_config_from(dir)?,
        None => None,
    };
    let workspace = load_workspace_config(workspace_root)?;
    let local = load_local_config(workspace_root)?;

    let config = merge_config(global, workspace, local, cli_options);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Resolve against an isolated global dir so the machine's own
    /// `~/.simplelog` never leaks in.
    fn load(global: &TempDir, workspace: &TempDir, cli: CliOptions) -> Result<ServerConfig, ConfigError> {
        load_config_with_global(Some(global.path()), workspace.path(), cli)
    }

    #[test]
    fn test_load_config_with_no_files() {
        let global = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let config = load(&global, &temp, CliOptions::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_config_reads_global_dir() {
        let global = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        std::fs::write(
            global.path().join(GLOBAL_CONFIG_FILE),
            r#"{"serviceName": "Global.Api", "port": 6000}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join(".simplelog.json"), r#"{"port": 7000}"#).unwrap();

        let config = load(&global, &temp, CliOptions::default()).unwrap();
        assert_eq!(config.service_name, "Global.Api");
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn test_load_config_without_global_layer() {
        let temp = TempDir::new().unwrap();
        let config = load_config_with_global(None, temp.path(), CliOptions::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_load_config_local_overrides_workspace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".simplelog.json"),
            r#"{"port": 7000, "environment": "Staging"}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join(".simplelog.local.json"),
            r#"{"port": 7001}"#,
        )
        .unwrap();

        let global = TempDir::new().unwrap();
        let config = load(&global, &temp, CliOptions::default()).unwrap();
        assert_eq!(config.port, 7001);
        assert_eq!(config.environment, "Staging");
    }

    #[test]
    fn test_load_config_cli_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".simplelog.json"), r#"{"port": 7000}"#).unwrap();

        let cli = CliOptions {
            port: Some(9999),
            ..Default::default()
        };

        let global = TempDir::new().unwrap();
        let config = load(&global, &temp, cli).unwrap();
        assert_eq!(config.port, 9999); // CLI wins
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".simplelog.json"),
            r#"{"logLevel": "shouty"}"#,
        )
        .unwrap();

        let global = TempDir::new().unwrap();
        let err = load(&global, &temp, CliOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logLevel"));
    }
}
