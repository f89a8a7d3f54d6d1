// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use std::path::PathBuf;

use super::types::{FileConfig, ServerConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Default configuration values.
pub fn default_config() -> ServerConfig {
    ServerConfig::default()
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI options
/// 2. Local config (.simplelog.local.json)
/// 3. Workspace config (.simplelog.json and friends)
/// 4. Global config (~/.simplelog/config.json)
/// 5. Default values
pub fn merge_config(
    global: Option<FileConfig>,
    workspace: Option<FileConfig>,
    local: Option<FileConfig>,
    cli: CliOptions,
) -> ServerConfig {
    let mut result = default_config();

    for config in [global, workspace, local].into_iter().flatten() {
        apply_file_config(&mut result, config);
    }

    apply_cli_options(&mut result, cli);

    result
}

fn apply_file_config(result: &mut ServerConfig, config: FileConfig) {
    if let Some(host) = config.host {
        result.host = host;
    }
    if let Some(port) = config.port {
        result.port = port;
    }
    if let Some(service_name) = config.service_name {
        result.service_name = service_name;
    }
    if let Some(environment) = config.environment {
        result.environment = environment;
    }
    if let Some(log_level) = config.log_level {
        result.log_level = log_level;
    }
    if config.log_dir.is_some() {
        result.log_dir = config.log_dir;
    }
    if let Some(retention) = config.log_retention {
        result.log_retention = retention;
    }
    if let Some(ms) = config.simulated_work_ms {
        result.simulated_work_ms = ms;
    }
    if let Some(ms) = config.simulated_dependency_ms {
        result.simulated_dependency_ms = ms;
    }
}

fn apply_cli_options(result: &mut ServerConfig, cli: CliOptions) {
    if let Some(host) = cli.host {
        result.host = host;
    }
    if let Some(port) = cli.port {
        result.port = port;
    }
    if let Some(environment) = cli.environment {
        result.environment = environment;
    }
    if let Some(log_level) = cli.log_level {
        result.log_level = log_level;
    }
    if cli.log_dir.is_some() {
        result.log_dir = cli.log_dir;
    }
}
