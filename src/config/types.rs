// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of file-backed and resolved configuration,
//! supporting JSON and YAML formats.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::telemetry::{Severity, DEFAULT_LOG_RETENTION};

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5080;

/// Default service name stamped on every record.
pub const DEFAULT_SERVICE_NAME: &str = "SimpleLog.Api";

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "Production";

/// Server configuration as written in a config file.
/// Every key is optional; missing keys fall through to lower-precedence sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    /// Address to bind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port to listen on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Application name attached to every telemetry record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Environment name (Development, Staging, Production, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Minimum log level (debug, info, warning, error, critical)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Directory for rolling log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Number of daily log files to keep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_retention: Option<usize>,

    /// Simulated work inside `simulate-operation`, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_work_ms: Option<u64>,

    /// Simulated dependency latency inside `simulate-operation`, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_dependency_ms: Option<u64>,
}

/// Resolved configuration with all values set.
/// This is the merged result of global, workspace, local, and CLI configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub log_retention: usize,
    pub simulated_work_ms: u64,
    pub simulated_dependency_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            log_retention: DEFAULT_LOG_RETENTION,
            simulated_work_ms: 100,
            simulated_dependency_ms: 50,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed minimum log level.
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        self.log_level
            .parse()
            .map_err(|e: String| ConfigError::invalid("logLevel", e))
    }

    /// Whether the environment is a development one.
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Check values that deserialization alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::invalid("port", "must be between 1 and 65535"));
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::invalid("serviceName", "must not be empty"));
        }
        if self.log_retention == 0 {
            return Err(ConfigError::invalid("logRetention", "must keep at least one file"));
        }
        self.severity()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_default() {
        let config = FileConfig::default();
        assert!(config.host.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn test_file_config_json_serialization() {
        let config = FileConfig {
            port: Some(8080),
            service_name: Some("Orders.Api".to_string()),
            simulated_work_ms: Some(5),
            ..Default::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"port\": 8080"));
        assert!(json.contains("\"serviceName\""));
        assert!(json.contains("\"simulatedWorkMs\""));
        assert!(!json.contains("host"));

        let parsed: FileConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_file_config_yaml_serialization() {
        let parsed: FileConfig =
            serde_yaml::from_str("environment: Development\nlogDir: /var/log/simplelog\n").unwrap();
        assert_eq!(parsed.environment.as_deref(), Some("Development"));
        assert_eq!(parsed.log_dir, Some(PathBuf::from("/var/log/simplelog")));
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5080");
        assert_eq!(config.service_name, "SimpleLog.Api");
        assert_eq!(config.log_retention, 14);
        assert!(!config.is_development());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_validation() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "port"
        ));

        let config = ServerConfig {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            log_retention: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
