// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the SimpleLog service.
//!
//! This module provides strongly-typed errors for different parts of the application,
//! using `thiserror` for ergonomic error definitions and `anyhow` for error propagation.

use thiserror::Error;

/// Message returned when a login event has no usable user id.
pub const LOGIN_USER_ID_REQUIRED: &str = "userId is required.";

/// Message returned when any workflow field is missing.
pub const WORKFLOW_FIELDS_REQUIRED: &str =
    "All fields are required: userId, action, role, permission, workflowId, workflowStateId.";

/// Message returned when a custom event has no name.
pub const EVENT_NAME_REQUIRED: &str = "Event name cannot be null or empty.";

/// A required field was missing or blank.
///
/// This is the only error the event helpers produce. It is always returned
/// to the caller and never results in a partial emission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The login helper's failure.
    pub fn login_user_id() -> Self {
        Self::new(LOGIN_USER_ID_REQUIRED)
    }

    /// The workflow helper's failure.
    pub fn workflow_fields() -> Self {
        Self::new(WORKFLOW_FIELDS_REQUIRED)
    }

    /// The custom event logger's failure.
    pub fn event_name() -> Self {
        Self::new(EVENT_NAME_REQUIRED)
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Errors raised while bringing up logging.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to create log file appender: {0}")]
    Appender(String),

    #[error("Subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
