// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry initialization and configuration.
//!
//! Logging is process-wide state owned by the entry point: call
//! [`init_telemetry`] before anything logs and keep the returned
//! [`TelemetryGuard`] alive until shutdown. Dropping the guard flushes
//! buffered file output.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::TelemetryError;

/// File name prefix for rolling log files.
pub const LOG_FILE_PREFIX: &str = "simplelog";

/// File name suffix for rolling log files.
pub const LOG_FILE_SUFFIX: &str = "log";

/// Default number of daily log files kept on disk.
pub const DEFAULT_LOG_RETENTION: usize = 14;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,

    /// Whether to include span events (enter/exit).
    pub include_span_events: bool,

    /// Whether to include file/line information.
    pub include_file_line: bool,

    /// Whether to include target module path.
    pub include_target: bool,

    /// Whether to use ANSI colors in output.
    pub ansi_colors: bool,

    /// Whether to use compact log format.
    pub compact: bool,

    /// Custom filter directive (overrides default_level).
    pub filter_directive: Option<String>,

    /// Directory for daily rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,

    /// Number of rolled files to keep.
    pub log_retention: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_span_events: false,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            compact: true,
            filter_directive: None,
            log_dir: None,
            log_retention: DEFAULT_LOG_RETENTION,
        }
    }
}

impl TelemetryConfig {
    /// Create a config suitable for development with verbose output.
    pub fn development() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_span_events: true,
            include_file_line: true,
            compact: false,
            ..Self::default()
        }
    }

    /// Create a config suitable for production with minimal output.
    pub fn production() -> Self {
        Self {
            default_level: Level::INFO,
            include_target: false,
            ansi_colors: false,
            ..Self::default()
        }
    }

    /// Create a config for testing with trace-level output.
    pub fn testing() -> Self {
        Self {
            default_level: Level::TRACE,
            include_span_events: true,
            include_file_line: true,
            ansi_colors: false,
            compact: false,
            filter_directive: Some("simplelog=trace".to_string()),
            ..Self::default()
        }
    }

    /// Pick the preset matching a deployment environment name.
    pub fn for_environment(environment: &str) -> Self {
        match environment.to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Self::development(),
            "testing" | "test" => Self::testing(),
            _ => Self::production(),
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_directive = Some(filter.into());
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    /// Write daily rolling log files into `dir`, keeping `retention` files.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>, retention: usize) -> Self {
        self.log_dir = Some(dir.into());
        self.log_retention = retention.max(1);
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        match &self.filter_directive {
            Some(directive) => EnvFilter::try_new(directive)
                .map_err(|e| TelemetryError::InvalidFilter(e.to_string())),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_level.to_string()))),
        }
    }
}

/// Guard that flushes telemetry on drop.
///
/// Keep this guard alive for the duration of your program.
pub struct TelemetryGuard {
    file_guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    /// Whether log lines are also written to rolling files.
    pub fn writes_files(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Flush buffered output and release the writer.
    pub fn flush(self) {
        tracing::debug!(files = self.writes_files(), "flushing telemetry");
        drop(self);
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        // WorkerGuard drains the non-blocking writer when it drops
        self.file_guard.take();
    }
}

/// Initialize telemetry with the given configuration.
///
/// This should be called once at application startup.
///
/// # Example
///
/// ```rust,ignore
/// use simplelog::telemetry::{init_telemetry, TelemetryConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let guard = init_telemetry(&TelemetryConfig::default())?;
///
///     // Your application code here
///
///     guard.flush();
///     Ok(())
/// }
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // RUST_LOG takes precedence unless an explicit directive is configured
    let filter = config.env_filter()?;

    let span_events = if config.include_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (file_writer, file_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.log_retention)
                .build(dir)
                .map_err(|e| TelemetryError::Appender(e.to_string()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
    });

    let fmt_layer = fmt::layer()
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .with_span_events(span_events);

    if config.compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt_layer.compact())
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    }

    Ok(TelemetryGuard { file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.ansi_colors);
        assert!(config.compact);
        assert!(config.log_dir.is_none());
        assert_eq!(config.log_retention, 14);
    }

    #[test]
    fn test_telemetry_config_development() {
        let config = TelemetryConfig::development();
        assert_eq!(config.default_level, Level::DEBUG);
        assert!(config.include_span_events);
    }

    #[test]
    fn test_telemetry_config_for_environment() {
        assert_eq!(
            TelemetryConfig::for_environment("Development").default_level,
            Level::DEBUG
        );
        let prod = TelemetryConfig::for_environment("Production");
        assert!(!prod.ansi_colors);
        assert!(!prod.include_span_events);
    }

    #[test]
    fn test_telemetry_config_builder() {
        let config = TelemetryConfig::default()
            .with_level(Level::DEBUG)
            .with_filter("simplelog=trace")
            .with_ansi(false)
            .with_log_dir("/tmp/logs", 0);

        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.filter_directive, Some("simplelog=trace".to_string()));
        assert!(!config.ansi_colors);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.log_retention, 1);
    }

    #[test]
    fn test_invalid_filter_directive() {
        let config = TelemetryConfig::default().with_filter("simplelog=notalevel");
        assert!(matches!(
            config.env_filter(),
            Err(TelemetryError::InvalidFilter(_))
        ));
    }
}
