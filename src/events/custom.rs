// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Free-form custom events.
//!
//! A custom event is a name plus positional attributes. Attributes are stored
//! as `attr0`, `attr1`, ... in the order given. Every event is paired with a
//! `Custom event: <name>` log line at the requested level.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{is_blank, EventProperties, TrackedEvent};
use crate::error::ValidationError;
use crate::sink::TelemetrySink;

/// Error text for an unrecognised level name.
pub const INVALID_LOG_LEVEL: &str =
    "Invalid LogLevel. Allowed values: Trace, Debug, Information, Warning, Error, Critical, None";

/// Level of the log line accompanying a custom event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    /// Emit the event without a log line.
    None,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "information" => Ok(LogLevel::Information),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "none" => Ok(LogLevel::None),
            _ => Err(INVALID_LOG_LEVEL.to_string()),
        }
    }
}

/// Emits custom events through an injected sink.
#[derive(Clone)]
pub struct CustomEventLogger {
    sink: Arc<dyn TelemetrySink>,
}

impl CustomEventLogger {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }

    /// Emit a custom event with an information-level log line.
    pub fn log_custom_event(
        &self,
        event_name: &str,
        attributes: &[&str],
    ) -> Result<TrackedEvent, ValidationError> {
        self.log_custom_event_with_level(event_name, LogLevel::Information, attributes)
    }

    /// Emit a custom event with a log line at `level`.
    ///
    /// The sink has no trace channel, so `LogLevel::Trace` is written through
    /// `log_debug`.
    pub fn log_custom_event_with_level(
        &self,
        event_name: &str,
        level: LogLevel,
        attributes: &[&str],
    ) -> Result<TrackedEvent, ValidationError> {
        if is_blank(event_name) {
            return Err(ValidationError::event_name());
        }

        let event = TrackedEvent::new(event_name, positional(EventProperties::new(), attributes));
        event.emit(self.sink.as_ref());

        let message = format!("Custom event: {event_name}");
        match level {
            LogLevel::Trace | LogLevel::Debug => self.sink.log_debug(&message),
            LogLevel::Information => self.sink.log_info(&message),
            LogLevel::Warning => self.sink.log_warning(&message),
            LogLevel::Error => self.sink.log_error(&message, None),
            LogLevel::Critical => self.sink.log_critical(&message, None),
            LogLevel::None => {}
        }
        Ok(event)
    }

    /// Emit a custom event describing a failure.
    ///
    /// The bag carries `exception.type` and `exception.message` ahead of the
    /// positional attributes, and the log line is written at error level.
    pub fn log_custom_event_with_error<E>(
        &self,
        event_name: &str,
        error: &E,
        attributes: &[&str],
    ) -> Result<TrackedEvent, ValidationError>
    where
        E: std::error::Error + 'static,
    {
        if is_blank(event_name) {
            return Err(ValidationError::event_name());
        }

        let mut properties = EventProperties::new();
        properties.insert("exception.type", std::any::type_name::<E>());
        properties.insert("exception.message", error.to_string());

        let event = TrackedEvent::new(event_name, positional(properties, attributes));
        event.emit(self.sink.as_ref());
        self.sink.log_error(
            &format!("Custom event: {event_name}"),
            Some(error as &dyn std::error::Error),
        );
        Ok(event)
    }
}

fn positional(mut properties: EventProperties, attributes: &[&str]) -> EventProperties {
    for (i, value) in attributes.iter().enumerate() {
        properties.insert(format!("attr{i}"), *value);
    }
    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordedCall, RecordingSink};
    use crate::telemetry::Severity;

    #[derive(Debug, thiserror::Error)]
    #[error("Database connection failed")]
    struct DatabaseDown;

    fn logger() -> (Arc<RecordingSink>, CustomEventLogger) {
        let sink = Arc::new(RecordingSink::new());
        let logger = CustomEventLogger::new(sink.clone());
        (sink, logger)
    }

    #[test]
    fn test_custom_event_with_attributes() {
        let (sink, logger) = logger();
        let event = logger
            .log_custom_event("user-login", &["admin", "192.168.1.1"])
            .unwrap();

        assert_eq!(event.properties.get("attr0"), Some("admin"));
        assert_eq!(event.properties.get("attr1"), Some("192.168.1.1"));
        assert_eq!(sink.events().len(), 1);
        assert_eq!(
            sink.logs(),
            vec![(Severity::Information, "Custom event: user-login".to_string())]
        );
    }

    #[test]
    fn test_custom_event_rejects_blank_name() {
        let (sink, logger) = logger();
        let err = logger.log_custom_event("  ", &[]).unwrap_err();
        assert_eq!(err.message(), "Event name cannot be null or empty.");
        assert_eq!(sink.call_count(), 0);
    }

    #[test]
    fn test_custom_event_levels() {
        let (sink, logger) = logger();
        logger
            .log_custom_event_with_level("critical-action", LogLevel::Warning, &["details"])
            .unwrap();
        logger
            .log_custom_event_with_level("quiet", LogLevel::None, &[])
            .unwrap();

        assert_eq!(sink.events().len(), 2);
        assert_eq!(
            sink.logs(),
            vec![(Severity::Warning, "Custom event: critical-action".to_string())]
        );
    }

    #[test]
    fn test_custom_event_trace_logs_at_debug() {
        let (sink, logger) = logger();
        logger
            .log_custom_event_with_level("cache-miss", LogLevel::Trace, &["key"])
            .unwrap();

        assert_eq!(sink.events().len(), 1);
        assert_eq!(
            sink.logs(),
            vec![(Severity::Debug, "Custom event: cache-miss".to_string())]
        );
    }

    #[test]
    fn test_custom_event_with_error() {
        let (sink, logger) = logger();
        let event = logger
            .log_custom_event_with_error("error-occurred", &DatabaseDown, &["retrying"])
            .unwrap();

        let keys: Vec<_> = event.properties.keys().collect();
        assert_eq!(keys, vec!["exception.type", "exception.message", "attr0"]);
        assert!(event
            .properties
            .get("exception.type")
            .unwrap()
            .ends_with("DatabaseDown"));
        assert_eq!(
            event.properties.get("exception.message"),
            Some("Database connection failed")
        );

        let calls = sink.calls();
        assert!(matches!(
            &calls[1],
            RecordedCall::Log { severity: Severity::Error, error: Some(e), .. }
                if e == "Database connection failed"
        ));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("CRITICAL".parse::<LogLevel>(), Ok(LogLevel::Critical));
        assert_eq!("None".parse::<LogLevel>(), Ok(LogLevel::None));
        assert_eq!("loud".parse::<LogLevel>(), Err(INVALID_LOG_LEVEL.to_string()));
    }
}
