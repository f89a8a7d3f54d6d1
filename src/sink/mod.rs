// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry sink abstraction.
//!
//! Everything the service emits goes through the [`TelemetrySink`] trait:
//! log lines at five severities, named events with a property bag, point
//! metrics, and timed dependency calls.
//!
//! - [`TracingSink`] - emits through `tracing` and aggregates into [`Metrics`](crate::telemetry::Metrics)
//! - [`RecordingSink`] - keeps every call in memory, for tests and benches
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use simplelog::sink::{SharedSink, TracingSink};
//! use simplelog::telemetry::Metrics;
//!
//! let metrics = Arc::new(Metrics::new());
//! let sink: SharedSink = Arc::new(TracingSink::new("SimpleLog.Api", metrics));
//! sink.log_info("ready");
//! ```

mod recording;
mod tracing_sink;

pub use recording::{RecordedCall, RecordingSink};
pub use tracing_sink::TracingSink;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::events::EventProperties;

/// Numeric measurements attached to an event.
pub type EventMetrics = IndexMap<String, f64>;

/// Shared, thread-safe sink handle.
pub type SharedSink = Arc<dyn TelemetrySink>;

/// Destination for logs, events, metrics and dependency records.
///
/// Implementations must be safe to call from many tasks at once. Sinks never
/// fail: delivery problems are the sink's own concern.
pub trait TelemetrySink: Send + Sync {
    /// Log an informational message.
    fn log_info(&self, message: &str);

    /// Log a warning.
    fn log_warning(&self, message: &str);

    /// Log an error, optionally with the error that caused it.
    fn log_error(&self, message: &str, error: Option<&dyn Error>);

    /// Log a debug message.
    fn log_debug(&self, message: &str);

    /// Log a critical failure, optionally with its cause.
    fn log_critical(&self, message: &str, error: Option<&dyn Error>);

    /// Track a named event.
    fn track_event(
        &self,
        name: &str,
        properties: Option<&EventProperties>,
        metrics: Option<&EventMetrics>,
    );

    /// Track a single metric value.
    fn track_metric(&self, name: &str, value: f64, properties: Option<&EventProperties>);

    /// Track a completed call to an external dependency.
    fn track_dependency(&self, dependency: &Dependency);
}

/// A completed call to something outside the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Kind of dependency, e.g. `HTTP` or `SQL`.
    pub type_name: String,
    /// Target name, e.g. `ExternalAPI`.
    pub name: String,
    /// Command or request text.
    pub data: String,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "durationMs", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub success: bool,
}

impl Dependency {
    /// A dependency call of `duration` that ended just now.
    ///
    /// Returns `None` when the start time would fall outside the
    /// representable date range.
    pub fn ending_now(
        type_name: impl Into<String>,
        name: impl Into<String>,
        data: impl Into<String>,
        duration: Duration,
        success: bool,
    ) -> Option<Self> {
        let elapsed = chrono::Duration::from_std(duration).ok()?;
        let start_time = Utc::now().checked_sub_signed(elapsed)?;
        Some(Self {
            type_name: type_name.into(),
            name: name.into(),
            data: data.into(),
            start_time,
            duration,
            success,
        })
    }

    /// Wall-clock end of the call, `None` if it is not representable.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        let elapsed = chrono::Duration::from_std(self.duration).ok()?;
        self.start_time.checked_add_signed(elapsed)
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_ending_now() {
        let before = Utc::now();
        let dep = Dependency::ending_now(
            "HTTP",
            "ExternalAPI",
            "GET /api/data",
            Duration::from_secs(2),
            true,
        )
        .unwrap();
        let after = Utc::now();

        let two = chrono::Duration::seconds(2);
        assert!(dep.start_time >= before - two);
        assert!(dep.start_time <= after - two);
        assert_eq!(
            dep.end_time().unwrap() - dep.start_time,
            chrono::Duration::seconds(2)
        );
    }

    #[test]
    fn test_dependency_ending_now_out_of_range() {
        let huge = Duration::from_secs_f64(1e13);
        assert!(Dependency::ending_now("SQL", "db", "", huge, true).is_none());
        assert!(Dependency::ending_now("SQL", "db", "", Duration::MAX, true).is_none());
    }

    #[test]
    fn test_dependency_end_time_out_of_range() {
        let dep = Dependency {
            type_name: "SQL".to_string(),
            name: "db".to_string(),
            data: String::new(),
            start_time: Utc::now(),
            duration: Duration::from_secs_f64(1e13),
            success: true,
        };
        assert!(dep.end_time().is_none());
    }

    #[test]
    fn test_dependency_serializes_camel_case() {
        let dep = Dependency::ending_now(
            "SQL",
            "orders",
            "SELECT 1",
            Duration::from_millis(250),
            false,
        )
        .unwrap();
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json["typeName"], "SQL");
        assert_eq!(json["durationMs"], 250.0);
        assert_eq!(json["success"], false);
        assert!(json.get("startTime").is_some());
    }

    #[test]
    fn test_shared_sink_dispatch() {
        let recording = Arc::new(RecordingSink::new());
        let sink: SharedSink = recording.clone();
        sink.log_info("hello");
        sink.track_metric("Latency", 1.5, None);
        assert_eq!(recording.call_count(), 2);
    }
}
