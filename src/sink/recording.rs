// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory sink that records every call in order.

use std::error::Error;
use std::sync::{Mutex, PoisonError};

use super::{Dependency, EventMetrics, TelemetrySink};
use crate::events::{EventProperties, TrackedEvent};
use crate::telemetry::Severity;

/// One call made against a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Log {
        severity: Severity,
        message: String,
        /// Display text of the attached error, if any.
        error: Option<String>,
    },
    Event {
        name: String,
        properties: Option<EventProperties>,
        metrics: Option<EventMetrics>,
    },
    Metric {
        name: String,
        value: f64,
        properties: Option<EventProperties>,
    },
    Dependency(Dependency),
}

/// Sink that keeps every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Tracked events, with missing property bags read as empty.
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Event {
                    name, properties, ..
                } => Some(TrackedEvent::new(
                    name.clone(),
                    properties.clone().unwrap_or_default(),
                )),
                _ => None,
            })
            .collect()
    }

    /// Log lines as `(severity, message)`.
    pub fn logs(&self) -> Vec<(Severity, String)> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Log {
                    severity, message, ..
                } => Some((*severity, message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Metric values as `(name, value)`.
    pub fn metrics(&self) -> Vec<(String, f64)> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Metric { name, value, .. } => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Dependency(dep) => Some(dep.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, call: RecordedCall) {
        self.lock().push(call);
    }

    fn push_log(&self, severity: Severity, message: &str, error: Option<&dyn Error>) {
        self.push(RecordedCall::Log {
            severity,
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        });
    }
}

impl TelemetrySink for RecordingSink {
    fn log_info(&self, message: &str) {
        self.push_log(Severity::Information, message, None);
    }

    fn log_warning(&self, message: &str) {
        self.push_log(Severity::Warning, message, None);
    }

    fn log_error(&self, message: &str, error: Option<&dyn Error>) {
        self.push_log(Severity::Error, message, error);
    }

    fn log_debug(&self, message: &str) {
        self.push_log(Severity::Debug, message, None);
    }

    fn log_critical(&self, message: &str, error: Option<&dyn Error>) {
        self.push_log(Severity::Critical, message, error);
    }

    fn track_event(
        &self,
        name: &str,
        properties: Option<&EventProperties>,
        metrics: Option<&EventMetrics>,
    ) {
        self.push(RecordedCall::Event {
            name: name.to_string(),
            properties: properties.cloned(),
            metrics: metrics.cloned(),
        });
    }

    fn track_metric(&self, name: &str, value: f64, properties: Option<&EventProperties>) {
        self.push(RecordedCall::Metric {
            name: name.to_string(),
            value,
            properties: properties.cloned(),
        });
    }

    fn track_dependency(&self, dependency: &Dependency) {
        self.push(RecordedCall::Dependency(dependency.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_records_calls_in_order() {
        let sink = RecordingSink::new();
        sink.log_warning("careful");
        sink.track_event("Started", None, None);
        sink.track_metric("Latency", 12.5, None);
        sink.track_dependency(&Dependency::ending_now(
            "HTTP",
            "ExternalAPI",
            "GET /",
            Duration::from_millis(10),
            true,
        )
        .unwrap());

        let calls = sink.calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(&calls[0], RecordedCall::Log { severity: Severity::Warning, .. }));
        assert!(matches!(&calls[1], RecordedCall::Event { properties: None, .. }));
        assert_eq!(sink.metrics(), vec![("Latency".to_string(), 12.5)]);
        assert_eq!(sink.dependencies()[0].name, "ExternalAPI");
        assert_eq!(sink.events()[0].properties.len(), 0);

        sink.clear();
        assert_eq!(sink.call_count(), 0);
    }

    #[test]
    fn test_records_error_text() {
        let sink = RecordingSink::new();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        sink.log_critical("Application terminated unexpectedly", Some(&err));

        assert_eq!(
            sink.calls(),
            vec![RecordedCall::Log {
                severity: Severity::Critical,
                message: "Application terminated unexpectedly".to_string(),
                error: Some("disk full".to_string()),
            }]
        );
    }

    #[test]
    fn test_concurrent_recording() {
        let sink = Arc::new(RecordingSink::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        sink.track_event(&format!("e{i}"), None, None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.call_count(), 400);
    }
}
