// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sink backed by `tracing` and the in-process metrics registry.

use std::error::Error;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{Dependency, EventMetrics, TelemetrySink};
use crate::events::EventProperties;
use crate::telemetry::{Metrics, Severity};

/// Emits every call as a structured `tracing` event and aggregates it.
///
/// Every record carries an `application` field. Property bags are rendered
/// as a JSON object so their key order survives into the log output.
#[derive(Debug, Clone)]
pub struct TracingSink {
    application: String,
    metrics: Arc<Metrics>,
}

impl TracingSink {
    pub fn new(application: impl Into<String>, metrics: Arc<Metrics>) -> Self {
        Self {
            application: application.into(),
            metrics,
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

impl TelemetrySink for TracingSink {
    fn log_info(&self, message: &str) {
        self.metrics.record_log(Severity::Information);
        info!(application = %self.application, "{message}");
    }

    fn log_warning(&self, message: &str) {
        self.metrics.record_log(Severity::Warning);
        warn!(application = %self.application, "{message}");
    }

    fn log_error(&self, message: &str, err: Option<&dyn Error>) {
        self.metrics.record_log(Severity::Error);
        match err {
            Some(e) => error!(
                application = %self.application,
                error = %error_chain(e),
                "{message}"
            ),
            None => error!(application = %self.application, "{message}"),
        }
    }

    fn log_debug(&self, message: &str) {
        self.metrics.record_log(Severity::Debug);
        debug!(application = %self.application, "{message}");
    }

    fn log_critical(&self, message: &str, err: Option<&dyn Error>) {
        self.metrics.record_log(Severity::Critical);
        match err {
            Some(e) => error!(
                application = %self.application,
                severity = Severity::Critical.as_str(),
                error = %error_chain(e),
                "{message}"
            ),
            None => error!(
                application = %self.application,
                severity = Severity::Critical.as_str(),
                "{message}"
            ),
        }
    }

    fn track_event(
        &self,
        name: &str,
        properties: Option<&EventProperties>,
        metrics: Option<&EventMetrics>,
    ) {
        self.metrics.record_event(name);
        if let Some(values) = metrics {
            for (key, value) in values {
                self.metrics.record_value(&format!("{name}.{key}"), *value);
            }
        }

        info!(
            application = %self.application,
            event = %name,
            properties = %render(properties),
            metrics = %render(metrics),
            "event tracked"
        );
    }

    fn track_metric(&self, name: &str, value: f64, properties: Option<&EventProperties>) {
        self.metrics.record_value(name, value);
        info!(
            application = %self.application,
            metric = %name,
            value,
            properties = %render(properties),
            "metric tracked"
        );
    }

    fn track_dependency(&self, dependency: &Dependency) {
        self.metrics
            .record_dependency(&dependency.name, dependency.duration, dependency.success);
        info!(
            application = %self.application,
            dependency_type = %dependency.type_name,
            dependency_name = %dependency.name,
            data = %dependency.data,
            start_time = %dependency.start_time.to_rfc3339(),
            duration_ms = dependency.duration.as_secs_f64() * 1000.0,
            success = dependency.success,
            "dependency tracked"
        );
    }
}

/// Render an optional bag as compact JSON, `{}` when absent.
fn render<T: serde::Serialize>(value: Option<&T>) -> String {
    value
        .and_then(|v| serde_json::to_string(v).ok())
        .unwrap_or_else(|| "{}".to_string())
}

/// Error message followed by each of its sources.
fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
