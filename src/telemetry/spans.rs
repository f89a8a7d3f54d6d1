// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span helpers for consistent instrumentation.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info_span, Span};

use crate::sink::Dependency;

/// Extension trait for enhanced span functionality.
pub trait SpanExt {
    /// Record an HTTP status code.
    fn record_status(&self, status: u16);
}

impl SpanExt for Span {
    fn record_status(&self, status: u16) {
        self.record("status", status);
    }
}

/// Timer for an outbound call.
///
/// Captures the wall-clock start for the dependency record and a monotonic
/// start for the duration. Finishing yields a [`Dependency`] ready to hand to
/// a sink.
pub struct DependencySpan {
    type_name: String,
    name: String,
    data: String,
    started_at: DateTime<Utc>,
    start: Instant,
    span: Span,
}

impl DependencySpan {
    /// Start timing a dependency call.
    pub fn start(type_name: &str, name: &str, data: &str) -> Self {
        let span = info_span!(
            "dependency",
            dependency_type = %type_name,
            dependency_name = %name,
            duration_ms = tracing::field::Empty,
            success = tracing::field::Empty,
        );

        Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            data: data.to_string(),
            started_at: Utc::now(),
            start: Instant::now(),
            span,
        }
    }

    /// Get elapsed time so far.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Stop the timer and build the dependency record.
    pub fn finish(self, success: bool) -> Dependency {
        let duration = self.start.elapsed();

        self.span
            .record("duration_ms", duration.as_secs_f64() * 1000.0);
        self.span.record("success", success);

        Dependency {
            type_name: self.type_name,
            name: self.name,
            data: self.data,
            start_time: self.started_at,
            duration,
            success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_span_lifecycle() {
        let before = Utc::now();
        let span = DependencySpan::start("HTTP", "ExternalAPI", "GET /api/data");
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(span.elapsed().as_micros() > 0);

        let dependency = span.finish(true);
        assert_eq!(dependency.type_name, "HTTP");
        assert_eq!(dependency.name, "ExternalAPI");
        assert_eq!(dependency.data, "GET /api/data");
        assert!(dependency.success);
        assert!(dependency.start_time >= before);
        assert!(dependency.duration >= std::time::Duration::from_millis(2));
    }

    #[test]
    fn test_dependency_span_failure() {
        let span = DependencySpan::start("InMemory", "Generate", "");
        let dependency = span.finish(false);
        assert!(!dependency.success);
    }

    #[test]
    fn test_span_ext() {
        let span = info_span!("test", status = tracing::field::Empty);
        span.record_status(200);
    }
}
