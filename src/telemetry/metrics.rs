// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process aggregation of everything the sink emits.
//!
//! Events are counted by name, point metrics keep running statistics,
//! dependencies keep success rates and a latency histogram, and log lines are
//! counted per severity. Aggregates are cheap to read concurrently and are
//! exposed through [`Metrics::snapshot`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use super::Severity;

/// Central metrics collection.
#[derive(Debug)]
pub struct Metrics {
    /// Custom event counts by event name.
    events: RwLock<HashMap<String, u64>>,

    /// Point metric statistics by metric name.
    values: RwLock<HashMap<String, ValueMetrics>>,

    /// Dependency call statistics by dependency name.
    dependencies: RwLock<HashMap<String, DependencyMetrics>>,

    /// HTTP request timings by route.
    requests: RwLock<HashMap<String, OperationMetrics>>,

    /// Log line counts per severity.
    logs: LogCounters,

    /// Start time for calculating uptime.
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
            dependencies: RwLock::new(HashMap::new()),
            requests: RwLock::new(HashMap::new()),
            logs: LogCounters::new(),
            start_time: Instant::now(),
        }
    }

    /// Count one occurrence of a named event.
    pub fn record_event(&self, name: &str) {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        *events.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Record a point metric value.
    pub fn record_value(&self, name: &str, value: f64) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values
            .entry(name.to_string())
            .or_insert_with(ValueMetrics::new)
            .record(value);
    }

    /// Record a dependency call.
    pub fn record_dependency(&self, name: &str, duration: Duration, success: bool) {
        let mut deps = self
            .dependencies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        deps.entry(name.to_string())
            .or_insert_with(DependencyMetrics::new)
            .record(duration, success);
    }

    /// Record a served HTTP request.
    pub fn record_request(&self, route: &str, duration: Duration) {
        let mut requests = self.requests.write().unwrap_or_else(PoisonError::into_inner);
        requests
            .entry(route.to_string())
            .or_insert_with(OperationMetrics::new)
            .record(duration);
    }

    /// Count one log line at the given severity.
    pub fn record_log(&self, severity: Severity) {
        self.logs.increment(severity);
    }

    /// Number of times an event was emitted.
    pub fn event_count(&self, name: &str) -> u64 {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Get statistics for a specific point metric.
    pub fn value_metrics(&self, name: &str) -> Option<ValueMetrics> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Get statistics for a specific dependency.
    pub fn dependency_metrics(&self, name: &str) -> Option<DependencyMetrics> {
        self.dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Get timings for a specific route.
    pub fn request_metrics(&self, route: &str) -> Option<OperationMetrics> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(route)
            .cloned()
    }

    /// Number of log lines recorded at a severity.
    pub fn log_count(&self, severity: Severity) -> u64 {
        self.logs.get(severity)
    }

    /// Get uptime since metrics were initialized.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let dependencies = self
            .dependencies
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            events: events.clone(),
            values: values.clone(),
            dependencies: dependencies.clone(),
            requests: requests.clone(),
            logs: self.logs.snapshot(),
            uptime: self.uptime(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.events.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.values.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.dependencies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.requests.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.logs.reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Running statistics for a point metric.
#[derive(Debug, Clone, Serialize)]
pub struct ValueMetrics {
    /// Number of recorded values.
    pub count: u64,

    /// Sum of all recorded values.
    pub sum: f64,

    /// Smallest recorded value.
    pub min: f64,

    /// Largest recorded value.
    pub max: f64,

    /// Most recent value.
    pub last: f64,
}

impl ValueMetrics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            last: 0.0,
        }
    }

    /// Record a value.
    pub fn record(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.last = value;
    }

    /// Mean of all recorded values.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl Default for ValueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics for a specific dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyMetrics {
    /// Total number of calls.
    pub calls: u64,

    /// Number of successful calls.
    pub successes: u64,

    /// Number of failed calls.
    pub failures: u64,

    /// Total time spent in this dependency.
    #[serde(rename = "totalMs", serialize_with = "serialize_millis")]
    pub total_duration: Duration,

    /// Maximum call duration.
    #[serde(rename = "maxMs", serialize_with = "serialize_millis")]
    pub max_duration: Duration,

    /// Latency distribution.
    pub histogram: Histogram,
}

impl DependencyMetrics {
    /// Create new empty dependency metrics.
    pub fn new() -> Self {
        Self {
            calls: 0,
            successes: 0,
            failures: 0,
            total_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    /// Record a dependency call.
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.calls += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.total_duration += duration;
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Calculate average call time.
    pub fn avg_duration(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.calls as u32
        }
    }

    /// Calculate success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.calls == 0 {
            1.0
        } else {
            self.successes as f64 / self.calls as f64
        }
    }
}

impl Default for DependencyMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic operation metrics with histogram.
#[derive(Debug, Clone, Serialize)]
pub struct OperationMetrics {
    /// Number of operations.
    pub count: u64,

    /// Total duration.
    #[serde(rename = "totalMs", serialize_with = "serialize_millis")]
    pub total_duration: Duration,

    /// Maximum duration.
    #[serde(rename = "maxMs", serialize_with = "serialize_millis")]
    pub max_duration: Duration,

    /// Histogram buckets for latency distribution.
    pub histogram: Histogram,
}

impl OperationMetrics {
    /// Create new operation metrics.
    pub fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    /// Record an operation.
    pub fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Calculate average duration.
    pub fn avg_duration(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.count as u32
        }
    }
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple histogram with fixed buckets for latency tracking.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Bucket boundaries in microseconds.
    /// Default: [1ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, +inf]
    buckets: Vec<u64>,

    /// Count per bucket.
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in microseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    /// Record a duration value.
    pub fn record(&mut self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    /// Get counts for each bucket.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get bucket boundaries.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Calculate approximate percentile (p50, p90, p99, etc.).
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                // Overflow bucket reports ten times the last boundary
                let micros = if i < self.buckets.len() {
                    self.buckets[i]
                } else {
                    self.buckets.last().copied().unwrap_or(0) * 10
                };
                return Duration::from_micros(micros);
            }
        }

        Duration::ZERO
    }

    /// Get p50 (median) latency.
    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    /// Get p99 latency.
    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_buckets(vec![
            1_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000,
        ])
    }
}

/// Thread-safe log line counters.
#[derive(Debug)]
struct LogCounters {
    debug: AtomicU64,
    info: AtomicU64,
    warning: AtomicU64,
    error: AtomicU64,
    critical: AtomicU64,
}

impl LogCounters {
    fn new() -> Self {
        Self {
            debug: AtomicU64::new(0),
            info: AtomicU64::new(0),
            warning: AtomicU64::new(0),
            error: AtomicU64::new(0),
            critical: AtomicU64::new(0),
        }
    }

    fn counter(&self, severity: Severity) -> &AtomicU64 {
        match severity {
            Severity::Debug => &self.debug,
            Severity::Information => &self.info,
            Severity::Warning => &self.warning,
            Severity::Error => &self.error,
            Severity::Critical => &self.critical,
        }
    }

    fn increment(&self, severity: Severity) {
        self.counter(severity).fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self, severity: Severity) -> u64 {
        self.counter(severity).load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> LogCounts {
        LogCounts {
            debug: self.get(Severity::Debug),
            information: self.get(Severity::Information),
            warning: self.get(Severity::Warning),
            error: self.get(Severity::Error),
            critical: self.get(Severity::Critical),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.debug,
            &self.info,
            &self.warning,
            &self.error,
            &self.critical,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Log line counts at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogCounts {
    pub debug: u64,
    pub information: u64,
    pub warning: u64,
    pub error: u64,
    pub critical: u64,
}

/// A snapshot of all metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Event counts by name.
    pub events: HashMap<String, u64>,

    /// Point metric statistics by name.
    pub values: HashMap<String, ValueMetrics>,

    /// Dependency statistics by name.
    pub dependencies: HashMap<String, DependencyMetrics>,

    /// Request timings by route.
    pub requests: HashMap<String, OperationMetrics>,

    /// Log line counts.
    pub logs: LogCounts,

    /// Uptime when snapshot was taken.
    #[serde(rename = "uptimeMs", serialize_with = "serialize_millis")]
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Telemetry Report ===\n\n");
        report.push_str(&format!("Uptime: {:.2?}\n", self.uptime));
        report.push_str(&format!(
            "Logs: {} debug, {} info, {} warning, {} error, {} critical\n\n",
            self.logs.debug,
            self.logs.information,
            self.logs.warning,
            self.logs.error,
            self.logs.critical
        ));

        if !self.events.is_empty() {
            report.push_str("Events:\n");
            for (name, count) in &self.events {
                report.push_str(&format!("  {}: {}\n", name, count));
            }
            report.push('\n');
        }

        if !self.values.is_empty() {
            report.push_str("Metrics:\n");
            for (name, stats) in &self.values {
                report.push_str(&format!(
                    "  {}: {} values, mean {:.2}, last {:.2}\n",
                    name,
                    stats.count,
                    stats.mean(),
                    stats.last
                ));
            }
            report.push('\n');
        }

        if !self.dependencies.is_empty() {
            report.push_str("Dependencies:\n");
            for (name, stats) in &self.dependencies {
                report.push_str(&format!(
                    "  {}: {} calls, {:.1}% success, avg {:.2?}\n",
                    name,
                    stats.calls,
                    stats.success_rate() * 100.0,
                    stats.avg_duration()
                ));
            }
            report.push('\n');
        }

        if !self.requests.is_empty() {
            report.push_str("Requests:\n");
            for (route, stats) in &self.requests {
                report.push_str(&format!(
                    "  {}: {} requests, avg {:.2?}, p99 {:.2?}\n",
                    route,
                    stats.count,
                    stats.avg_duration(),
                    stats.histogram.p99()
                ));
            }
        }

        report
    }
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
