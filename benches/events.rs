// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for event enrichment.
//!
//! These measure the cost the helpers add on top of the sink:
//! - Login and workflow validation and property building
//! - Custom event attribute expansion
//! - Tracing sink dispatch with metrics aggregation
//!
//! Run with: `cargo bench --bench events`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::error::Error;
use std::hint::black_box;
use std::sync::Arc;

use simplelog::events::{
    try_track_login, try_track_workflow_action, CustomEventLogger, EventProperties, LogLevel,
    LoginEvent, WorkflowActionEvent,
};
use simplelog::sink::{Dependency, EventMetrics, TelemetrySink, TracingSink};
use simplelog::telemetry::Metrics;

/// Sink that discards everything, so only enrichment is measured.
struct NullSink;

impl TelemetrySink for NullSink {
    fn log_info(&self, _message: &str) {}
    fn log_warning(&self, _message: &str) {}
    fn log_error(&self, _message: &str, _error: Option<&dyn Error>) {}
    fn log_debug(&self, _message: &str) {}
    fn log_critical(&self, _message: &str, _error: Option<&dyn Error>) {}
    fn track_event(
        &self,
        _name: &str,
        _properties: Option<&EventProperties>,
        _metrics: Option<&EventMetrics>,
    ) {
    }
    fn track_metric(&self, _name: &str, _value: f64, _properties: Option<&EventProperties>) {}
    fn track_dependency(&self, _dependency: &Dependency) {}
}

fn workflow_event(extra: usize) -> WorkflowActionEvent {
    WorkflowActionEvent {
        user_id: "u1".to_string(),
        action: "approve".to_string(),
        role: "admin".to_string(),
        permission: "write".to_string(),
        workflow_id: "wf-1024".to_string(),
        workflow_state_id: "state-7".to_string(),
        properties: (0..extra)
            .map(|i| (format!("key{i}"), format!("value{i}")))
            .collect(),
    }
}

/// Benchmark login enrichment.
fn bench_login(c: &mut Criterion) {
    let mut group = c.benchmark_group("login");
    let sink = NullSink;

    group.bench_function("minimal", |b| {
        let login = LoginEvent::new("u1", true);
        b.iter(|| black_box(try_track_login(&sink, black_box(&login))));
    });

    group.bench_function("full", |b| {
        let login = LoginEvent::new("u1", false)
            .with_ip_address("10.0.0.1")
            .with_user_agent("Mozilla/5.0")
            .with_method("password")
            .with_property("tenant", "contoso");
        b.iter(|| black_box(try_track_login(&sink, black_box(&login))));
    });

    group.bench_function("rejected", |b| {
        let login = LoginEvent::new("  ", true);
        b.iter(|| black_box(try_track_login(&sink, black_box(&login))));
    });

    group.finish();
}

/// Benchmark workflow enrichment as extension properties grow.
fn bench_workflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("workflow");
    let sink = NullSink;

    for extra in [0, 8, 64] {
        let event = workflow_event(extra);
        group.throughput(Throughput::Elements(6 + extra as u64));
        group.bench_with_input(BenchmarkId::new("extensions", extra), &event, |b, event| {
            b.iter(|| black_box(try_track_workflow_action(&sink, black_box(event))));
        });
    }

    group.finish();
}

/// Benchmark custom event attribute expansion.
fn bench_custom_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("custom_events");
    let logger = CustomEventLogger::new(Arc::new(NullSink));

    for count in [0usize, 4, 32] {
        let values: Vec<String> = (0..count).map(|i| format!("attribute-{i}")).collect();
        let attributes: Vec<&str> = values.iter().map(String::as_str).collect();
        group.bench_with_input(
            BenchmarkId::new("attributes", count),
            &attributes,
            |b, attributes| {
                b.iter(|| {
                    black_box(logger.log_custom_event_with_level(
                        "ProfileViewed",
                        LogLevel::None,
                        attributes,
                    ))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the tracing sink with no subscriber installed.
fn bench_tracing_sink(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracing_sink");
    let sink = TracingSink::new("SimpleLog.Bench", Arc::new(Metrics::new()));

    group.bench_function("login", |b| {
        let login = LoginEvent::new("u1", true).with_ip_address("10.0.0.1");
        b.iter(|| black_box(try_track_login(&sink, &login)));
    });

    group.bench_function("track_metric", |b| {
        b.iter(|| sink.track_metric("QueueDepth", black_box(7.0), None));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_login,
    bench_workflow,
    bench_custom_events,
    bench_tracing_sink,
);
criterion_main!(benches);
