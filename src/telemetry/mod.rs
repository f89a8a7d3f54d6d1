// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry, tracing, and metrics infrastructure.
//!
//! This module provides the observability plumbing behind the sink:
//!
//! - **Tracing**: Structured logging, console plus optional rolling files
//! - **Metrics**: In-process aggregates of events, values and dependencies
//! - **Correlation IDs**: Request tracing across async boundaries
//!
//! # Usage
//!
//! Initialize telemetry at process start and keep the guard until exit:
//!
//! ```rust,ignore
//! use simplelog::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let guard = init_telemetry(&TelemetryConfig::default())?;
//! // ... serve ...
//! guard.flush();
//! ```

mod correlation;
mod init;
mod level;
pub mod metrics;
mod spans;

pub use correlation::{CorrelationId, CorrelationIdExt, CORRELATION_HEADER};
pub use init::{
    init_telemetry, TelemetryConfig, TelemetryGuard, DEFAULT_LOG_RETENTION, LOG_FILE_PREFIX,
    LOG_FILE_SUFFIX,
};
pub use level::Severity;
pub use metrics::{
    DependencyMetrics, Histogram, LogCounts, Metrics, MetricsSnapshot, OperationMetrics,
    ValueMetrics,
};
pub use spans::{DependencySpan, SpanExt};
