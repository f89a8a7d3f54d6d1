// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SimpleLog - structured event enrichment for application telemetry.
//!
//! Turns login attempts, workflow actions and free-form custom events into
//! consistently shaped telemetry events, and serves them over a small HTTP API.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`events`] - Validation and property enrichment for login, workflow and custom events
//! - [`sink`] - The telemetry sink abstraction and its implementations
//! - [`telemetry`] - Tracing setup, metrics aggregation, correlation ids and spans
//! - [`api`] - HTTP handlers and the router
//! - [`config`] - Configuration loading and merging
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use simplelog::events::{try_track_login, LoginEvent};
//! use simplelog::sink::TracingSink;
//! use simplelog::telemetry::Metrics;
//!
//! let sink = TracingSink::new("SimpleLog.Api", Arc::new(Metrics::new()));
//! let login = LoginEvent::new("u1", true).with_ip_address("10.0.0.1");
//! let event = try_track_login(&sink, &login)?;
//! assert_eq!(event.name, "UserLogin");
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod sink;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use error::{ConfigError, Result, TelemetryError, ValidationError};
pub use events::{
    try_track_login, try_track_workflow_action, CustomEventLogger, EventProperties, LogLevel,
    LoginEvent, TrackedEvent, WorkflowAction, WorkflowActionEvent,
};
pub use sink::{Dependency, EventMetrics, RecordingSink, SharedSink, TelemetrySink, TracingSink};

/// SimpleLog version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
