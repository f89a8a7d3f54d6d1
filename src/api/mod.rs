// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP surface.
//!
//! - `/api/login` - login events
//! - `/api/workflow/{approve,sendback,reject}` - workflow action events
//! - `/api/monitoring/*` - direct access to every sink operation
//! - `/api/custom-events/*` - the custom event logger
//! - `/api/health`, `/api/health/detailed` - liveness
//!
//! Every request passes through [`middleware::correlate`], which assigns a
//! correlation id, opens the `request` span and times the request.

mod custom_events;
mod error;
mod health;
mod login;
pub mod middleware;
mod monitoring;
mod workflow;

pub use error::{ApiError, ApiResult, ReportedError, BODY_REQUIRED};

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Json, Router};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::events::CustomEventLogger;
use crate::sink::{SharedSink, TracingSink};
use crate::telemetry::Metrics;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub sink: SharedSink,
    pub custom_events: CustomEventLogger,
    pub metrics: Arc<Metrics>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, sink: SharedSink, metrics: Arc<Metrics>) -> Self {
        Self {
            custom_events: CustomEventLogger::new(Arc::clone(&sink)),
            sink,
            metrics,
            config: Arc::new(config),
        }
    }

    /// State backed by a [`TracingSink`] named after the configured service.
    pub fn with_tracing_sink(config: ServerConfig) -> Self {
        let metrics = Arc::new(Metrics::new());
        let sink: SharedSink = Arc::new(TracingSink::new(
            config.service_name.clone(),
            Arc::clone(&metrics),
        ));
        Self::new(config, sink, metrics)
    }
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(login::endpoints())
        .nest("/api/workflow", workflow::endpoints())
        .nest("/api/monitoring", monitoring::endpoints())
        .nest("/api/custom-events", custom_events::endpoints())
        .merge(health::endpoints())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::correlate,
        ))
        .with_state(state)
}

/// `{"message": ...}` body used by the monitoring and custom event surface.
#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub(crate) fn json(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Absent or unreadable bodies read as empty so the field checks report them.
pub(crate) fn body_or_default<T: Default>(body: Result<Json<T>, JsonRejection>) -> T {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable request body");
            T::default()
        }
    }
}
