// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::AppState;
use crate::events::EventProperties;

const HEALTHY: &str = "Healthy";

pub(crate) fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/health/detailed", get(detailed))
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    service: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DetailedHealthResponse {
    #[serde(flatten)]
    summary: HealthResponse,
    version: &'static str,
    environment: String,
    /// Seconds since the service started.
    uptime: f64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    state.sink.log_info("Health check endpoint called");

    let now = Utc::now();
    let properties: EventProperties = [
        ("Status", HEALTHY.to_string()),
        ("Timestamp", now.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    ]
    .into_iter()
    .collect();
    state
        .sink
        .track_event("HealthCheckPerformed", Some(&properties), None);

    Json(HealthResponse {
        status: HEALTHY,
        timestamp: now,
        service: state.config.service_name.clone(),
    })
}

async fn detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    state.sink.log_debug("Detailed health check endpoint called");

    let uptime = state.metrics.uptime().as_secs_f64();
    state.sink.track_metric("ServiceUptime", uptime, None);

    Json(DetailedHealthResponse {
        summary: HealthResponse {
            status: HEALTHY,
            timestamp: Utc::now(),
            service: state.config.service_name.clone(),
        },
        version: crate::VERSION,
        environment: state.config.environment.clone(),
        uptime,
    })
}
