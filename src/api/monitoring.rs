// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Direct access to every sink operation, plus a simulated operation that
//! exercises them together.

use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::error::{require, ApiError, ApiResult, ReportedError};
use super::{body_or_default, AppState, MessageResponse};
use crate::events::EventProperties;
use crate::sink::{Dependency, EventMetrics};
use crate::telemetry::{DependencySpan, MetricsSnapshot};

/// Error text when `durationSeconds` reaches past the representable date range.
pub(crate) const DURATION_OUT_OF_RANGE: &str = "DurationSeconds is out of range";

/// Operation name used when the caller gives none.
pub(crate) const DEFAULT_OPERATION: &str = "TestOperation";

pub(crate) fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/log-info", post(log_info))
        .route("/log-warning", post(log_warning))
        .route("/log-error", post(log_error))
        .route("/track-event", post(track_event))
        .route("/track-metric", post(track_metric))
        .route("/track-dependency", post(track_dependency))
        .route("/custom-event", post(custom_event))
        .route("/simulate-operation", post(simulate_operation))
        .route("/metrics", get(metrics))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogMessageRequest {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogErrorRequest {
    message: Option<String>,
    exception_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackEventRequest {
    event_name: Option<String>,
    properties: Option<EventProperties>,
    metrics: Option<EventMetrics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackMetricRequest {
    metric_name: Option<String>,
    #[serde(default)]
    value: f64,
    properties: Option<EventProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TrackDependencyRequest {
    dependency_type_name: Option<String>,
    dependency_name: Option<String>,
    data: Option<String>,
    duration_seconds: f64,
    success: bool,
}

impl Default for TrackDependencyRequest {
    fn default() -> Self {
        Self {
            dependency_type_name: None,
            dependency_name: None,
            data: None,
            duration_seconds: 1.0,
            success: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomEventRequest {
    event_name: Option<String>,
    additional_attribute: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulateOperationRequest {
    operation_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulateOperationResponse {
    message: &'static str,
    operation_name: String,
    duration_ms: f64,
}

async fn log_info(
    State(state): State<AppState>,
    body: Result<Json<LogMessageRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let message = require(request.message.as_deref(), "Message")?;
    state.sink.log_info(message);
    Ok(MessageResponse::json("Information logged successfully"))
}

async fn log_warning(
    State(state): State<AppState>,
    body: Result<Json<LogMessageRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let message = require(request.message.as_deref(), "Message")?;
    state.sink.log_warning(message);
    Ok(MessageResponse::json("Warning logged successfully"))
}

async fn log_error(
    State(state): State<AppState>,
    body: Result<Json<LogErrorRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let message = require(request.message.as_deref(), "Message")?;

    let cause = request
        .exception_message
        .filter(|m| !m.trim().is_empty())
        .map(ReportedError);
    state.sink.log_error(
        message,
        cause.as_ref().map(|e| e as &dyn std::error::Error),
    );
    Ok(MessageResponse::json("Error logged successfully"))
}

async fn track_event(
    State(state): State<AppState>,
    body: Result<Json<TrackEventRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.event_name.as_deref(), "EventName")?;
    state.sink.track_event(
        name,
        request.properties.as_ref(),
        request.metrics.as_ref(),
    );
    Ok(MessageResponse::json("Event tracked successfully"))
}

async fn track_metric(
    State(state): State<AppState>,
    body: Result<Json<TrackMetricRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.metric_name.as_deref(), "MetricName")?;
    state
        .sink
        .track_metric(name, request.value, request.properties.as_ref());
    Ok(MessageResponse::json("Metric tracked successfully"))
}

async fn track_dependency(
    State(state): State<AppState>,
    body: Result<Json<TrackDependencyRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let type_name = require(request.dependency_type_name.as_deref(), "DependencyTypeName")?;
    let name = require(request.dependency_name.as_deref(), "DependencyName")?;
    let duration = Duration::try_from_secs_f64(request.duration_seconds)
        .map_err(|_| ApiError::json("DurationSeconds must be a non-negative number"))?;

    let dependency = Dependency::ending_now(
        type_name,
        name,
        request.data.unwrap_or_default(),
        duration,
        request.success,
    )
    .ok_or_else(|| ApiError::json(DURATION_OUT_OF_RANGE))?;
    state.sink.track_dependency(&dependency);
    Ok(MessageResponse::json("Dependency tracked successfully"))
}

async fn custom_event(
    State(state): State<AppState>,
    body: Result<Json<CustomEventRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.event_name.as_deref(), "EventName")?;

    let attributes: Vec<&str> = request
        .additional_attribute
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .into_iter()
        .collect();
    state
        .custom_events
        .log_custom_event(name, &attributes)
        .map_err(|e| ApiError::json(e.message()))?;
    Ok(MessageResponse::json("Custom event logged successfully"))
}

/// Emit a start log, an event, a timed dependency, a metric and a completion
/// log for one fake operation.
async fn simulate_operation(
    State(state): State<AppState>,
    body: Result<Json<SimulateOperationRequest>, JsonRejection>,
) -> Json<SimulateOperationResponse> {
    let operation = body_or_default(body)
        .operation_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OPERATION.to_string());
    let work = Duration::from_millis(state.config.simulated_work_ms);
    let latency = Duration::from_millis(state.config.simulated_dependency_ms);
    let start = Instant::now();

    state
        .sink
        .log_info(&format!("Starting operation: {operation}"));

    tokio::time::sleep(work).await;

    let properties: EventProperties = [("Operation", operation.as_str())].into_iter().collect();
    let mut values = EventMetrics::new();
    values.insert("DurationMs".to_string(), work.as_secs_f64() * 1000.0);
    state.sink.track_event(
        &format!("{operation}Started"),
        Some(&properties),
        Some(&values),
    );

    let call = DependencySpan::start("HTTP", "ExternalAPI", "GET /api/data");
    tokio::time::sleep(latency).await;
    state.sink.track_dependency(&call.finish(true));

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status: EventProperties = [("Status", "Success")].into_iter().collect();
    state.sink.track_metric(
        &format!("{operation}.ExecutionTime"),
        elapsed_ms,
        Some(&status),
    );

    state
        .sink
        .log_info(&format!("Operation completed successfully: {operation}"));

    Json(SimulateOperationResponse {
        message: "Operation simulated and monitored successfully",
        operation_name: operation,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
