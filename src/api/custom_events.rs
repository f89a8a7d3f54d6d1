// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::error::{require, ApiError, ApiResult, ReportedError};
use super::{body_or_default, AppState, MessageResponse};
use crate::events::LogLevel;

/// Event emitted by the `simple` endpoint.
const SIMPLE_EVENT: &str = "user-action";

/// Exception text when the caller supplies none.
const DEFAULT_EXCEPTION_MESSAGE: &str = "An error occurred";

pub(crate) fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/simple", post(simple))
        .route("/with-attributes", post(with_attributes))
        .route("/with-level", post(with_level))
        .route("/with-exception", post(with_exception))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomEventRequest {
    event_name: Option<String>,
    user_id: Option<String>,
    ip_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomEventWithLevelRequest {
    event_name: Option<String>,
    log_level: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomEventWithExceptionRequest {
    event_name: Option<String>,
    exception_message: Option<String>,
    details: Option<String>,
}

async fn simple(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state
        .custom_events
        .log_custom_event(SIMPLE_EVENT, &[])
        .map_err(|e| ApiError::json(e.message()))?;
    Ok(MessageResponse::json("Custom event logged successfully"))
}

async fn with_attributes(
    State(state): State<AppState>,
    body: Result<Json<CustomEventRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.event_name.as_deref(), "EventName")?;

    let attributes = [
        request.user_id.as_deref().unwrap_or_default(),
        request.ip_address.as_deref().unwrap_or_default(),
    ];
    state
        .custom_events
        .log_custom_event(name, &attributes)
        .map_err(|e| ApiError::json(e.message()))?;
    Ok(MessageResponse::json(
        "Custom event with attributes logged successfully",
    ))
}

async fn with_level(
    State(state): State<AppState>,
    body: Result<Json<CustomEventWithLevelRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.event_name.as_deref(), "EventName")?;
    let level: LogLevel = request
        .log_level
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::json)?;

    state
        .custom_events
        .log_custom_event_with_level(
            name,
            level,
            &[request.details.as_deref().unwrap_or_default()],
        )
        .map_err(|e| ApiError::json(e.message()))?;
    Ok(MessageResponse::json(
        "Custom event with log level logged successfully",
    ))
}

async fn with_exception(
    State(state): State<AppState>,
    body: Result<Json<CustomEventWithExceptionRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let request = body_or_default(body);
    let name = require(request.event_name.as_deref(), "EventName")?;
    let error = ReportedError(
        request
            .exception_message
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCEPTION_MESSAGE.to_string()),
    );

    state
        .custom_events
        .log_custom_event_with_error(
            name,
            &error,
            &[request.details.as_deref().unwrap_or_default()],
        )
        .map_err(|e| ApiError::json(e.message()))?;
    Ok(MessageResponse::json(
        "Custom event with exception logged successfully",
    ))
}
