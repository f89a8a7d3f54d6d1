// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiError, ApiResult, BODY_REQUIRED};
use super::AppState;
use crate::events::{try_track_login, ExtraProperties, LoginEvent};

pub(crate) fn endpoints() -> Router<AppState> {
    Router::new().route("/api/login", post(login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    user_id: Option<String>,
    #[serde(default = "default_success")]
    success: bool,
    ip_address: Option<String>,
    user_agent: Option<String>,
    method: Option<String>,
    properties: Option<ExtraProperties>,
}

fn default_success() -> bool {
    true
}

impl From<LoginRequest> for LoginEvent {
    fn from(request: LoginRequest) -> Self {
        LoginEvent {
            user_id: request.user_id.unwrap_or_default(),
            success: request.success,
            ip_address: request.ip_address,
            user_agent: request.user_agent,
            method: request.method,
            properties: request.properties.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    status: &'static str,
    user_id: String,
    success: bool,
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = body.map_err(|rejection| {
        debug!(%rejection, "unreadable login body");
        ApiError::text(BODY_REQUIRED)
    })?;

    let login = LoginEvent::from(request);
    try_track_login(state.sink.as_ref(), &login)?;
    state.sink.log_info(&format!(
        "User login tracked for {} (success: {})",
        login.user_id, login.success
    ));

    Ok(Json(LoginResponse {
        status: "logged",
        user_id: login.user_id,
        success: login.success,
    }))
}
