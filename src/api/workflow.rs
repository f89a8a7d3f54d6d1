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
use crate::events::{
    try_track_workflow_action, ExtraProperties, WorkflowAction, WorkflowActionEvent,
};

pub(crate) fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/approve", post(approve))
        .route("/sendback", post(send_back))
        .route("/reject", post(reject))
}

type Body = Result<Json<WorkflowActionRequest>, JsonRejection>;

async fn approve(state: State<AppState>, body: Body) -> ApiResult<Json<WorkflowActionResponse>> {
    track(state, body, WorkflowAction::Approve).await
}

async fn send_back(state: State<AppState>, body: Body) -> ApiResult<Json<WorkflowActionResponse>> {
    track(state, body, WorkflowAction::SendBack).await
}

async fn reject(state: State<AppState>, body: Body) -> ApiResult<Json<WorkflowActionResponse>> {
    track(state, body, WorkflowAction::Reject).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkflowActionRequest {
    user_id: Option<String>,
    role: Option<String>,
    permission: Option<String>,
    workflow_id: Option<String>,
    workflow_state_id: Option<String>,
    properties: Option<ExtraProperties>,
}

impl WorkflowActionRequest {
    fn into_event(self, action: WorkflowAction) -> WorkflowActionEvent {
        WorkflowActionEvent {
            user_id: self.user_id.unwrap_or_default(),
            action: action.as_str().to_string(),
            role: self.role.unwrap_or_default(),
            permission: self.permission.unwrap_or_default(),
            workflow_id: self.workflow_id.unwrap_or_default(),
            workflow_state_id: self.workflow_state_id.unwrap_or_default(),
            properties: self.properties.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkflowActionResponse {
    status: &'static str,
    action: WorkflowAction,
    user_id: String,
    workflow_id: String,
    workflow_state_id: String,
}

async fn track(
    State(state): State<AppState>,
    body: Body,
    action: WorkflowAction,
) -> ApiResult<Json<WorkflowActionResponse>> {
    let Json(request) = body.map_err(|rejection| {
        debug!(%rejection, %action, "unreadable workflow body");
        ApiError::text(BODY_REQUIRED)
    })?;

    let event = request.into_event(action);
    try_track_workflow_action(state.sink.as_ref(), &event)?;
    state.sink.log_info(&format!(
        "Workflow action logged: {action} for workflow {}",
        event.workflow_id
    ));

    Ok(Json(WorkflowActionResponse {
        status: "logged",
        action,
        user_id: event.user_id,
        workflow_id: event.workflow_id,
        workflow_state_id: event.workflow_state_id,
    }))
}
