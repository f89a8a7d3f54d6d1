// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workflow action events (approve, send back, reject).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_blank, EventProperties, ExtraProperties, TrackedEvent};
use crate::error::ValidationError;
use crate::sink::TelemetrySink;

/// Name of the event emitted for every tracked workflow action.
pub const WORKFLOW_ACTION_EVENT: &str = "WorkflowAction";

/// Property key for the workflow state id.
///
/// Lower-case unlike `workflowId`; downstream queries depend on the exact key.
pub const WORKFLOW_STATE_KEY: &str = "workflowstateid";

/// Actions exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowAction {
    Approve,
    SendBack,
    Reject,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 3] = [
        WorkflowAction::Approve,
        WorkflowAction::SendBack,
        WorkflowAction::Reject,
    ];

    /// Value recorded in the `action` property and used as the route segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Approve => "approve",
            WorkflowAction::SendBack => "sendback",
            WorkflowAction::Reject => "reject",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" => Ok(WorkflowAction::Approve),
            "sendback" => Ok(WorkflowAction::SendBack),
            "reject" => Ok(WorkflowAction::Reject),
            other => Err(format!("unknown workflow action: {other}")),
        }
    }
}

/// A workflow action performed by a user. All six identity fields are required.
#[derive(Debug, Clone, Default)]
pub struct WorkflowActionEvent {
    pub user_id: String,
    pub action: String,
    pub role: String,
    pub permission: String,
    pub workflow_id: String,
    pub workflow_state_id: String,
    pub properties: ExtraProperties,
}

impl WorkflowActionEvent {
    fn required_fields(&self) -> [&str; 6] {
        [
            &self.user_id,
            &self.action,
            &self.role,
            &self.permission,
            &self.workflow_id,
            &self.workflow_state_id,
        ]
    }

    fn to_properties(&self) -> EventProperties {
        let mut properties = EventProperties::new();
        properties.insert("userId", self.user_id.as_str());
        properties.insert("action", self.action.as_str());
        properties.insert("role", self.role.as_str());
        properties.insert("permission", self.permission.as_str());
        properties.insert("workflowId", self.workflow_id.as_str());
        properties.insert(WORKFLOW_STATE_KEY, self.workflow_state_id.as_str());

        let dropped = properties.merge_extensions(
            self.properties
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        if !dropped.is_empty() {
            debug!(?dropped, "ignored extension properties colliding with workflow fields");
        }
        properties
    }
}

/// Validate a workflow action and emit one `WorkflowAction` event.
///
/// Any blank required field fails the whole call with a single fixed message
/// and leaves the sink untouched.
pub fn try_track_workflow_action<S: TelemetrySink + ?Sized>(
    sink: &S,
    action: &WorkflowActionEvent,
) -> Result<TrackedEvent, ValidationError> {
    if action.required_fields().iter().any(|field| is_blank(field)) {
        return Err(ValidationError::workflow_fields());
    }

    let event = TrackedEvent::new(WORKFLOW_ACTION_EVENT, action.to_properties());
    event.emit(sink);
    Ok(event)
}
