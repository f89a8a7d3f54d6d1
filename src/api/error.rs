// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::ValidationError;

/// Error text when a login or workflow body is absent or unreadable.
pub const BODY_REQUIRED: &str = "Request body is required.";

pub type ApiResult<T> = Result<T, ApiError>;

/// An error returned to the HTTP caller.
///
/// The login and workflow surface answers with the bare message as text; the
/// monitoring and custom event surface wraps it as `{"error": message}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    Text { status: StatusCode, message: String },

    #[error("{message}")]
    Json { status: StatusCode, message: String },
}

impl ApiError {
    /// `400` with a plain-text body.
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// `400` with an `{"error": ...}` body.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// `400 {"error": "<field> is required"}`.
    pub fn required(field: &str) -> Self {
        Self::json(format!("{field} is required"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Text { status, .. } | Self::Json { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Text { message, .. } | Self::Json { message, .. } => message,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::text(err.message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Text { status, message } => (status, message).into_response(),
            ApiError::Json { status, message } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

/// An error described by the caller rather than raised in this process.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct ReportedError(pub String);

/// Fail with `<field> is required` when `value` is absent or blank.
pub(crate) fn require<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::required(field)),
    }
}
