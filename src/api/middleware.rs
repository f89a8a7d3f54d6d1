// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request correlation and timing.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info_span, Instrument};

use super::AppState;
use crate::telemetry::{CorrelationId, CorrelationIdExt, SpanExt, CORRELATION_HEADER};

/// Route label for requests no endpoint matched. Raw paths are never used as
/// metric keys.
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Run a request inside a `request` span carrying its correlation id.
///
/// The id is taken from the `x-correlation-id` header when it holds a UUID
/// and generated otherwise. It is made available to handlers as a request
/// extension and echoed on the response.
pub async fn correlate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let id = CorrelationId::from_header(
        request
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(id);

    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let span = info_span!(
        "request",
        method = %method,
        route = %route,
        correlation_id = tracing::field::Empty,
        status = tracing::field::Empty,
    );
    span.record_correlation_id(&id);

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed = start.elapsed();

    span.record_status(response.status().as_u16());
    state
        .metrics
        .record_request(&format!("{method} {route}"), elapsed);
    span.in_scope(|| debug!(status = response.status().as_u16(), ?elapsed, "request completed"));

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
