//! JSON API and metrics endpoints.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::usecases::students::ServiceError;

use super::AppState;

fn json_failure(err: &ServiceError) -> Response {
    error!(error = %err, "API request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "storage unavailable" })),
    )
        .into_response()
}

/// `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Response {
    match state.service.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => json_failure(&e),
    }
}

/// `GET /api/students`
pub async fn students(State(state): State<AppState>) -> Response {
    match state.service.export().await {
        Ok(students) => Json(students).into_response(),
        Err(e) => json_failure(&e),
    }
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Response {
    let Some(metrics) = state.metrics.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Ok(stats) = state.service.stats().await {
        metrics.set_stored(stats.total_students);
    }

    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
