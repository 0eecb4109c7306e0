//! Health Checks - Liveness and Readiness Probes
//!
//! `/live` answers while the process runs. `/ready` answers 200 only
//! when the store is usable and the process is not shutting down.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::sync::watch;

use crate::adapters::web::AppState;

/// Shared readiness flag, flipped to false on shutdown.
#[derive(Debug, Clone)]
pub struct HealthState {
    accepting: watch::Receiver<bool>,
}

impl HealthState {
    /// Create a health state driven by `accepting`.
    pub const fn new(accepting: watch::Receiver<bool>) -> Self {
        Self { accepting }
    }

    /// A health state that is always accepting (tests).
    pub fn always_ready() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { accepting: rx }
    }

    /// Whether the process is still accepting traffic.
    pub fn is_accepting(&self) -> bool {
        *self.accepting.borrow()
    }
}

/// Routes for `/live` and `/ready`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe: 200 only if storage is healthy and not shutting down.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_accepting() && state.service.is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}
