//! Web Adapter - HTTP Surface for Student Records
//!
//! Builds the axum router: HTML pages for browsing and editing records,
//! the JSON API (`/api/stats`, `/api/students`), and the operational
//! routes (`/live`, `/ready`, `/metrics`).

pub mod api;
pub mod handlers;
pub mod notice;
pub mod pages;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::adapters::metrics::{health, HealthState, MetricsRegistry};
use crate::usecases::students::StudentService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Record repository backed by the configured store.
    pub service: Arc<StudentService>,
    /// Prometheus metrics, `None` when disabled.
    pub metrics: Option<Arc<MetricsRegistry>>,
    /// Readiness flag.
    pub health: HealthState,
}

impl AppState {
    pub fn new(
        service: Arc<StudentService>,
        metrics: Option<Arc<MetricsRegistry>>,
        health: HealthState,
    ) -> Self {
        Self {
            service,
            metrics,
            health,
        }
    }

    pub(crate) fn record_mutation(&self, op: &str) {
        if let Some(m) = &self.metrics {
            m.record_mutation(op);
        }
    }

    pub(crate) fn record_rejection(&self, reason: &str) {
        if let Some(m) = &self.metrics {
            m.record_rejection(reason);
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/index", get(handlers::index))
        .route("/view_students", get(handlers::view_students))
        .route("/view_student/:id", get(handlers::view_student))
        .route(
            "/add_student",
            get(handlers::add_student_form).post(handlers::add_student),
        )
        .route(
            "/edit_student/:id",
            get(handlers::edit_student_form).post(handlers::edit_student),
        )
        .route("/student/delete/:id", get(handlers::delete_student))
        .route("/search", get(handlers::search))
        .route("/api/stats", get(api::stats))
        .route("/api/students", get(api::students))
        .route("/metrics", get(api::metrics))
        .merge(health::routes())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Log method, path, status and latency for every request.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis();
    if path == "/live" || path == "/ready" {
        debug!(%method, %path, status, elapsed_ms, "Request served");
    } else {
        info!(%method, %path, status, elapsed_ms, "Request served");
    }
    response
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(address = %listener.local_addr()?, "Web server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
