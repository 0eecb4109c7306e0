//! Student Records — Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml (path from STUDENT_RECORDS_CONFIG) or defaults
//! 2. Init tracing (JSON or pretty, RUST_LOG overrides the level)
//! 3. Create the configured StudentStore and run its init
//! 4. Build StudentService, metrics registry and health state
//! 5. Serve the axum router until SIGINT
//! 6. Graceful shutdown: mark not-ready, drain in-flight requests, exit

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use student_records::adapters::metrics::{HealthState, MetricsRegistry};
use student_records::adapters::persistence::{JsonFileStore, MemoryStore};
use student_records::adapters::web::{self, AppState};
use student_records::config::loader::{config_path, load_or_default};
use student_records::config::{AppConfig, LogFormat, StorageBackend};
use student_records::ports::storage::StudentStore;
use student_records::usecases::StudentService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let path = config_path();
    let (config, from_file) =
        load_or_default(&path).context("Failed to load configuration")?;

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config);

    if from_file {
        info!(path = %path, "Configuration loaded");
    } else {
        info!(path = %path, "No config file found, using defaults");
    }

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.bind_address,
        backend = ?config.storage.backend,
        data_file = %config.storage.data_file,
        "Starting student records service"
    );

    // ── 3. Storage ──────────────────────────────────────────
    let store: Arc<dyn StudentStore> = match config.storage.backend {
        StorageBackend::JsonFile => Arc::new(JsonFileStore::new(&config.storage.data_file)),
        StorageBackend::Memory => {
            warn!("Memory backend selected, records are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let service = Arc::new(StudentService::new(store));
    service
        .init()
        .await
        .context("Failed to initialize student storage")?;

    // ── 4. Metrics and health ───────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };
    let (ready_tx, ready_rx) = watch::channel(true);
    let state = AppState::new(service, metrics, HealthState::new(ready_rx));

    // ── 5. Serve ────────────────────────────────────────────
    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    web::serve(listener, web::router(state), async move {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
        }
        info!("SIGINT received, initiating graceful shutdown");
        let _ = ready_tx.send(false);
    })
    .await?;

    info!("Shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber from config, with `RUST_LOG` taking
/// precedence over `server.log_level`.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    match config.server.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
