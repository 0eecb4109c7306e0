//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! and field has a default, so a missing file or an empty one yields a
//! working local setup.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// HTTP server and logging.
  pub server: ServerConfig,
  /// Where student records live.
  pub storage: StorageConfig,
  /// Metrics and monitoring.
  pub metrics: MetricsConfig,
}

/// Output format for tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
  /// Structured JSON lines.
  #[default]
  Json,
  /// Human-readable text.
  Pretty,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  /// Human-readable service name (logged at startup).
  pub name: String,
  /// Listen address.
  pub bind_address: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Log output format.
  pub log_format: LogFormat,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      bind_address: default_bind_address(),
      log_level: default_log_level(),
      log_format: LogFormat::default(),
    }
  }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
  /// Pretty-printed JSON document on disk.
  #[default]
  JsonFile,
  /// Process memory only; lost on restart.
  Memory,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Which store to use.
  pub backend: StorageBackend,
  /// Path of the JSON document (json_file backend).
  pub data_file: String,
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: StorageBackend::default(),
      data_file: default_data_file(),
    }
  }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
  /// Serve Prometheus metrics on `/metrics`.
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Defaults used by the `Default` impls above

fn default_name() -> String {
  "student-records".to_string()
}

fn default_bind_address() -> String {
  "127.0.0.1:5000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_data_file() -> String {
  "data/students.json".to_string()
}
