//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};

use super::{AppConfig, StorageBackend};

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "STUDENT_RECORDS_CONFIG";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Load the config file if it exists, otherwise fall back to defaults.
///
/// Returns whether a file was actually read, so the caller can log it
/// once tracing is initialized.
///
/// # Errors
/// A present but unreadable or invalid file is an error.
pub fn load_or_default(path: &str) -> Result<(AppConfig, bool)> {
  if !Path::new(path).exists() {
    let config = AppConfig::default();
    validate_config(&config)?;
    return Ok((config, false));
  }
  Ok((load_config(path)?, true))
}

/// Resolve the config path from the environment.
pub fn config_path() -> String {
  std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!(
        "server.bind_address is not a socket address: {}",
        config.server.bind_address
      )
    })?;

  anyhow::ensure!(
    ["trace", "debug", "info", "warn", "error"]
      .contains(&config.server.log_level.to_ascii_lowercase().as_str()),
    "server.log_level must be one of trace/debug/info/warn/error, got {}",
    config.server.log_level
  );

  if config.storage.backend == StorageBackend::JsonFile {
    anyhow::ensure!(
      !config.storage.data_file.trim().is_empty(),
      "storage.data_file must not be empty for the json_file backend"
    );
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LogFormat;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_missing_file_falls_back_to_defaults() {
    let (config, from_file) = load_or_default("definitely-not-here.toml").unwrap();
    assert!(!from_file);
    assert_eq!(config.server.bind_address, "127.0.0.1:5000");
    assert_eq!(config.storage.data_file, "data/students.json");
    assert_eq!(config.storage.backend, StorageBackend::JsonFile);
    assert!(config.metrics.enabled);
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.server.log_format, LogFormat::Json);
  }

  #[test]
  fn test_partial_override() {
    let config = parse_config(
      r#"
        [server]
        bind_address = "0.0.0.0:8080"
        log_format = "pretty"

        [storage]
        backend = "memory"
      "#,
    )
    .unwrap();
    assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    assert_eq!(config.server.log_format, LogFormat::Pretty);
    assert_eq!(config.server.name, "student-records");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
  }

  #[test]
  fn test_invalid_bind_address() {
    let result = parse_config("[server]\nbind_address = \"not-an-address\"\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_invalid_log_level() {
    let result = parse_config("[server]\nlog_level = \"loud\"\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_data_file_rejected() {
    let result = parse_config("[storage]\ndata_file = \"  \"\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[metrics]\nenabled = false\n").unwrap();

    let (config, from_file) = load_or_default(path.to_str().unwrap()).unwrap();
    assert!(from_file);
    assert!(!config.metrics.enabled);
  }
}
