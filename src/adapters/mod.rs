//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure, and exposes the service over HTTP.
//!
//! Adapter categories:
//! - `persistence`: JSON file and in-memory student stores
//! - `web`: axum router, HTML pages and JSON API
//! - `metrics`: Prometheus counters and health probes

pub mod metrics;
pub mod persistence;
pub mod web;
