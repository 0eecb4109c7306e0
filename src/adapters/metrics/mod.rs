//! Metrics and Monitoring Adapters
//!
//! Prometheus counters for record mutations and rejections, plus the
//! `/live` and `/ready` probes served by the web router.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use self::prometheus::MetricsRegistry;
