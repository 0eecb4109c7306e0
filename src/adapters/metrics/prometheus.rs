//! Prometheus Metrics Registry - Student Records Observability
//!
//! Counts successful mutations per operation and rejections per reason,
//! and tracks the number of stored records. Rendered as Prometheus text
//! on `/metrics`.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Centralized Prometheus metrics for the service.
///
/// All metrics follow the naming convention `student_records_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Successful mutations by operation (`create`, `update`, `delete`).
    pub mutations: IntCounterVec,
    /// Rejected requests by reason (`missing_fields`, `duplicate_roll_no`, ...).
    pub rejections: IntCounterVec,
    /// Records stored after the last observed mutation.
    pub stored: IntGauge,
}

impl MetricsRegistry {
    /// Create and register all metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let mutations = IntCounterVec::new(
            Opts::new(
                "student_records_mutations_total",
                "Successful record mutations",
            ),
            &["op"],
        )?;

        let rejections = IntCounterVec::new(
            Opts::new(
                "student_records_rejections_total",
                "Requests rejected by validation, conflict or lookup",
            ),
            &["reason"],
        )?;

        let stored = IntGauge::new("student_records_stored", "Records currently stored")?;

        registry.register(Box::new(mutations.clone()))?;
        registry.register(Box::new(rejections.clone()))?;
        registry.register(Box::new(stored.clone()))?;

        Ok(Self {
            registry,
            mutations,
            rejections,
            stored,
        })
    }

    /// Record a successful mutation.
    pub fn record_mutation(&self, op: &str) {
        self.mutations.with_label_values(&[op]).inc();
    }

    /// Record a rejected request.
    pub fn record_rejection(&self, reason: &str) {
        self.rejections.with_label_values(&[reason]).inc();
    }

    /// Set the stored record gauge.
    pub fn set_stored(&self, count: usize) {
        self.stored.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
