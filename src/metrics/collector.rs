//! Metrics collection and registry.

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

use crate::ledger::RollLedger;
use crate::pool::EntropyPool;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The Prometheus client rejected a metric.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of service state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Rolls recorded in the ledger.
    pub total_rolls: u64,
    /// Current entropy pool length.
    pub pool_size: usize,
    /// Pool refreshes performed.
    pub entropy_counter: u64,
    /// Seeds held in the history.
    pub history_size: usize,
}

impl MetricsSnapshot {
    /// Creates a snapshot from the pool and ledger.
    pub fn from_components(pool: &EntropyPool, ledger: &RollLedger) -> Self {
        Self {
            total_rolls: ledger.total_rolls(),
            pool_size: pool.len(),
            entropy_counter: pool.counter(),
            history_size: pool.history_len(),
        }
    }
}

/// Prometheus metrics registry for the die service.
pub struct MetricsRegistry {
    registry: Registry,

    // Roll metrics
    rolls_total: IntCounter,
    face_total: IntCounterVec,

    // Pool metrics
    pool_size: IntGauge,
    entropy_counter: IntGauge,
    history_size: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let rolls_total = IntCounter::new("dice_rolls_total", "Total rolls recorded")?;
        let face_total = IntCounterVec::new(
            Opts::new("dice_face_total", "Rolls per die face"),
            &["face"],
        )?;

        let pool_size = IntGauge::new("dice_entropy_pool_size", "Current entropy pool length")?;
        let entropy_counter =
            IntGauge::new("dice_entropy_counter", "Entropy pool refreshes performed")?;
        let history_size = IntGauge::new(
            "dice_entropy_history_size",
            "Seeds held in the entropy history",
        )?;

        registry.register(Box::new(rolls_total.clone()))?;
        registry.register(Box::new(face_total.clone()))?;
        registry.register(Box::new(pool_size.clone()))?;
        registry.register(Box::new(entropy_counter.clone()))?;
        registry.register(Box::new(history_size.clone()))?;

        Ok(Self {
            registry,
            rolls_total,
            face_total,
            pool_size,
            entropy_counter,
            history_size,
        })
    }

    /// Counts one roll of `face`.
    pub fn record_face(&self, face: u8) {
        let label = face.to_string();
        self.face_total.with_label_values(&[label.as_str()]).inc();
    }

    /// Updates all gauges and counters from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward, so increment by the difference.
        let current_rolls = self.rolls_total.get();
        if snapshot.total_rolls > current_rolls {
            self.rolls_total.inc_by(snapshot.total_rolls - current_rolls);
        }

        self.pool_size.set(saturating_i64(snapshot.pool_size as u64));
        self.entropy_counter.set(saturating_i64(snapshot.entropy_counter));
        self.history_size.set(saturating_i64(snapshot.history_size as u64));
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
