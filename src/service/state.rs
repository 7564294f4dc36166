//! Shared service state.
//!
//! The generator and the ledger sit behind a single mutex so that one
//! request's refresh, draw, combine and append complete before the next
//! begins. This keeps roll numbers gap-free and the pool consistent.
//! Host counters come from blocking procfs reads, so they are read
//! before the lock is taken; only the pool snapshot is read under it.

use tokio::sync::Mutex;

use crate::generator::{DieGenerator, EntropyInfo};
use crate::ledger::{RollLedger, RollRecord};
use crate::source::HostMetrics;
use crate::metrics::{MetricsError, MetricsRegistry, MetricsSnapshot};

/// Mutable state guarded as one unit.
struct DiceState {
    generator: DieGenerator,
    ledger: RollLedger,
}

/// Result of one roll, captured while the lock was held.
#[derive(Debug, Clone)]
pub struct RollOutcome {
    /// The new record.
    pub record: RollRecord,
    /// Ledger counter after the append.
    pub total_rolls: u64,
    /// The record before this one, if any.
    pub previous: Option<RollRecord>,
}

/// State shared by all request handlers.
pub struct ServiceState {
    dice: Mutex<DiceState>,
    metrics: MetricsRegistry,
}

impl ServiceState {
    /// Creates state around a generator with an empty ledger.
    pub fn new(generator: DieGenerator) -> Result<Self, MetricsError> {
        Ok(Self {
            dice: Mutex::new(DiceState {
                generator,
                ledger: RollLedger::new(),
            }),
            metrics: MetricsRegistry::new()?,
        })
    }

    /// Rolls, records and reports, all under one lock.
    pub async fn roll(&self) -> RollOutcome {
        let host = HostMetrics::collect();

        let mut guard = self.dice.lock().await;
        let DiceState { generator, ledger } = &mut *guard;

        let face = generator.roll();
        let info = EntropyInfo::new(generator.pool().snapshot(), host);
        let record = ledger.append(face, Some(info)).clone();

        self.metrics.record_face(face);
        self.metrics
            .update(&MetricsSnapshot::from_components(generator.pool(), ledger));

        RollOutcome {
            total_rolls: ledger.total_rolls(),
            previous: ledger.previous().cloned(),
            record,
        }
    }

    /// Copies the counter and full log.
    pub async fn audit(&self) -> (u64, Vec<RollRecord>) {
        let guard = self.dice.lock().await;
        let summary = guard.ledger.summary();
        (summary.total_rolls, summary.rolls.to_vec())
    }

    /// Current entropy diagnostics.
    pub async fn entropy_info(&self) -> EntropyInfo {
        let host = HostMetrics::collect();
        let pool = self.dice.lock().await.generator.pool().snapshot();
        EntropyInfo::new(pool, host)
    }

    /// Prometheus registry.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}
