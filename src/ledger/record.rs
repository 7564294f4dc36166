//! Roll records and the append-only ledger.
//!
//! Roll numbers are assigned from a counter that is incremented before
//! each append, so after `N` appends the records carry exactly `1..=N`
//! in insertion order. The ledger grows without bound for the lifetime
//! of the process.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::generator::EntropyInfo;

/// One recorded roll. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    /// Random UUID (v4).
    pub id: String,
    /// Face in `1..=6`.
    pub die: u8,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    /// 1-based position in the ledger.
    pub roll_number: u64,
    /// Entropy state captured with the roll.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy_info: Option<EntropyInfo>,
}

/// Read-only view of the ledger.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary<'a> {
    /// Ledger counter.
    pub total_rolls: u64,
    /// All records in roll order.
    pub rolls: &'a [RollRecord],
}

/// Ordered log of rolls plus a running counter.
#[derive(Debug, Default)]
pub struct RollLedger {
    records: Vec<RollRecord>,
    counter: u64,
}

impl RollLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a roll and returns the stored record.
    pub fn append(&mut self, die: u8, entropy_info: Option<EntropyInfo>) -> &RollRecord {
        self.counter += 1;

        let record = RollRecord {
            id: Uuid::new_v4().to_string(),
            die,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            roll_number: self.counter,
            entropy_info,
        };

        tracing::debug!(
            roll_number = record.roll_number,
            die = record.die,
            id = %record.id,
            "Recorded roll"
        );

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// The record before the most recent one, if at least two exist.
    pub fn previous(&self) -> Option<&RollRecord> {
        self.records.len().checked_sub(2).map(|idx| &self.records[idx])
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&RollRecord> {
        self.records.last()
    }

    /// Counter value and the full ordered log.
    pub fn summary(&self) -> LedgerSummary<'_> {
        LedgerSummary {
            total_rolls: self.counter,
            rolls: &self.records,
        }
    }

    /// Number of rolls recorded.
    pub fn total_rolls(&self) -> u64 {
        self.counter
    }
}
