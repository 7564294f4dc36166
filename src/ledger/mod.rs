//! In-memory audit trail of rolls.

mod record;

pub use record::{LedgerSummary, RollLedger, RollRecord};
