//! Roll distribution analysis.
//!
//! Summarises a batch of die faces and classifies how far the observed
//! frequencies stray from uniform. These are sanity checks on a sample,
//! not proofs of randomness.

mod distribution;
mod threshold;

pub use distribution::{FaceDistribution, FaceStats};
pub use threshold::{DistributionThresholds, DistributionVerdict};
