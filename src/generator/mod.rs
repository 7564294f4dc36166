//! Die roll generation.
//!
//! [`DieGenerator`] is the production source: it refreshes the entropy
//! pool, draws three independent secure values and folds them together
//! with the pool's mixed output. The other [`DieSource`] implementations
//! are simpler variants kept for side-by-side comparison.

mod die;
mod variants;

pub use die::{reduce_to_face, DieGenerator, EntropyInfo};
pub use variants::{CryptoDie, CryptoIntDie, WordDie};

/// Something that rolls a six-sided die.
pub trait DieSource {
    /// Returns a face in `1..=6`.
    fn roll(&mut self) -> u8;

    /// Short human-readable name of the strategy.
    fn name(&self) -> &'static str;
}
