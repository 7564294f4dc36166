//! Entropy pool maintenance and mixing.
//!
//! The pool accumulates scalar samples (clocks, counters, PRNG and OS
//! CSPRNG draws, host counters) into a bounded buffer, keeps a running
//! seed, and folds everything together with xorshift-style mixing.
//!
//! Mixing does not add cryptographic strength. The randomness floor of
//! a roll is set by the secure draws that are XORed in alongside it.

mod entropy;
mod mix;
mod sampler;

pub use entropy::{EntropyPool, PoolConfig, PoolSnapshot};
pub use mix::{mix_rounds, xor_fold, xorshift};
pub use sampler::{reduce_sample, SampleSource, SystemSampler};
