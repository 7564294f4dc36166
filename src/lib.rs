//! Dice Entropy Library
//!
//! Rolls a six-sided die from an entropy-mixing pool layered over the
//! operating system CSPRNG, and keeps an in-memory audit trail of every
//! roll.
//!
//! # Architecture
//!
//! ```text
//! source → pool → generator → ledger
//!                     ↓          ↓
//!               service (HTTP, metrics)
//! ```
//!
//! # Design Principles
//!
//! - **Secure floor**: every roll XORs in fresh OS CSPRNG draws; the pool
//!   mixing on top neither weakens nor provably strengthens them
//! - **Fail loudly**: there is no fallback if the OS generator fails
//! - **Gap-free audit**: roll numbers run 1..=N with no gaps or repeats
//! - **No persistence**: all state lives for the process lifetime only
//!
//! # Example
//!
//! ```
//! use dice_entropy::{DieGenerator, RollLedger};
//!
//! let mut generator = DieGenerator::new();
//! let mut ledger = RollLedger::new();
//!
//! for _ in 0..3 {
//!     let face = generator.roll();
//!     ledger.append(face, Some(generator.entropy_info()));
//! }
//!
//! assert_eq!(ledger.summary().total_rolls, 3);
//! assert_eq!(ledger.previous().map(|r| r.roll_number), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod generator;
pub mod ledger;
pub mod metrics;
pub mod pool;
#[cfg(feature = "server")]
pub mod service;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{DistributionThresholds, DistributionVerdict, FaceDistribution};
pub use generator::{DieGenerator, DieSource, EntropyInfo};
pub use ledger::{RollLedger, RollRecord};
pub use pool::{EntropyPool, PoolConfig, PoolSnapshot};
pub use source::SecureByteSource;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
