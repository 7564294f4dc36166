//! Prometheus metrics for the die service.
//!
//! # Metrics Exposed
//!
//! - `dice_rolls_total` - Total rolls recorded in the ledger
//! - `dice_face_total{face}` - Rolls per face
//! - `dice_entropy_pool_size` - Current entropy pool length
//! - `dice_entropy_counter` - Pool refreshes performed
//! - `dice_entropy_history_size` - Seeds held in the history
//!
//! # Example
//!
//! ```
//! use dice_entropy::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.record_face(4);
//! registry.update(&MetricsSnapshot {
//!     total_rolls: 1,
//!     pool_size: 29,
//!     entropy_counter: 1,
//!     history_size: 1,
//! });
//!
//! assert!(registry.encode().unwrap().contains("dice_rolls_total 1"));
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
