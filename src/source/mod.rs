//! Leaf randomness and host counters.
//!
//! Everything in this module is stateless: the secure source reads the
//! operating system CSPRNG on every call, and `HostMetrics::collect` reads the
//! current process and system counters on demand.

mod host;
mod secure;

pub use host::{HostMetrics, ProcessMemory, SystemInfo};
pub use secure::SecureByteSource;

/// Largest integer a sample may hold (`2^53 - 1`).
///
/// Wide samples are reduced modulo this bound before entering the pool
/// so that pool values stay exactly representable as JSON numbers.
pub const SAFE_MAX: u64 = (1 << 53) - 1;
