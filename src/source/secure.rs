//! Operating system CSPRNG wrapper.
//!
//! There is no fallback source. `OsRng` panics if the OS generator fails,
//! and the release profile aborts on panic, so exhaustion is fatal rather
//! than silently degraded.

use rand_core::{OsRng, RngCore};

/// Cryptographically secure random values drawn from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureByteSource;

impl SecureByteSource {
    /// Creates a handle to the OS generator.
    pub fn new() -> Self {
        Self
    }

    /// Reads eight bytes as a little-endian `u64`.
    pub fn next_u64(&self) -> u64 {
        let mut buf = [0u8; 8];
        OsRng.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    /// Reads four bytes as a little-endian `u32`.
    pub fn next_u32(&self) -> u32 {
        let mut buf = [0u8; 4];
        OsRng.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    /// Returns a uniform value in `0..bound` using rejection sampling.
    ///
    /// `bound` must be non-zero.
    pub fn uniform_below(&self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "bound must be non-zero");
        let range = 1u64 << 32;
        let bound = u64::from(bound.max(1));
        let limit = range - range % bound;

        loop {
            let value = u64::from(self.next_u32());
            if value < limit {
                // value % bound < bound <= u32::MAX
                return (value % bound) as u32;
            }
        }
    }

    /// Fills a 32-byte seed for seeding a general-purpose PRNG.
    pub fn seed_bytes(&self) -> [u8; 32] {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        seed
    }
}
