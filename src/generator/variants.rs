//! Alternative die strategies built directly on the OS CSPRNG.

use super::die::reduce_to_face;
use super::DieSource;
use crate::pool::xorshift;
use crate::source::{SecureByteSource, SAFE_MAX};

/// Three secure draws XORed together, one xorshift pass, reduced mod 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoDie {
    secure: SecureByteSource,
}

impl CryptoDie {
    /// Creates the source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DieSource for CryptoDie {
    fn roll(&mut self) -> u8 {
        let combined = (self.secure.next_u64() % SAFE_MAX)
            ^ u64::from(self.secure.next_u32())
            ^ u64::from(self.secure.next_u32());
        reduce_to_face(xorshift(combined))
    }

    fn name(&self) -> &'static str {
        "crypto"
    }
}

/// An unbiased secure face XORed with a secure word mod 6, folded back
/// into `1..=6`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoIntDie {
    secure: SecureByteSource,
}

impl CryptoIntDie {
    /// Creates the source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DieSource for CryptoIntDie {
    fn roll(&mut self) -> u8 {
        let base = self.secure.uniform_below(6) + 1;
        let extra = self.secure.next_u32() % 6;
        // base ^ extra <= 7
        let mixed = base ^ extra;
        ((mixed + 5) % 6) as u8 + 1
    }

    fn name(&self) -> &'static str {
        "crypto-int"
    }
}

/// Three secure 32-bit words XORed, one 32-bit xorshift pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordDie {
    secure: SecureByteSource,
}

impl WordDie {
    /// Creates the source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DieSource for WordDie {
    fn roll(&mut self) -> u8 {
        let mut x = self.secure.next_u32() ^ self.secure.next_u32() ^ self.secure.next_u32();
        x ^= x >> 17;
        x ^= x << 5;
        x ^= x >> 13;
        // x % 6 < 6
        (x % 6) as u8 + 1
    }

    fn name(&self) -> &'static str {
        "word"
    }
}
