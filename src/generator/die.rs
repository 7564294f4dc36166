//! Entropy-pool backed die generator.

use serde::Serialize;

use super::DieSource;
use crate::pool::{xorshift, EntropyPool, PoolConfig, PoolSnapshot, SampleSource, SystemSampler};
use crate::source::{HostMetrics, SecureByteSource, SAFE_MAX};

/// Maps any word onto a die face in `1..=6`.
///
/// The input is already non-negative, so only the modulo reduction
/// applies. The reduction carries the usual `2^64 mod 6` bias, which is
/// far below what a frequency test can observe.
#[inline]
pub fn reduce_to_face(value: u64) -> u8 {
    // value % 6 < 6
    (value % 6) as u8 + 1
}

/// Pool snapshot plus host diagnostics, as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyInfo {
    /// Pool state.
    #[serde(flatten)]
    pub pool: PoolSnapshot,
    /// Host diagnostics.
    #[serde(flatten)]
    pub host: HostMetrics,
}

impl EntropyInfo {
    /// Pairs a pool snapshot with a separately taken host reading.
    pub fn new(pool: PoolSnapshot, host: HostMetrics) -> Self {
        Self { pool, host }
    }
}

/// Produces die faces from an [`EntropyPool`] plus fresh secure draws.
pub struct DieGenerator<S = SystemSampler> {
    pool: EntropyPool,
    sampler: S,
    secure: SecureByteSource,
}

impl DieGenerator<SystemSampler> {
    /// Creates a generator with the default pool configuration.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates a generator sampling the live system.
    pub fn with_config(config: PoolConfig) -> Self {
        let sampler = SystemSampler::new(config.host_metrics);
        Self::with_sampler(config, sampler)
    }
}

impl Default for DieGenerator<SystemSampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SampleSource> DieGenerator<S> {
    /// Creates a generator over a custom sample source.
    pub fn with_sampler(config: PoolConfig, mut sampler: S) -> Self {
        let pool = EntropyPool::initialize(config, &mut sampler);
        Self {
            pool,
            sampler,
            secure: SecureByteSource::new(),
        }
    }

    /// Rolls one die.
    ///
    /// Refreshes the pool, then XORs a secure `u64` (reduced below
    /// `SAFE_MAX`), two secure `u32`s, the pool mix, the running seed and
    /// the refresh counter, applies one xorshift pass and reduces to a
    /// face. The secure draws alone set the uniformity floor.
    pub fn roll(&mut self) -> u8 {
        self.pool.refresh(&mut self.sampler);

        let wide = self.secure.next_u64() % SAFE_MAX;
        let narrow_a = u64::from(self.secure.next_u32());
        let narrow_b = u64::from(self.secure.next_u32());

        let mixed = self.pool.mix();

        let combined =
            wide ^ narrow_a ^ narrow_b ^ mixed ^ self.pool.seed() ^ self.pool.counter();
        let face = reduce_to_face(xorshift(combined));

        tracing::debug!(face, counter = self.pool.counter(), "Rolled die");
        face
    }

    /// Current pool state plus host diagnostics.
    pub fn entropy_info(&self) -> EntropyInfo {
        EntropyInfo::new(self.pool.snapshot(), HostMetrics::collect())
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &EntropyPool {
        &self.pool
    }
}

impl<S: SampleSource> DieSource for DieGenerator<S> {
    fn roll(&mut self) -> u8 {
        DieGenerator::<S>::roll(self)
    }

    fn name(&self) -> &'static str {
        "entropy-pool"
    }
}
