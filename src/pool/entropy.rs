//! Bounded entropy pool with a running seed and seed history.

use serde::Serialize;

use super::mix::{mix_rounds, xor_fold, xorshift};
use super::sampler::{reduce_sample, SampleSource};

/// Configuration for the entropy pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Pool length that triggers trimming.
    pub capacity: usize,
    /// Number of most recent samples kept after trimming.
    pub retain: usize,
    /// History length that triggers trimming.
    pub history_capacity: usize,
    /// Number of most recent seeds kept after trimming.
    pub history_retain: usize,
    /// Number of trailing samples exposed by [`EntropyPool::snapshot`].
    pub snapshot_len: usize,
    /// Sample host counters (memory, load) when the platform has them.
    pub host_metrics: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            retain: 100,
            history_capacity: 50,
            history_retain: 25,
            snapshot_len: 8,
            host_metrics: true,
        }
    }
}

/// Diagnostic view of the pool. Never fed back into mixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    /// Samples held.
    pub pool_size: usize,
    /// Running seed.
    pub last_seed: u64,
    /// Refreshes performed.
    pub entropy_counter: u64,
    /// Seeds held in the history.
    pub entropy_history_size: usize,
    /// The most recent samples, oldest first.
    pub entropy_sources: Vec<u64>,
}

/// Accumulates entropy samples and derives mixed values from them.
///
/// The pool is never empty after [`EntropyPool::initialize`]. When it
/// grows past `capacity` only the most recent `retain` samples are kept;
/// older samples are discarded rather than merged.
#[derive(Debug, Clone)]
pub struct EntropyPool {
    samples: Vec<u64>,
    /// Last mixed output, fed back into the next refresh batch.
    seed: u64,
    /// Number of refreshes performed.
    counter: u64,
    /// Past seeds, most recent last.
    history: Vec<u64>,
    config: PoolConfig,
}

impl EntropyPool {
    /// Populates a new pool from the source's initial batch.
    ///
    /// The running seed starts as the first sample (wall-clock
    /// milliseconds for [`SystemSampler`](super::SystemSampler)).
    pub fn initialize<S: SampleSource + ?Sized>(config: PoolConfig, source: &mut S) -> Self {
        let mut samples: Vec<u64> = source
            .initial_samples()
            .into_iter()
            .map(reduce_sample)
            .collect();

        if samples.is_empty() {
            tracing::warn!("Sample source produced no initial samples; seeding pool with zero");
            samples.push(0);
        }

        let seed = samples[0];
        tracing::debug!(pool_size = samples.len(), "Entropy pool initialized");

        Self {
            samples,
            seed,
            counter: 0,
            history: Vec::with_capacity(config.history_capacity + 1),
            config,
        }
    }

    /// Appends a fresh batch, trims, and evolves the seed.
    pub fn refresh<S: SampleSource + ?Sized>(&mut self, source: &mut S) {
        self.counter = self.counter.wrapping_add(1);

        let batch = source.fresh_samples(self.seed, self.counter);
        self.samples.extend(batch.into_iter().map(reduce_sample));
        trim_to_recent(&mut self.samples, self.config.capacity, self.config.retain);

        // Kept below SAFE_MAX like every sample: the seed is exposed as JSON.
        self.seed = reduce_sample(xorshift(xor_fold(&self.samples)));

        self.history.push(self.seed);
        trim_to_recent(
            &mut self.history,
            self.config.history_capacity,
            self.config.history_retain,
        );

        tracing::trace!(
            counter = self.counter,
            pool_size = self.samples.len(),
            history_size = self.history.len(),
            "Entropy pool refreshed"
        );
    }

    /// Folds the pool through three five-step passes, then XORs in the
    /// fold of the seed history. Pure: repeated calls agree until the
    /// next refresh.
    pub fn mix(&self) -> u64 {
        mix_rounds(xor_fold(&self.samples), 3) ^ xor_fold(&self.history)
    }

    /// Returns a diagnostic snapshot.
    pub fn snapshot(&self) -> PoolSnapshot {
        let tail = self.samples.len().saturating_sub(self.config.snapshot_len);
        PoolSnapshot {
            pool_size: self.samples.len(),
            last_seed: self.seed,
            entropy_counter: self.counter,
            entropy_history_size: self.history.len(),
            entropy_sources: self.samples[tail..].to_vec(),
        }
    }

    /// Current running seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Refreshes performed so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false once initialized; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of seeds held in the history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

/// Keeps only the most recent `retain` values once `values` exceeds `capacity`.
fn trim_to_recent(values: &mut Vec<u64>, capacity: usize, retain: usize) {
    if values.len() > capacity {
        let keep = retain.clamp(1, capacity.max(1));
        let excess = values.len() - keep;
        values.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SAFE_MAX;
    use proptest::prelude::*;

    /// Deterministic source emitting a fixed-size counting batch.
    struct CountingSource {
        next: u64,
        batch: usize,
    }

    impl CountingSource {
        fn new(batch: usize) -> Self {
            Self { next: 1, batch }
        }

        fn take(&mut self, n: usize) -> Vec<u64> {
            let out = (self.next..self.next + n as u64).collect();
            self.next += n as u64;
            out
        }
    }

    impl SampleSource for CountingSource {
        fn initial_samples(&mut self) -> Vec<u64> {
            let n = self.batch;
            self.take(n)
        }

        fn fresh_samples(&mut self, seed: u64, counter: u64) -> Vec<u64> {
            let n = self.batch.saturating_sub(2);
            let mut out = self.take(n);
            out.extend([seed, counter]);
            out
        }
    }

    struct EmptySource;

    impl SampleSource for EmptySource {
        fn initial_samples(&mut self) -> Vec<u64> {
            Vec::new()
        }

        fn fresh_samples(&mut self, _seed: u64, _counter: u64) -> Vec<u64> {
            Vec::new()
        }
    }

    #[test]
    fn test_initialize_seeds_from_first_sample() {
        let pool = EntropyPool::initialize(PoolConfig::default(), &mut CountingSource::new(15));
        assert_eq!(pool.len(), 15);
        assert_eq!(pool.seed(), 1);
        assert_eq!(pool.counter(), 0);
        assert_eq!(pool.history_len(), 0);
    }

    #[test]
    fn test_empty_source_still_non_empty() {
        let mut source = EmptySource;
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);
        assert_eq!(pool.len(), 1);

        pool.refresh(&mut source);
        assert!(!pool.is_empty());
        let _ = pool.mix();
    }

    #[test]
    fn test_refresh_updates_counter_seed_history() {
        let mut source = CountingSource::new(14);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);

        pool.refresh(&mut source);

        assert_eq!(pool.counter(), 1);
        assert_eq!(pool.len(), 28);
        assert_eq!(pool.history_len(), 1);
    }

    #[test]
    fn test_refresh_seed_is_folded_pool() {
        let mut source = CountingSource::new(4);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);
        pool.refresh(&mut source);

        // Initial 1..=4, then 5, 6 plus old seed 1 and counter 1.
        let expected = reduce_sample(xorshift(xor_fold(&[1, 2, 3, 4, 5, 6, 1, 1])));
        assert_eq!(pool.seed(), expected);
        assert_eq!(pool.snapshot().last_seed, expected);
    }

    #[test]
    fn test_seed_stays_below_safe_max() {
        struct WideSource(u64);
        impl SampleSource for WideSource {
            fn initial_samples(&mut self) -> Vec<u64> {
                vec![SAFE_MAX - 1]
            }
            fn fresh_samples(&mut self, seed: u64, counter: u64) -> Vec<u64> {
                self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                vec![self.0, seed, counter]
            }
        }

        let mut source = WideSource(0x9E37_79B9_7F4A_7C15);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);

        for _ in 0..500 {
            pool.refresh(&mut source);
            let snapshot = pool.snapshot();
            assert!(snapshot.last_seed < SAFE_MAX, "seed {} too wide", snapshot.last_seed);
            let json = serde_json::to_value(&snapshot).unwrap();
            assert_eq!(json["lastSeed"].as_f64().unwrap() as u64, snapshot.last_seed);
        }
    }

    #[test]
    fn test_trim_keeps_most_recent() {
        let config = PoolConfig {
            capacity: 10,
            retain: 5,
            ..Default::default()
        };
        let mut source = CountingSource::new(8);
        let mut pool = EntropyPool::initialize(config, &mut source);

        pool.refresh(&mut source);

        // 8 + 8 = 16 > 10, trimmed to the last 5 of the refresh batch.
        assert_eq!(pool.len(), 5);
        let snapshot = pool.snapshot();
        assert_eq!(snapshot.entropy_sources[4], 1); // counter
        assert_eq!(snapshot.entropy_sources[3], 1); // previous seed
    }

    #[test]
    fn test_history_trim() {
        let mut source = CountingSource::new(6);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);

        for _ in 0..50 {
            pool.refresh(&mut source);
        }
        assert_eq!(pool.history_len(), 50);

        pool.refresh(&mut source);
        assert_eq!(pool.history_len(), 25);
    }

    #[test]
    fn test_mix_is_deterministic_without_refresh() {
        let mut source = CountingSource::new(14);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);
        pool.refresh(&mut source);

        assert_eq!(pool.mix(), pool.mix());

        let before = pool.mix();
        pool.refresh(&mut source);
        assert_ne!(before, pool.mix());
    }

    #[test]
    fn test_mix_includes_history() {
        let mut source = CountingSource::new(4);
        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);
        pool.refresh(&mut source);

        let pool_only = mix_rounds(xor_fold(&[1, 2, 3, 4, 5, 6, 1, 1]), 3);
        assert_eq!(pool.mix(), pool_only ^ pool.seed());
    }

    #[test]
    fn test_snapshot_tail() {
        let mut source = CountingSource::new(20);
        let pool = EntropyPool::initialize(PoolConfig::default(), &mut source);

        let snapshot = pool.snapshot();
        assert_eq!(snapshot.pool_size, 20);
        assert_eq!(snapshot.entropy_sources, (13..=20).collect::<Vec<u64>>());
    }

    #[test]
    fn test_wide_samples_reduced() {
        struct WideSource;
        impl SampleSource for WideSource {
            fn initial_samples(&mut self) -> Vec<u64> {
                vec![u64::MAX]
            }
            fn fresh_samples(&mut self, _seed: u64, _counter: u64) -> Vec<u64> {
                vec![u64::MAX, u64::MAX - 1]
            }
        }

        let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut WideSource);
        pool.refresh(&mut WideSource);
        assert!(pool.snapshot().entropy_sources.iter().all(|&s| s < SAFE_MAX));
    }

    proptest! {
        #[test]
        fn prop_pool_bounded_and_non_empty(refreshes in 0usize..120, batch in 1usize..40) {
            let mut source = CountingSource::new(batch);
            let mut pool = EntropyPool::initialize(PoolConfig::default(), &mut source);

            for _ in 0..refreshes {
                pool.refresh(&mut source);
                prop_assert!(pool.len() <= 200);
                prop_assert!(!pool.is_empty());
                prop_assert!(pool.history_len() <= 50);
            }
        }
    }
}
