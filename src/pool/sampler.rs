//! Entropy sample collection.

use std::time::Instant;

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use crate::source::{HostMetrics, SecureByteSource, SAFE_MAX};

/// Produces batches of scalar samples for the pool.
///
/// Implementations must reduce every sample with [`reduce_sample`].
pub trait SampleSource {
    /// Samples used to populate a fresh pool.
    fn initial_samples(&mut self) -> Vec<u64>;

    /// Samples appended on each refresh. `seed` and `counter` are the
    /// pool's previous seed and its already-incremented counter.
    fn fresh_samples(&mut self, seed: u64, counter: u64) -> Vec<u64>;
}

/// Reduces a sample into `0..SAFE_MAX`.
#[inline]
pub fn reduce_sample(value: u64) -> u64 {
    value % SAFE_MAX
}

/// Production sampler: clocks, PRNG, OS CSPRNG and host counters.
pub struct SystemSampler {
    secure: SecureByteSource,
    /// General-purpose PRNG, seeded once from the OS.
    prng: ChaCha20Rng,
    /// Origin for monotonic and uptime samples.
    started: Instant,
    /// Whether host counters are sampled.
    host_metrics: bool,
}

impl SystemSampler {
    /// Creates a sampler. `host_metrics` toggles procfs sampling.
    pub fn new(host_metrics: bool) -> Self {
        let secure = SecureByteSource::new();
        Self {
            prng: ChaCha20Rng::from_seed(secure.seed_bytes()),
            secure,
            started: Instant::now(),
            host_metrics,
        }
    }

    fn wall_clock_ms() -> u64 {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }

    fn monotonic_ns(&self) -> u64 {
        let nanos = self.started.elapsed().as_nanos() % u128::from(SAFE_MAX);
        u64::try_from(nanos).unwrap_or(0)
    }

    fn uptime_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn host(&self) -> Option<HostMetrics> {
        self.host_metrics.then(HostMetrics::collect)
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new(true)
    }
}

fn load_scaled(host: &HostMetrics) -> Option<u64> {
    // Saturating float-to-int cast; negative load is impossible.
    host.system_info.loadavg.map(|l| (l[0] * 1_000_000.0) as u64)
}

impl SampleSource for SystemSampler {
    fn initial_samples(&mut self) -> Vec<u64> {
        let mut samples = vec![
            Self::wall_clock_ms(),
            self.monotonic_ns(),
            self.prng.next_u64(),
            self.secure.next_u64(),
            u64::from(std::process::id()),
            self.uptime_ms(),
        ];

        if let Some(host) = self.host() {
            samples.extend(host.system_info.freemem);
            samples.extend(host.system_info.totalmem);
            samples.extend(load_scaled(&host));
            samples.push(host.system_info.cpus as u64);
            if let Some(memory) = host.memory_usage {
                samples.extend([memory.rss, memory.virtual_size, memory.data]);
            }
        }

        samples.push(u64::from(self.secure.next_u32()));
        samples.push(u64::from(self.secure.next_u32()));

        samples.into_iter().map(reduce_sample).collect()
    }

    fn fresh_samples(&mut self, seed: u64, counter: u64) -> Vec<u64> {
        let mut samples = vec![
            Self::wall_clock_ms(),
            self.monotonic_ns(),
            self.prng.next_u64(),
            self.secure.next_u64(),
            seed,
            counter,
        ];

        if let Some(host) = self.host() {
            if let Some(memory) = host.memory_usage {
                samples.extend([memory.rss, memory.virtual_size, memory.data]);
            }
            samples.extend(host.system_info.freemem);
            samples.extend(load_scaled(&host));
        }

        for _ in 0..3 {
            samples.push(u64::from(self.secure.next_u32()));
        }

        samples.into_iter().map(reduce_sample).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_sample_bounds() {
        assert_eq!(reduce_sample(SAFE_MAX), 0);
        assert_eq!(reduce_sample(SAFE_MAX - 1), SAFE_MAX - 1);
        assert!(reduce_sample(u64::MAX) < SAFE_MAX);
    }

    #[test]
    fn test_initial_samples_reduced() {
        let mut sampler = SystemSampler::new(true);
        let samples = sampler.initial_samples();

        // Clocks, PRNG, secure draws, pid, uptime are always present.
        assert!(samples.len() >= 8);
        assert!(samples.iter().all(|&s| s < SAFE_MAX));
    }

    #[test]
    fn test_fresh_samples_carry_seed_and_counter() {
        let mut sampler = SystemSampler::new(false);
        let samples = sampler.fresh_samples(1234, 7);

        assert_eq!(samples.len(), 9);
        assert_eq!(samples[4], 1234);
        assert_eq!(samples[5], 7);
    }

    #[test]
    fn test_without_host_metrics() {
        let mut sampler = SystemSampler::new(false);
        assert_eq!(sampler.initial_samples().len(), 8);
    }
}
