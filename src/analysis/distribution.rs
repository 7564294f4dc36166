//! Face frequency statistics.

use serde::Serialize;

use super::threshold::{DistributionThresholds, DistributionVerdict};

/// Number of faces on the die.
const FACES: usize = 6;

/// Per-face summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceStats {
    /// Face value, 1 through 6.
    pub face: u8,
    /// Times the face was rolled.
    pub count: u64,
    /// Share of all rolls, in percent.
    pub percentage: f64,
    /// Signed deviation from the uniform expectation, in percent.
    pub deviation: f64,
}

/// Observed counts of each face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceDistribution {
    counts: [u64; FACES],
    total: u64,
}

impl FaceDistribution {
    /// Creates an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a distribution from a sequence of faces.
    pub fn from_rolls<I: IntoIterator<Item = u8>>(rolls: I) -> Self {
        let mut dist = Self::new();
        for face in rolls {
            dist.record(face);
        }
        dist
    }

    /// Records one roll. Faces outside 1..=6 are ignored and reported
    /// by returning `false`.
    pub fn record(&mut self, face: u8) -> bool {
        match usize::from(face).checked_sub(1) {
            Some(idx) if idx < FACES => {
                self.counts[idx] += 1;
                self.total += 1;
                true
            }
            _ => {
                tracing::warn!(face, "Ignoring out-of-range die face");
                false
            }
        }
    }

    /// Count for `face` (1..=6); zero for any other value.
    pub fn count(&self, face: u8) -> u64 {
        usize::from(face)
            .checked_sub(1)
            .and_then(|idx| self.counts.get(idx).copied())
            .unwrap_or(0)
    }

    /// Total rolls recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Expected count per face under a uniform die.
    pub fn expected(&self) -> f64 {
        self.total as f64 / FACES as f64
    }

    /// Per-face rows, faces 1 through 6.
    pub fn faces(&self) -> Vec<FaceStats> {
        let expected = self.expected();
        (1..=FACES as u8)
            .map(|face| {
                let count = self.count(face);
                FaceStats {
                    face,
                    count,
                    percentage: percent(count as f64, self.total as f64),
                    deviation: percent(count as f64 - expected, expected),
                }
            })
            .collect()
    }

    /// Largest absolute per-face deviation, in percent.
    pub fn max_deviation(&self) -> f64 {
        self.faces()
            .iter()
            .map(|f| f.deviation.abs())
            .fold(0.0, f64::max)
    }

    /// Mean face value (3.5 for a fair die).
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.weighted_sum(|face| face) / self.total as f64
    }

    /// Population variance of face values (~2.917 for a fair die).
    pub fn variance(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mean = self.mean();
        self.weighted_sum(|face| (face - mean).powi(2)) / self.total as f64
    }

    /// Standard deviation of face values (~1.708 for a fair die).
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Pearson chi-square statistic against the uniform expectation
    /// (5 degrees of freedom).
    pub fn chi_square(&self) -> f64 {
        let expected = self.expected();
        if expected == 0.0 {
            return 0.0;
        }
        self.counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum()
    }

    /// Classifies the distribution with the given thresholds.
    pub fn verdict(&self, thresholds: &DistributionThresholds) -> DistributionVerdict {
        thresholds.classify(self.max_deviation())
    }

    fn weighted_sum(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(idx, &c)| f((idx + 1) as f64) * c as f64)
            .sum()
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
