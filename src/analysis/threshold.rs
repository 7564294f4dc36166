//! Bias classification thresholds.

use serde::{Deserialize, Serialize};

/// Maximum-deviation cut-offs, in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionThresholds {
    /// Below this the distribution reads as random.
    pub random_below: f64,
    /// Below this (and at or above `random_below`) it reads as slightly biased.
    pub slight_bias_below: f64,
}

impl Default for DistributionThresholds {
    fn default() -> Self {
        Self {
            random_below: 10.0,
            slight_bias_below: 20.0,
        }
    }
}

impl DistributionThresholds {
    /// Classifies a maximum per-face deviation.
    pub fn classify(&self, max_deviation: f64) -> DistributionVerdict {
        if max_deviation < self.random_below {
            DistributionVerdict::Random
        } else if max_deviation < self.slight_bias_below {
            DistributionVerdict::SlightBias
        } else {
            DistributionVerdict::SignificantBias
        }
    }
}

/// Outcome of a distribution check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DistributionVerdict {
    /// Maximum deviation under 10%.
    Random,
    /// Maximum deviation under 20%.
    SlightBias,
    /// Anything larger.
    SignificantBias,
}

impl std::fmt::Display for DistributionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Random => "distribution looks random",
            Self::SlightBias => "distribution may have slight bias",
            Self::SignificantBias => "distribution shows significant bias",
        };
        f.write_str(text)
    }
}
