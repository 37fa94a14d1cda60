//! Summary Statistics
//!
//! Central tendency and spread of one stage's durations across trials.
//! Samples are sorted before any reduction, so the same multiset of samples
//! always yields bit-identical results regardless of the order trials arrived in.

use serde::{Deserialize, Serialize};

/// Summary of a set of duration samples (seconds)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected, 0 for a single sample)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Median (midpoint average for even counts)
    pub median: f64,
    /// Number of samples
    pub sample_count: usize,
}

/// Compute summary statistics in a single batch pass over the samples
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    let mean = sorted.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    SummaryStatistics {
        mean,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        median,
        sample_count: n,
    }
}

impl SummaryStatistics {
    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }
}
