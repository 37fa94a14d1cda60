//! Per-Stage Aggregation
//!
//! Collects trial results and reduces them, per stage name, into summary
//! statistics. Every trial in one aggregation session must declare the same
//! stage names in the same order; the first trial fixes that layout.

use crate::summary::{SummaryStatistics, compute_summary};
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use stagebench_core::{HarnessError, TrialResult};

/// Upper bound on per-stage sample buffers reserved up front
pub const MAX_PREALLOCATED_TRIALS: usize = 4096;

/// Aggregated statistics for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    /// Stage name
    pub name: String,
    /// Summary of the stage's durations across trials
    #[serde(flatten)]
    pub summary: SummaryStatistics,
}

impl StageStats {
    /// Mean duration in seconds
    pub fn mean(&self) -> f64 {
        self.summary.mean
    }

    /// Sample standard deviation in seconds
    pub fn std_dev(&self) -> f64 {
        self.summary.std_dev
    }

    /// Number of trials contributing to this stage
    pub fn sample_count(&self) -> usize {
        self.summary.sample_count
    }
}

/// Per-stage statistics across all aggregated trials, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    stages: Vec<StageStats>,
}

impl AggregateStats {
    /// Build directly from per-stage entries
    pub fn from_stages(stages: Vec<StageStats>) -> Self {
        Self { stages }
    }

    /// Statistics for the named stage
    pub fn get(&self, name: &str) -> Option<&StageStats> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &StageStats> {
        self.stages.iter()
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether there are no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<'a> IntoIterator for &'a AggregateStats {
    type Item = &'a StageStats;
    type IntoIter = std::slice::Iter<'a, StageStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// Accumulates trial results and computes [`AggregateStats`]
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    names: Vec<String>,
    // samples[stage][trial]
    samples: Vec<Vec<f64>>,
    trials: usize,
    capacity_hint: usize,
}

impl StatisticsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator expecting roughly `trials` results.
    ///
    /// At most [`MAX_PREALLOCATED_TRIALS`] samples per stage are reserved;
    /// longer runs grow the buffers as trials arrive.
    pub fn with_capacity(trials: usize) -> Self {
        Self {
            capacity_hint: trials.min(MAX_PREALLOCATED_TRIALS),
            ..Self::default()
        }
    }

    /// Add one trial's durations.
    ///
    /// The first trial fixes the stage layout and must name each stage once
    /// ([`HarnessError::DuplicateStage`] otherwise). Any later trial whose stage
    /// names differ (in membership or order) is rejected with
    /// [`HarnessError::StageSetMismatch`]. A rejected trial leaves the
    /// aggregator unchanged.
    pub fn add_trial(&mut self, result: &TrialResult) -> Result<(), HarnessError> {
        if self.trials == 0 {
            if result.is_empty() {
                return Err(HarnessError::EmptyPipeline);
            }
            let mut seen = FxHashSet::default();
            if let Some(dup) = result.stage_names().find(|name| !seen.insert(*name)) {
                return Err(HarnessError::DuplicateStage(dup.to_string()));
            }
            self.names = result.stage_names().map(str::to_string).collect();
            self.samples = (0..self.names.len())
                .map(|_| Vec::with_capacity(self.capacity_hint))
                .collect();
        } else if !result.stage_names().eq(self.names.iter().map(String::as_str)) {
            return Err(HarnessError::StageSetMismatch {
                trial: self.trials,
                expected: self.names.clone(),
                found: result.stage_names().map(str::to_string).collect(),
            });
        }

        for (column, timing) in self.samples.iter_mut().zip(result) {
            column.push(timing.seconds);
        }
        self.trials += 1;
        tracing::trace!(trials = self.trials, "trial aggregated");
        Ok(())
    }

    /// Number of trials added so far
    pub fn trial_count(&self) -> usize {
        self.trials
    }

    /// Stage layout fixed by the first trial
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Raw samples recorded for the named stage
    pub fn samples(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.samples[i].as_slice())
    }

    /// Compute per-stage statistics over every trial added so far.
    ///
    /// Does not consume or mutate the collected samples, so repeated calls
    /// without an intervening [`add_trial`](Self::add_trial) return identical results.
    pub fn finalize(&self) -> Result<AggregateStats, HarnessError> {
        if self.trials == 0 {
            return Err(HarnessError::NoTrials);
        }

        let stages = self
            .names
            .iter()
            .zip(&self.samples)
            .map(|(name, samples)| StageStats {
                name: name.clone(),
                summary: compute_summary(samples),
            })
            .collect();

        Ok(AggregateStats { stages })
    }
}
