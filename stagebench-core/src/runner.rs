//! Trial Execution
//!
//! Runs every stage of a pipeline once, in declaration order, timing each one.
//!
//! ```text
//! Pipeline ──► for each stage (declared order)
//!                 │
//!                 ├─ StageTimer::measure(action(ctx))
//!                 │     ok  → record (name, seconds), continue
//!                 │     err → abort trial, HarnessError::StageFailed
//!                 ▼
//!             TrialResult
//! ```
//!
//! Stages are never reordered, skipped or run concurrently: later stages may
//! depend on artifacts produced by earlier ones.

use crate::context::TrialContext;
use crate::error::HarnessError;
use crate::measure::StageTimer;
use crate::stage::Pipeline;
use serde::{Deserialize, Serialize};

/// One stage's elapsed time within a trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    /// Stage name
    pub name: String,
    /// Elapsed wall-clock seconds
    pub seconds: f64,
}

/// Per-trial record of elapsed seconds per stage, in declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialResult {
    timings: Vec<StageTiming>,
}

impl TrialResult {
    /// Build a result from `(name, seconds)` pairs.
    ///
    /// Intended for tests and for drivers replaying recorded timings.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            timings: pairs
                .into_iter()
                .map(|(name, seconds)| StageTiming {
                    name: name.into(),
                    seconds,
                })
                .collect(),
        }
    }

    /// Duration of the named stage
    pub fn get(&self, name: &str) -> Option<f64> {
        self.timings
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.seconds)
    }

    /// Timings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &StageTiming> {
        self.timings.iter()
    }

    /// Stage names in declaration order
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.timings.iter().map(|t| t.name.as_str())
    }

    /// Number of recorded stages
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Whether no stage was recorded
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Sum of all stage durations
    pub fn total_seconds(&self) -> f64 {
        self.timings.iter().map(|t| t.seconds).sum()
    }
}

impl<'r> IntoIterator for &'r TrialResult {
    type Item = &'r StageTiming;
    type IntoIter = std::slice::Iter<'r, StageTiming>;

    fn into_iter(self) -> Self::IntoIter {
        self.timings.iter()
    }
}

/// Executes one full pipeline trial
#[derive(Debug, Clone, Default)]
pub struct TrialRunner {
    timer: StageTimer,
}

impl TrialRunner {
    /// Create a runner
    pub fn new() -> Self {
        Self {
            timer: StageTimer::new(),
        }
    }

    /// Run one trial with a fresh [`TrialContext`]
    pub fn run_trial(&self, pipeline: &mut Pipeline<'_>) -> Result<TrialResult, HarnessError> {
        let mut ctx = TrialContext::new();
        self.run_trial_in(pipeline, &mut ctx)
    }

    /// Run one trial against a caller-supplied context.
    ///
    /// The context is cleared first; after a successful trial it holds every
    /// artifact the stages left behind, so the driver can inspect the output.
    pub fn run_trial_in(
        &self,
        pipeline: &mut Pipeline<'_>,
        ctx: &mut TrialContext,
    ) -> Result<TrialResult, HarnessError> {
        ctx.clear();
        let mut timings = Vec::with_capacity(pipeline.len());

        for stage in pipeline.stages_mut() {
            let seconds = match self.timer.measure(|| stage.invoke(ctx)) {
                Ok(seconds) => seconds,
                Err(source) => {
                    tracing::debug!(stage = stage.name(), error = %source, "stage failed");
                    return Err(HarnessError::StageFailed {
                        stage: stage.name().to_string(),
                        source,
                    });
                }
            };
            tracing::trace!(stage = stage.name(), seconds, "stage complete");
            timings.push(StageTiming {
                name: stage.name().to_string(),
                seconds,
            });
        }

        Ok(TrialResult { timings })
    }
}
