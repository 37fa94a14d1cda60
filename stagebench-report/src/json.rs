//! JSON Output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagebench_core::{StageTiming, TrialResult};
use stagebench_stats::{AggregateStats, StageStats};

/// Schema version of [`RunReport`]
pub const SCHEMA_VERSION: u32 = 1;

/// Machine-readable record of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run metadata
    pub meta: RunMeta,
    /// Per-stage results
    pub results: RunResults,
}

/// Metadata describing how the run was configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    /// Report schema version
    pub schema_version: u32,
    /// Harness version
    pub version: String,
    /// Report generation time
    pub timestamp: DateTime<Utc>,
    /// Pipeline label
    pub pipeline: String,
    /// Measured trials
    pub trials: u64,
    /// Discarded warmup trials
    pub warmup_trials: u64,
}

impl RunMeta {
    /// Metadata stamped with the current time
    pub fn new(pipeline: impl Into<String>, trials: u64, warmup_trials: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            pipeline: pipeline.into(),
            trials,
            warmup_trials,
        }
    }
}

/// Aggregate statistics or the raw durations of a single trial
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", content = "stages", rename_all = "lowercase")]
pub enum RunResults {
    /// Multi-trial mode
    Aggregate(Vec<StageStats>),
    /// Single-trial mode
    Single(Vec<StageTiming>),
}

impl RunReport {
    /// Report for a multi-trial run
    pub fn aggregate(meta: RunMeta, stats: &AggregateStats) -> Self {
        Self {
            meta,
            results: RunResults::Aggregate(stats.iter().cloned().collect()),
        }
    }

    /// Report for a single-trial run
    pub fn single(meta: RunMeta, result: &TrialResult) -> Self {
        Self {
            meta,
            results: RunResults::Single(result.iter().cloned().collect()),
        }
    }
}

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
