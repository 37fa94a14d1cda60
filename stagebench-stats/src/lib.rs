#![warn(missing_docs)]
//! StageBench Statistical Engine
//!
//! Reduces per-trial stage timings into per-stage statistics:
//! - Sample mean and Bessel-corrected standard deviation
//! - Min, max and median for the JSON report
//! - Stage-layout checking across trials

mod aggregator;
mod summary;

pub use aggregator::{
    AggregateStats, MAX_PREALLOCATED_TRIALS, StageStats, StatisticsAggregator,
};
pub use summary::{SummaryStatistics, compute_summary};
