#![warn(missing_docs)]
//! # StageBench
//!
//! Staged performance-measurement harness: times the discrete phases of a
//! multi-step pipeline across repeated trials and reports per-phase mean and
//! sample standard deviation.
//!
//! - **Ordered stages**: stages run in declaration order, one trial at a time
//! - **Explicit data flow**: stages exchange artifacts through a typed `TrialContext`
//! - **Fail-fast**: the first stage failure aborts the run, tagged with the stage name
//! - **Statistics**: mean and Bessel-corrected standard deviation per stage
//! - **Reports**: `<stage>: <mean>±<stddev> s` lines, or raw durations for a single trial
//!
//! The harness never inspects what a stage does; it only measures wall-clock cost.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stagebench::prelude::*;
//!
//! struct Params(u64);
//!
//! fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::builder()
//!         .stage("setup", |ctx| {
//!             ctx.insert(Params(65537));
//!             Ok(())
//!         })
//!         .stage("work", |ctx| {
//!             let p = ctx.require::<Params>()?;
//!             std::hint::black_box(p.0 * p.0);
//!             Ok(())
//!         })
//!         .build()?;
//!
//!     stagebench::run(Harness::new(pipeline).with_title("Demo Performance Test"))
//! }
//! ```

// Re-export core types
pub use stagebench_core::{
    BoxError, DEFAULT_TRIALS, HarnessError, Pipeline, PipelineBuilder, Stage, StageError,
    StageFn, StageTimer, StageTiming, Timer, TrialContext, TrialResult, TrialRunner,
};

// Re-export stats
pub use stagebench_stats::{
    AggregateStats, StageStats, StatisticsAggregator, SummaryStatistics, compute_summary,
};

// Re-export report types
pub use stagebench_report::{
    OutputFormat, ReportEmitter, RunMeta, RunReport, RunResults, SampleOutput,
    generate_json_report,
};

// Re-export CLI driver types
pub use stagebench_cli::{
    Cli, Harness, RunConfig, RunOutcome, StageConfig, build_run_config, run_pipeline,
    run_with_cli,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Harness, HarnessError, Pipeline, RunConfig, RunOutcome, SampleOutput, StageError,
        TrialContext,
    };
}

/// Run the StageBench CLI harness.
///
/// Call this from your driver binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     stagebench::run(harness)
/// }
/// ```
pub use stagebench_cli::run;
