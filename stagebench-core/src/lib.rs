#![warn(missing_docs)]
//! StageBench Core - Trial Runtime
//!
//! This crate provides the execution side of the harness:
//! - `StageTimer` for wall-clock timing of one stage invocation
//! - `Stage` / `Pipeline` for the ordered, named units of work
//! - `TrialContext` for passing artifacts between stages explicitly
//! - `TrialRunner` for running one full trial into a `TrialResult`

mod context;
mod error;
mod measure;
mod runner;
mod stage;

pub use context::TrialContext;
pub use error::{BoxError, HarnessError, StageError};
pub use measure::{StageTimer, Timer};
pub use runner::{StageTiming, TrialResult, TrialRunner};
pub use stage::{Pipeline, PipelineBuilder, Stage, StageFn};

/// Trial count used when none is configured
pub const DEFAULT_TRIALS: u64 = 100;
