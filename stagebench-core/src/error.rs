//! Error types for stage execution and harness configuration

use thiserror::Error;

/// Boxed error raised by driver code inside a stage
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure signalled by a stage action
#[derive(Debug, Error)]
pub enum StageError {
    /// The stage needed an artifact no earlier stage produced
    #[error("missing trial artifact `{0}`")]
    MissingArtifact(&'static str),

    /// Free-form failure message
    #[error("{0}")]
    Message(String),

    /// Underlying error from the measured workload
    #[error(transparent)]
    Source(#[from] BoxError),
}

impl StageError {
    /// Build a [`StageError::Message`]
    pub fn msg(message: impl Into<String>) -> Self {
        StageError::Message(message.into())
    }

    /// Wrap any error from the measured workload
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StageError::Source(Box::new(err))
    }
}

/// Errors surfaced by the harness itself
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// A pipeline must declare at least one stage
    #[error("pipeline has no stages")]
    EmptyPipeline,

    /// Two stages in one pipeline share a name
    #[error("duplicate stage name `{0}`")]
    DuplicateStage(String),

    /// A stage action failed; the trial was abandoned
    #[error("stage `{stage}` failed")]
    StageFailed {
        /// Name of the failing stage
        stage: String,
        /// Cause reported by the stage
        #[source]
        source: StageError,
    },

    /// A trial result declared a different stage set than earlier trials
    #[error(
        "trial {trial} declares stages [{}], expected [{}]",
        .found.join(", "),
        .expected.join(", ")
    )]
    StageSetMismatch {
        /// Zero-based index of the offending trial within the aggregation
        trial: usize,
        /// Stage names fixed by the first trial
        expected: Vec<String>,
        /// Stage names of the rejected trial
        found: Vec<String>,
    },

    /// Statistics requested before any trial was added
    #[error("no trials have been aggregated")]
    NoTrials,

    /// Trial count must be at least one
    #[error("trial count must be a positive integer, got {0}")]
    InvalidTrialCount(u64),
}

impl HarnessError {
    /// Name of the failing stage, if this is a stage failure
    pub fn failed_stage(&self) -> Option<&str> {
        match self {
            HarnessError::StageFailed { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Whether this is a configuration error rather than a stage failure
    pub fn is_configuration(&self) -> bool {
        !matches!(self, HarnessError::StageFailed { .. })
    }
}
