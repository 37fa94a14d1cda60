//! Stages and Pipelines
//!
//! A [`Stage`] is one named unit of timed work. A [`Pipeline`] is the ordered,
//! validated sequence of stages that makes up a trial. Pipelines are built once
//! per process and reused unchanged across every trial.

use crate::context::TrialContext;
use crate::error::{HarnessError, StageError};
use fxhash::FxHashSet;

/// Boxed stage action.
///
/// The lifetime lets actions borrow state owned by the driver.
pub type StageFn<'a> = Box<dyn FnMut(&mut TrialContext) -> Result<(), StageError> + 'a>;

/// A named unit of timed work
pub struct Stage<'a> {
    name: String,
    action: StageFn<'a>,
}

impl<'a> Stage<'a> {
    /// Create a stage from a name and an action
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut TrialContext) -> Result<(), StageError> + 'a,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }

    /// Stage name, unique within its pipeline
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the action once (untimed)
    pub fn invoke(&mut self, ctx: &mut TrialContext) -> Result<(), StageError> {
        (self.action)(ctx)
    }
}

impl std::fmt::Debug for Stage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// Ordered, non-empty sequence of uniquely named stages
#[derive(Debug)]
pub struct Pipeline<'a> {
    name: String,
    stages: Vec<Stage<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Start building a pipeline
    pub fn builder() -> PipelineBuilder<'a> {
        PipelineBuilder::new()
    }

    /// Validate an already assembled stage list
    pub fn from_stages(
        name: impl Into<String>,
        stages: Vec<Stage<'a>>,
    ) -> Result<Self, HarnessError> {
        if stages.is_empty() {
            return Err(HarnessError::EmptyPipeline);
        }

        let mut seen = FxHashSet::default();
        for stage in &stages {
            if !seen.insert(stage.name.as_str()) {
                return Err(HarnessError::DuplicateStage(stage.name.clone()));
            }
        }

        Ok(Self {
            name: name.into(),
            stages,
        })
    }

    /// Pipeline label used in reports and logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for a validated pipeline
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in declaration order
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name.as_str())
    }

    pub(crate) fn stages_mut(&mut self) -> &mut [Stage<'a>] {
        &mut self.stages
    }
}

/// Builder for [`Pipeline`]
#[derive(Debug)]
pub struct PipelineBuilder<'a> {
    name: String,
    stages: Vec<Stage<'a>>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            name: "pipeline".to_string(),
            stages: Vec::new(),
        }
    }

    /// Set the pipeline label
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a stage
    pub fn stage<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut TrialContext) -> Result<(), StageError> + 'a,
    {
        self.stages.push(Stage::new(name, action));
        self
    }

    /// Validate and build.
    ///
    /// Rejects empty pipelines and duplicate stage names.
    pub fn build(self) -> Result<Pipeline<'a>, HarnessError> {
        Pipeline::from_stages(self.name, self.stages)
    }
}

impl Default for PipelineBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
