//! Run Driver
//!
//! Drives one complete run of a pipeline:
//!
//! ```text
//! INIT ─► warmup × W (discarded)
//!      ─► trial × N ─► StatisticsAggregator ─► AGGREGATE ─► REPORT
//!                 └─ (N = 1) raw TrialResult + sample output ─► REPORT
//!
//! any stage failure ─► ABORTED (HarnessError::StageFailed, no report)
//! ```
//!
//! Trials run strictly one after another on the calling thread.

use indicatif::{ProgressBar, ProgressStyle};
use stagebench_core::{HarnessError, Pipeline, TrialContext, TrialResult, TrialRunner};
use stagebench_report::{
    OutputFormat, ReportEmitter, RunMeta, RunReport, SampleOutput, generate_json_report,
};
use stagebench_stats::{AggregateStats, StatisticsAggregator};

/// Extracts an illustrative output value from a finished trial's context
pub type SampleFn<'a> = Box<dyn Fn(&TrialContext) -> Option<SampleOutput> + 'a>;

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Measured trials
    pub trials: u64,
    /// Discarded warmup trials
    pub warmup_trials: u64,
    /// Draw a progress bar on stderr
    pub progress: bool,
    /// Report format
    pub format: OutputFormat,
    /// Sample output values shown in single-trial mode
    pub preview_len: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trials: stagebench_core::DEFAULT_TRIALS,
            warmup_trials: 0,
            progress: false,
            format: OutputFormat::Human,
            preview_len: stagebench_report::DEFAULT_PREVIEW_LEN,
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// N > 1: per-stage mean and standard deviation
    Aggregate(AggregateStats),
    /// N = 1: raw durations plus optional sample output
    Single {
        /// Durations of the only trial
        result: TrialResult,
        /// Sample output extracted from the trial context
        sample: Option<SampleOutput>,
    },
}

/// A pipeline plus the driver's reporting hooks
pub struct Harness<'a> {
    pipeline: Pipeline<'a>,
    title: Option<String>,
    sample: Option<SampleFn<'a>>,
    runner: TrialRunner,
}

impl<'a> Harness<'a> {
    /// Wrap a validated pipeline
    pub fn new(pipeline: Pipeline<'a>) -> Self {
        Self {
            pipeline,
            title: None,
            sample: None,
            runner: TrialRunner::new(),
        }
    }

    /// Report title printed above the stage lines
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sample output shown after a single-trial report
    pub fn with_sample_output<F>(mut self, extract: F) -> Self
    where
        F: Fn(&TrialContext) -> Option<SampleOutput> + 'a,
    {
        self.sample = Some(Box::new(extract));
        self
    }

    /// The wrapped pipeline
    pub fn pipeline(&self) -> &Pipeline<'a> {
        &self.pipeline
    }

    /// Run warmup and measured trials.
    ///
    /// The first stage failure aborts the whole run; nothing is aggregated
    /// from the failing trial or any trial after it.
    pub fn execute(&mut self, config: &RunConfig) -> Result<RunOutcome, HarnessError> {
        if config.trials == 0 {
            return Err(HarnessError::InvalidTrialCount(config.trials));
        }

        tracing::info!(
            pipeline = self.pipeline.name(),
            stages = self.pipeline.len(),
            trials = config.trials,
            warmup = config.warmup_trials,
            "starting run"
        );

        let mut ctx = TrialContext::new();
        for i in 0..config.warmup_trials {
            tracing::debug!(trial = i, "warmup trial");
            self.runner.run_trial_in(&mut self.pipeline, &mut ctx)?;
        }

        if config.trials == 1 {
            let result = self.runner.run_trial_in(&mut self.pipeline, &mut ctx)?;
            let sample = self.sample.as_ref().and_then(|extract| extract(&ctx));
            tracing::info!(total_seconds = result.total_seconds(), "single trial complete");
            return Ok(RunOutcome::Single { result, sample });
        }

        let pb = progress_bar(config);
        let expected = usize::try_from(config.trials).unwrap_or(usize::MAX);
        let mut aggregator = StatisticsAggregator::with_capacity(expected);
        for i in 0..config.trials {
            let result = match self.runner.run_trial_in(&mut self.pipeline, &mut ctx) {
                Ok(result) => result,
                Err(e) => {
                    pb.abandon_with_message("aborted");
                    tracing::error!(trial = i, "{e}");
                    return Err(e);
                }
            };
            tracing::debug!(trial = i, seconds = result.total_seconds(), "trial complete");
            aggregator.add_trial(&result)?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        let stats = aggregator.finalize()?;
        tracing::info!(trials = aggregator.trial_count(), "aggregation complete");
        Ok(RunOutcome::Aggregate(stats))
    }

    /// Render a finished run in the configured format
    pub fn render(&self, outcome: &RunOutcome, config: &RunConfig) -> anyhow::Result<String> {
        let output = match config.format {
            OutputFormat::Human => {
                let mut emitter = ReportEmitter::new().with_preview_len(config.preview_len);
                if let Some(title) = &self.title {
                    emitter = emitter.with_title(title.clone());
                }
                match outcome {
                    RunOutcome::Aggregate(stats) => emitter.render_aggregate(stats),
                    RunOutcome::Single { result, sample } => {
                        emitter.render_single(result, sample.as_ref())
                    }
                }
            }
            OutputFormat::Json => {
                let meta = RunMeta::new(self.pipeline.name(), config.trials, config.warmup_trials);
                let report = match outcome {
                    RunOutcome::Aggregate(stats) => RunReport::aggregate(meta, stats),
                    RunOutcome::Single { result, .. } => RunReport::single(meta, result),
                };
                let mut json = generate_json_report(&report)?;
                json.push('\n');
                json
            }
        };
        Ok(output)
    }
}

fn progress_bar(config: &RunConfig) -> ProgressBar {
    if !config.progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(config.trials);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} trials")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
