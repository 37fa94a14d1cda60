#![warn(missing_docs)]
//! StageBench CLI Library
//!
//! Command-line front end for driver programs. Build a [`Pipeline`] of stages,
//! wrap it in a [`Harness`], and hand it to [`run`]:
//!
//! ```ignore
//! use stagebench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::builder()
//!         .stage("encode", |ctx| { /* ... */ Ok(()) })
//!         .stage("decode", |ctx| { /* ... */ Ok(()) })
//!         .build()?;
//!     stagebench::run(Harness::new(pipeline))
//! }
//! ```
//!
//! The report block goes to stdout once every trial has finished; logs and the
//! progress bar go to stderr.

mod config;
mod driver;

pub use config::*;
pub use driver::{Harness, RunConfig, RunOutcome, SampleFn};

use anyhow::Context;
use clap::Parser;
use stagebench_core::Pipeline;
use stagebench_report::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// StageBench CLI arguments
#[derive(Parser, Debug, Default)]
#[command(name = "stagebench")]
#[command(author, version, about = "StageBench - per-stage timing across repeated trials")]
pub struct Cli {
    /// Number of measured trials (1 prints raw single-trial durations)
    #[arg(long, short = 'n')]
    pub trials: Option<u64>,

    /// Number of discarded warmup trials
    #[arg(long)]
    pub warmup: Option<u64>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Configuration file (default: discover stagebench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// Run the StageBench CLI for `harness`.
/// This is the main entry point for driver binaries.
///
/// # Returns
/// Returns `Ok(())` once the report has been printed, or the error that
/// aborted the run (no report is printed in that case).
pub fn run(harness: Harness<'_>) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, harness)
}

/// Run the StageBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, mut harness: Harness<'_>) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::discover().unwrap_or_default(),
    };
    let run_config = build_run_config(&cli, &config)?;

    let outcome = harness
        .execute(&run_config)
        .with_context(|| format!("run of `{}` aborted", harness.pipeline().name()))?;
    let output = harness.render(&outcome, &run_config)?;

    print!("{}", output);
    Ok(())
}

/// Merge stagebench.toml settings with CLI overrides
pub fn build_run_config(cli: &Cli, config: &StageConfig) -> anyhow::Result<RunConfig> {
    let format_str = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_str
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    Ok(RunConfig {
        trials: cli.trials.unwrap_or(config.runner.trials),
        warmup_trials: cli.warmup.unwrap_or(config.runner.warmup_trials),
        progress: config.runner.progress && !cli.no_progress,
        format,
        preview_len: config.output.preview_len,
    })
}

/// Convenience for drivers that only have a pipeline
pub fn run_pipeline(pipeline: Pipeline<'_>) -> anyhow::Result<()> {
    run(Harness::new(pipeline))
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "stagebench=debug"
    } else {
        "stagebench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
