#![warn(missing_docs)]
//! StageBench Report - Output Rendering
//!
//! Generates the end-of-run report:
//! - Human text (one line per stage, six fractional digits in seconds)
//! - JSON (machine-readable, with run metadata)

mod emitter;
mod json;

pub use emitter::{DEFAULT_PREVIEW_LEN, ReportEmitter, SampleOutput};
pub use json::{RunMeta, RunReport, RunResults, SCHEMA_VERSION, generate_json_report};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with run metadata
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
