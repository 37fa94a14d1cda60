//! Human-Readable Report
//!
//! Renders one line per stage, durations in seconds with six fractional digits:
//!
//! ```text
//! Slot Arithmetic Performance Test
//! ------------------
//! parameter setup: 0.000412±0.000031 s     (aggregate mode)
//! parameter setup: 0.000398 s              (single-trial mode)
//! ```
//!
//! Rendering is pure: inputs are never mutated and identical inputs give
//! identical text.

use stagebench_core::TrialResult;
use stagebench_stats::AggregateStats;
use std::fmt::{Display, Write};

/// Number of sample output values shown by default
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// Illustrative output value shown after a single-trial report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutput {
    /// What the values are (e.g. "Decrypted result")
    pub label: String,
    /// Rendered values, in order
    pub values: Vec<String>,
}

impl SampleOutput {
    /// Capture values from any displayable sequence
    pub fn from_values<I, T>(label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        Self {
            label: label.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Renders aggregate or single-trial reports as text
#[derive(Debug, Clone)]
pub struct ReportEmitter {
    title: Option<String>,
    preview_len: usize,
}

impl Default for ReportEmitter {
    fn default() -> Self {
        Self {
            title: None,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

impl ReportEmitter {
    /// Emitter with no title and the default preview length
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `title` and a rule above the stage lines
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of sample output values to show
    pub fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    /// One `<stage>: <mean>±<stddev> s` line per stage
    pub fn render_aggregate(&self, stats: &AggregateStats) -> String {
        let mut out = self.header();
        // fmt::Write for String is infallible
        for stage in stats {
            let _ = writeln!(
                out,
                "{}: {:.6}±{:.6} s",
                stage.name,
                stage.mean(),
                stage.std_dev()
            );
        }
        out
    }

    /// One `<stage>: <seconds> s` line per stage, then an optional sample preview
    pub fn render_single(&self, result: &TrialResult, sample: Option<&SampleOutput>) -> String {
        let mut out = self.header();
        // fmt::Write for String is infallible
        for timing in result {
            let _ = writeln!(out, "{}: {:.6} s", timing.name, timing.seconds);
        }

        if let Some(sample) = sample {
            let shown = sample.values.len().min(self.preview_len);
            let _ = writeln!(
                out,
                "{} (first {} values): {}",
                sample.label,
                shown,
                sample.values[..shown].join(" ")
            );
        }
        out
    }

    fn header(&self) -> String {
        match &self.title {
            Some(title) => format!("{}\n{}\n", title, "-".repeat(18)),
            None => String::new(),
        }
    }
}
