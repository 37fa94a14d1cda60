//! Wall-Clock Stage Timing
//!
//! Measures one invocation of a stage action against the monotonic clock
//! (`std::time::Instant`). Durations are reported as `f64` seconds, which keeps
//! nanosecond resolution for anything shorter than a few months.

use std::time::{Duration, Instant};

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Running stopwatch over the monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since `start`
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }
}

// ─── StageTimer ──────────────────────────────────────────────────────────────

/// Times a single callable unit of work.
///
/// The timer holds no state, so one instance can be shared by every stage of
/// every trial. It never retries or buffers: each call to [`measure`](Self::measure)
/// invokes the action exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimer;

impl StageTimer {
    /// Create a stage timer
    pub const fn new() -> Self {
        Self
    }

    /// Run `action` once and return the elapsed wall-clock time in seconds.
    ///
    /// A failing action yields its error and no duration.
    #[inline]
    pub fn measure<F, E>(&self, action: F) -> Result<f64, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        self.measure_duration(action).map(|d| d.as_secs_f64())
    }

    /// Same as [`measure`](Self::measure) but returns the raw [`Duration`].
    #[inline]
    pub fn measure_duration<F, E>(&self, action: F) -> Result<Duration, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        let timer = Timer::start();
        action()?;
        Ok(timer.stop())
    }
}
