//! Fixed-duration stages for exercising the harness without a real workload.

use stagebench::{HarnessError, Pipeline, StageError, TrialContext};
use std::time::Duration;
use thiserror::Error;

/// Errors from building the fixed pipeline
#[derive(Debug, Error)]
pub enum SyntheticError {
    /// Scale is negative, NaN, or stretches a stage beyond `Duration::MAX`
    #[error("invalid duration scale {0}")]
    Scale(f64),

    /// Pipeline validation failed
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

/// Stage names and nominal durations of the fixed pipeline
pub const FIXED_STAGES: [(&str, Duration); 3] = [
    ("setup", Duration::from_millis(100)),
    ("work", Duration::from_millis(200)),
    ("finish", Duration::from_millis(50)),
];

/// Pipeline whose stages sleep for the given durations, scaled by `scale`.
///
/// `scale` must be finite and non-negative.
pub fn fixed_pipeline(scale: f64) -> Result<Pipeline<'static>, SyntheticError> {
    let builder = FIXED_STAGES.iter().try_fold(
        Pipeline::builder().name("fixed"),
        |builder, &(name, nominal)| {
            let pause = Duration::try_from_secs_f64(nominal.as_secs_f64() * scale)
                .map_err(|_| SyntheticError::Scale(scale))?;
            Ok::<_, SyntheticError>(builder.stage(
                name,
                move |_: &mut TrialContext| -> Result<(), StageError> {
                    std::thread::sleep(pause);
                    Ok(())
                },
            ))
        },
    )?;
    Ok(builder.build()?)
}
