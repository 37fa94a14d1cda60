//! Slot Arithmetic Performance Test
//!
//! Times setup, key generation, encoding, encryption, addition,
//! multiplication, decryption and decoding over 8192 slots.
//!
//! One untimed trial runs first so a broken workload is caught before any
//! measurement; correctness is never checked inside the timed run.
//!
//! ```sh
//! cargo run --example slot_arithmetic -p stagebench-demos --release          # 100 trials
//! cargo run --example slot_arithmetic -p stagebench-demos --release -- -n 1  # raw durations + sample
//! ```

use stagebench::{Harness, TrialContext, TrialRunner};
use stagebench_demos::slots::{SlotParamsLiteral, decoded_sample, slot_pipeline, verify_decoded};

fn run() -> anyhow::Result<()> {
    let literal = SlotParamsLiteral::default();
    let mut pipeline = slot_pipeline(&literal)?;

    let mut ctx = TrialContext::new();
    TrialRunner::new().run_trial_in(&mut pipeline, &mut ctx)?;
    verify_decoded(&ctx)?;

    let harness = Harness::new(pipeline)
        .with_title("Slot Arithmetic Performance Test")
        .with_sample_output(decoded_sample);
    stagebench::run(harness)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
