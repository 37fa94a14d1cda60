//! Failing Stage
//!
//! The third stage fails on the fifth trial. The run aborts with an error
//! naming the stage, and no report is printed.
//!
//! ```sh
//! cargo run --example failing_stage -p stagebench-demos
//! # Error: run of `failing` aborted: stage `decode` failed: checksum mismatch in trial 5
//! ```

use stagebench::prelude::*;
use std::cell::Cell;

fn run() -> anyhow::Result<()> {
    let trial = Cell::new(0u32);
    let pipeline = Pipeline::builder()
        .name("failing")
        .stage("encode", |ctx| {
            trial.set(trial.get() + 1);
            ctx.insert(vec![7u8; 4096]);
            Ok(())
        })
        .stage("transform", |ctx| {
            let data = ctx.require_mut::<Vec<u8>>()?;
            data.iter_mut().for_each(|b| *b = b.wrapping_mul(31));
            Ok(())
        })
        .stage("decode", |ctx| {
            ctx.require::<Vec<u8>>()?;
            if trial.get() == 5 {
                return Err(StageError::msg(format!(
                    "checksum mismatch in trial {}",
                    trial.get()
                )));
            }
            Ok(())
        })
        .build()?;

    stagebench::run(Harness::new(pipeline))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
