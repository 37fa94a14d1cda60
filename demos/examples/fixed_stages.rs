//! Fixed-Duration Stages
//!
//! Three sleeping stages with known costs, useful for checking that reported
//! means land near 0.10, 0.20 and 0.05 seconds.
//!
//! ```sh
//! cargo run --example fixed_stages -p stagebench-demos -- -n 10
//! ```

use stagebench::Harness;
use stagebench_demos::synthetic::fixed_pipeline;

fn run() -> anyhow::Result<()> {
    let pipeline = fixed_pipeline(1.0)?;
    stagebench::run(Harness::new(pipeline).with_title("Fixed Stage Test"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
