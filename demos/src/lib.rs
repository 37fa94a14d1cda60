//! StageBench Demos
//!
//! Runnable driver programs for the harness. This crate is not published; it
//! hosts the example workloads and the binaries that time them.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p stagebench-demos --release -- -n 100
//! ```
//!
//! | Example | Scenario |
//! |---------|----------|
//! | `fixed_stages` | Three sleeping stages with known durations (`setup`, `work`, `finish`) |
//! | `slot_arithmetic` | Setup, key generation, encode, encrypt, add, multiply, decrypt, decode over 8192 slots |
//! | `failing_stage` | A stage that fails mid-run: the run aborts with the stage name and no report |

pub mod slots;
pub mod synthetic;
