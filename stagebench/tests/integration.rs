//! Integration tests for StageBench
//!
//! These tests verify the end-to-end behavior of the harness: trial execution,
//! aggregation and report rendering working together.

use stagebench::prelude::*;
use stagebench::{ReportEmitter, StatisticsAggregator, TrialResult, TrialRunner};
use std::cell::RefCell;
use std::time::Duration;

const FIXED: [(&str, f64); 3] = [("setup", 0.10), ("work", 0.20), ("finish", 0.05)];

/// Artifact written by stage A and read by stage B
struct Produced(u64);

/// Artifact written by stage B and read by stage C
struct Derived(u64);

fn dependent_pipeline<'a>(probe: &'a RefCell<Vec<&'static str>>, reversed: bool) -> Pipeline<'a> {
    let a = move |ctx: &mut TrialContext| -> Result<(), StageError> {
        probe.borrow_mut().push("A");
        ctx.insert(Produced(21));
        Ok(())
    };
    let b = move |ctx: &mut TrialContext| -> Result<(), StageError> {
        probe.borrow_mut().push("B");
        let value = ctx.require::<Produced>()?.0;
        ctx.insert(Derived(value * 2));
        Ok(())
    };
    let c = move |ctx: &mut TrialContext| -> Result<(), StageError> {
        probe.borrow_mut().push("C");
        ctx.require::<Derived>()?;
        Ok(())
    };

    let builder = Pipeline::builder();
    let builder = if reversed {
        builder.stage("B", b).stage("A", a)
    } else {
        builder.stage("A", a).stage("B", b)
    };
    builder.stage("C", c).build().unwrap()
}

/// Test that dependent stages succeed in declared order
#[test]
fn test_declared_order_satisfies_dependencies() {
    let probe = RefCell::new(Vec::new());
    let mut pipeline = dependent_pipeline(&probe, false);
    let runner = TrialRunner::new();

    for _ in 0..5 {
        let result = runner.run_trial(&mut pipeline).unwrap();
        let names: Vec<_> = result.stage_names().collect();
        assert_eq!(names, ["A", "B", "C"]);
    }
    drop(pipeline);
    assert_eq!(probe.into_inner(), ["A", "B", "C"].repeat(5));
}

/// Test that reversing a dependency fails deterministically at the reader
#[test]
fn test_reversed_dependency_fails_deterministically() {
    let probe = RefCell::new(Vec::new());
    let mut pipeline = dependent_pipeline(&probe, true);
    let runner = TrialRunner::new();

    for _ in 0..3 {
        let err = runner.run_trial(&mut pipeline).unwrap_err();
        assert_eq!(err.failed_stage(), Some("B"));
        assert!(matches!(
            err,
            HarnessError::StageFailed {
                source: StageError::MissingArtifact(_),
                ..
            }
        ));
    }
    drop(pipeline);
    // Neither A nor C ever ran
    assert_eq!(probe.into_inner(), ["B", "B", "B"]);
}

/// Test that aggregation yields K entries with N samples each
#[test]
fn test_aggregate_shape() {
    let mut pipeline = Pipeline::builder()
        .stage("one", |_| Ok(()))
        .stage("two", |_| Ok(()))
        .stage("three", |_| Ok(()))
        .stage("four", |_| Ok(()))
        .build()
        .unwrap();
    let runner = TrialRunner::new();
    let mut aggregator = StatisticsAggregator::new();

    for _ in 0..9 {
        let result = runner.run_trial(&mut pipeline).unwrap();
        aggregator.add_trial(&result).unwrap();
    }

    let stats = aggregator.finalize().unwrap();
    assert_eq!(stats.len(), 4);
    for stage in &stats {
        assert_eq!(stage.sample_count(), 9);
        assert!(stage.mean() >= 0.0);
        assert!(stage.std_dev() >= 0.0);
    }
}

/// Test the fixed-duration scenario: ten identical trials
#[test]
fn test_fixed_durations_aggregate_report() {
    let mut aggregator = StatisticsAggregator::new();
    for _ in 0..10 {
        aggregator.add_trial(&TrialResult::from_pairs(FIXED)).unwrap();
    }
    let stats = aggregator.finalize().unwrap();

    for (name, expected) in FIXED {
        let stage = stats.get(name).unwrap();
        assert!((stage.mean() - expected).abs() < 1e-12);
        assert!(stage.std_dev() < 1e-12);
        assert_eq!(stage.sample_count(), 10);
    }

    let text = ReportEmitter::new().render_aggregate(&stats);
    assert_eq!(
        text,
        "setup: 0.100000±0.000000 s\nwork: 0.200000±0.000000 s\nfinish: 0.050000±0.000000 s\n"
    );
}

/// Test the single-trial scenario: three lines, declared order, no ±
#[test]
fn test_fixed_durations_single_report() {
    let result = TrialResult::from_pairs(FIXED);
    let text = ReportEmitter::new().render_single(&result, None);

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        ["setup: 0.100000 s", "work: 0.200000 s", "finish: 0.050000 s"]
    );
    assert!(!text.contains('±'));
}

/// Test that one trial aggregates to its own durations with zero spread
#[test]
fn test_single_trial_aggregate_equals_trial() {
    let result = TrialResult::from_pairs([("encode", 0.0123), ("decode", 0.000456)]);
    let mut aggregator = StatisticsAggregator::new();
    aggregator.add_trial(&result).unwrap();
    let stats = aggregator.finalize().unwrap();

    for timing in &result {
        let stage = stats.get(&timing.name).unwrap();
        assert_eq!(stage.mean(), timing.seconds);
        assert_eq!(stage.std_dev(), 0.0);
    }
}

/// Test that real sleeping stages are measured in seconds
#[test]
fn test_harness_measures_sleeping_stages() {
    let sleep = |ms| {
        move |_: &mut TrialContext| -> Result<(), StageError> {
            std::thread::sleep(Duration::from_millis(ms));
            Ok(())
        }
    };
    let pipeline = Pipeline::builder()
        .name("sleepers")
        .stage("setup", sleep(10))
        .stage("work", sleep(20))
        .stage("finish", sleep(5))
        .build()
        .unwrap();

    let mut harness = Harness::new(pipeline);
    let outcome = harness
        .execute(&RunConfig {
            trials: 3,
            ..Default::default()
        })
        .unwrap();

    let RunOutcome::Aggregate(stats) = outcome else {
        panic!("expected aggregate outcome");
    };
    for (name, floor) in [("setup", 0.010), ("work", 0.020), ("finish", 0.005)] {
        let stage = stats.get(name).unwrap();
        assert!(stage.mean() >= floor, "{name}: {}", stage.mean());
        assert!(stage.mean() < floor + 0.5, "{name}: {}", stage.mean());
    }
}

/// Test that a failing stage aborts the run before later stages run
#[test]
fn test_failure_propagation_through_harness() {
    let probe = RefCell::new(Vec::new());
    let pipeline = Pipeline::builder()
        .stage("params", |_| {
            probe.borrow_mut().push("params");
            Ok(())
        })
        .stage("keygen", |_| {
            probe.borrow_mut().push("keygen");
            Err(StageError::source(std::io::Error::other("rng unavailable")))
        })
        .stage("encrypt", |_| {
            probe.borrow_mut().push("encrypt");
            Ok(())
        })
        .build()
        .unwrap();

    let mut harness = Harness::new(pipeline);
    let err = harness
        .execute(&RunConfig {
            trials: 100,
            ..Default::default()
        })
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some("keygen"));
    let cause = std::error::Error::source(&err).map(|e| e.to_string());
    assert_eq!(cause.as_deref(), Some("rng unavailable"));
    drop(harness);
    assert_eq!(probe.into_inner(), ["params", "keygen"]);
}

/// Test single-trial mode end to end, including the sample preview
#[test]
fn test_single_trial_mode_with_sample() {
    struct Decoded(Vec<u64>);

    let pipeline = Pipeline::builder()
        .name("slots")
        .stage("encode", |ctx| {
            ctx.insert(vec![1u64; 64]);
            Ok(())
        })
        .stage("decode", |ctx| {
            let slots = ctx.require::<Vec<u64>>()?;
            let decoded = slots.iter().map(|s| s + 2).collect();
            ctx.insert(Decoded(decoded));
            Ok(())
        })
        .build()
        .unwrap();

    let mut harness = Harness::new(pipeline)
        .with_title("Slot Test")
        .with_sample_output(|ctx| {
            ctx.get::<Decoded>()
                .map(|d| SampleOutput::from_values("Decoded result", &d.0))
        });
    let config = RunConfig {
        trials: 1,
        ..Default::default()
    };
    let outcome = harness.execute(&config).unwrap();
    let text = harness.render(&outcome, &config).unwrap();

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Slot Test");
    assert!(lines[2].starts_with("encode: ") && lines[2].ends_with(" s"));
    assert!(lines[3].starts_with("decode: "));
    assert_eq!(lines[4], "Decoded result (first 5 values): 3 3 3 3 3");
}

/// Test that the JSON report round-trips through serde_json
#[test]
fn test_json_report_parses() {
    let pipeline = Pipeline::builder()
        .name("json")
        .stage("only", |_| Ok(()))
        .build()
        .unwrap();
    let mut harness = Harness::new(pipeline);
    let config = RunConfig {
        trials: 4,
        warmup_trials: 1,
        format: stagebench::OutputFormat::Json,
        ..Default::default()
    };

    let outcome = harness.execute(&config).unwrap();
    let json = harness.render(&outcome, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["meta"]["trials"], 4);
    assert_eq!(value["meta"]["warmup_trials"], 1);
    assert_eq!(value["results"]["stages"][0]["sample_count"], 4);
}
