//! End-to-end runs through `GenerationStepper` and `run_parallel`.

use std::sync::Arc;

use gridlock_core::{Board, NineCellRule, Rule};
use gridlock_engine::{
    partition, run_parallel, step_serial, ConfigError, EngineConfig, EngineError,
    ExecutionMode, GenerationStepper, RunPath, StepperState,
};
use gridlock_test_utils::fixtures::{CountingRule, PanickingRule, ThreadRecordingRule};
use gridlock_test_utils::{blinker, blinker_rotated, covers_interior_once, glider, random_board};
use proptest::prelude::*;

fn serial(board: &Board, steps: u64) -> Board {
    let mut b = board.clone();
    step_serial(&mut b, &NineCellRule, steps).unwrap();
    b
}

fn config(workers: usize, mode: ExecutionMode, serial_fallback: bool) -> EngineConfig {
    EngineConfig {
        worker_count: Some(workers),
        mode,
        serial_fallback,
        thread_stack_size: None,
    }
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn blinker_four_workers_period_two() {
    assert_eq!(run_parallel(4, blinker(), 1).unwrap(), blinker_rotated());
    assert_eq!(run_parallel(4, blinker(), 2).unwrap(), blinker());
}

#[test]
fn blinker_four_workers_pooled() {
    // With the fallback off the 3x3 interior is split four ways.
    let mut stepper = GenerationStepper::new(config(4, ExecutionMode::WorkersOnly, false));
    let done = stepper.run(blinker(), 1).unwrap();
    assert_eq!(done.report.path, RunPath::Parallel);
    assert_eq!(done.board, blinker_rotated());

    let done = stepper.run(blinker(), 2).unwrap();
    assert_eq!(done.board, blinker());
    assert_eq!(done.report.threads_spawned, 4);
}

#[test]
fn zero_steps_returns_input_without_threads() {
    let input = random_board(12, 9, 0.4, 3);
    let mut stepper = GenerationStepper::new(config(4, ExecutionMode::WorkersOnly, false));
    let done = stepper.run(input.clone(), 0).unwrap();
    assert_eq!(done.board, input);
    assert_eq!(done.report.path, RunPath::Skipped);
    assert_eq!(done.report.threads_spawned, 0);
    assert_eq!(stepper.state(), StepperState::Done);
}

#[test]
fn tiny_board_many_workers_does_not_deadlock() {
    let mut input = Board::new(3, 3).unwrap();
    input.set_at(1, 1, gridlock_core::Cell::Alive);
    let mut stepper = GenerationStepper::new(config(10, ExecutionMode::WorkersOnly, false));
    let done = stepper.run(input.clone(), 6).unwrap();
    assert_eq!(done.report.path, RunPath::Parallel);
    assert_eq!(done.report.threads_spawned, 10);
    assert_eq!(done.report.threads_joined, 10);
    assert_eq!(done.report.generations, 6);
    assert_eq!(done.board, serial(&input, 6));
}

#[test]
fn glider_matches_serial_in_both_modes() {
    let input = glider(20, 14);
    let expected = serial(&input, 24);
    for mode in [ExecutionMode::WorkersOnly, ExecutionMode::WorkersAndCaller] {
        for workers in [1, 2, 3, 7] {
            let mut stepper = GenerationStepper::new(config(workers, mode, true));
            let done = stepper.run(input.clone(), 24).unwrap();
            assert_eq!(done.board, expected, "{mode:?} with {workers} workers");
        }
    }
}

// ── Determinism ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn worker_count_does_not_change_result(
        width in 3usize..24,
        height in 3usize..24,
        seed in any::<u64>(),
        workers in 2usize..9,
        steps in 1u64..6,
    ) {
        let input = random_board(width, height, 0.35, seed);
        let one = run_parallel(1, input.clone(), steps).unwrap();
        let mut stepper = GenerationStepper::new(config(workers, ExecutionMode::WorkersOnly, false));
        let many = stepper.run(input, steps).unwrap();
        prop_assert_eq!(one.fingerprint(), many.board.fingerprint());
        prop_assert_eq!(one, many.board);
    }

    #[test]
    fn partitions_cover_the_interior(
        height in 3usize..30,
        width in 3usize..30,
        n in 1usize..40,
    ) {
        let slices = partition(height, width, n).unwrap();
        prop_assert!(covers_interior_once(
            height,
            width,
            slices.iter().map(|s| (s.rows(), s.cols())),
        ));
    }
}

// ── Termination ─────────────────────────────────────────────────

#[test]
fn every_spawned_thread_is_joined() {
    let mut stepper = GenerationStepper::new(config(6, ExecutionMode::WorkersOnly, true));
    let done = stepper.run(random_board(40, 30, 0.3, 11), 10).unwrap();
    assert_eq!(done.report.threads_spawned, 6);
    assert!(done.report.all_joined());
}

#[test]
fn rule_released_after_run() {
    let rule = Arc::new(CountingRule::new());
    let shared: Arc<dyn Rule> = rule.clone();
    let mut stepper = GenerationStepper::with_rule(config(4, ExecutionMode::WorkersOnly, true), shared);
    stepper.run(random_board(30, 30, 0.3, 5), 3).unwrap();
    // Test handle plus the stepper's own; no worker still holds one.
    assert_eq!(Arc::strong_count(&rule), 2);
    drop(stepper);
    assert_eq!(Arc::strong_count(&rule), 1);
}

#[test]
fn each_interior_cell_evaluated_once_per_generation() {
    let rule = Arc::new(CountingRule::new());
    let mut stepper = GenerationStepper::with_rule(
        config(5, ExecutionMode::WorkersAndCaller, true),
        rule.clone(),
    );
    stepper.run(random_board(25, 17, 0.5, 9), 4).unwrap();
    assert_eq!(rule.evaluations(), 23 * 15 * 4);
}

#[test]
fn workers_use_named_threads() {
    let rule = Arc::new(ThreadRecordingRule::new());
    let mut stepper =
        GenerationStepper::with_rule(config(3, ExecutionMode::WorkersOnly, true), rule.clone());
    stepper.run(random_board(32, 32, 0.3, 2), 1).unwrap();
    assert_eq!(
        rule.thread_names(),
        vec![
            "gridlock-worker-0".to_string(),
            "gridlock-worker-1".to_string(),
            "gridlock-worker-2".to_string(),
        ]
    );
}

// ── Failures ────────────────────────────────────────────────────

#[test]
fn invalid_configurations_rejected_before_spawn() {
    let cases = [
        (config(0, ExecutionMode::WorkersOnly, true), blinker()),
        (config(2, ExecutionMode::WorkersOnly, true), Board::new(2, 8).unwrap()),
    ];
    for (cfg, board) in cases {
        let err = GenerationStepper::new(cfg).run(board.clone(), 1).unwrap_err();
        assert!(matches!(err.kind, EngineError::InvalidConfiguration(_)));
        assert_eq!(err.board, board);
    }

    let err = run_parallel(0, blinker(), 1).unwrap_err();
    assert_eq!(
        err.kind,
        EngineError::InvalidConfiguration(ConfigError::ZeroWorkers)
    );
}

#[test]
fn worker_panic_aborts_run_and_returns_input() {
    let input = random_board(30, 30, 0.4, 21);
    // Fails partway through the second generation.
    let rule = Arc::new(PanickingRule::new(28 * 28 + 100));
    let mut stepper =
        GenerationStepper::with_rule(config(4, ExecutionMode::WorkersOnly, true), rule.clone());
    let err = stepper.run(input.clone(), 5).unwrap_err();
    match err.kind {
        EngineError::WorkerPanicked { worker } => assert!(worker < 4),
        other => panic!("expected WorkerPanicked, got {other:?}"),
    }
    assert_eq!(err.board, input);
    assert_eq!(stepper.state(), StepperState::Done);
    assert_eq!(Arc::strong_count(&rule), 2);
}

#[test]
fn spawn_failure_returns_input() {
    // No platform can reserve a 64 TiB stack, so the first spawn fails.
    let input = random_board(30, 30, 0.4, 8);
    let cfg = EngineConfig {
        thread_stack_size: Some(1 << 46),
        ..config(4, ExecutionMode::WorkersOnly, false)
    };
    let mut stepper = GenerationStepper::new(cfg);
    let err = stepper.run(input.clone(), 3).unwrap_err();
    match &err.kind {
        EngineError::SpawnFailed { worker, reason } => {
            assert_eq!(*worker, 0);
            assert!(!reason.is_empty());
        }
        other => panic!("expected SpawnFailed, got {other:?}"),
    }
    assert_eq!(err.board, input);
    assert_eq!(stepper.state(), StepperState::Done);
}

#[test]
fn caller_slice_panic_reports_last_index() {
    // One worker and the caller; the rule panics on its first call, so
    // whichever side evaluates first fails. Both are valid indices.
    let rule = Arc::new(PanickingRule::new(0));
    let mut stepper =
        GenerationStepper::with_rule(config(1, ExecutionMode::WorkersAndCaller, true), rule);
    let err = stepper.run(random_board(20, 20, 0.3, 4), 2).unwrap_err();
    match err.kind {
        EngineError::WorkerPanicked { worker } => assert!(worker <= 1),
        other => panic!("expected WorkerPanicked, got {other:?}"),
    }
}

#[test]
fn serial_fallback_panic_is_caught() {
    let input = blinker();
    let mut stepper = GenerationStepper::with_rule(
        config(8, ExecutionMode::WorkersOnly, true),
        Arc::new(PanickingRule::new(0)),
    );
    let err = stepper.run(input.clone(), 1).unwrap_err();
    assert_eq!(err.kind, EngineError::WorkerPanicked { worker: 0 });
    assert_eq!(err.board, input);
}
