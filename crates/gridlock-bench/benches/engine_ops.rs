//! Criterion benchmarks for serial and pooled generation stepping.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gridlock_bench::{profile_config, reference_profile, stress_profile};
use gridlock_core::NineCellRule;
use gridlock_engine::{partition, step_serial, ExecutionMode, GenerationStepper};

const STEPS: u64 = 16;
const STRESS_STEPS: u64 = 4;

/// Benchmark: 16 generations on one thread, 256x256.
fn bench_serial_256(c: &mut Criterion) {
    let board = reference_profile(42);
    c.bench_function("serial_256_x16", |b| {
        b.iter(|| {
            let mut work = board.clone();
            step_serial(&mut work, &NineCellRule, STEPS).unwrap();
            black_box(work.population());
        });
    });
}

/// Benchmark: 16 generations through the pool, 256x256, by worker count.
/// Includes pool spawn and join.
fn bench_pooled_256(c: &mut Criterion) {
    let board = reference_profile(42);
    let mut group = c.benchmark_group("pooled_256_x16");
    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &n| {
            let mut stepper = GenerationStepper::new(profile_config(n, ExecutionMode::WorkersOnly));
            b.iter(|| {
                let done = stepper.run(board.clone(), STEPS).unwrap();
                black_box(done.board.population());
            });
        });
    }
    group.finish();
}

/// Benchmark: caller-participating mode against workers-only at 4 slices.
fn bench_modes_256(c: &mut Criterion) {
    let board = reference_profile(7);
    let mut group = c.benchmark_group("mode_256_x16");
    for (label, workers, mode) in [
        ("workers_only", 4, ExecutionMode::WorkersOnly),
        ("workers_and_caller", 3, ExecutionMode::WorkersAndCaller),
    ] {
        group.bench_function(label, |b| {
            let mut stepper = GenerationStepper::new(profile_config(workers, mode));
            b.iter(|| {
                let done = stepper.run(board.clone(), STEPS).unwrap();
                black_box(done.board.population());
            });
        });
    }
    group.finish();
}

/// Benchmark: 4 generations on a 1024x1024 board, serial against 4 and
/// 8 pooled workers.
fn bench_stress_1024(c: &mut Criterion) {
    let board = stress_profile(42);
    let mut group = c.benchmark_group("stress_1024_x4");
    group.sample_size(10);
    group.bench_function("serial", |b| {
        b.iter(|| {
            let mut work = board.clone();
            step_serial(&mut work, &NineCellRule, STRESS_STEPS).unwrap();
            black_box(work.population());
        });
    });
    for workers in [4usize, 8] {
        group.bench_with_input(BenchmarkId::new("pooled", workers), &workers, |b, &n| {
            let mut stepper = GenerationStepper::new(profile_config(n, ExecutionMode::WorkersOnly));
            b.iter(|| {
                let done = stepper.run(board.clone(), STRESS_STEPS).unwrap();
                black_box(done.board.population());
            });
        });
    }
    group.finish();
}

/// Benchmark: partitioning a 4096x4096 board 64 ways.
fn bench_partition(c: &mut Criterion) {
    c.bench_function("partition_4096_64", |b| {
        b.iter(|| black_box(partition(black_box(4096), black_box(4096), 64).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_serial_256,
    bench_pooled_256,
    bench_modes_256,
    bench_stress_1024,
    bench_partition
);
criterion_main!(benches);
