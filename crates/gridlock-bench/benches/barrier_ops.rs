//! Criterion micro-benchmarks for cyclic barrier round trips.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gridlock_engine::CyclicBarrier;

/// Benchmark: a single-participant barrier never blocks.
fn bench_uncontended(c: &mut Criterion) {
    let barrier = CyclicBarrier::with_action(1, || {});
    c.bench_function("barrier_wait_1", |b| {
        b.iter(|| black_box(barrier.wait().is_leader()));
    });
}

/// Benchmark: one full cycle with `n - 1` helper threads parked on the
/// same barrier.
fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("barrier_round_trip");
    for n in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let barrier = Arc::new(CyclicBarrier::new(n));
            let stop = Arc::new(AtomicBool::new(false));
            let helpers: Vec<_> = (1..n)
                .map(|_| {
                    let barrier = Arc::clone(&barrier);
                    let stop = Arc::clone(&stop);
                    thread::spawn(move || loop {
                        barrier.wait();
                        if stop.load(Ordering::Acquire) {
                            break;
                        }
                    })
                })
                .collect();

            b.iter(|| black_box(barrier.wait().is_leader()));

            // One more cycle so every helper observes the flag.
            stop.store(true, Ordering::Release);
            barrier.wait();
            for h in helpers {
                h.join().unwrap();
            }
        });
    }
    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_round_trip);
criterion_main!(benches);
