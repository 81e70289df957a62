//! Long-lived worker threads driven by a pair of cyclic barriers.
//!
//! A [`WorkerPool`] spawns one thread per slice. Each generation the
//! orchestrator and every worker meet at the *start gate*, compute their
//! slices, then meet at the *finish gate*, whose last arriver flips the
//! generation buffers. Both gates have one participant more than there
//! are workers: the orchestrator takes part in every cycle whether or not
//! it computes a slice.
//!
//! # Shutdown
//!
//! [`terminate_and_join()`](WorkerPool::terminate_and_join) sets the
//! shared `terminated` flag and then cycles the start gate once. Workers
//! check the flag right after the start gate, so that cycle releases
//! them straight into exit without touching the finish gate.
//!
//! # Launch
//!
//! Freshly spawned threads block on a launch channel before their first
//! gate. The pool only sends the launch signal once every thread exists;
//! if a spawn fails, the sender is dropped and the threads already
//! created exit on the disconnect and are joined.

use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use gridlock_core::Rule;

use crate::barrier::CyclicBarrier;
use crate::buffer::DoubleBuffer;
use crate::error::EngineError;
use crate::kernel::advance_slice;
use crate::partition::Slice;

/// Sentinel for "no slice has panicked".
const NO_PANIC: usize = usize::MAX;

/// Everything a pool needs to compute generations.
#[derive(Clone)]
pub struct PoolContext {
    /// Shared generation buffers.
    pub buffers: Arc<DoubleBuffer>,
    /// Update rule applied to every cell.
    pub rule: Arc<dyn Rule>,
    /// Stack size for worker threads. `None` = platform default.
    pub thread_stack_size: Option<usize>,
}

impl fmt::Debug for PoolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolContext")
            .field("buffers", &self.buffers)
            .field("rule", &self.rule.name())
            .field("thread_stack_size", &self.thread_stack_size)
            .finish()
    }
}

/// Thread accounting from [`WorkerPool::terminate_and_join()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Threads the pool created.
    pub spawned: usize,
    /// Threads that were joined without a panic.
    pub joined: usize,
}

/// State shared by the orchestrator and every worker.
struct PoolShared {
    start_gate: CyclicBarrier,
    finish_gate: CyclicBarrier,
    terminated: AtomicBool,
    /// Index of the first slice that panicked, or [`NO_PANIC`].
    panicked: AtomicUsize,
    buffers: Arc<DoubleBuffer>,
    rule: Arc<dyn Rule>,
}

impl PoolShared {
    fn new(participants: usize, buffers: Arc<DoubleBuffer>, rule: Arc<dyn Rule>) -> Self {
        let swap_target = Arc::clone(&buffers);
        Self {
            start_gate: CyclicBarrier::new(participants),
            finish_gate: CyclicBarrier::with_action(participants, move || swap_target.swap()),
            terminated: AtomicBool::new(false),
            panicked: AtomicUsize::new(NO_PANIC),
            buffers,
            rule,
        }
    }

    /// Compute `slice` for slice index `index`, recording a panic instead
    /// of unwinding past the gates.
    fn compute(&self, index: usize, slice: &Slice) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            compute_slice(&self.buffers, self.rule.as_ref(), slice);
        }));
        if result.is_err() {
            log::warn!("slice {index} panicked during rule '{}'", self.rule.name());
            let _ = self.panicked.compare_exchange(
                NO_PANIC,
                index,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
    }

    fn panicked_slice(&self) -> Option<usize> {
        match self.panicked.load(Ordering::Acquire) {
            NO_PANIC => None,
            index => Some(index),
        }
    }
}

/// Advance every cell of `slice` from the active plane into the scratch
/// plane.
pub(crate) fn compute_slice(buffers: &DoubleBuffer, rule: &dyn Rule, slice: &Slice) {
    let src = buffers.active();
    let dst = buffers.scratch();
    advance_slice(rule, &src, slice, |x, y, cell| dst.set(x, y, cell));
}

fn worker_main(index: usize, slice: Slice, shared: Arc<PoolShared>, launch: Receiver<()>) {
    if launch.recv().is_err() {
        return;
    }
    drop(launch);
    loop {
        shared.start_gate.wait();
        if shared.terminated.load(Ordering::Acquire) {
            break;
        }
        shared.compute(index, &slice);
        shared.finish_gate.wait();
    }
}

struct WorkerHandle {
    index: usize,
    slice: Slice,
    thread: JoinHandle<()>,
}

/// Fixed set of worker threads, one per slice.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<WorkerHandle>,
    spawned: usize,
    report: Option<JoinReport>,
}

impl WorkerPool {
    /// Spawn one worker per entry of `slices`.
    ///
    /// On success every worker is running and blocked on the start gate.
    /// On failure no thread from this call is left running.
    pub fn spawn(ctx: PoolContext, slices: &[Slice]) -> Result<Self, EngineError> {
        Self::spawn_with(ctx, slices, |_| Ok(()))
    }

    /// [`spawn()`](Self::spawn) with a hook consulted before each thread
    /// is created. An `Err` from `admit` takes the same path as a failed
    /// OS spawn.
    pub(crate) fn spawn_with(
        ctx: PoolContext,
        slices: &[Slice],
        mut admit: impl FnMut(usize) -> io::Result<()>,
    ) -> Result<Self, EngineError> {
        let worker_count = slices.len();
        let shared = Arc::new(PoolShared::new(worker_count + 1, ctx.buffers, ctx.rule));
        let (launch_tx, launch_rx) = crossbeam_channel::bounded(worker_count);

        let mut workers = Vec::with_capacity(worker_count);
        for (index, slice) in slices.iter().cloned().enumerate() {
            let mut builder = thread::Builder::new().name(format!("gridlock-worker-{index}"));
            if let Some(size) = ctx.thread_stack_size {
                builder = builder.stack_size(size);
            }
            let worker_shared = Arc::clone(&shared);
            let worker_launch = launch_rx.clone();
            let worker_slice = slice.clone();
            let spawned = admit(index).and_then(|()| {
                builder.spawn(move || worker_main(index, worker_slice, worker_shared, worker_launch))
            });
            match spawned {
                Ok(thread) => workers.push(WorkerHandle {
                    index,
                    slice,
                    thread,
                }),
                Err(e) => {
                    log::error!("failed to spawn worker {index} of {worker_count}: {e}");
                    drop(launch_tx);
                    for w in workers {
                        let _ = w.thread.join();
                    }
                    return Err(EngineError::SpawnFailed {
                        worker: index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        drop(launch_rx);

        // The channel holds one slot per worker, so these never block.
        for _ in 0..worker_count {
            let _ = launch_tx.send(());
        }
        log::debug!("spawned {worker_count} workers");

        Ok(Self {
            shared,
            workers,
            spawned: worker_count,
            report: None,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.spawned
    }

    /// Slices assigned to the live workers, in worker order. Empty once
    /// the pool has been terminated.
    pub fn slices(&self) -> impl Iterator<Item = &Slice> {
        self.workers.iter().map(|w| &w.slice)
    }

    /// Completed generations.
    pub fn generations(&self) -> u64 {
        self.shared.finish_gate.generation()
    }

    /// Index of the first slice that panicked, if any.
    pub fn panicked_slice(&self) -> Option<usize> {
        self.shared.panicked_slice()
    }

    /// Run one generation.
    ///
    /// `caller_slice`, when given, is computed on the calling thread
    /// between the gates and reported as slice index
    /// [`worker_count()`](Self::worker_count) if it panics. The buffers
    /// are swapped before this returns.
    ///
    /// # Panics
    ///
    /// Panics if the pool has already been terminated.
    pub fn step(&mut self, caller_slice: Option<&Slice>) -> Result<(), EngineError> {
        assert!(self.report.is_none(), "step on a terminated pool");
        self.shared.start_gate.wait();
        if let Some(slice) = caller_slice {
            self.shared.compute(self.spawned, slice);
        }
        self.shared.finish_gate.wait();
        match self.shared.panicked_slice() {
            Some(worker) => Err(EngineError::WorkerPanicked { worker }),
            None => Ok(()),
        }
    }

    /// Release every worker into exit and join all threads.
    ///
    /// Idempotent: later calls return the first report.
    pub fn terminate_and_join(&mut self) -> JoinReport {
        if let Some(report) = self.report {
            return report;
        }
        self.shared.terminated.store(true, Ordering::Release);
        self.shared.start_gate.wait();

        let mut joined = 0;
        for w in self.workers.drain(..) {
            match w.thread.join() {
                Ok(()) => joined += 1,
                Err(_) => log::warn!("worker {} exited by panic", w.index),
            }
        }
        log::debug!("joined {joined} of {} workers", self.spawned);

        let report = JoinReport {
            spawned: self.spawned,
            joined,
        };
        self.report = Some(report);
        report
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.terminate_and_join();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.spawned)
            .field("generations", &self.generations())
            .field("terminated", &self.report.is_some())
            .finish()
    }
}
