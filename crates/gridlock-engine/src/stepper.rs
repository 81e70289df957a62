//! Generation orchestration: validate, partition, spawn, cycle, drain.
//!
//! [`GenerationStepper`] drives one run at a time through
//! [`StepperState`]: `Idle → Running → Draining → Done`. A run owns its
//! buffers and its pool exclusively; both are gone by the time
//! [`run()`](GenerationStepper::run) returns, whether it succeeded or not.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gridlock_core::{Board, NineCellRule, Rule};

use crate::buffer::DoubleBuffer;
use crate::config::{EngineConfig, ExecutionMode};
use crate::error::{EngineError, RunError};
use crate::kernel::step_serial;
use crate::metrics::{RunPath, RunReport};
use crate::partition::{needs_serial_fallback, partition, Slice};
use crate::pool::{PoolContext, WorkerPool};

/// Lifecycle state of a [`GenerationStepper`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepperState {
    /// No run has started.
    #[default]
    Idle,
    /// Generations are being computed.
    Running,
    /// Workers are being released and joined.
    Draining,
    /// The last run has finished and released all its resources.
    Done,
}

/// Output of a successful run.
#[derive(Debug)]
pub struct RunResult {
    /// The board after the requested number of generations.
    pub board: Board,
    /// How the run executed.
    pub report: RunReport,
}

/// Orchestrates generation steps over a worker pool.
pub struct GenerationStepper {
    config: EngineConfig,
    rule: Arc<dyn Rule>,
    state: StepperState,
}

impl GenerationStepper {
    /// Stepper using [`NineCellRule`].
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rule(config, Arc::new(NineCellRule))
    }

    /// Stepper using a custom rule.
    pub fn with_rule(config: EngineConfig, rule: Arc<dyn Rule>) -> Self {
        Self {
            config,
            rule,
            state: StepperState::Idle,
        }
    }

    /// The configuration this stepper runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StepperState {
        self.state
    }

    /// Advance `board` by `steps` generations.
    ///
    /// On error the input board is handed back unchanged inside the
    /// [`RunError`]; no worker thread outlives the call either way.
    pub fn run(&mut self, board: Board, steps: u64) -> Result<RunResult, RunError> {
        let start = Instant::now();
        self.state = StepperState::Idle;

        if let Err(e) = self.config.validate(&board) {
            self.state = StepperState::Done;
            return Err(RunError::new(e.into(), board));
        }

        if steps == 0 {
            self.state = StepperState::Done;
            return Ok(RunResult {
                board,
                report: RunReport::default(),
            });
        }

        let slice_count = self.config.slice_count();
        let result = if self.config.serial_fallback
            && needs_serial_fallback(board.height(), board.width(), slice_count)
        {
            log::warn!(
                "{}x{} board too small for {slice_count} slices, stepping serially",
                board.width(),
                board.height()
            );
            self.run_serial(board, steps)
        } else {
            self.run_pooled(board, steps, slice_count)
        };
        self.state = StepperState::Done;

        result.map(|mut done| {
            done.report.total_us = whole_micros(start.elapsed());
            log::info!(
                "run complete: {:?}, {} generations in {}us",
                done.report.path,
                done.report.generations,
                done.report.total_us
            );
            done
        })
    }

    fn run_serial(&mut self, board: Board, steps: u64) -> Result<RunResult, RunError> {
        self.state = StepperState::Running;
        let mut work = match board.try_clone() {
            Ok(work) => work,
            Err(_) => {
                let cells = board.cell_count();
                return Err(RunError::new(EngineError::AllocationFailed { cells }, board));
            }
        };
        let rule = self.rule.as_ref();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step_serial(&mut work, rule, steps)));
        match outcome {
            Ok(Ok(())) => Ok(RunResult {
                board: work,
                report: RunReport {
                    path: RunPath::Serial,
                    generations: steps,
                    ..RunReport::default()
                },
            }),
            Ok(Err(e)) => Err(RunError::new(e, board)),
            Err(_) => {
                log::warn!("serial step panicked during rule '{}'", self.rule.name());
                Err(RunError::new(EngineError::WorkerPanicked { worker: 0 }, board))
            }
        }
    }

    fn run_pooled(
        &mut self,
        mut board: Board,
        steps: u64,
        slice_count: usize,
    ) -> Result<RunResult, RunError> {
        let slices = match partition(board.height(), board.width(), slice_count) {
            Ok(slices) => slices,
            Err(e) => return Err(RunError::new(e.into(), board)),
        };
        if let Some(first) = slices.first() {
            log::debug!(
                "partitioned {}x{} into {slice_count} slices along {:?}",
                board.width(),
                board.height(),
                first.axis()
            );
        }
        let (worker_slices, caller_slice): (&[Slice], Option<&Slice>) = match self.config.mode {
            ExecutionMode::WorkersOnly => (&slices[..], None),
            ExecutionMode::WorkersAndCaller => match slices.split_last() {
                Some((caller, workers)) => (workers, Some(caller)),
                None => (&slices[..], None),
            },
        };

        let buffers = match DoubleBuffer::from_board(&board) {
            Ok(buffers) => Arc::new(buffers),
            Err(e) => return Err(RunError::new(e, board)),
        };
        let ctx = PoolContext {
            buffers: Arc::clone(&buffers),
            rule: Arc::clone(&self.rule),
            thread_stack_size: self.config.thread_stack_size,
        };
        let mut pool = match WorkerPool::spawn(ctx, worker_slices) {
            Ok(pool) => pool,
            Err(e) => return Err(RunError::new(e, board)),
        };

        self.state = StepperState::Running;
        let mut generations = 0;
        let mut failure = None;
        for _ in 0..steps {
            if let Err(e) = pool.step(caller_slice) {
                failure = Some(e);
                break;
            }
            generations += 1;
        }

        self.state = StepperState::Draining;
        let joined = pool.terminate_and_join();
        drop(pool);

        if let Some(e) = failure {
            return Err(RunError::new(e, board));
        }
        buffers.copy_active_into(&mut board);
        Ok(RunResult {
            board,
            report: RunReport {
                path: RunPath::Parallel,
                generations,
                slices: slices.len(),
                threads_spawned: joined.spawned,
                threads_joined: joined.joined,
                total_us: 0,
            },
        })
    }
}

impl std::fmt::Debug for GenerationStepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationStepper")
            .field("config", &self.config)
            .field("rule", &self.rule.name())
            .field("state", &self.state)
            .finish()
    }
}

/// Advance `board` by `steps` generations with `worker_count` workers and
/// the default rule and configuration.
pub fn run_parallel(worker_count: usize, board: Board, steps: u64) -> Result<Board, RunError> {
    GenerationStepper::new(EngineConfig::with_workers(worker_count))
        .run(board, steps)
        .map(|done| done.board)
}

/// Microseconds in `elapsed`, saturating at `u64::MAX`.
fn whole_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
