//! Parallel generation engine for gridlock boards.
//!
//! Provides the [`GenerationStepper`] that advances a [`Board`] by a
//! number of generations using a fixed pool of worker threads. Workers
//! are synchronized by two reusable [`CyclicBarrier`]s per generation;
//! the board interior is split into disjoint [`Slice`]s by
//! [`partition()`], and the current/next generations live in a shared
//! [`DoubleBuffer`] whose swap is an O(1) index flip.
//!
//! [`Board`]: gridlock_core::Board

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod buffer;
pub mod config;
pub mod error;
pub mod kernel;
pub mod metrics;
pub mod partition;
pub mod pool;
pub mod stepper;

pub use barrier::{BarrierWaitResult, CyclicBarrier};
pub use buffer::{DoubleBuffer, PlaneView, PlaneWriter};
pub use config::{ConfigError, EngineConfig, ExecutionMode, MAX_WORKERS};
pub use error::{EngineError, RunError};
pub use kernel::{advance_slice, step_serial};
pub use metrics::{RunPath, RunReport};
pub use partition::{needs_serial_fallback, partition, Axis, PartitionError, Slice, Slices};
pub use pool::{JoinReport, PoolContext, WorkerPool};
pub use stepper::{run_parallel, GenerationStepper, RunResult, StepperState};
