//! Error types for engine runs.

use std::error::Error;
use std::fmt;

use gridlock_core::Board;

use crate::config::ConfigError;
use crate::partition::PartitionError;

/// Why a run failed.
///
/// Every variant is fatal to the run; there are no retryable errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Configuration or board rejected before any thread was spawned.
    InvalidConfiguration(ConfigError),
    /// The board interior could not be partitioned.
    Partition(PartitionError),
    /// A generation buffer could not be allocated.
    AllocationFailed {
        /// Cells requested for the failing buffer.
        cells: usize,
    },
    /// A worker thread could not be created. Threads created before it
    /// have already been joined.
    SpawnFailed {
        /// Index of the worker that failed to spawn.
        worker: usize,
        /// OS error description.
        reason: String,
    },
    /// Computing a slice panicked. Slice indices follow partition order;
    /// the caller's own slice, when it has one, is last.
    WorkerPanicked {
        /// Index of the slice whose computation panicked.
        worker: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            Self::Partition(e) => write!(f, "partition: {e}"),
            Self::AllocationFailed { cells } => {
                write!(f, "failed to allocate a {cells}-cell generation buffer")
            }
            Self::SpawnFailed { worker, reason } => {
                write!(f, "failed to spawn worker {worker}: {reason}")
            }
            Self::WorkerPanicked { worker } => write!(f, "worker {worker} panicked"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfiguration(e) => Some(e),
            Self::Partition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfiguration(e)
    }
}

impl From<PartitionError> for EngineError {
    fn from(e: PartitionError) -> Self {
        Self::Partition(e)
    }
}

/// Error returned from a failed run.
///
/// Hands the input board back unchanged so the caller keeps ownership
/// of its state. No worker thread outlives the error.
#[derive(Debug)]
pub struct RunError {
    /// The underlying error.
    pub kind: EngineError,
    /// The board passed to the run, unmodified.
    pub board: Board,
}

impl RunError {
    pub(crate) fn new(kind: EngineError, board: Board) -> Self {
        Self { kind, board }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}
