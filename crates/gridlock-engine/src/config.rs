//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the input for constructing a
//! [`GenerationStepper`](crate::GenerationStepper).
//! [`validate()`](EngineConfig::validate) checks the configuration against
//! a board before any buffer is allocated or thread spawned.

use std::error::Error;
use std::fmt;

use gridlock_core::Board;

/// Upper bound on explicitly configured workers.
pub const MAX_WORKERS: usize = 1024;

// ── ExecutionMode ──────────────────────────────────────────────────

/// Whether the orchestrating thread computes a slice itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Only pool threads compute; the caller just cycles the gates.
    #[default]
    WorkersOnly,
    /// The caller takes one extra slice each generation
    /// ("workers-and-main").
    WorkersAndCaller,
}

impl ExecutionMode {
    /// Slices the caller computes per generation (0 or 1).
    pub fn caller_slices(self) -> usize {
        match self {
            Self::WorkersOnly => 0,
            Self::WorkersAndCaller => 1,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`EngineConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_count` was explicitly set to zero.
    ZeroWorkers,
    /// `worker_count` exceeds [`MAX_WORKERS`].
    TooManyWorkers {
        /// The configured count.
        configured: usize,
        /// The allowed maximum.
        max: usize,
    },
    /// Board smaller than 3×3 has no interior to step.
    BoardTooSmall {
        /// Board width.
        width: usize,
        /// Board height.
        height: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
            Self::TooManyWorkers { configured, max } => {
                write!(f, "worker_count {configured} exceeds maximum of {max}")
            }
            Self::BoardTooSmall { width, height } => {
                write!(f, "board {width}x{height} is smaller than 3x3")
            }
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Configuration for a [`GenerationStepper`](crate::GenerationStepper).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of pool threads. `None` = auto-detect from
    /// `available_parallelism` (one fewer in
    /// [`ExecutionMode::WorkersAndCaller`], minimum 1).
    pub worker_count: Option<usize>,
    /// Whether the caller computes a slice too. Default: `WorkersOnly`.
    pub mode: ExecutionMode,
    /// Step on the calling thread when both interior extents are smaller
    /// than the slice count. Default: `true`.
    pub serial_fallback: bool,
    /// Stack size for pool threads. `None` = platform default.
    pub thread_stack_size: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            mode: ExecutionMode::WorkersOnly,
            serial_fallback: true,
            thread_stack_size: None,
        }
    }
}

impl EngineConfig {
    /// Configuration with an explicit worker count and defaults otherwise.
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count: Some(worker_count),
            ..Self::default()
        }
    }

    /// Resolve the pool size, applying auto-detection if `None`.
    ///
    /// Explicit values are returned as-is; [`validate()`](Self::validate)
    /// rejects the out-of-range ones.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n,
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                cpus.saturating_sub(self.mode.caller_slices()).max(1)
            }
        }
    }

    /// Slices computed per generation: pool threads plus the caller.
    pub fn slice_count(&self) -> usize {
        self.resolved_worker_count() + self.mode.caller_slices()
    }

    /// Validate the configuration against `board`.
    pub fn validate(&self, board: &Board) -> Result<(), ConfigError> {
        match self.worker_count {
            Some(0) => return Err(ConfigError::ZeroWorkers),
            Some(n) if n > MAX_WORKERS => {
                return Err(ConfigError::TooManyWorkers {
                    configured: n,
                    max: MAX_WORKERS,
                })
            }
            _ => {}
        }
        if !board.has_interior() {
            return Err(ConfigError::BoardTooSmall {
                width: board.width(),
                height: board.height(),
            });
        }
        Ok(())
    }
}
