//! Gridlock: a lockstep multi-threaded cellular automaton engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the gridlock sub-crates. For most users, adding `gridlock` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gridlock::prelude::*;
//!
//! // A blinker oscillates with period 2.
//! let board: Board = "5 5\n.....\n..*..\n..*..\n..*..\n.....\n".parse().unwrap();
//!
//! let config = EngineConfig {
//!     worker_count: Some(2),
//!     ..EngineConfig::default()
//! };
//! let mut stepper = GenerationStepper::new(config);
//! let done = stepper.run(board.clone(), 2).unwrap();
//! assert_eq!(done.board, board);
//! assert!(done.report.all_joined());
//!
//! // Or, with the default rule and configuration:
//! let rotated = run_parallel(2, board, 1).unwrap();
//! assert_eq!(rotated.to_string(), "5 5\n.....\n.....\n.***.\n.....\n.....\n");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridlock-core` | Cells, boards, the text format, update rules |
//! | [`engine`] | `gridlock-engine` | Cyclic barrier, partitioner, worker pool, stepper |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cells, boards, and update rules (`gridlock-core`).
///
/// Implement [`types::Rule`] to plug a custom automaton into the engine.
pub use gridlock_core as types;

/// Parallel generation engine (`gridlock-engine`).
///
/// [`engine::GenerationStepper`] drives runs; [`engine::CyclicBarrier`]
/// and [`engine::partition()`] are usable on their own.
pub use gridlock_engine as engine;

/// Common imports for typical gridlock usage.
///
/// ```rust
/// use gridlock::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use gridlock_core::{Board, Cell, CellRead, NineCellRule, Rule};

    // Errors
    pub use gridlock_core::BoardError;
    pub use gridlock_engine::{ConfigError, EngineError, RunError};

    // Engine
    pub use gridlock_engine::{
        run_parallel, EngineConfig, ExecutionMode, GenerationStepper, RunReport, RunResult,
    };
}
