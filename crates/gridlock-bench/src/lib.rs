//! Benchmark profiles for the gridlock engine.
//!
//! Provides pre-built boards for benchmarking and examples:
//!
//! - [`reference_profile`]: 256x256 board (~65K cells) at 30% density
//! - [`stress_profile`]: 1024x1024 board (~1M cells) at 30% density
//! - [`profile_config`]: engine configuration used by the benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridlock_core::Board;
use gridlock_engine::{EngineConfig, ExecutionMode};
use gridlock_test_utils::random_board;

/// Live-cell density shared by the profiles.
pub const PROFILE_DENSITY: f64 = 0.3;

/// Build a reference benchmark board: 256x256.
pub fn reference_profile(seed: u64) -> Board {
    random_board(256, 256, PROFILE_DENSITY, seed)
}

/// Build a stress benchmark board: 1024x1024.
///
/// Same density as [`reference_profile`] at 16x the cell count.
pub fn stress_profile(seed: u64) -> Board {
    random_board(1024, 1024, PROFILE_DENSITY, seed)
}

/// Engine configuration with `workers` pool threads and no serial
/// fallback, so every run measures the pooled path.
pub fn profile_config(workers: usize, mode: ExecutionMode) -> EngineConfig {
    EngineConfig {
        worker_count: Some(workers),
        mode,
        serial_fallback: false,
        thread_stack_size: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_dimensions() {
        let b = reference_profile(42);
        assert_eq!((b.width(), b.height()), (256, 256));
        assert!(b.population() > 0);
    }

    #[test]
    fn stress_profile_dimensions() {
        let b = stress_profile(42);
        assert_eq!((b.width(), b.height()), (1024, 1024));
        assert!(b.population() > b.cell_count() / 4);
    }

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(reference_profile(1), reference_profile(1));
        assert_ne!(reference_profile(1), reference_profile(2));
    }

    #[test]
    fn profile_config_is_valid() {
        let cfg = profile_config(4, ExecutionMode::WorkersAndCaller);
        assert!(cfg.validate(&reference_profile(0)).is_ok());
        assert_eq!(cfg.slice_count(), 5);
    }
}
