//! Per-run summary reported by the stepper.
//!
//! [`RunReport`] records which execution path a run took and how its
//! threads were accounted for, so callers can check termination and
//! profile runs without installing a logger.

/// Execution path taken by a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunPath {
    /// `steps == 0`: nothing was computed and no thread was created.
    #[default]
    Skipped,
    /// Stepped on the calling thread.
    Serial,
    /// Stepped by a worker pool.
    Parallel,
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Execution path.
    pub path: RunPath,
    /// Generations computed.
    pub generations: u64,
    /// Slices the interior was split into (0 unless parallel).
    pub slices: usize,
    /// Worker threads created.
    pub threads_spawned: usize,
    /// Worker threads joined cleanly.
    pub threads_joined: usize,
    /// Wall-clock time for the whole run, in microseconds.
    pub total_us: u64,
}

impl RunReport {
    /// Whether every created thread was joined.
    pub fn all_joined(&self) -> bool {
        self.threads_spawned == self.threads_joined
    }
}
