//! Rule fixtures for engine tests.
//!
//! - [`CountingRule`] wraps [`NineCellRule`] and counts evaluations.
//! - [`PanickingRule`] panics deterministically after N evaluations.
//! - [`ThreadRecordingRule`] records the names of threads that evaluate it.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use gridlock_core::{Cell, NineCellRule, Rule};

/// [`NineCellRule`] that counts how many cells it has evaluated.
#[derive(Debug, Default)]
pub struct CountingRule {
    evaluations: AtomicUsize,
}

impl CountingRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells evaluated so far, across all threads.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl Rule for CountingRule {
    fn name(&self) -> &str {
        "counting"
    }

    fn next(&self, cell: Cell, population: u8) -> Cell {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        NineCellRule.next(cell, population)
    }
}

/// Behaves like [`NineCellRule`] for `succeed_count` evaluations, then
/// panics on every later one.
#[derive(Debug)]
pub struct PanickingRule {
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl PanickingRule {
    /// Create a rule that evaluates `succeed_count` cells then panics.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `next()` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Rule for PanickingRule {
    fn name(&self) -> &str {
        "panicking"
    }

    fn next(&self, cell: Cell, population: u8) -> Cell {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            panic!("panicking rule: evaluation {n} past limit {}", self.succeed_count);
        }
        NineCellRule.next(cell, population)
    }
}

/// [`NineCellRule`] that records which named threads evaluated cells.
#[derive(Debug, Default)]
pub struct ThreadRecordingRule {
    names: Mutex<BTreeSet<String>>,
}

impl ThreadRecordingRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct thread names seen, sorted. Unnamed threads are recorded
    /// as `"<unnamed>"`.
    pub fn thread_names(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Rule for ThreadRecordingRule {
    fn name(&self) -> &str {
        "thread_recording"
    }

    fn next(&self, cell: Cell, population: u8) -> Cell {
        let name = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        self.names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name);
        NineCellRule.next(cell, population)
    }
}
