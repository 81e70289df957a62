//! Reusable rendezvous point with a last-arriver action.
//!
//! [`CyclicBarrier`] blocks a fixed number of participants until all of
//! them have arrived, then releases them together and resets for the
//! next cycle. An optional action runs exactly once per cycle on the
//! thread that arrives last, *before* anyone is released, and under the
//! same lock that publishes the release, so every participant observes
//! its effects.
//!
//! # Generation guard
//!
//! Waiters capture the barrier generation on arrival and sleep until it
//! changes. A condition-variable wakeup alone is never trusted: it may be
//! spurious, and on a reused barrier a broadcast for cycle *k* must not
//! release a participant that has already arrived for cycle *k + 1*.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

type BarrierAction = Box<dyn Fn() + Send + Sync>;

struct BarrierState {
    /// Participants that have arrived in the current cycle.
    arrived: usize,
    /// Completed cycles.
    generation: u64,
}

/// Result returned from [`CyclicBarrier::wait()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierWaitResult {
    is_leader: bool,
}

impl BarrierWaitResult {
    /// `true` for the single participant per cycle that arrived last and
    /// ran the action.
    #[inline]
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}

/// Mutex/condvar cyclic barrier for a fixed participant count.
pub struct CyclicBarrier {
    participants: usize,
    state: Mutex<BarrierState>,
    released: Condvar,
    on_last_arrival: Option<BarrierAction>,
}

// Compile-time assertion: CyclicBarrier must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<CyclicBarrier>();
};

impl CyclicBarrier {
    /// Create a barrier for `participants` threads with no action.
    ///
    /// # Panics
    ///
    /// Panics if `participants` is 0.
    pub fn new(participants: usize) -> Self {
        Self::build(participants, None)
    }

    /// Create a barrier whose last arriver runs `action` each cycle.
    ///
    /// The action runs with the barrier lock held: it must not panic and
    /// must not call back into this barrier.
    ///
    /// # Panics
    ///
    /// Panics if `participants` is 0.
    pub fn with_action<F>(participants: usize, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::build(participants, Some(Box::new(action)))
    }

    fn build(participants: usize, on_last_arrival: Option<BarrierAction>) -> Self {
        assert!(participants > 0, "barrier needs at least one participant");
        Self {
            participants,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
            }),
            released: Condvar::new(),
            on_last_arrival,
        }
    }

    /// Number of participants per cycle.
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Number of completed cycles.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    // Counters are only mutated under the lock, so state recovered from a
    // poisoned mutex is still consistent.
    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until all participants of the current cycle have arrived.
    ///
    /// Must not be called twice by the same participant within one cycle.
    pub fn wait(&self) -> BarrierWaitResult {
        let mut state = self.lock();
        let arrival_generation = state.generation;
        state.arrived += 1;

        if state.arrived == self.participants {
            if let Some(action) = &self.on_last_arrival {
                action();
            }
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.released.notify_all();
            return BarrierWaitResult { is_leader: true };
        }

        while state.generation == arrival_generation {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        BarrierWaitResult { is_leader: false }
    }
}

impl fmt::Debug for CyclicBarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("CyclicBarrier")
            .field("participants", &self.participants)
            .field("arrived", &state.arrived)
            .field("generation", &state.generation)
            .field("has_action", &self.on_last_arrival.is_some())
            .finish()
    }
}
