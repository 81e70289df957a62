//! Per-slice generation kernel and the single-threaded stepper.

use gridlock_core::{Board, Cell, CellRead, Rule};

use crate::error::EngineError;
use crate::partition::Slice;

/// Compute the next state of every cell in `slice` from `src`.
///
/// `write` receives `(x, y, next)` for each cell, row-major. Border cells
/// are never part of a slice and are never written.
#[inline]
pub fn advance_slice<G, W>(rule: &dyn Rule, src: &G, slice: &Slice, mut write: W)
where
    G: CellRead,
    W: FnMut(usize, usize, Cell),
{
    for (x, y) in slice.cells() {
        let population = rule.population(src, x, y);
        write(x, y, rule.next(src.at(x, y), population));
    }
}

/// Advance `board` by `steps` generations on the calling thread.
///
/// Allocates a single scratch board and swaps it with `board` after each
/// generation. On error `board` is untouched.
pub fn step_serial(board: &mut Board, rule: &dyn Rule, steps: u64) -> Result<(), EngineError> {
    if steps == 0 || !board.has_interior() {
        return Ok(());
    }
    let mut scratch = board
        .try_clone()
        .map_err(|_| EngineError::AllocationFailed {
            cells: board.cell_count(),
        })?;
    let interior = Slice::interior(board.height(), board.width());
    for _ in 0..steps {
        advance_slice(rule, &*board, &interior, |x, y, cell| {
            scratch.set_at(x, y, cell)
        });
        board.swap(&mut scratch);
    }
    Ok(())
}
