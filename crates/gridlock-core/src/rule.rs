//! Cell update rules.
//!
//! A [`Rule`] is a pure function of a cell's 3×3 neighborhood. The
//! engine never interprets cell states itself: it asks the rule for the
//! neighborhood population and then for the next state, so rules can be
//! swapped without touching the scheduling code.

use crate::board::CellRead;
use crate::cell::Cell;

/// An injectable, side-effect-free cell update rule.
///
/// Rules are shared by reference across every worker thread of a run,
/// hence the `Send + Sync` bound. Implementations must be deterministic:
/// the same neighborhood must always produce the same next state, or
/// serial and parallel runs will diverge.
pub trait Rule: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Neighborhood population of the interior cell `(x, y)`.
    ///
    /// Defaults to [`moore_population`]: the live count over the 3×3
    /// block centred on `(x, y)`, the centre included.
    fn population(&self, grid: &dyn CellRead, x: usize, y: usize) -> u8 {
        moore_population(grid, x, y)
    }

    /// Next state of a cell given its current state and population.
    fn next(&self, cell: Cell, population: u8) -> Cell;
}

/// Live count over the 3×3 block centred on `(x, y)`, centre included.
///
/// `(x, y)` must be an interior cell so that all eight neighbours exist.
#[inline]
pub fn moore_population(grid: &dyn CellRead, x: usize, y: usize) -> u8 {
    debug_assert!(
        x >= 1 && y >= 1 && x + 1 < grid.width() && y + 1 < grid.height(),
        "({x}, {y}) is not an interior cell"
    );
    let mut count = 0;
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            count += grid.at(nx, ny).to_bits();
        }
    }
    count
}

/// The nine-cell tally rule.
///
/// A cell is alive in the next generation iff its 3×3 population
/// (centre included) is exactly 3, or exactly 4 while the cell itself is
/// alive. Counting the centre makes this equivalent to B3/S23.
#[derive(Clone, Copy, Debug, Default)]
pub struct NineCellRule;

impl Rule for NineCellRule {
    fn name(&self) -> &str {
        "nine_cell"
    }

    #[inline]
    fn next(&self, cell: Cell, population: u8) -> Cell {
        match (population, cell) {
            (3, _) | (4, Cell::Alive) => Cell::Alive,
            _ => Cell::Dead,
        }
    }
}
