//! Test utilities and fixtures for gridlock development.
//!
//! Provides canned boards ([`blinker`], [`glider`]), seeded random
//! boards for determinism checks, and slice coverage helpers. Test
//! rules live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use gridlock_core::{Board, Cell};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Vertical phase of the period-2 blinker on a 5×5 board.
pub const BLINKER_VERTICAL: &str = "5 5\n.....\n..*..\n..*..\n..*..\n.....\n";

/// Horizontal phase of the period-2 blinker on a 5×5 board.
pub const BLINKER_HORIZONTAL: &str = "5 5\n.....\n.....\n.***.\n.....\n.....\n";

/// Parse a board literal, panicking on malformed input.
pub fn board(text: &str) -> Board {
    match text.parse() {
        Ok(b) => b,
        Err(e) => panic!("bad board literal: {e}"),
    }
}

/// 5×5 blinker in its vertical phase.
pub fn blinker() -> Board {
    board(BLINKER_VERTICAL)
}

/// 5×5 blinker in its horizontal phase.
pub fn blinker_rotated() -> Board {
    board(BLINKER_HORIZONTAL)
}

/// A glider heading down-right from the top-left corner of a
/// `width × height` board.
pub fn glider(width: usize, height: usize) -> Board {
    assert!(width >= 5 && height >= 5, "glider needs at least 5x5");
    let mut b = Board::new(width, height).unwrap();
    for (x, y) in [(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)] {
        b.set_at(x, y, Cell::Alive);
    }
    b
}

/// Random board where each cell is alive with probability `density`.
///
/// The same `seed` always yields the same board.
pub fn random_board(width: usize, height: usize, density: f64, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    // Maps a draw into [0, 1).
    let scale = f64::from(u32::MAX) + 1.0;
    let mut b = Board::new(width, height).unwrap();
    for cell in b.cells_mut() {
        *cell = Cell::from(f64::from(rng.next_u32()) / scale < density);
    }
    b
}

/// Whether the interior of a `height × width` board is covered exactly
/// once by `regions`, each given as `(rows, cols)` half-open ranges, and
/// the border not at all.
pub fn covers_interior_once<I>(height: usize, width: usize, regions: I) -> bool
where
    I: IntoIterator<Item = (std::ops::Range<usize>, std::ops::Range<usize>)>,
{
    let mut marks = vec![0u32; height * width];
    for (rows, cols) in regions {
        for y in rows {
            for x in cols.clone() {
                if x >= width || y >= height {
                    return false;
                }
                marks[y * width + x] += 1;
            }
        }
    }
    (0..height).all(|y| {
        (0..width).all(|x| {
            let interior = x >= 1 && y >= 1 && x + 1 < width && y + 1 < height;
            marks[y * width + x] == u32::from(interior)
        })
    })
}
