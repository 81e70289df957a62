//! Shared current/next generation planes.
//!
//! A [`DoubleBuffer`] owns two full-size cell planes. During a generation
//! every worker reads the *active* plane and writes its own slice of the
//! *scratch* plane; the slices are disjoint, so no cell is written twice.
//! [`swap()`](DoubleBuffer::swap) flips which plane is active in O(1).
//!
//! Cells are stored as `AtomicU8` so the planes can be shared across
//! threads without locking. All cell accesses are `Relaxed`: the barrier
//! mutex between phases provides the happens-before edge that makes a
//! generation's writes visible to the next generation's reads.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

use gridlock_core::{Board, Cell, CellRead};

use crate::error::EngineError;

/// Two cell planes with an O(1) active/scratch flip.
pub struct DoubleBuffer {
    width: usize,
    height: usize,
    planes: [Box<[AtomicU8]>; 2],
    /// Index of the plane holding the current generation.
    active: AtomicUsize,
    swaps: AtomicU64,
}

// Compile-time assertion: DoubleBuffer must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<DoubleBuffer>();
};

fn alloc_plane(board: &Board) -> Result<Box<[AtomicU8]>, EngineError> {
    let cells = board.cell_count();
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(cells)
        .map_err(|_| EngineError::AllocationFailed { cells })?;
    plane.extend(board.cells().iter().map(|c| AtomicU8::new(c.to_bits())));
    Ok(plane.into_boxed_slice())
}

impl DoubleBuffer {
    /// Build both planes as copies of `board`.
    ///
    /// Copying the border into the scratch plane too means border cells
    /// read identically whichever plane is active.
    pub fn from_board(board: &Board) -> Result<Self, EngineError> {
        let current = alloc_plane(board)?;
        let scratch = alloc_plane(board)?;
        Ok(Self {
            width: board.width(),
            height: board.height(),
            planes: [current, scratch],
            active: AtomicUsize::new(0),
            swaps: AtomicU64::new(0),
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    fn active_index(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Read view of the current generation.
    pub fn active(&self) -> PlaneView<'_> {
        PlaneView {
            width: self.width,
            height: self.height,
            plane: &self.planes[self.active_index()],
        }
    }

    /// Write view of the next generation.
    pub fn scratch(&self) -> PlaneWriter<'_> {
        PlaneWriter {
            width: self.width,
            height: self.height,
            plane: &self.planes[self.active_index() ^ 1],
        }
    }

    /// Make the scratch plane current.
    ///
    /// Must only be called while no worker is reading or writing, which
    /// in the pool means from the finish gate's last-arrival action.
    pub fn swap(&self) {
        self.active.fetch_xor(1, Ordering::AcqRel);
        self.swaps.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of swaps performed so far.
    pub fn swaps(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    /// Copy the current generation into `board`.
    ///
    /// # Panics
    ///
    /// Panics if `board` has different dimensions.
    pub fn copy_active_into(&self, board: &mut Board) {
        assert!(
            board.width() == self.width && board.height() == self.height,
            "board is {}x{}, buffer is {}x{}",
            board.width(),
            board.height(),
            self.width,
            self.height
        );
        let plane = &self.planes[self.active_index()];
        for (dst, src) in board.cells_mut().iter_mut().zip(plane.iter()) {
            *dst = Cell::from_bits(src.load(Ordering::Relaxed));
        }
    }
}

impl fmt::Debug for DoubleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("active", &self.active_index())
            .field("swaps", &self.swaps())
            .finish()
    }
}

/// Read-only view of one plane.
#[derive(Clone, Copy)]
pub struct PlaneView<'a> {
    width: usize,
    height: usize,
    plane: &'a [AtomicU8],
}

impl CellRead for PlaneView<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> Cell {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        Cell::from_bits(self.plane[y * self.width + x].load(Ordering::Relaxed))
    }
}

/// Write handle to the scratch plane.
#[derive(Clone, Copy)]
pub struct PlaneWriter<'a> {
    width: usize,
    height: usize,
    plane: &'a [AtomicU8],
}

impl PlaneWriter<'_> {
    /// Store the next state of `(x, y)`.
    #[inline]
    pub fn set(&self, x: usize, y: usize, cell: Cell) {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.plane[y * self.width + x].store(cell.to_bits(), Ordering::Relaxed);
    }
}
