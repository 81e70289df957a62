//! The simulation grid and its text format.
//!
//! A [`Board`] is a dense row-major `width × height` grid of [`Cell`]s.
//! Coordinates are `(x, y)` with `x` the column and `y` the row. The
//! outermost one-cell ring is the *border*; everything else is the
//! *interior*, the only region a generation ever updates.
//!
//! # Text format
//!
//! ```text
//! 5 4
//! .....
//! ..*..
//! ..*..
//! .....
//! ```
//!
//! The first line holds `width height`; it is followed by `height` lines
//! of exactly `width` characters, `*` for alive and `.` for dead.

use std::collections::TryReserveError;
use std::fmt;
use std::str::FromStr;

use crate::cell::Cell;
use crate::error::BoardError;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Read-only cell access shared by boards and engine buffers.
///
/// Rules compute neighborhood populations through this trait so the
/// same rule runs unchanged against a plain [`Board`] (serial path) and
/// the engine's shared generation buffers (parallel path).
pub trait CellRead {
    /// Number of columns.
    fn width(&self) -> usize;
    /// Number of rows.
    fn height(&self) -> usize;
    /// Cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `(x, y)` is out of bounds.
    fn at(&self, x: usize, y: usize) -> Cell;
}

/// Dense row-major grid of cells.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-dead board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        let len = Self::checked_len(width, height)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| BoardError::AllocationFailed { cells: len })?;
        cells.resize(len, Cell::Dead);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a board from row-major cells.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, BoardError> {
        let expected = Self::checked_len(width, height)?;
        if cells.len() != expected {
            return Err(BoardError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn checked_len(width: usize, height: usize) -> Result<usize, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroDimension { width, height });
        }
        width
            .checked_mul(height)
            .ok_or(BoardError::CellCountOverflow { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells, border included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the board has at least one non-border cell.
    pub fn has_interior(&self) -> bool {
        self.width >= 3 && self.height >= 3
    }

    /// Number of interior (non-border) cells.
    pub fn interior_count(&self) -> usize {
        self.width.saturating_sub(2) * self.height.saturating_sub(2)
    }

    /// Row-major index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        y * self.width + x
    }

    /// Cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) out of bounds for {}x{} board",
            self.width,
            self.height
        );
        self.cells[y * self.width + x]
    }

    /// Overwrite the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_at(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) out of bounds for {}x{} board",
            self.width,
            self.height
        );
        self.cells[y * self.width + x] = cell;
    }

    /// Clone without aborting on allocation failure.
    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut cells = Vec::new();
        cells.try_reserve_exact(self.cells.len())?;
        cells.extend_from_slice(&self.cells);
        Ok(Self {
            width: self.width,
            height: self.height,
            cells,
        })
    }

    /// Exchange contents with `other` in O(1).
    ///
    /// Only the owned buffers move; no cell data is copied.
    pub fn swap(&mut self, other: &mut Board) {
        std::mem::swap(self, other);
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable row-major view of every cell.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Number of live cells on the whole board.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// FNV-1a hash over the dimensions and every cell.
    ///
    /// Not cryptographically secure; used for fast equality checks when
    /// comparing runs.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = FNV_OFFSET;
        for v in [self.width as u64, self.height as u64] {
            for b in v.to_le_bytes() {
                hash = (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME);
            }
        }
        for cell in &self.cells {
            hash = (hash ^ u64::from(cell.to_bits())).wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

impl CellRead for Board {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> Cell {
        Board::at(self, x, y)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("population", &self.population())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.width, self.height)?;
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn parse_dimension(token: Option<&str>, line: usize, what: &str) -> Result<usize, BoardError> {
    let token = token.ok_or_else(|| BoardError::Parse {
        line,
        reason: format!("missing {what} in header"),
    })?;
    token.parse().map_err(|_| BoardError::Parse {
        line,
        reason: format!("invalid {what} '{token}'"),
    })
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()));

        let (header_line, header) =
            lines
                .find(|(_, l)| !l.is_empty())
                .ok_or_else(|| BoardError::Parse {
                    line: 1,
                    reason: "missing header".into(),
                })?;
        let mut tokens = header.split_whitespace();
        let width = parse_dimension(tokens.next(), header_line, "width")?;
        let height = parse_dimension(tokens.next(), header_line, "height")?;
        if tokens.next().is_some() {
            return Err(BoardError::Parse {
                line: header_line,
                reason: "trailing tokens in header".into(),
            });
        }

        // Storage grows with the rows actually present, so an oversized
        // header cannot force a large allocation up front.
        Board::checked_len(width, height)?;
        let mut cells = Vec::new();
        for y in 0..height {
            let (line, row) = lines.next().ok_or_else(|| BoardError::Parse {
                line: header_line + y + 1,
                reason: format!("expected {height} rows, found {y}"),
            })?;
            let mut count = 0;
            for (x, ch) in row.chars().enumerate() {
                if x >= width {
                    return Err(BoardError::Parse {
                        line,
                        reason: format!("row is longer than width {width}"),
                    });
                }
                let cell = Cell::from_char(ch).ok_or_else(|| BoardError::Parse {
                    line,
                    reason: format!("unexpected character '{ch}'"),
                })?;
                cells.push(cell);
                count += 1;
            }
            if count != width {
                return Err(BoardError::Parse {
                    line,
                    reason: format!("row has {count} cells, expected {width}"),
                });
            }
        }

        if let Some((line, _)) = lines.find(|(_, l)| !l.is_empty()) {
            return Err(BoardError::Parse {
                line,
                reason: "unexpected content after last row".into(),
            });
        }
        Board::from_cells(width, height, cells)
    }
}
