//! Error types for board construction and parsing.

use std::error::Error;
use std::fmt;

/// Errors from [`Board`](crate::Board) construction or text parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Width or height is zero.
    ZeroDimension {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// `width * height` does not fit in `usize`.
    CellCountOverflow {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The cell storage could not be allocated.
    AllocationFailed {
        /// Number of cells requested.
        cells: usize,
    },
    /// Cell vector length does not match the declared dimensions.
    LengthMismatch {
        /// `width * height`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// The text format could not be parsed.
    Parse {
        /// 1-based line number where parsing failed.
        line: usize,
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "board dimensions must be non-zero, got {width}x{height}")
            }
            Self::CellCountOverflow { width, height } => {
                write!(f, "board {width}x{height} overflows the cell count")
            }
            Self::AllocationFailed { cells } => {
                write!(f, "failed to allocate storage for {cells} cells")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} cells, got {actual}")
            }
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
        }
    }
}

impl Error for BoardError {}
