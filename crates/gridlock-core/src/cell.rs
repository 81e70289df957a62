//! Two-state cell type.

use std::fmt;

/// State of a single grid cell.
///
/// Stored as one byte so that boards can be mirrored into atomic byte
/// buffers without conversion cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Dead = 0,
    /// Occupied cell.
    Alive = 1,
}

impl Cell {
    /// Character used for a live cell in the board text format.
    pub const ALIVE_CHAR: char = '*';
    /// Character used for a dead cell in the board text format.
    pub const DEAD_CHAR: char = '.';

    /// Decode a raw byte. Any non-zero value is alive.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 {
            Self::Dead
        } else {
            Self::Alive
        }
    }

    /// Raw byte representation (`0` or `1`).
    #[inline]
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    /// Whether the cell is alive.
    #[inline]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Parse a text-format character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            Self::ALIVE_CHAR => Some(Self::Alive),
            Self::DEAD_CHAR => Some(Self::Dead),
            _ => None,
        }
    }

    /// Text-format character for this cell.
    pub const fn to_char(self) -> char {
        match self {
            Self::Alive => Self::ALIVE_CHAR,
            Self::Dead => Self::DEAD_CHAR,
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
