//! Core types and traits for the gridlock simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the cell state, the [`Board`] grid with its text format, the
//! [`CellRead`] access trait, and the injectable update [`Rule`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod cell;
pub mod error;
pub mod rule;

pub use board::{Board, CellRead};
pub use cell::Cell;
pub use error::BoardError;
pub use rule::{moore_population, NineCellRule, Rule};
