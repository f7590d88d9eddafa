//! Error types for the explorer's input boundaries.
//!
//! The generator itself has no failure paths; everything here is raised while
//! turning user or URL input into a rule or a model.

use thiserror::Error;

/// Rejected rule id text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleIdError {
    /// Not a plain decimal number.
    #[error("rule id is not a decimal number: {0:?}")]
    NotNumeric(String),

    /// Outside `[0, 65536)`.
    #[error("rule id {0} is out of range (max {max})", max = u16::MAX)]
    OutOfRange(String),
}

/// A grid that is not a non-empty square of bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("line {line}, column {column}: invalid cell {found:?}")]
    InvalidCell {
        line: usize,
        column: usize,
        found: char,
    },
}

/// Failure to decode an encoded model string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A run character outside the 64 symbol alphabet.
    #[error("invalid symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { symbol: char, offset: usize },

    /// A raw suffix character other than `0` or `1`.
    #[error("invalid bit {found:?} at offset {offset} of the raw suffix")]
    InvalidBit { found: char, offset: usize },

    /// The decoded bit count is not the area of a square.
    #[error("{0} bits cannot be reshaped into a square grid")]
    NotSquare(usize),

    #[error("encoded model is empty")]
    Empty,

    #[error("malformed run-length data: {0}")]
    Malformed(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors raised by the paint editor model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaintError {
    #[error("line {line}, column {column}: Invalid character {found:?}")]
    InvalidCharacter {
        line: usize,
        column: usize,
        found: char,
    },

    /// The grid still has undetermined (`?`) cells.
    #[error("{0} cells are still undetermined")]
    Unresolved(usize),
}

/// Errors raised by the explorer session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("nothing to undo")]
    NothingToUndo,
}
