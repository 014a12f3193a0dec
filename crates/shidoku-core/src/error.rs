//! Error types for the shidoku engine

use thiserror::Error;

/// Main error type for the shidoku crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("grid string has wrong length: expected {expected} cells, got {got} in '{context}'")]
    InvalidGridLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("cell value {value} at ({row}, {col}) is out of range (must be 0-4)")]
    InvalidCellValue { row: usize, col: usize, value: u8 },

    #[error("grid '{grid}' is not a valid complete grid")]
    NotComplete { grid: String },

    #[error("permutation must have exactly 4 images, got {got}")]
    InvalidPermutationLength { got: usize },

    #[error("permutation image {digit} is out of range (must be 1-4)")]
    InvalidPermutationDigit { digit: u8 },

    #[error("permutation maps two digits onto {digit}")]
    DuplicatePermutationDigit { digit: u8 },

    #[error("geometry bits {bits:#010b} use more than 7 flags")]
    InvalidTransformBits { bits: u8 },

    #[error("trace index {index} is out of range ({available} representatives available)")]
    TraceIndexOutOfRange { index: usize, available: usize },

    #[error("internal invariant violated: {message}")]
    InvariantViolation { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }
}
