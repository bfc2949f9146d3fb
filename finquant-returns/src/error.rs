use smol_str::SmolStr;
use thiserror::Error;

/// All errors generated in `finquant-returns`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("dimension mismatch: expected {expected} weights, found {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} values but the table has {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("column {column} has {actual} values but the index has {expected} keys")]
    ColumnLength {
        column: SmolStr,
        expected: usize,
        actual: usize,
    },

    #[error("table has {actual} rows but the index has {expected} keys")]
    IndexLength { expected: usize, actual: usize },

    #[error("index is not strictly increasing at position {position}")]
    UnorderedIndex { position: usize },

    #[error("duplicate column label: {0}")]
    DuplicateColumn(SmolStr),

    #[error("unknown column label: {0}")]
    UnknownColumn(SmolStr),
}
