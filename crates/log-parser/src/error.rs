//! Parse Error Types

use serde::Serialize;
use thiserror::Error;

/// Fatal parse failures; any of these aborts the whole request
#[derive(Debug, Error)]
pub enum ParseError {
    /// The byte stream is not text at all
    #[error("content is not CSV text: {0}")]
    BinaryContent(&'static str),

    /// The first row does not look like a header row
    #[error("no header row found (first row carries no column names)")]
    MissingHeader,

    /// Too few columns to be a delimited log
    #[error("header has {0} column(s), a log needs at least 3")]
    NotDelimited(usize),

    /// Header parsed but the file carries no data
    #[error("no data rows after the header")]
    NoDataRows,

    /// CSV decoding failed below the row level
    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Minimum column count for a plausible log (timestamp + two channels)
pub const MIN_COLUMNS: usize = 3;

/// Recoverable per-row problems, surfaced in the report instead of
/// discarding the data-loss information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A row's column count did not match the header
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },
}
