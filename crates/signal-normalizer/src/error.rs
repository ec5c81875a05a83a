//! Normalization Error Types

use serde::Serialize;
use thiserror::Error;

/// Fatal normalization failures: the time axis is unusable
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// Neither a device-time nor a GPS-time column was recognized
    #[error("no timestamp column (device or GPS time) in header")]
    MissingTimestampColumn,

    /// A timestamp column exists but no row carried a parseable value
    #[error("timestamp column present but none of {total} rows had a parseable value")]
    UnparseableTimestamps { total: usize },
}

/// Recoverable conditions, surfaced in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizeWarning {
    /// Rows dropped because their timestamp cell was missing or unparseable
    #[error("{count} row(s) skipped: timestamp missing or unparseable")]
    RowsWithoutTimestamp { count: usize },

    /// Rows arrived out of order and were re-sorted by timestamp
    #[error("{count} out-of-order row(s) reordered by timestamp")]
    OutOfOrderTimestamps { count: usize },

    /// Rows with identical timestamps were merged, last value winning
    #[error("{merged} duplicate-timestamp row(s) merged (last value wins)")]
    DuplicateTimestamps { merged: usize },
}
