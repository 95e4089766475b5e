//! Error types.
//!
//! The concurrency core cannot fail: a lock only delays and the allocator is a
//! pure counter transition. A failing unit is a normal outcome reported in the
//! verdict, not an error. What can fail is everything around the run:
//! configuration, grid construction, file loading and thread management.

use crate::types::WorkerId;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// The run configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The grid handed to the sudoku checker is malformed.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A config file could not be parsed.
    #[cfg(feature = "config-file")]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The OS refused to start a worker thread.
    #[error("failed to spawn {worker}: {source}")]
    Spawn {
        /// Worker that could not be started.
        worker: WorkerId,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A worker thread panicked instead of reaching a terminal state.
    #[error("{0} panicked")]
    WorkerPanicked(WorkerId),
}

/// Reasons a [`RunConfig`](crate::RunConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No worker threads were requested.
    #[error("thread count must be at least 1")]
    NoThreads,
    /// More workers than the waiter registry can index.
    #[error("thread count {requested} exceeds the limit of {limit}")]
    TooManyThreads {
        /// Requested thread count.
        requested: usize,
        /// Hard limit.
        limit: usize,
    },
    /// Grid dimension of zero.
    #[error("grid dimension must be at least 1")]
    ZeroDimension,
    /// Chunk size of zero would never make progress.
    #[error("task increment must be at least 1")]
    ZeroIncrement,
    /// `3 × N` does not fit in `usize`.
    #[error("grid dimension {0} is too large")]
    DimensionOverflow(usize),
    /// The grid's size disagrees with the configured dimension.
    #[error("configured dimension {configured} does not match grid of {actual} rows")]
    DimensionMismatch {
        /// Dimension in the configuration.
        configured: usize,
        /// Rows in the grid.
        actual: usize,
    },
}

/// Reasons a sudoku grid is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows.
    #[error("grid is empty")]
    Empty,
    /// A row's length differs from the number of rows.
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// One-based row number.
        row: usize,
        /// Cells found.
        len: usize,
        /// Cells expected.
        expected: usize,
    },
    /// The side length has no integer square root, so subgrids are undefined.
    #[error("side length {0} is not a perfect square")]
    NotPerfectSquare(usize),
    /// A cell holds a value outside `1..=N`.
    #[error("cell ({row}, {col}) holds {value}, expected 1..={max}")]
    ValueOutOfRange {
        /// One-based row number.
        row: usize,
        /// One-based column number.
        col: usize,
        /// Value found.
        value: u32,
        /// Largest allowed value.
        max: usize,
    },
}
