//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a trace from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input file {} is {size} bytes, above the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during trace parsing
///
/// Row numbers are zero-based indices into the loaded trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Event {requested} out of range: trace contains {available} event(s)")]
    OutOfRange { requested: u32, available: usize },

    #[error("Row {row}: missing field {column} ({field})")]
    MissingField {
        row: usize,
        column: usize,
        field: String,
    },

    #[error("Row {row}, column {column}: '{value}' is not numeric")]
    NonNumeric {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Row {row}: {count} fields, a particle row has at most {max}")]
    ExtraFields { row: usize, count: usize, max: usize },

    #[error("No offset declared for collision field '{0}'")]
    UndeclaredField(&'static str),

    #[error("Total time {total_time} with timestep {timestep} yields no slices")]
    InvalidTimestep { total_time: f64, timestep: f64 },

    #[error("Separator at row {separator} announces {expected} particles but only {available} rows follow")]
    Truncated {
        separator: usize,
        expected: usize,
        available: usize,
    },

    #[error("Row {row}: pseudorapidity undefined for momentum along the beam axis")]
    UndefinedEta { row: usize },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to publish output: {0}")]
    PublishFailed(#[from] tempfile::PersistError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Event table has no usable column '{0}'")]
    MissingColumn(String),
}
