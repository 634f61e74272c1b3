//! Error types for ReliefFill

use thiserror::Error;

/// Main error type for ReliefFill operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Coordinate ({x}, {y}) maps to cell ({row}, {col}), outside the raster")]
    CoordinateOutOfRange {
        x: f64,
        y: f64,
        row: isize,
        col: isize,
    },

    #[error("Seed cell ({row}, {col}) is nodata")]
    NodataSeed { row: usize, col: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ReliefFill operations
pub type Result<T> = std::result::Result<T, Error>;
