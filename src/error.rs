//! Error types for SOM grid addressing and layout computation.

use thiserror::Error;

/// The main error type for grid and layout operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A coordinate lies outside the grid extent.
    #[error("Coordinate ({x}, {y}, {z}) out of bounds for grid {extent:?}")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Requested layer.
        z: usize,
        /// Grid extent as `(x_size, y_size, z_size)`.
        extent: (usize, usize, usize),
    },

    /// Declared sizes disagree with the data supplied.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A numeric parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The scoped worker pool could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<rayon::ThreadPoolBuildError> for GridError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        GridError::ThreadPool(err.to_string())
    }
}
