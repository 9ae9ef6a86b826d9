//! Error types for the output writers.

use thiserror::Error;

/// Errors that can occur while writing scan output.
#[derive(Error, Debug)]
pub enum ExportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The number of rays does not match the grid.
    #[error("expected {expected} rays for the grid, got {actual}")]
    SizeMismatch {
        /// Cells in the grid.
        expected: usize,
        /// Rays supplied.
        actual: usize,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
