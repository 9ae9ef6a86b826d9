//! Error types for the scattering kernel.

use thiserror::Error;

/// Errors that can occur while building a scene or scanning it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScatterError {
    /// Invalid scan settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A sphere could not be added to the scene.
    #[error("invalid sphere: {0}")]
    InvalidSphere(String),

    /// A trajectory produced a non-finite position or direction.
    #[error("trajectory of grid cell {cell} became non-finite")]
    NonFinite {
        /// Row-major index of the offending grid cell.
        cell: usize,
    },
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, ScatterError>;
