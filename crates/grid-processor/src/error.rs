//! Error types for grid processing.

use thiserror::Error;

/// Errors that can occur during grid processing.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// The boundary file is absent, unreadable, or holds no polygon.
    #[error("failed to load boundary: {0}")]
    BoundaryLoad(String),

    /// The lattice would exceed the configured point budget.
    #[error("grid too large: {points} points exceeds the limit of {max_points}")]
    GridTooLarge { points: usize, max_points: usize },

    /// Interpolation could not produce an estimate.
    #[error("interpolation error: {0}")]
    Interpolation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Projection error.
    #[error("projection error: {0}")]
    Projection(#[from] projection::ProjectionError),
}

impl GridProcessorError {
    /// Create a BoundaryLoad error.
    pub fn boundary_load(msg: impl Into<String>) -> Self {
        Self::BoundaryLoad(msg.into())
    }

    /// Create an Interpolation error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::Interpolation(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
