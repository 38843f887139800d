//! Projection errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Input coordinate is NaN or infinite.
    #[error("non-finite coordinate ({0}, {1})")]
    NonFinite(f64, f64),

    /// Latitude outside the domain of the projection.
    #[error("latitude {0}° is outside the projection domain")]
    LatitudeOutOfRange(f64),

    /// Inverse iteration did not converge.
    #[error("inverse projection did not converge for ({0}, {1})")]
    NoConvergence(f64, f64),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
