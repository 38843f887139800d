//! Coordinate reference system transformations.
//!
//! Forward and inverse Lambert Conformal Conic (two standard parallels) on
//! an ellipsoid, with the RGF93 / Lambert-93 (EPSG:2154) parameters the
//! interpolation pipeline works in.

pub mod error;
pub mod lambert;

pub use error::{ProjectionError, Result};
pub use lambert::{Ellipsoid, LambertConformal};

/// EPSG code of the planar CRS used for interpolation and raster export.
pub const PLANAR_EPSG: u16 = 2154;
