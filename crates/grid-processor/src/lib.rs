//! Planar grid processing for station surfaces.
//!
//! This crate turns scattered station values into a regular Lambert-93
//! lattice clipped to an administrative boundary:
//!
//! - **Grid building**: axis vectors over the boundary bbox, with a point
//!   budget checked before any value is computed
//! - **Interpolation**: inverse distance weighting (batched weight matrices)
//!   or ordinary kriging with a fitted linear variogram
//! - **Masking**: cells outside the boundary become `NaN`
//! - **Statistics**: min/max/mean over the remaining cells
//!
//! # Architecture
//!
//! ```text
//! StationSample (lon/lat)
//!      │
//!      ▼
//! project_samples() ──► PlanarSample (x/y metres)
//!      │
//!      ├─► Boundary::from_path() ──► bbox
//!      │                              │
//!      │                              ▼
//!      │                    GridBuilder::build() ──► GridAxes
//!      │                              │
//!      ▼                              ▼
//! interpolate(&dyn Interpolator, samples, axes) ──► Grid
//!      │
//!      ├─► Boundary::mask()
//!      │
//!      └─► GridStats::summarize()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{interpolate, interpolator_for, Boundary, GridBuilder, GridStats};
//!
//! let boundary = Boundary::from_path("data/raw/departement_13.geojson")?;
//! let axes = GridBuilder::from_config(&config)?.build(&boundary.bbox())?;
//! let interpolator = interpolator_for(InterpolationMethod::Idw, &config)?;
//! let mut grid = interpolate(interpolator.as_ref(), &samples, axes)?;
//! boundary.mask(&mut grid);
//! let stats = GridStats::summarize(&grid.values);
//! ```

pub mod boundary;
pub mod builder;
pub mod config;
pub mod error;
pub mod interpolation;
pub mod stats;
pub mod types;

// Re-export commonly used types at crate root
pub use boundary::Boundary;
pub use builder::GridBuilder;
pub use config::GridProcessorConfig;
pub use error::{GridProcessorError, Result};
pub use interpolation::{
    interpolate, interpolator_for, project_samples, Idw, Interpolator, LinearVariogram,
    OrdinaryKriging, PlanarSample,
};
pub use stats::GridStats;
pub use types::{Grid, GridAxes};
