//! Scattered-point interpolation onto a regular lattice.
//!
//! Two strategies share one trait: inverse distance weighting ([`Idw`]) and
//! ordinary kriging with a linear variogram ([`OrdinaryKriging`]). Both are
//! deterministic for a given sample set and lattice.

mod idw;
mod kriging;

pub use idw::{Idw, MIN_DISTANCE};
pub use kriging::{LinearVariogram, OrdinaryKriging};

use meteo_common::{InterpolationMethod, StationSample};
use projection::LambertConformal;
use tracing::{debug, info};

use crate::config::GridProcessorConfig;
use crate::error::{GridProcessorError, Result};
use crate::types::{Grid, GridAxes};

/// A station value located in planar (Lambert-93) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarSample {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl PlanarSample {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Euclidean distance to a planar point.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Estimates values at every node of a lattice from scattered samples.
pub trait Interpolator {
    /// Short method name used in logs.
    fn name(&self) -> &'static str;

    /// One estimate per node, in row-major order.
    fn estimate(&self, samples: &[PlanarSample], grid: &GridAxes) -> Result<Vec<f64>>;
}

/// Construct the interpolator for a method from the processor config.
pub fn interpolator_for(
    method: InterpolationMethod,
    config: &GridProcessorConfig,
) -> Result<Box<dyn Interpolator>> {
    Ok(match method {
        InterpolationMethod::Idw => Box::new(Idw::new(config.idw_power, config.batch_size)?),
        InterpolationMethod::Kriging => Box::new(OrdinaryKriging::default()),
    })
}

/// Project station samples from lon/lat degrees into planar metres.
pub fn project_samples(
    samples: &[StationSample],
    projection: &LambertConformal,
) -> Result<Vec<PlanarSample>> {
    samples
        .iter()
        .map(|s| -> Result<PlanarSample> {
            let (x, y) = projection.forward(s.longitude, s.latitude)?;
            Ok(PlanarSample::new(x, y, s.value))
        })
        .collect()
}

/// Run an interpolator over the lattice and wrap the estimates in a [`Grid`].
pub fn interpolate(
    interpolator: &dyn Interpolator,
    samples: &[PlanarSample],
    axes: GridAxes,
) -> Result<Grid> {
    if samples.is_empty() {
        return Err(GridProcessorError::interpolation(
            "no samples to interpolate from",
        ));
    }

    debug!(
        method = interpolator.name(),
        samples = samples.len(),
        rows = axes.rows(),
        cols = axes.cols(),
        "Interpolating grid"
    );

    let values = interpolator.estimate(samples, &axes)?;
    let grid = Grid::new(axes, values)?;

    info!(
        method = interpolator.name(),
        samples = samples.len(),
        cells = grid.values.len(),
        "Interpolation complete"
    );
    Ok(grid)
}
