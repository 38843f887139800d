//! Regular lattice construction over a boundary's bounding box.

use meteo_common::BoundingBox;
use tracing::debug;

use crate::config::GridProcessorConfig;
use crate::error::{GridProcessorError, Result};
use crate::types::GridAxes;

/// Builds grid axes at a fixed resolution with a point budget.
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder {
    resolution: f64,
    max_points: usize,
}

impl GridBuilder {
    pub fn new(resolution: f64, max_points: usize) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "resolution must be a positive number of metres, got {}",
                resolution
            )));
        }
        Ok(Self {
            resolution,
            max_points,
        })
    }

    pub fn from_config(config: &GridProcessorConfig) -> Result<Self> {
        Self::new(config.resolution, config.max_points)
    }

    /// Number of nodes along one axis spanning `[min, max]`.
    ///
    /// `min + i·res` for `i` in `0..ceil((max + res − min) / res)`, so the
    /// last node lies at or beyond `max` by less than one step.
    pub fn axis_len(&self, min: f64, max: f64) -> usize {
        ((max + self.resolution - min) / self.resolution).ceil().max(0.0) as usize
    }

    /// Lattice size for a bbox as `(rows, cols)`.
    pub fn shape(&self, bbox: &BoundingBox) -> (usize, usize) {
        (
            self.axis_len(bbox.min_y, bbox.max_y),
            self.axis_len(bbox.min_x, bbox.max_x),
        )
    }

    /// Build the axes covering `bbox`.
    ///
    /// Fails with [`GridProcessorError::GridTooLarge`] before allocating
    /// anything when `rows × cols` exceeds the budget.
    pub fn build(&self, bbox: &BoundingBox) -> Result<GridAxes> {
        if !bbox.is_valid() {
            return Err(GridProcessorError::config(format!(
                "invalid grid extent {:?}",
                bbox
            )));
        }

        let (rows, cols) = self.shape(bbox);
        let points = rows.saturating_mul(cols);
        if points > self.max_points {
            return Err(GridProcessorError::GridTooLarge {
                points,
                max_points: self.max_points,
            });
        }

        let xs = axis(bbox.min_x, cols, self.resolution);
        let ys = axis(bbox.min_y, rows, self.resolution);

        debug!(rows, cols, points, resolution = self.resolution, "Built grid axes");

        Ok(GridAxes {
            xs,
            ys,
            resolution: self.resolution,
        })
    }
}

fn axis(min: f64, len: usize, resolution: f64) -> Vec<f64> {
    (0..len).map(|i| min + i as f64 * resolution).collect()
}
