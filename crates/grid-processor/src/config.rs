//! Configuration for the grid processor.

use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Configuration for grid construction and interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProcessorConfig {
    /// Node spacing in metres, both axes.
    pub resolution: f64,

    /// Upper bound on `rows × cols`, checked before any value is computed.
    pub max_points: usize,

    /// Grid nodes per IDW weight-matrix batch.
    pub batch_size: usize,

    /// IDW distance exponent.
    pub idw_power: f64,
}

impl Default for GridProcessorConfig {
    fn default() -> Self {
        Self {
            resolution: 2000.0,
            max_points: 250_000,
            batch_size: 10_000,
            idw_power: 2.0,
        }
    }
}

impl GridProcessorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "resolution must be a positive number of metres, got {}",
                self.resolution
            )));
        }

        if self.max_points == 0 {
            return Err(GridProcessorError::config("max_points must be > 0"));
        }

        if self.batch_size == 0 {
            return Err(GridProcessorError::config("batch_size must be > 0"));
        }

        if !self.idw_power.is_finite() || self.idw_power <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "idw power must be > 0, got {}",
                self.idw_power
            )));
        }

        Ok(())
    }
}
