//! Interpolator configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags (each of which can also come from an `INTERP_*`
//! environment variable).

use anyhow::{bail, Context, Result};
use grid_processor::GridProcessorConfig;
use meteo_common::InterpolationMethod;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted preview block size.
const MAX_PREVIEW_SCALE: usize = 64;

/// Top-level interpolator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolatorConfig {
    /// Station dataset written by the ETL step
    pub input: PathBuf,

    /// Boundary polygon (GeoJSON in Lambert-93 metres)
    pub boundary: PathBuf,

    /// Directory receiving the layer files
    pub outdir: PathBuf,

    /// Catalog index path, `<outdir>/index.json` when unset
    pub index: Option<PathBuf>,

    /// Interpolation method
    pub method: InterpolationMethod,

    /// Preview pixels per grid cell, both axes
    pub preview_scale: usize,

    /// Grid construction and interpolation settings
    pub grid: GridProcessorConfig,
}

impl Default for InterpolatorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("web/meteo_data.json"),
            boundary: PathBuf::from("data/raw/departement_13.geojson"),
            outdir: PathBuf::from("outputs/interpolation"),
            index: None,
            method: InterpolationMethod::Idw,
            preview_scale: 4,
            grid: GridProcessorConfig::default(),
        }
    }
}

/// Values supplied on the command line or through the environment.
///
/// Every field is optional; set fields replace the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub boundary: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub index: Option<PathBuf>,
    pub method: Option<InterpolationMethod>,
    pub power: Option<f64>,
    pub resolution: Option<f64>,
    pub max_points: Option<usize>,
    pub batch_size: Option<usize>,
    pub preview_scale: Option<usize>,
}

impl InterpolatorConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read interpolator config from {:?}", path))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse interpolator config from {:?}", path))
    }

    /// Apply command-line / environment overrides.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(input) = &overrides.input {
            self.input = input.clone();
        }
        if let Some(boundary) = &overrides.boundary {
            self.boundary = boundary.clone();
        }
        if let Some(outdir) = &overrides.outdir {
            self.outdir = outdir.clone();
        }
        if let Some(index) = &overrides.index {
            self.index = Some(index.clone());
        }
        if let Some(method) = overrides.method {
            self.method = method;
        }
        if let Some(power) = overrides.power {
            self.grid.idw_power = power;
        }
        if let Some(resolution) = overrides.resolution {
            self.grid.resolution = resolution;
        }
        if let Some(max_points) = overrides.max_points {
            self.grid.max_points = max_points;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.grid.batch_size = batch_size;
        }
        if let Some(scale) = overrides.preview_scale {
            self.preview_scale = scale;
        }
    }

    /// Catalog index location.
    pub fn index_path(&self) -> PathBuf {
        self.index
            .clone()
            .unwrap_or_else(|| self.outdir.join("index.json"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate().context("Invalid grid settings")?;

        if self.preview_scale == 0 || self.preview_scale > MAX_PREVIEW_SCALE {
            bail!(
                "preview_scale must be between 1 and {}, got {}",
                MAX_PREVIEW_SCALE,
                self.preview_scale
            );
        }

        if self.input.as_os_str().is_empty() {
            bail!("input path must not be empty");
        }
        if self.boundary.as_os_str().is_empty() {
            bail!("boundary path must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{temp_test_dir, write_fixture};

    #[test]
    fn test_defaults() {
        let config = InterpolatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.method, InterpolationMethod::Idw);
        assert_eq!(config.preview_scale, 4);
        assert_eq!(config.grid.resolution, 2000.0);
        assert_eq!(
            config.index_path(),
            PathBuf::from("outputs/interpolation/index.json")
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = temp_test_dir();
        let path = write_fixture(
            dir.path(),
            "interpolator.yaml",
            "outdir: /tmp/layers\nmethod: kriging\ngrid:\n  resolution: 5000\n",
        );

        let config = InterpolatorConfig::from_yaml(&path).unwrap();
        assert_eq!(config.outdir, PathBuf::from("/tmp/layers"));
        assert_eq!(config.method, InterpolationMethod::Kriging);
        assert_eq!(config.grid.resolution, 5000.0);
        assert_eq!(config.grid.max_points, 250_000);
        assert_eq!(config.input, PathBuf::from("web/meteo_data.json"));
    }

    #[test]
    fn test_bad_yaml_reports_path() {
        let dir = temp_test_dir();
        let path = write_fixture(dir.path(), "broken.yaml", "grid: [1, 2");
        let err = InterpolatorConfig::from_yaml(&path).unwrap_err();
        assert!(format!("{}", err).contains("broken.yaml"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = InterpolatorConfig::default();
        config.apply_overrides(&ConfigOverrides {
            outdir: Some(PathBuf::from("out")),
            power: Some(3.0),
            resolution: Some(1000.0),
            preview_scale: Some(2),
            ..Default::default()
        });

        assert_eq!(config.grid.idw_power, 3.0);
        assert_eq!(config.grid.resolution, 1000.0);
        assert_eq!(config.grid.batch_size, 10_000);
        assert_eq!(config.preview_scale, 2);
        assert_eq!(config.index_path(), PathBuf::from("out/index.json"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = InterpolatorConfig::default();
        config.preview_scale = 0;
        assert!(config.validate().is_err());

        let mut config = InterpolatorConfig::default();
        config.grid.resolution = -5.0;
        assert!(config.validate().is_err());
    }
}
