//! Layer records: what one run produced and where it was written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{MeteoError, PeriodType, Variable};

/// Interpolation strategy used to build a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Inverse distance weighting.
    #[default]
    Idw,
    /// Ordinary kriging with a linear variogram.
    Kriging,
}

impl InterpolationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpolationMethod::Idw => "idw",
            InterpolationMethod::Kriging => "kriging",
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = MeteoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "idw" => Ok(InterpolationMethod::Idw),
            "kriging" | "ok" => Ok(InterpolationMethod::Kriging),
            other => Err(MeteoError::invalid_parameter(
                "method",
                format!("expected 'idw' or 'kriging', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics over the valid cells of a layer.
///
/// All fields are `None` (JSON `null`) when no cell is valid, which keeps an
/// empty layer distinguishable from a layer of zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl LayerStats {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.mean.is_none()
    }
}

/// Files written for a layer. Paths use forward slashes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputPaths {
    pub geojson: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geotiff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_file: Option<String>,
}

impl OutputPaths {
    /// Normalize a path for the catalog (forward slashes on every platform).
    pub fn normalize(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

/// Identity of a layer in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerKey {
    pub variable: Variable,
    pub period_type: PeriodType,
    pub period: String,
    pub method: Option<InterpolationMethod>,
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.variable, self.period_type, self.period)?;
        if let Some(method) = self.method {
            write!(f, ":{}", method)?;
        }
        Ok(())
    }
}

/// A generated layer as recorded in the catalog index.
///
/// Output paths are flattened into the record (`geojson`, `geotiff`, `png`)
/// which is the shape the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub variable: Variable,
    pub period_type: PeriodType,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<InterpolationMethod>,
    /// Grid resolution in metres.
    #[serde(rename = "grid", default, skip_serializing_if = "Option::is_none")]
    pub grid_resolution: Option<f64>,
    pub stats: LayerStats,
    #[serde(flatten)]
    pub outputs: OutputPaths,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl LayerRecord {
    pub fn key(&self) -> LayerKey {
        LayerKey {
            variable: self.variable,
            period_type: self.period_type,
            period: self.period.clone(),
            method: self.method,
        }
    }
}
