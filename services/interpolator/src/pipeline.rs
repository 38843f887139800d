//! A single interpolation run, from station dataset to catalog record.
//!
//! ```text
//! StationDataset ──► select_samples ──► project_samples
//!                                             │
//! Boundary ──► GridBuilder::build ────────────┤
//!    │                                        ▼
//!    └──────────► mask ◄──────────────── interpolate
//!                  │
//!                  ▼
//!             GridStats ──► LayerExporter ──► Catalog::register_layer
//! ```
//!
//! Every check that can fail on the inputs (period, station values, boundary,
//! grid budget) runs before the first file is written, and the catalog is
//! only touched once all exports succeeded.

use anyhow::{Context, Result};
use chrono::Utc;
use grid_processor::{
    interpolate, interpolator_for, project_samples, Boundary, GridBuilder, GridStats,
};
use meteo_common::{
    InterpolationMethod, LayerRecord, LayerStats, MeteoError, MeteoResult, Period, PeriodType,
    StationDataset, Variable,
};
use projection::LambertConformal;
use storage::Catalog;
use tracing::{debug, info, warn};

use crate::capabilities::ExportCapabilities;
use crate::config::InterpolatorConfig;
use crate::export::{file_stem, LayerExporter};

/// Resolve the requested period from either `period_type` + `period` or the
/// `date` / `month` shorthands.
///
/// Mixing the two forms, or giving only half of the long form, is rejected.
pub fn resolve_period(
    period_type: Option<&str>,
    period: Option<&str>,
    date: Option<&str>,
    month: Option<&str>,
) -> MeteoResult<Period> {
    match (period_type, period) {
        (None, None) => Period::from_options(date, month),
        (Some(kind), Some(value)) => {
            if date.is_some() || month.is_some() {
                return Err(MeteoError::invalid_parameter(
                    "period",
                    "use either --period-type/--period or --date/--month",
                ));
            }
            Period::parse(kind.parse::<PeriodType>()?, value)
        }
        (Some(_), None) => Err(MeteoError::MissingParameter("period".to_string())),
        (None, Some(_)) => Err(MeteoError::MissingParameter("period_type".to_string())),
    }
}

/// What to build: one variable, one period, one method.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRequest {
    pub variable: Variable,
    pub period: Period,
    pub method: InterpolationMethod,
}

impl LayerRequest {
    pub fn new(variable: Variable, period: Period, method: InterpolationMethod) -> Self {
        Self {
            variable,
            period,
            method,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct LayerOutcome {
    /// Record written to the catalog.
    pub record: LayerRecord,
    /// Statistics over the masked grid.
    pub stats: GridStats,
    /// Stations that contributed a value.
    pub stations: usize,
}

/// Runs layer requests against one configuration.
pub struct Pipeline {
    config: InterpolatorConfig,
    capabilities: ExportCapabilities,
    projection: LambertConformal,
}

impl Pipeline {
    pub fn new(config: InterpolatorConfig, capabilities: ExportCapabilities) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            capabilities,
            projection: LambertConformal::lambert93(),
        })
    }

    pub fn config(&self) -> &InterpolatorConfig {
        &self.config
    }

    /// Build, export and register one layer.
    pub fn run(&self, request: &LayerRequest) -> Result<LayerOutcome> {
        info!(
            variable = %request.variable,
            period = %request.period,
            method = %request.method,
            resolution = self.config.grid.resolution,
            "Building layer"
        );

        let dataset = StationDataset::from_path(&self.config.input)
            .with_context(|| format!("Failed to load station data from {:?}", self.config.input))?;
        let stations = dataset.select_samples(request.variable, &request.period)?;
        info!(
            stations = stations.len(),
            total = dataset.len(),
            "Selected station values"
        );

        let boundary = Boundary::from_path(&self.config.boundary)?;
        let axes = GridBuilder::from_config(&self.config.grid)?.build(&boundary.bbox())?;
        debug!(rows = axes.rows(), cols = axes.cols(), "Grid lattice ready");

        let samples = project_samples(&stations, &self.projection)?;
        let interpolator = interpolator_for(request.method, &self.config.grid)?;
        let mut grid = interpolate(interpolator.as_ref(), &samples, axes)?;

        let inside = boundary.mask(&mut grid);
        let stats = GridStats::summarize(&grid.values);
        if stats.is_empty() {
            warn!("No grid node falls inside the boundary; layer has no values");
        }
        info!(
            valid_cells = inside,
            min = ?stats.min,
            max = ?stats.max,
            mean = ?stats.mean,
            "Surface masked"
        );

        let stem = file_stem(
            request.variable,
            &request.period,
            request.method,
            self.config.grid.resolution,
        );
        let layer_stats = LayerStats::from(stats);
        let outputs = LayerExporter::new(
            &self.config.outdir,
            &self.projection,
            self.capabilities,
            self.config.preview_scale,
        )
        .export(&stem, &grid, &layer_stats)?;

        let record = LayerRecord {
            variable: request.variable,
            period_type: request.period.period_type(),
            period: request.period.to_string(),
            method: Some(request.method),
            grid_resolution: Some(self.config.grid.resolution),
            stats: layer_stats,
            outputs,
            generated_at: Some(Utc::now()),
        };

        let index_path = self.config.index_path();
        Catalog::new(&index_path)
            .register_layer(record.clone())
            .with_context(|| format!("Failed to update catalog {:?}", index_path))?;

        Ok(LayerOutcome {
            record,
            stats,
            stations: stations.len(),
        })
    }
}
