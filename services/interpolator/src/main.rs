//! Station surface interpolator.
//!
//! Builds one interpolated layer per invocation and records it in the
//! catalog index read by the dashboard.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use interpolator::{
    resolve_period, ConfigOverrides, ExportCapabilities, InterpolatorConfig, LayerRequest,
    Pipeline,
};
use meteo_common::{InterpolationMethod, Variable};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "interpolator")]
#[command(about = "Interpolate station measurements onto a bounded Lambert-93 surface")]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "INTERP_CONFIG")]
    config: Option<PathBuf>,

    /// Station dataset (JSON)
    #[arg(long, env = "INTERP_INPUT")]
    input: Option<PathBuf>,

    /// Variable to interpolate (temp_moy, temp_min, temp_max, precipitation, vent_moy, vent_max)
    #[arg(long, env = "INTERP_VARIABLE")]
    variable: String,

    /// Period granularity (day or month), used with --period
    #[arg(long, env = "INTERP_PERIOD_TYPE")]
    period_type: Option<String>,

    /// Period value (YYYYMMDD or YYYY-MM), used with --period-type
    #[arg(long, env = "INTERP_PERIOD")]
    period: Option<String>,

    /// Single day, YYYYMMDD
    #[arg(long, env = "INTERP_DATE")]
    date: Option<String>,

    /// Calendar month, YYYY-MM
    #[arg(long, env = "INTERP_MONTH")]
    month: Option<String>,

    /// Interpolation method (idw or kriging)
    #[arg(long, env = "INTERP_METHOD")]
    method: Option<InterpolationMethod>,

    /// IDW distance exponent
    #[arg(long, env = "INTERP_POWER")]
    power: Option<f64>,

    /// Grid resolution in metres
    #[arg(long = "grid", env = "INTERP_GRID")]
    resolution: Option<f64>,

    /// Output directory
    #[arg(long, env = "INTERP_OUTDIR")]
    outdir: Option<PathBuf>,

    /// Catalog index (default: <outdir>/index.json)
    #[arg(long, env = "INTERP_INDEX")]
    index: Option<PathBuf>,

    /// Boundary polygon (GeoJSON, Lambert-93)
    #[arg(long, env = "INTERP_BOUNDARY")]
    boundary: Option<PathBuf>,

    /// Maximum number of grid nodes
    #[arg(long, env = "INTERP_MAX_POINTS")]
    max_points: Option<usize>,

    /// Grid nodes per IDW batch
    #[arg(long, env = "INTERP_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Preview pixels per grid cell
    #[arg(long, env = "INTERP_PREVIEW_SCALE")]
    preview_scale: Option<usize>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, env = "INTERP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "INTERP_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input: self.input.clone(),
            boundary: self.boundary.clone(),
            outdir: self.outdir.clone(),
            index: self.index.clone(),
            method: self.method,
            power: self.power,
            resolution: self.resolution,
            max_points: self.max_points,
            batch_size: self.batch_size,
            preview_scale: self.preview_scale,
        }
    }
}

fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!(e))
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    info!("Starting station surface interpolator");

    let mut config = match &args.config {
        Some(path) => InterpolatorConfig::from_yaml(path)?,
        None => InterpolatorConfig::default(),
    };
    config.apply_overrides(&args.overrides());

    // Parameters are checked before the dataset is read
    let period = resolve_period(
        args.period_type.as_deref(),
        args.period.as_deref(),
        args.date.as_deref(),
        args.month.as_deref(),
    )
    .context("Invalid period")?;
    let variable: Variable = args.variable.parse().context("Invalid variable")?;
    let request = LayerRequest::new(variable, period, config.method);

    let pipeline = Pipeline::new(config, ExportCapabilities::detect())?;
    let outcome = pipeline.run(&request)?;

    info!(
        stations = outcome.stations,
        geojson = %outcome.record.outputs.geojson,
        geotiff = ?outcome.record.outputs.geotiff,
        png = ?outcome.record.outputs.png,
        index = %pipeline.config().index_path().display(),
        "Layer complete"
    );

    Ok(())
}
