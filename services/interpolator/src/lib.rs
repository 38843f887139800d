//! Station surface interpolator.
//!
//! Selects one value per weather station for a variable and period,
//! interpolates them onto a Lambert-93 lattice clipped to a boundary, writes
//! the layer as GeoJSON / GeoTIFF / PNG plus a stats file, and registers it
//! in the JSON layer catalog.

pub mod capabilities;
pub mod config;
pub mod export;
pub mod pipeline;

pub use capabilities::{ExportCapabilities, DISABLED_EXPORTS_ENV};
pub use config::{ConfigOverrides, InterpolatorConfig};
pub use export::{file_stem, LayerExporter};
pub use pipeline::{resolve_period, LayerOutcome, LayerRequest, Pipeline};
