//! Common types and utilities shared across the surface interpolation crates.

pub mod bbox;
pub mod error;
pub mod geojson;
pub mod layer;
pub mod period;
pub mod station;
pub mod variable;

pub use bbox::BoundingBox;
pub use error::{MeteoError, MeteoResult};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use layer::{InterpolationMethod, LayerKey, LayerRecord, LayerStats, OutputPaths};
pub use period::{Period, PeriodType};
pub use station::{DailyRecord, Station, StationDataset, StationSample};
pub use variable::{Aggregation, Variable};
