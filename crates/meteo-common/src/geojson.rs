//! GeoJSON types for boundary input and vector layer output.
//!
//! Only the subset needed here is modelled: feature collections of points,
//! polygons and multipolygons. Other geometry types deserialize to
//! [`Geometry::Other`] so a boundary file carrying extra features still loads.
//! Positions keep their first two ordinates; elevation and any further
//! values are dropped on read.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Geometry; GeoJSON allows `null`.
    pub geometry: Option<Geometry>,

    /// Free-form properties.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a point feature carrying a single numeric `value` property.
    pub fn point_value(lon: f64, lat: f64, value: f64) -> Self {
        let mut properties = Map::new();
        properties.insert("value".to_string(), Value::from(value));
        Self {
            type_: "Feature".to_string(),
            geometry: Some(Geometry::point(lon, lat)),
            properties,
        }
    }
}

/// GeoJSON geometry types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A point geometry, `[x, y]`.
    Point {
        #[serde(deserialize_with = "position")]
        coordinates: [f64; 2],
    },

    /// A polygon: linear rings, the first is the exterior, the rest are holes.
    Polygon {
        #[serde(deserialize_with = "rings")]
        coordinates: Vec<Vec<[f64; 2]>>,
    },

    /// A set of polygons.
    MultiPolygon {
        #[serde(deserialize_with = "polygons")]
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },

    /// Any geometry type not used by this workspace.
    #[serde(other)]
    Other,
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point {
            coordinates: [x, y],
        }
    }

    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
    }
}

/// A GeoJSON position with at least two ordinates.
#[derive(Deserialize)]
#[serde(try_from = "Vec<f64>")]
struct Position([f64; 2]);

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y, ..] => Ok(Position([*x, *y])),
            _ => Err(format!(
                "position needs at least 2 coordinates, got {}",
                values.len()
            )),
        }
    }
}

fn position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
    Position::deserialize(deserializer).map(|p| p.0)
}

fn rings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<[f64; 2]>>, D::Error> {
    let rings: Vec<Vec<Position>> = Vec::deserialize(deserializer)?;
    Ok(rings
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| p.0).collect())
        .collect())
}

fn polygons<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Vec<Vec<[f64; 2]>>>, D::Error> {
    let polygons: Vec<Vec<Vec<Position>>> = Vec::deserialize(deserializer)?;
    Ok(polygons
        .into_iter()
        .map(|rings| {
            rings
                .into_iter()
                .map(|ring| ring.into_iter().map(|p| p.0).collect())
                .collect()
        })
        .collect())
}
