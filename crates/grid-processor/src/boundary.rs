//! Administrative boundary loading and grid masking.
//!
//! The boundary is read from GeoJSON already expressed in Lambert-93 metres.
//! Point-in-polygon queries go through a prepared edge index: every ring
//! edge is bucketed into the horizontal bands it spans, so a query only
//! walks the edges crossing its own band.
//!
//! Points lying exactly on an edge or a vertex are treated as outside,
//! matching the interior-only semantics of `geo::Contains`.

use std::path::Path;

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Polygon};
use meteo_common::{BoundingBox, FeatureCollection, Geometry};
use tracing::{debug, info};

use crate::error::{GridProcessorError, Result};
use crate::types::Grid;

/// Upper bound on the number of bands in the edge index.
const MAX_BANDS: usize = 4096;

/// Target number of edges per band.
const EDGES_PER_BAND: usize = 4;

/// A loaded, immutable boundary polygon with a prepared contains index.
#[derive(Debug, Clone)]
pub struct Boundary {
    geometry: MultiPolygon<f64>,
    bbox: BoundingBox,
    index: EdgeIndex,
}

impl Boundary {
    /// Load the first Polygon/MultiPolygon feature of a GeoJSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GridProcessorError::boundary_load(format!("{}: {}", path.display(), e))
        })?;
        let boundary = Self::from_geojson_str(&text).map_err(|e| match e {
            GridProcessorError::BoundaryLoad(msg) => {
                GridProcessorError::boundary_load(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            polygons = boundary.geometry.0.len(),
            edges = boundary.index.edges.len(),
            "Loaded boundary"
        );
        Ok(boundary)
    }

    /// Parse a GeoJSON FeatureCollection and keep its first polygonal feature.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)
            .map_err(|e| GridProcessorError::boundary_load(format!("invalid GeoJSON: {}", e)))?;

        let polygons = collection
            .features
            .into_iter()
            .filter_map(|f| f.geometry)
            .find_map(|geometry| match geometry {
                Geometry::Polygon { coordinates } => Some(vec![coordinates]),
                Geometry::MultiPolygon { coordinates } => Some(coordinates),
                _ => None,
            })
            .ok_or_else(|| {
                GridProcessorError::boundary_load("no Polygon or MultiPolygon feature found")
            })?;

        let polygons = polygons
            .into_iter()
            .map(to_polygon)
            .collect::<Result<Vec<_>>>()?;

        Self::from_multi_polygon(MultiPolygon::new(polygons))
    }

    /// Prepare a boundary from an in-memory geometry.
    pub fn from_multi_polygon(geometry: MultiPolygon<f64>) -> Result<Self> {
        let rect = geometry
            .bounding_rect()
            .ok_or_else(|| GridProcessorError::boundary_load("boundary geometry is empty"))?;
        let bbox = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        if !bbox.is_valid() {
            return Err(GridProcessorError::boundary_load(format!(
                "boundary has non-finite coordinates: {:?}",
                bbox
            )));
        }

        let index = EdgeIndex::build(&geometry, &bbox);
        Ok(Self {
            geometry,
            bbox,
            index,
        })
    }

    /// Bounding box of the boundary.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Whether `(x, y)` lies strictly inside the boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() || !self.bbox.contains_point(x, y) {
            return false;
        }
        self.index.contains(x, y)
    }

    /// Set every cell whose node is not contained to NaN.
    ///
    /// Returns the number of cells holding a value afterwards. Applying the
    /// mask twice gives the same grid.
    pub fn mask(&self, grid: &mut Grid) -> usize {
        let mut valid = 0;
        for (i, value) in grid.values.iter_mut().enumerate() {
            let (x, y) = grid.axes.node(i);
            if !self.contains(x, y) {
                *value = f64::NAN;
            } else if !value.is_nan() {
                valid += 1;
            }
        }
        debug!(valid, total = grid.values.len(), "Applied boundary mask");
        valid
    }
}

fn to_polygon(rings: Vec<Vec<[f64; 2]>>) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| GridProcessorError::boundary_load("polygon has no exterior ring"))?;
    if exterior.len() < 3 {
        return Err(GridProcessorError::boundary_load(format!(
            "polygon exterior ring has {} positions, need at least 3",
            exterior.len()
        )));
    }
    let interiors: Vec<LineString<f64>> = rings.map(LineString::from).collect();
    Ok(Polygon::new(LineString::from(exterior), interiors))
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    start: Coord<f64>,
    end: Coord<f64>,
}

impl Edge {
    fn min_y(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    fn max_y(&self) -> f64 {
        self.start.y.max(self.end.y)
    }

    /// Whether the point lies on the closed segment.
    fn touches(&self, x: f64, y: f64) -> bool {
        let (x0, y0, x1, y1) = (self.start.x, self.start.y, self.end.x, self.end.y);
        if x < x0.min(x1) || x > x0.max(x1) || y < y0.min(y1) || y > y0.max(y1) {
            return false;
        }
        let cross = (x1 - x0) * (y - y0) - (y1 - y0) * (x - x0);
        cross.abs() <= 1e-9 * ((x1 - x0).abs() + (y1 - y0).abs()).max(1.0)
    }

    /// Even-odd crossing of a ray cast towards +x.
    fn crosses_ray(&self, x: f64, y: f64) -> bool {
        let (x0, y0, x1, y1) = (self.start.x, self.start.y, self.end.x, self.end.y);
        if (y0 > y) == (y1 > y) {
            return false;
        }
        let x_at = x0 + (y - y0) * (x1 - x0) / (y1 - y0);
        x < x_at
    }
}

/// Ring edges bucketed by horizontal band.
#[derive(Debug, Clone)]
struct EdgeIndex {
    edges: Vec<Edge>,
    bands: Vec<Vec<usize>>,
    min_y: f64,
    band_height: f64,
}

impl EdgeIndex {
    fn build(geometry: &MultiPolygon<f64>, bbox: &BoundingBox) -> Self {
        let edges: Vec<Edge> = geometry
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .flat_map(|ring| ring.lines())
            .filter(|line| line.start != line.end)
            .map(|line| Edge {
                start: line.start,
                end: line.end,
            })
            .collect();

        let height = bbox.height();
        let band_count = if height > 0.0 {
            (edges.len() / EDGES_PER_BAND).clamp(1, MAX_BANDS)
        } else {
            1
        };
        let band_height = if height > 0.0 {
            height / band_count as f64
        } else {
            1.0
        };

        let mut index = Self {
            edges,
            bands: vec![Vec::new(); band_count],
            min_y: bbox.min_y,
            band_height,
        };

        for (i, edge) in index.edges.iter().enumerate() {
            let first = index.band_of(edge.min_y());
            let last = index.band_of(edge.max_y());
            for band in &mut index.bands[first..=last] {
                band.push(i);
            }
        }

        index
    }

    fn band_of(&self, y: f64) -> usize {
        let band = ((y - self.min_y) / self.band_height).floor();
        if band <= 0.0 {
            0
        } else {
            (band as usize).min(self.bands.len() - 1)
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let mut inside = false;
        for &i in &self.bands[self.band_of(y)] {
            let edge = &self.edges[i];
            if edge.touches(x, y) {
                return false;
            }
            if edge.crosses_ray(x, y) {
                inside = !inside;
            }
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridAxes;
    use geo::{Contains, Point};
    use test_utils::{boundary_collection, scattered_samples, square_boundary_geojson};

    fn square() -> Boundary {
        Boundary::from_geojson_str(&square_boundary_geojson((0.0, 0.0, 10.0, 10.0))).unwrap()
    }

    #[test]
    fn test_square_interior_and_exterior() {
        let boundary = square();
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(boundary.contains(5.0, 5.0));
        assert!(boundary.contains(0.001, 9.999));
        assert!(!boundary.contains(-0.001, 5.0));
        assert!(!boundary.contains(15.0, 5.0));
    }

    #[test]
    fn test_edges_and_vertices_are_outside() {
        let boundary = square();
        for (x, y) in [(0.0, 5.0), (10.0, 5.0), (5.0, 0.0), (5.0, 10.0), (0.0, 0.0), (10.0, 10.0)] {
            assert!(!boundary.contains(x, y), "({}, {}) should be outside", x, y);
        }
    }

    #[test]
    fn test_polygon_with_hole() {
        let json = boundary_collection(vec![serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                    [[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]]
                ]
            }
        })]);
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        assert!(boundary.contains(2.0, 2.0));
        assert!(!boundary.contains(5.0, 5.0));
        assert!(!boundary.contains(4.0, 5.0));
    }

    #[test]
    fn test_positions_with_elevation_load() {
        let json = boundary_collection(vec![serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 10.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 0.0]]
                ]
            }
        })]);
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(boundary.contains(5.0, 5.0));
        assert!(!boundary.contains(10.0, 5.0));
    }

    #[test]
    fn test_multipolygon_and_first_polygonal_feature() {
        let json = boundary_collection(vec![
            serde_json::json!({
                "type": "Feature",
                "properties": { "label": "chef-lieu" },
                "geometry": { "type": "Point", "coordinates": [50.0, 50.0] }
            }),
            serde_json::json!({
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]],
                        [[[5.0, 5.0], [8.0, 5.0], [8.0, 8.0], [5.0, 8.0], [5.0, 5.0]]]
                    ]
                }
            }),
        ]);
        let boundary = Boundary::from_geojson_str(&json).unwrap();
        assert_eq!(boundary.bbox(), BoundingBox::new(0.0, 0.0, 8.0, 8.0));
        assert!(boundary.contains(1.0, 1.0));
        assert!(boundary.contains(6.0, 7.0));
        assert!(!boundary.contains(3.5, 3.5));
    }

    #[test]
    fn test_no_polygon_is_an_error() {
        let json = boundary_collection(vec![serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Point", "coordinates": [1.0, 1.0] }
        })]);
        assert!(matches!(
            Boundary::from_geojson_str(&json),
            Err(GridProcessorError::BoundaryLoad(_))
        ));
        assert!(matches!(
            Boundary::from_geojson_str("not json"),
            Err(GridProcessorError::BoundaryLoad(_))
        ));
    }

    #[test]
    fn test_missing_file_is_boundary_error() {
        let err = Boundary::from_path("/nonexistent/departement.geojson").unwrap_err();
        assert!(matches!(err, GridProcessorError::BoundaryLoad(_)));
        assert!(err.to_string().contains("departement.geojson"));
    }

    #[test]
    fn test_agrees_with_geo_contains() {
        // Irregular concave ring with many edges so several bands are used
        let ring: Vec<[f64; 2]> = (0..64)
            .map(|i| {
                let angle = i as f64 / 64.0 * std::f64::consts::TAU;
                let radius = if i % 2 == 0 { 1000.0 } else { 600.0 };
                [radius * angle.cos(), radius * angle.sin()]
            })
            .collect();
        let polygon = Polygon::new(LineString::from(ring), vec![]);
        let boundary = Boundary::from_multi_polygon(MultiPolygon::new(vec![polygon.clone()])).unwrap();
        assert!(boundary.index.bands.len() > 1);

        for (x, y, _) in scattered_samples(2000, (-1100.0, -1100.0, 1100.0, 1100.0), 42) {
            assert_eq!(
                boundary.contains(x, y),
                polygon.contains(&Point::new(x, y)),
                "disagreement at ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn test_mask_is_idempotent() {
        let boundary = square();
        let axes = GridAxes {
            xs: vec![0.0, 5.0, 10.0],
            ys: vec![0.0, 5.0, 10.0],
            resolution: 5.0,
        };
        let mut grid = Grid::new(axes, vec![1.0; 9]).unwrap();

        assert_eq!(boundary.mask(&mut grid), 1);
        let once: Vec<u64> = grid.values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(boundary.mask(&mut grid), 1);
        let twice: Vec<u64> = grid.values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(once, twice);
        assert_eq!(grid.get(1, 1), Some(1.0));
    }
}
