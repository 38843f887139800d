//! Layer exports.
//!
//! Every layer gets a GeoJSON point layer and a stats file; the GeoTIFF
//! raster and the PNG preview are written when the corresponding
//! [`ExportCapabilities`] flag is set.

use anyhow::{Context, Result};
use grid_processor::Grid;
use meteo_common::{
    Feature, FeatureCollection, InterpolationMethod, LayerStats, OutputPaths, Period, Variable,
};
use projection::{LambertConformal, PLANAR_EPSG};
use renderer::{encode_geotiff, encode_preview_png, fit_preview_scale, ColorRamp, GeoTiffSpec};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::capabilities::ExportCapabilities;

/// File stem shared by every output of a layer.
///
/// The resolution is truncated to whole metres.
pub fn file_stem(
    variable: Variable,
    period: &Period,
    method: InterpolationMethod,
    resolution: f64,
) -> String {
    format!(
        "{}_{}_{}_grid{}",
        variable,
        period,
        method,
        resolution.trunc() as i64
    )
}

/// One point feature per valid cell, located in lon/lat degrees.
pub fn points_collection(grid: &Grid, projection: &LambertConformal) -> Result<FeatureCollection> {
    let features = grid
        .iter_valid()
        .map(|(x, y, value)| -> Result<Feature> {
            let (lon, lat) = projection
                .inverse(x, y)
                .with_context(|| format!("Failed to unproject grid node ({}, {})", x, y))?;
            Ok(Feature::point_value(lon, lat, value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection::new().with_features(features))
}

/// Float32 GeoTIFF of the grid in Lambert-93.
pub fn geotiff_bytes(grid: &Grid) -> Result<Vec<u8>> {
    let (origin_x, origin_y) = grid
        .axes
        .top_left()
        .context("Cannot georeference an empty grid")?;

    let spec = GeoTiffSpec {
        width: grid.cols(),
        height: grid.rows(),
        pixel_size: grid.axes.resolution,
        origin_x,
        origin_y,
        epsg: PLANAR_EPSG,
    };
    Ok(encode_geotiff(&grid.values, &spec)?)
}

/// Writes the files of one layer into an output directory.
pub struct LayerExporter<'a> {
    outdir: &'a Path,
    projection: &'a LambertConformal,
    capabilities: ExportCapabilities,
    preview_scale: usize,
    ramp: ColorRamp,
}

impl<'a> LayerExporter<'a> {
    pub fn new(
        outdir: &'a Path,
        projection: &'a LambertConformal,
        capabilities: ExportCapabilities,
        preview_scale: usize,
    ) -> Self {
        Self {
            outdir,
            projection,
            capabilities,
            preview_scale,
            ramp: ColorRamp::inferno(),
        }
    }

    /// Write all enabled outputs and return their paths.
    pub fn export(&self, stem: &str, grid: &Grid, stats: &LayerStats) -> Result<OutputPaths> {
        fs::create_dir_all(self.outdir)
            .with_context(|| format!("Failed to create output directory {:?}", self.outdir))?;

        let geojson = self.write_geojson(stem, grid)?;

        let geotiff = if self.capabilities.geotiff {
            Some(self.write_geotiff(stem, grid)?)
        } else {
            warn!(layer = stem, "GeoTIFF export unavailable, skipping raster");
            None
        };

        let png = if self.capabilities.png {
            Some(self.write_preview(stem, grid, stats)?)
        } else {
            warn!(layer = stem, "PNG export unavailable, skipping preview");
            None
        };

        let stats_file = self.write_stats(stem, stats)?;

        Ok(OutputPaths {
            geojson: OutputPaths::normalize(&geojson),
            geotiff: geotiff.as_deref().map(OutputPaths::normalize),
            png: png.as_deref().map(OutputPaths::normalize),
            stats_file: Some(OutputPaths::normalize(&stats_file)),
        })
    }

    fn path(&self, stem: &str, suffix: &str) -> PathBuf {
        self.outdir.join(format!("{}{}", stem, suffix))
    }

    fn write_geojson(&self, stem: &str, grid: &Grid) -> Result<PathBuf> {
        let path = self.path(stem, ".geojson");
        let collection = points_collection(grid, self.projection)?;

        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &collection)
            .with_context(|| format!("Failed to write {:?}", path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {:?}", path))?;

        info!(
            path = %path.display(),
            features = collection.features.len(),
            "Wrote GeoJSON layer"
        );
        Ok(path)
    }

    fn write_geotiff(&self, stem: &str, grid: &Grid) -> Result<PathBuf> {
        let path = self.path(stem, ".tif");
        let bytes = geotiff_bytes(grid)?;
        write_bytes(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote GeoTIFF");
        Ok(path)
    }

    fn write_preview(&self, stem: &str, grid: &Grid, stats: &LayerStats) -> Result<PathBuf> {
        let path = self.path(stem, ".png");
        let range = (stats.min.unwrap_or(0.0), stats.max.unwrap_or(1.0));
        let scale = fit_preview_scale(grid.rows(), grid.cols(), self.preview_scale);
        if scale < self.preview_scale {
            warn!(
                requested = self.preview_scale,
                scale,
                "Preview scale lowered to stay within the image size cap"
            );
        }
        let bytes = encode_preview_png(
            &grid.values,
            grid.rows(),
            grid.cols(),
            range,
            scale,
            &self.ramp,
        )?;
        write_bytes(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote PNG preview");
        Ok(path)
    }

    fn write_stats(&self, stem: &str, stats: &LayerStats) -> Result<PathBuf> {
        let path = self.path(stem, "_stats.json");
        let mut json = serde_json::to_string_pretty(stats)?;
        json.push('\n');
        write_bytes(&path, json.as_bytes())?;
        debug!(path = %path.display(), "Wrote layer stats");
        Ok(path)
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_processor::GridAxes;
    use meteo_common::Geometry;
    use test_utils::{assert_approx_eq, list_files, temp_test_dir};

    fn small_grid() -> Grid {
        // 2 rows × 3 cols around the projection origin, one no-data cell
        let axes = GridAxes {
            xs: vec![698_000.0, 700_000.0, 702_000.0],
            ys: vec![6_600_000.0, 6_602_000.0],
            resolution: 2000.0,
        };
        Grid::new(axes, vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]).unwrap()
    }

    fn stats() -> LayerStats {
        LayerStats {
            min: Some(1.0),
            max: Some(6.0),
            mean: Some(3.6),
        }
    }

    #[test]
    fn test_file_stem() {
        let period = Period::Month("2024-01".into());
        assert_eq!(
            file_stem(Variable::Precipitation, &period, InterpolationMethod::Kriging, 2000.0),
            "precipitation_2024-01_kriging_grid2000"
        );
        let day = Period::Day("20240115".into());
        assert_eq!(
            file_stem(Variable::TempMoy, &day, InterpolationMethod::Idw, 2500.7),
            "temp_moy_20240115_idw_grid2500"
        );
    }

    #[test]
    fn test_points_skip_nan_and_unproject() {
        let lambert = LambertConformal::lambert93();
        let collection = points_collection(&small_grid(), &lambert).unwrap();
        assert_eq!(collection.features.len(), 5);

        // Second feature is the node at the projection origin
        let feature = &collection.features[1];
        assert_eq!(feature.properties["value"], 2.0);
        match &feature.geometry {
            Some(Geometry::Point { coordinates }) => {
                assert_approx_eq!(coordinates[0], 3.0, 1e-9);
                assert_approx_eq!(coordinates[1], 46.5, 1e-9);
            }
            other => panic!("expected a point, got {:?}", other),
        }
    }

    #[test]
    fn test_export_writes_all_files() {
        let dir = temp_test_dir();
        let outdir = dir.path().join("layers");
        let lambert = LambertConformal::lambert93();
        let caps = ExportCapabilities {
            geotiff: true,
            png: true,
        };

        let paths = LayerExporter::new(&outdir, &lambert, caps, 2)
            .export("t_stem", &small_grid(), &stats())
            .unwrap();

        assert_eq!(
            list_files(&outdir),
            vec!["t_stem.geojson", "t_stem.png", "t_stem.tif", "t_stem_stats.json"]
        );
        assert!(paths.geojson.ends_with("layers/t_stem.geojson"));
        assert!(paths.geotiff.unwrap().ends_with("t_stem.tif"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(outdir.join("t_stem_stats.json")).unwrap())
                .unwrap();
        assert_eq!(written["min"], 1.0);
        assert_eq!(written["mean"], 3.6);
    }

    #[test]
    fn test_export_skips_disabled_formats() {
        let dir = temp_test_dir();
        let lambert = LambertConformal::lambert93();

        let paths = LayerExporter::new(dir.path(), &lambert, ExportCapabilities::none(), 4)
            .export("t_stem", &small_grid(), &stats())
            .unwrap();

        assert_eq!(paths.geotiff, None);
        assert_eq!(paths.png, None);
        assert_eq!(
            list_files(dir.path()),
            vec!["t_stem.geojson", "t_stem_stats.json"]
        );
    }

    #[test]
    fn test_geotiff_anchor_is_top_left_node() {
        let bytes = geotiff_bytes(&small_grid()).unwrap();
        let mut decoder = tiff::decoder::Decoder::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (3, 2));

        let tiepoint = decoder
            .get_tag_f64_vec(tiff::tags::Tag::from_u16_exhaustive(33922))
            .unwrap();
        assert_eq!(tiepoint, vec![0.0, 0.0, 0.0, 698_000.0, 6_602_000.0, 0.0]);
    }
}
