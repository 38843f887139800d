//! Single-band float32 GeoTIFF encoding.
//!
//! The raster is written through [`tiff::encoder::TiffEncoder`] as one
//! `Gray32Float` image, with the GeoTIFF tags needed to place it in a
//! projected CRS:
//!
//! | Tag   | Name                | Value                                   |
//! |-------|---------------------|-----------------------------------------|
//! | 33550 | ModelPixelScale     | `(res, res, 0)`                         |
//! | 33922 | ModelTiepoint       | pixel `(0, 0)` → top-left node          |
//! | 34735 | GeoKeyDirectory     | projected, pixel-is-area, EPSG code     |
//! | 42113 | GDAL_NODATA         | `"nan"`                                 |
//!
//! Rows are written north-up (first row = northernmost).

use std::io::Cursor;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{check_dimensions, RenderError, Result};

// GeoTIFF tags
pub const MODEL_PIXEL_SCALE: u16 = 33550;
pub const MODEL_TIEPOINT: u16 = 33922;
pub const GEO_KEY_DIRECTORY: u16 = 34735;
pub const GDAL_NODATA: u16 = 42113;

// GeoKeys
const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const PROJECTED_CS_TYPE: u16 = 3072;
const MODEL_TYPE_PROJECTED: u16 = 1;
const RASTER_PIXEL_IS_AREA: u16 = 1;

fn geo_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Georeferencing for a north-up raster in a projected CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTiffSpec {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Pixel size in CRS units, both axes.
    pub pixel_size: f64,
    /// CRS x of pixel (0, 0).
    pub origin_x: f64,
    /// CRS y of pixel (0, 0), i.e. the northern edge.
    pub origin_y: f64,
    /// EPSG code of the projected CRS.
    pub epsg: u16,
}

impl GeoTiffSpec {
    fn geo_keys(&self) -> [u16; 16] {
        [
            1, 1, 0, 3, // version, revision, minor, key count
            GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED,
            GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA,
            PROJECTED_CS_TYPE, 0, 1, self.epsg,
        ]
    }
}

/// Encode a grid as a float32 GeoTIFF.
///
/// `values` is row-major with row 0 the **southernmost** row (the grid
/// convention); rows are flipped on write. `NaN` cells are written as NaN
/// and flagged through GDAL_NODATA.
pub fn encode_geotiff(values: &[f64], spec: &GeoTiffSpec) -> Result<Vec<u8>> {
    check_dimensions(values.len(), spec.width, spec.height, 1)?;
    if !spec.pixel_size.is_finite() || spec.pixel_size <= 0.0 {
        return Err(RenderError::Encode(format!(
            "pixel size must be positive, got {}",
            spec.pixel_size
        )));
    }

    let north_up: Vec<f32> = values
        .chunks_exact(spec.width)
        .rev()
        .flatten()
        .map(|&v| v as f32)
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buffer)?;
        let mut image =
            encoder.new_image::<colortype::Gray32Float>(spec.width as u32, spec.height as u32)?;

        let dir = image.encoder();
        dir.write_tag(
            geo_tag(MODEL_PIXEL_SCALE),
            &[spec.pixel_size, spec.pixel_size, 0.0][..],
        )?;
        dir.write_tag(
            geo_tag(MODEL_TIEPOINT),
            &[0.0, 0.0, 0.0, spec.origin_x, spec.origin_y, 0.0][..],
        )?;
        dir.write_tag(geo_tag(GEO_KEY_DIRECTORY), &spec.geo_keys()[..])?;
        dir.write_tag(geo_tag(GDAL_NODATA), "nan")?;

        image.write_data(&north_up)?;
    }

    let tiff = buffer.into_inner();
    debug!(
        width = spec.width,
        height = spec.height,
        bytes = tiff.len(),
        "Encoded GeoTIFF"
    );
    Ok(tiff)
}
