//! Image encoding for interpolated surfaces.
//!
//! - Color ramps and grid-to-RGBA rendering (`colormap`)
//! - PNG encoding, indexed or RGBA (`png`)
//! - Single-band float32 GeoTIFF encoding (`geotiff`)
//!
//! Grids handed to this crate use the surface convention: row-major, row 0
//! southernmost. Both image encoders emit north-up output.

pub mod colormap;
pub mod error;
pub mod geotiff;
pub mod png;

pub use colormap::{
    fit_preview_scale, render_grid, Color, ColorRamp, RgbaImage, MAX_PREVIEW_PIXELS,
};
pub use error::{RenderError, Result};
pub use geotiff::{encode_geotiff, GeoTiffSpec};
pub use png::create_png_auto;

/// Render a grid with a ramp and encode it as PNG.
pub fn encode_preview_png(
    values: &[f64],
    rows: usize,
    cols: usize,
    range: (f64, f64),
    scale: usize,
    ramp: &ColorRamp,
) -> Result<Vec<u8>> {
    let image = render_grid(values, rows, cols, range.0, range.1, scale, ramp)?;
    create_png_auto(&image.pixels, image.width, image.height)
}
