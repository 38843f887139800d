//! Color ramps and grid-to-RGBA rendering for surface previews.

use crate::error::{check_dimensions, RenderError, Result};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| ((a as f64 * t_inv) + (b as f64 * t)).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Piecewise-linear color ramp over `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<(f64, Color)>,
}

impl ColorRamp {
    /// Build a ramp from ascending stops. At least one stop is required.
    pub fn new(stops: Vec<(f64, Color)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(RenderError::Encode("color ramp needs at least one stop".into()));
        }
        if stops.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(RenderError::Encode("color ramp stops must ascend".into()));
        }
        Ok(Self { stops })
    }

    /// Perceptually uniform dark-purple → yellow ramp (matplotlib "inferno").
    pub fn inferno() -> Self {
        Self {
            stops: vec![
                (0.000, Color::new(0, 0, 4, 255)),
                (0.125, Color::new(31, 12, 72, 255)),
                (0.250, Color::new(85, 15, 109, 255)),
                (0.375, Color::new(136, 34, 106, 255)),
                (0.500, Color::new(186, 54, 85, 255)),
                (0.625, Color::new(227, 89, 51, 255)),
                (0.750, Color::new(249, 140, 10, 255)),
                (0.875, Color::new(249, 201, 50, 255)),
                (1.000, Color::new(252, 255, 164, 255)),
            ],
        }
    }

    /// Color at a normalized position; values outside `[0, 1]` are clamped.
    pub fn color_at(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let upper = self.stops.partition_point(|(pos, _)| *pos < t);
        if upper == 0 {
            return self.stops[0].1;
        }
        if upper >= self.stops.len() {
            return self.stops[self.stops.len() - 1].1;
        }

        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let span = p1 - p0;
        if span <= 0.0 {
            return c1;
        }
        interpolate_color(c0, c1, (t - p0) / span)
    }
}

/// RGBA pixels ready for PNG encoding.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Largest preview image, in pixels.
pub const MAX_PREVIEW_PIXELS: usize = 4096 * 4096;

/// Largest scale not above `requested` that keeps a `rows × cols` preview
/// within [`MAX_PREVIEW_PIXELS`]. Never below 1.
pub fn fit_preview_scale(rows: usize, cols: usize, requested: usize) -> usize {
    let cells = rows.saturating_mul(cols).max(1);
    let max_scale = ((MAX_PREVIEW_PIXELS / cells) as f64).sqrt().floor() as usize;
    requested.clamp(1, max_scale.max(1))
}

/// Render a south-up grid as a north-up false-color image.
///
/// `values` is row-major with row 0 the southernmost. Each cell becomes a
/// `scale × scale` block, with `scale` lowered by [`fit_preview_scale`]. `NaN` cells are fully transparent. Values are
/// normalized between `min` and `max`; a flat range maps everything to the
/// bottom of the ramp.
pub fn render_grid(
    values: &[f64],
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
    scale: usize,
    ramp: &ColorRamp,
) -> Result<RgbaImage> {
    check_dimensions(values.len(), cols, rows, 1)?;
    let scale = fit_preview_scale(rows, cols, scale);
    let width = cols * scale;
    let height = rows * scale;

    let range = max - min;
    let range = if range.is_finite() && range.abs() > f64::EPSILON {
        range
    } else {
        1.0
    };

    let mut pixels = vec![0u8; width * height * 4];
    for (out_row, line) in pixels.chunks_exact_mut(width * 4).enumerate() {
        let grid_row = rows - 1 - out_row / scale;
        for (out_col, pixel) in line.chunks_exact_mut(4).enumerate() {
            let value = values[grid_row * cols + out_col / scale];
            let color = if value.is_nan() {
                Color::transparent()
            } else {
                ramp.color_at((value - min) / range)
            };
            pixel.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    Ok(RgbaImage {
        pixels,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferno_endpoints() {
        let ramp = ColorRamp::inferno();
        assert_eq!(ramp.color_at(0.0), Color::new(0, 0, 4, 255));
        assert_eq!(ramp.color_at(1.0), Color::new(252, 255, 164, 255));
        assert_eq!(ramp.color_at(-3.0), ramp.color_at(0.0));
        assert_eq!(ramp.color_at(7.0), ramp.color_at(1.0));
        assert_eq!(ramp.color_at(0.5), Color::new(186, 54, 85, 255));
    }

    #[test]
    fn test_preview_scale_bounded_by_pixel_cap() {
        assert_eq!(fit_preview_scale(5, 5, 4), 4);
        assert_eq!(fit_preview_scale(100, 100, 64), 40);
        assert_eq!(fit_preview_scale(500, 500, 64), 8);
        assert_eq!(fit_preview_scale(5000, 5000, 4), 1);
        assert_eq!(fit_preview_scale(3, 3, 0), 1);

        let scale = fit_preview_scale(500, 500, 64);
        assert!(500 * scale * 500 * scale <= MAX_PREVIEW_PIXELS);
    }

    #[test]
    fn test_ramp_interpolates_between_stops() {
        let ramp = ColorRamp::new(vec![
            (0.0, Color::new(0, 0, 0, 255)),
            (1.0, Color::new(200, 100, 50, 255)),
        ])
        .unwrap();
        assert_eq!(ramp.color_at(0.5), Color::new(100, 50, 25, 255));
    }

    #[test]
    fn test_ramp_rejects_unsorted_stops() {
        assert!(ColorRamp::new(vec![]).is_err());
        assert!(ColorRamp::new(vec![
            (1.0, Color::transparent()),
            (0.0, Color::transparent())
        ])
        .is_err());
    }

    #[test]
    fn test_render_grid_flips_and_scales() {
        // 2 rows × 1 col: south = 0 (dark), north = 1 (bright)
        let img = render_grid(&[0.0, 1.0], 2, 1, 0.0, 1.0, 2, &ColorRamp::inferno()).unwrap();
        assert_eq!((img.width, img.height), (2, 4));

        let top_left = &img.pixels[0..4];
        let bottom_left = &img.pixels[(3 * 2) * 4..(3 * 2) * 4 + 4];
        assert_eq!(top_left, &[252, 255, 164, 255]);
        assert_eq!(bottom_left, &[0, 0, 4, 255]);
    }

    #[test]
    fn test_render_grid_nan_is_transparent() {
        let img = render_grid(&[f64::NAN, 5.0], 1, 2, 5.0, 5.0, 1, &ColorRamp::inferno()).unwrap();
        assert_eq!(&img.pixels[0..4], &[0, 0, 0, 0]);
        assert_eq!(img.pixels[7], 255);
    }
}
