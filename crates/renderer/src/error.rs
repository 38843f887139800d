//! Error types for raster encoding.

use thiserror::Error;

/// Errors that can occur while encoding an image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Pixel or value buffer does not match the stated dimensions.
    #[error("buffer of {actual} elements does not match {width}x{height} (expected {expected})")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Zero-sized or oversized image.
    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: usize, height: usize },

    /// Compression or write failure.
    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<tiff::TiffError> for RenderError {
    fn from(err: tiff::TiffError) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Check image dimensions against a buffer of `per_pixel`-sized elements.
pub(crate) fn check_dimensions(len: usize, width: usize, height: usize, per_pixel: usize) -> Result<()> {
    if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(RenderError::InvalidSize { width, height });
    }
    let expected = width * height * per_pixel;
    if len != expected {
        return Err(RenderError::DimensionMismatch {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
