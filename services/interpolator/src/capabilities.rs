//! Optional export formats available to this build.

use std::fmt;
use tracing::{info, warn};

/// Environment variable listing exports to turn off, comma separated.
pub const DISABLED_EXPORTS_ENV: &str = "INTERP_DISABLED_EXPORTS";

/// Which optional exports a run may produce.
///
/// The GeoJSON layer and the stats file are always written; the raster and
/// the preview depend on cargo features and can be switched off at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportCapabilities {
    pub geotiff: bool,
    pub png: bool,
}

impl ExportCapabilities {
    /// Exports compiled into this binary.
    pub fn compiled() -> Self {
        Self {
            geotiff: cfg!(feature = "geotiff"),
            png: cfg!(feature = "png"),
        }
    }

    pub fn none() -> Self {
        Self {
            geotiff: false,
            png: false,
        }
    }

    /// Probe once at startup: compiled exports minus those disabled through
    /// [`DISABLED_EXPORTS_ENV`].
    pub fn detect() -> Self {
        let compiled = Self::compiled();
        let caps = match std::env::var(DISABLED_EXPORTS_ENV) {
            Ok(list) => compiled.without(&list),
            Err(_) => compiled,
        };

        info!(geotiff = caps.geotiff, png = caps.png, "Export capabilities");
        caps
    }

    /// Turn off the exports named in a comma-separated list.
    pub fn without(mut self, list: &str) -> Self {
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_lowercase().as_str() {
                "geotiff" | "tif" | "tiff" => self.geotiff = false,
                "png" | "preview" => self.png = false,
                other => warn!(export = other, "Ignoring unknown export name"),
            }
        }
        self
    }
}

impl fmt::Display for ExportCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |b: bool| if b { "on" } else { "off" };
        write!(f, "geotiff={} png={}", on_off(self.geotiff), on_off(self.png))
    }
}
