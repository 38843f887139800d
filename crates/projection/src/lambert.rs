//! Lambert Conformal Conic projection (ellipsoidal, two standard parallels).
//!
//! Maps a cone secant to the ellipsoid onto a flat plane. The projection
//! parameters include:
//! - Latitude of origin (lat0) and central meridian (lon0)
//! - Standard parallels: latin1 and latin2 (can be equal for tangent cone)
//! - False easting / northing in metres
//! - The reference ellipsoid
//!
//! [`LambertConformal::lambert93`] gives the French national projection
//! (EPSG:2154), which is what the surface interpolator works in.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::{ProjectionError, Result};

/// Convergence threshold for the inverse latitude iteration (radians).
const INVERSE_TOLERANCE: f64 = 1e-12;
const INVERSE_MAX_ITERATIONS: usize = 15;

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Inverse flattening
    pub inv_f: f64,
}

impl Ellipsoid {
    /// GRS80, the ellipsoid of RGF93 (and, to the millimetre, of WGS84).
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        inv_f: 298.257222101,
    };

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        let f = 1.0 / self.inv_f;
        (2.0 * f - f * f).sqrt()
    }
}

/// Lambert Conformal Conic projection parameters.
///
/// Forward maps geographic (lon/lat, degrees) to planar (x, y, metres);
/// inverse maps back.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// False easting (metres)
    pub false_easting: f64,
    /// False northing (metres)
    pub false_northing: f64,
    /// Semi-major axis (metres)
    pub a: f64,
    /// First eccentricity
    pub e: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the latitude of origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from parameters in degrees and metres.
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();
        let a = ellipsoid.a;
        let e = ellipsoid.eccentricity();

        let m1 = m(latin1, e);
        let m2 = m(latin2, e);
        let t1 = t(latin1, e);
        let t2 = t(latin2, e);

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };

        let f = m1 / (n * t1.powf(n));
        let rho0 = a * f * t(lat0, e).powf(n);

        Self {
            lon0,
            lat0,
            latin1,
            latin2,
            false_easting,
            false_northing,
            a,
            e,
            n,
            f,
            rho0,
        }
    }

    /// RGF93 / Lambert-93 (EPSG:2154).
    ///
    /// - Standard parallels: 49°N and 44°N
    /// - Origin: 46.5°N, 3°E
    /// - False origin: (700000, 6600000)
    /// - Ellipsoid: GRS80
    pub fn lambert93() -> Self {
        Self::new(
            46.5,            // lat0
            3.0,             // lon0
            49.0,            // latin1
            44.0,            // latin2
            700000.0,        // false easting
            6600000.0,       // false northing
            Ellipsoid::GRS80,
        )
    }

    /// Convert geographic coordinates (degrees) to planar coordinates (metres).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Result<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(ProjectionError::NonFinite(lon_deg, lat_deg));
        }
        if lat_deg.abs() > 90.0 {
            return Err(ProjectionError::LatitudeOutOfRange(lat_deg));
        }

        let lat = lat_deg.to_radians();
        let dlon = normalize_angle(lon_deg.to_radians() - self.lon0);

        // The pole opposite the cone apex maps to infinity.
        let t = t(lat, self.e);
        if !t.is_finite() || (self.n > 0.0 && lat <= -FRAC_PI_2 + 1e-12) {
            return Err(ProjectionError::LatitudeOutOfRange(lat_deg));
        }

        let rho = self.a * self.f * t.powf(self.n);
        let theta = self.n * dlon;

        let x = self.false_easting + rho * theta.sin();
        let y = self.false_northing + self.rho0 - rho * theta.cos();

        Ok((x, y))
    }

    /// Convert planar coordinates (metres) to geographic coordinates (degrees).
    ///
    /// Returns `(lon, lat)`.
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite(x, y));
        }

        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);

        let sign = self.n.signum();
        let rho = sign * (dx * dx + dy * dy).sqrt();
        let theta = (sign * dx).atan2(sign * dy);

        let lon = normalize_angle(theta / self.n + self.lon0);

        if rho == 0.0 {
            return Ok((lon.to_degrees(), sign * 90.0));
        }

        let t = (rho / (self.a * self.f)).powf(1.0 / self.n);
        let half_e = self.e / 2.0;

        let mut lat = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..INVERSE_MAX_ITERATIONS {
            let es = self.e * lat.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(half_e)).atan();
            if (next - lat).abs() < INVERSE_TOLERANCE {
                return Ok((lon.to_degrees(), next.to_degrees()));
            }
            lat = next;
        }

        Err(ProjectionError::NoConvergence(x, y))
    }

    /// Point scale factor at a latitude (1.0 on the standard parallels).
    pub fn scale_factor(&self, lat_deg: f64) -> f64 {
        let lat = lat_deg.to_radians();
        let rho = self.a * self.f * t(lat, self.e).powf(self.n);
        rho * self.n / (self.a * m(lat, self.e))
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

/// m(φ) = cos φ / sqrt(1 − e² sin² φ)
fn m(lat: f64, e: f64) -> f64 {
    let es = e * lat.sin();
    lat.cos() / (1.0 - es * es).sqrt()
}

/// t(φ) = tan(π/4 − φ/2) / ((1 − e sin φ) / (1 + e sin φ))^(e/2)
fn t(lat: f64, e: f64) -> f64 {
    let es = e * lat.sin();
    (FRAC_PI_4 - lat / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

/// Normalize an angle to [-π, π].
fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert93_origin() {
        let proj = LambertConformal::lambert93();

        // The natural origin maps to the false origin
        let (x, y) = proj.forward(3.0, 46.5).unwrap();
        assert!((x - 700000.0).abs() < 1e-6, "x should be 700000, got {}", x);
        assert!((y - 6600000.0).abs() < 1e-6, "y should be 6600000, got {}", y);
    }

    #[test]
    fn test_lambert93_roundtrip() {
        let proj = LambertConformal::lambert93();

        for &(lon, lat) in &[(5.3698, 43.2965), (4.6300, 43.6766), (-1.5, 48.1), (7.75, 48.58)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-9, "lon roundtrip failed: {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat roundtrip failed: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_scale_is_one_on_standard_parallels() {
        let proj = LambertConformal::lambert93();
        assert!((proj.scale_factor(44.0) - 1.0).abs() < 1e-9);
        assert!((proj.scale_factor(49.0) - 1.0).abs() < 1e-9);
        // Between the parallels the cone is inside the ellipsoid
        assert!(proj.scale_factor(46.5) < 1.0);
    }

    #[test]
    fn test_east_of_meridian_is_east_of_false_easting() {
        let proj = LambertConformal::lambert93();
        let (x, _) = proj.forward(5.4, 43.3).unwrap();
        assert!(x > 700000.0);
        let (x, _) = proj.forward(-1.0, 43.3).unwrap();
        assert!(x < 700000.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let proj = LambertConformal::lambert93();
        assert!(matches!(
            proj.forward(f64::NAN, 43.0),
            Err(ProjectionError::NonFinite(_, _))
        ));
        assert!(matches!(
            proj.forward(3.0, 91.0),
            Err(ProjectionError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            proj.forward(3.0, -90.0),
            Err(ProjectionError::LatitudeOutOfRange(_))
        ));
        assert!(proj.inverse(f64::INFINITY, 0.0).is_err());
    }
}
