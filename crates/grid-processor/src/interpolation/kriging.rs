//! Ordinary kriging with a linear variogram.
//!
//! The ordinary kriging system for `n` samples is the bordered matrix
//!
//! ```text
//! | γ11 … γ1n 1 |   | w1 |   | γ10 |
//! |  ⋮  ⋱  ⋮  ⋮ | · | ⋮  | = |  ⋮  |
//! | γn1 … γnn 1 |   | wn |   | γn0 |
//! |  1  …  1  0 |   | μ  |   |  1  |
//! ```
//!
//! It depends only on the sample positions, so it is inverted once and
//! folded with the sample values into one coefficient vector; each node then
//! costs a single dot product with its variogram column.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::{Interpolator, PlanarSample};
use crate::error::{GridProcessorError, Result};
use crate::types::GridAxes;

/// Number of equal-width lag bins in the experimental variogram.
const LAG_BINS: usize = 6;

/// Lags shorter than this count as zero distance.
const ZERO_LAG: f64 = 1e-10;

/// `γ(h) = nugget + slope · h` for `h > 0`, and `γ(0) = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearVariogram {
    pub nugget: f64,
    pub slope: f64,
}

impl Default for LinearVariogram {
    fn default() -> Self {
        Self {
            nugget: 0.0,
            slope: 1.0,
        }
    }
}

impl LinearVariogram {
    pub fn new(nugget: f64, slope: f64) -> Self {
        Self { nugget, slope }
    }

    #[inline]
    pub fn gamma(&self, h: f64) -> f64 {
        if h < ZERO_LAG {
            0.0
        } else {
            self.nugget + self.slope * h
        }
    }

    /// Fit nugget and slope to the experimental semivariogram.
    ///
    /// Pairwise semivariances `½(vi − vj)²` are averaged in six equal-width
    /// lag bins up to the largest pair distance, then a straight line is fit
    /// through the bin centroids by least squares. Both parameters are
    /// clamped to be non-negative; a fit that ends with both at zero (or
    /// non-finite) falls back to the default `slope = 1, nugget = 0`.
    pub fn fit(samples: &[PlanarSample]) -> Self {
        let mut pairs = Vec::with_capacity(samples.len() * samples.len().saturating_sub(1) / 2);
        for (i, a) in samples.iter().enumerate() {
            for b in &samples[i + 1..] {
                let h = a.distance_to(b.x, b.y);
                let semivariance = 0.5 * (a.value - b.value).powi(2);
                pairs.push((h, semivariance));
            }
        }

        let max_lag = pairs.iter().map(|&(h, _)| h).fold(0.0, f64::max);
        if pairs.is_empty() || max_lag < ZERO_LAG {
            return Self::default();
        }

        // Bin centroids: (mean lag, mean semivariance)
        let width = max_lag / LAG_BINS as f64;
        let mut sums = [(0.0, 0.0, 0usize); LAG_BINS];
        for &(h, g) in &pairs {
            let bin = ((h / width) as usize).min(LAG_BINS - 1);
            sums[bin].0 += h;
            sums[bin].1 += g;
            sums[bin].2 += 1;
        }
        let bins: Vec<(f64, f64)> = sums
            .iter()
            .filter(|(_, _, count)| *count > 0)
            .map(|&(h, g, count)| (h / count as f64, g / count as f64))
            .collect();

        let fitted = fit_line(&bins);
        let variogram = Self {
            nugget: fitted.nugget.max(0.0),
            slope: fitted.slope.max(0.0),
        };

        if !variogram.nugget.is_finite()
            || !variogram.slope.is_finite()
            || (variogram.nugget == 0.0 && variogram.slope == 0.0)
        {
            return Self::default();
        }
        variogram
    }
}

/// Least-squares line through `(lag, semivariance)` points.
fn fit_line(bins: &[(f64, f64)]) -> LinearVariogram {
    let n = bins.len() as f64;
    let sum_h: f64 = bins.iter().map(|&(h, _)| h).sum();
    let sum_g: f64 = bins.iter().map(|&(_, g)| g).sum();
    let mean_h = sum_h / n;
    let mean_g = sum_g / n;

    let var_h: f64 = bins.iter().map(|&(h, _)| (h - mean_h).powi(2)).sum();
    if bins.len() < 2 || var_h <= 0.0 {
        // A single lag: line through the origin
        let slope = if sum_h > 0.0 { sum_g / sum_h } else { 0.0 };
        return LinearVariogram::new(0.0, slope);
    }

    let cov: f64 = bins
        .iter()
        .map(|&(h, g)| (h - mean_h) * (g - mean_g))
        .sum();
    let slope = cov / var_h;
    let nugget = mean_g - slope * mean_h;

    if slope < 0.0 {
        // No spatial structure: flat at the mean semivariance
        return LinearVariogram::new(mean_g, 0.0);
    }
    if nugget < 0.0 {
        // Refit through the origin
        let hh: f64 = bins.iter().map(|&(h, _)| h * h).sum();
        let hg: f64 = bins.iter().map(|&(h, g)| h * g).sum();
        return LinearVariogram::new(0.0, hg / hh);
    }
    LinearVariogram::new(nugget, slope)
}

/// Ordinary kriging.
///
/// With no explicit variogram, one is fitted from the samples on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryKriging {
    variogram: Option<LinearVariogram>,
}

impl OrdinaryKriging {
    /// Kriging with a fixed variogram instead of a fitted one.
    pub fn with_variogram(variogram: LinearVariogram) -> Self {
        Self {
            variogram: Some(variogram),
        }
    }

    /// Solve the kriging system once and fold the sample values in.
    ///
    /// Returns `c` such that the estimate at a node is `c · [γ(d1) … γ(dn) 1]`.
    fn coefficients(&self, samples: &[PlanarSample], variogram: &LinearVariogram) -> Result<DVector<f64>> {
        let n = samples.len();

        for (i, a) in samples.iter().enumerate() {
            for b in &samples[i + 1..] {
                if a.distance_to(b.x, b.y) < ZERO_LAG {
                    return Err(GridProcessorError::interpolation(format!(
                        "kriging system is singular: co-located samples at ({}, {})",
                        a.x, a.y
                    )));
                }
            }
        }

        let mut k = DMatrix::zeros(n + 1, n + 1);
        for i in 0..n {
            for j in 0..n {
                let h = samples[i].distance_to(samples[j].x, samples[j].y);
                k[(i, j)] = variogram.gamma(h);
            }
            k[(i, n)] = 1.0;
            k[(n, i)] = 1.0;
        }

        let k_inv = k.try_inverse().ok_or_else(|| {
            GridProcessorError::interpolation("kriging system is singular and cannot be inverted")
        })?;

        let mut values = DVector::zeros(n + 1);
        for (i, s) in samples.iter().enumerate() {
            values[i] = s.value;
        }

        // The system is symmetric, so vᵀ K⁻¹ = (K⁻¹ v)ᵀ
        let coefficients = k_inv * values;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(GridProcessorError::interpolation(
                "kriging system is ill-conditioned",
            ));
        }
        Ok(coefficients)
    }
}

impl Interpolator for OrdinaryKriging {
    fn name(&self) -> &'static str {
        "kriging"
    }

    fn estimate(&self, samples: &[PlanarSample], grid: &GridAxes) -> Result<Vec<f64>> {
        let variogram = self
            .variogram
            .unwrap_or_else(|| LinearVariogram::fit(samples));
        debug!(
            nugget = variogram.nugget,
            slope = variogram.slope,
            samples = samples.len(),
            "Kriging variogram"
        );

        let c = self.coefficients(samples, &variogram)?;
        let n = samples.len();

        let out = (0..grid.len())
            .map(|index| {
                let (x, y) = grid.node(index);
                let estimate = samples
                    .iter()
                    .enumerate()
                    .map(|(i, s)| c[i] * variogram.gamma(s.distance_to(x, y)))
                    .sum::<f64>()
                    + c[n];
                if estimate.is_finite() {
                    estimate
                } else {
                    f64::NAN
                }
            })
            .collect();

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::scattered_samples;

    fn lattice(n: usize, step: f64) -> GridAxes {
        GridAxes {
            xs: (0..n).map(|i| i as f64 * step).collect(),
            ys: (0..n).map(|i| i as f64 * step).collect(),
            resolution: step,
        }
    }

    fn to_samples(points: Vec<(f64, f64, f64)>) -> Vec<PlanarSample> {
        points
            .into_iter()
            .map(|(x, y, v)| PlanarSample::new(x, y, v))
            .collect()
    }

    #[test]
    fn test_gamma_is_zero_at_origin() {
        let v = LinearVariogram::new(2.0, 0.5);
        assert_eq!(v.gamma(0.0), 0.0);
        assert_eq!(v.gamma(10.0), 7.0);
    }

    #[test]
    fn test_exact_at_stations() {
        let samples = vec![
            PlanarSample::new(0.0, 0.0, 10.0),
            PlanarSample::new(100.0, 0.0, 14.0),
            PlanarSample::new(0.0, 100.0, 12.0),
            PlanarSample::new(100.0, 100.0, 20.0),
        ];
        let kriging = OrdinaryKriging::default();
        let est = kriging.estimate(&samples, &lattice(2, 100.0)).unwrap();
        assert_eq!(est.len(), 4);
        assert!((est[0] - 10.0).abs() < 1e-6);
        assert!((est[1] - 14.0).abs() < 1e-6);
        assert!((est[2] - 12.0).abs() < 1e-6);
        assert!((est[3] - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_field_is_reproduced() {
        // Weights sum to one, so a constant field stays constant everywhere
        let samples: Vec<_> = scattered_samples(12, (0.0, 0.0, 1000.0, 1000.0), 3)
            .into_iter()
            .map(|(x, y, _)| PlanarSample::new(x, y, 5.0))
            .collect();
        let kriging = OrdinaryKriging::with_variogram(LinearVariogram::new(0.0, 1.0));
        for v in kriging.estimate(&samples, &lattice(8, 150.0)).unwrap() {
            assert!((v - 5.0).abs() < 1e-8, "got {}", v);
        }
    }

    #[test]
    fn test_single_sample_is_constant() {
        let samples = vec![PlanarSample::new(50.0, 50.0, 3.5)];
        let est = OrdinaryKriging::default()
            .estimate(&samples, &lattice(3, 40.0))
            .unwrap();
        for v in est {
            assert!((v - 3.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_colocated_samples_are_fatal() {
        let samples = vec![
            PlanarSample::new(0.0, 0.0, 1.0),
            PlanarSample::new(0.0, 0.0, 2.0),
            PlanarSample::new(10.0, 0.0, 3.0),
        ];
        assert!(matches!(
            OrdinaryKriging::default().estimate(&samples, &lattice(2, 5.0)),
            Err(GridProcessorError::Interpolation(_))
        ));
    }

    #[test]
    fn test_fit_recovers_linear_variogram() {
        // Semivariance grows with lag along a trend
        let samples = to_samples((0..10).map(|i| (i as f64 * 10.0, 0.0, i as f64)).collect());
        let v = LinearVariogram::fit(&samples);
        assert!(v.slope > 0.0);
        assert!(v.nugget >= 0.0);
    }

    #[test]
    fn test_fit_degenerate_cases() {
        // Single sample: no pairs
        assert_eq!(
            LinearVariogram::fit(&[PlanarSample::new(0.0, 0.0, 1.0)]),
            LinearVariogram::default()
        );

        // Identical values: zero semivariance everywhere
        let flat = to_samples(vec![(0.0, 0.0, 4.0), (10.0, 0.0, 4.0), (0.0, 25.0, 4.0)]);
        assert_eq!(LinearVariogram::fit(&flat), LinearVariogram::default());

        // Two samples: one lag, slope through the origin
        let pair = to_samples(vec![(0.0, 0.0, 0.0), (10.0, 0.0, 2.0)]);
        let v = LinearVariogram::fit(&pair);
        assert_eq!(v.nugget, 0.0);
        assert!((v.slope - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let samples = to_samples(scattered_samples(30, (0.0, 0.0, 5000.0, 5000.0), 11));
        assert_eq!(LinearVariogram::fit(&samples), LinearVariogram::fit(&samples));
    }
}
