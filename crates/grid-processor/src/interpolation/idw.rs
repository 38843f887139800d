//! Inverse distance weighting.

use nalgebra::{DMatrix, DVector};

use super::{Interpolator, PlanarSample};
use crate::error::{GridProcessorError, Result};
use crate::types::GridAxes;

/// Distances below this are clamped so a node on a station stays finite.
pub const MIN_DISTANCE: f64 = 1e-6;

/// IDW with a configurable power, evaluated in row-major node batches.
///
/// Each batch builds a dense `batch × stations` weight matrix and reduces
/// it with two matrix–vector products (weighted values and weight sums),
/// so peak memory is bounded by `batch_size × stations` weights.
#[derive(Debug, Clone, Copy)]
pub struct Idw {
    power: f64,
    batch_size: usize,
}

impl Idw {
    pub fn new(power: f64, batch_size: usize) -> Result<Self> {
        if !power.is_finite() || power <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "idw power must be > 0, got {}",
                power
            )));
        }
        if batch_size == 0 {
            return Err(GridProcessorError::config("batch_size must be > 0"));
        }
        Ok(Self { power, batch_size })
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    /// Weight of a sample at distance `d`.
    #[inline]
    pub fn weight(&self, distance: f64) -> f64 {
        1.0 / distance.max(MIN_DISTANCE).powf(self.power)
    }
}

impl Default for Idw {
    fn default() -> Self {
        Self {
            power: 2.0,
            batch_size: 10_000,
        }
    }
}

impl Interpolator for Idw {
    fn name(&self) -> &'static str {
        "idw"
    }

    fn estimate(&self, samples: &[PlanarSample], grid: &GridAxes) -> Result<Vec<f64>> {
        let n = samples.len();
        let total = grid.len();
        let values = DVector::from_iterator(n, samples.iter().map(|s| s.value));
        let ones = DVector::from_element(n, 1.0);

        let mut out = Vec::with_capacity(total);
        let mut start = 0;
        while start < total {
            let end = (start + self.batch_size).min(total);
            let weights = DMatrix::from_fn(end - start, n, |row, col| {
                let (x, y) = grid.node(start + row);
                self.weight(samples[col].distance_to(x, y))
            });

            let weighted = &weights * &values;
            let sums = &weights * &ones;
            out.extend(weighted.iter().zip(sums.iter()).map(|(num, den)| {
                let estimate = num / den;
                if estimate.is_finite() {
                    estimate
                } else {
                    f64::NAN
                }
            }));
            start = end;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes(xs: Vec<f64>, ys: Vec<f64>) -> GridAxes {
        GridAxes {
            xs,
            ys,
            resolution: 1.0,
        }
    }

    fn samples() -> Vec<PlanarSample> {
        vec![
            PlanarSample::new(0.0, 0.0, 10.0),
            PlanarSample::new(100.0, 0.0, 20.0),
            PlanarSample::new(0.0, 100.0, 30.0),
        ]
    }

    #[test]
    fn test_weight_finite_at_coincident_point() {
        let idw = Idw::default();
        let w = idw.weight(0.0);
        assert!(w.is_finite() && w > 0.0);
        assert_eq!(w, idw.weight(MIN_DISTANCE));
    }

    #[test]
    fn test_node_on_station_takes_its_value() {
        let idw = Idw::default();
        let est = idw
            .estimate(&samples(), &axes(vec![0.0, 100.0], vec![0.0]))
            .unwrap();
        assert!((est[0] - 10.0).abs() < 1e-6);
        assert!((est[1] - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_estimates_bounded_by_sample_range() {
        let idw = Idw::new(1.5, 7).unwrap();
        let grid = axes(
            (0..20).map(|i| -50.0 + i as f64 * 10.0).collect(),
            (0..20).map(|i| -50.0 + i as f64 * 10.0).collect(),
        );
        for v in idw.estimate(&samples(), &grid).unwrap() {
            assert!((10.0..=30.0).contains(&v), "estimate {} out of range", v);
        }
    }

    #[test]
    fn test_matches_direct_formula() {
        let idw = Idw::new(2.0, 1).unwrap();
        let est = idw
            .estimate(&samples(), &axes(vec![30.0], vec![40.0]))
            .unwrap();

        let (mut num, mut den) = (0.0, 0.0);
        for s in samples() {
            let w = 1.0 / s.distance_to(30.0, 40.0).powi(2);
            num += w * s.value;
            den += w;
        }
        assert!((est[0] - num / den).abs() < 1e-12);
    }

    #[test]
    fn test_batch_size_does_not_change_result() {
        let grid = axes(
            (0..13).map(|i| i as f64 * 9.0).collect(),
            (0..11).map(|i| i as f64 * 11.0).collect(),
        );
        let a = Idw::new(2.0, 1).unwrap().estimate(&samples(), &grid).unwrap();
        let b = Idw::new(2.0, 17).unwrap().estimate(&samples(), &grid).unwrap();
        let c = Idw::new(2.0, 10_000).unwrap().estimate(&samples(), &grid).unwrap();
        assert_eq!(a.len(), 143);
        for i in 0..a.len() {
            assert!((a[i] - b[i]).abs() < 1e-9);
            assert!((a[i] - c[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_power() {
        assert!(Idw::new(0.0, 10).is_err());
        assert!(Idw::new(-2.0, 10).is_err());
        assert!(Idw::new(f64::NAN, 10).is_err());
        assert!(Idw::new(2.0, 0).is_err());
    }
}
