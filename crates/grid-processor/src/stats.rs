//! Summary statistics over valid grid cells.

use meteo_common::LayerStats;
use serde::{Deserialize, Serialize};

/// Min, max and mean over non-NaN cells.
///
/// All three are `None` when no cell holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_cells: usize,
}

impl GridStats {
    pub fn summarize(values: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &v in values.iter().filter(|v| !v.is_nan()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / count as f64),
            valid_cells: count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.valid_cells == 0
    }
}

impl From<GridStats> for LayerStats {
    fn from(stats: GridStats) -> Self {
        LayerStats {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_skips_nan() {
        let stats = GridStats::summarize(&[1.0, f64::NAN, 3.0, 8.0]);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(8.0));
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(stats.valid_cells, 3);
    }

    #[test]
    fn test_all_nan_is_empty() {
        let stats = GridStats::summarize(&[f64::NAN; 4]);
        assert!(stats.is_empty());
        assert_eq!(stats.min, None);

        let layer: LayerStats = stats.into();
        let json = serde_json::to_value(layer).unwrap();
        assert!(json["min"].is_null());
        assert!(json["mean"].is_null());
    }
}
