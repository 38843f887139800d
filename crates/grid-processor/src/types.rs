//! Core types for grid processing.

use crate::error::{GridProcessorError, Result};

/// Axis vectors of a regular planar lattice.
///
/// Both axes ascend; row 0 is the southernmost row. Nodes are addressed in
/// row-major order: `index = row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    /// Node x coordinates, one per column.
    pub xs: Vec<f64>,
    /// Node y coordinates, one per row.
    pub ys: Vec<f64>,
    /// Spacing between neighbouring nodes (metres).
    pub resolution: f64,
}

impl GridAxes {
    pub fn cols(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Planar coordinates of the node at a row-major index.
    pub fn node(&self, index: usize) -> (f64, f64) {
        let cols = self.cols();
        (self.xs[index % cols], self.ys[index / cols])
    }

    /// Top-left (north-west) node, the raster anchor.
    pub fn top_left(&self) -> Option<(f64, f64)> {
        Some((*self.xs.first()?, *self.ys.last()?))
    }
}

/// Interpolated values on a lattice.
///
/// `NaN` marks no-data cells (outside the boundary, or non-finite
/// estimates).
#[derive(Debug, Clone)]
pub struct Grid {
    pub axes: GridAxes,
    /// Row-major values, `axes.len()` long.
    pub values: Vec<f64>,
}

impl Grid {
    /// Create a grid, checking that the value count matches the axes.
    pub fn new(axes: GridAxes, values: Vec<f64>) -> Result<Self> {
        if values.len() != axes.len() {
            return Err(GridProcessorError::interpolation(format!(
                "expected {} values for a {}x{} grid, got {}",
                axes.len(),
                axes.rows(),
                axes.cols(),
                values.len()
            )));
        }
        Ok(Self { axes, values })
    }

    pub fn rows(&self) -> usize {
        self.axes.rows()
    }

    pub fn cols(&self) -> usize {
        self.axes.cols()
    }

    /// Value at a cell, `None` when out of range or no-data.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        let value = self.values[row * self.cols() + col];
        (!value.is_nan()).then_some(value)
    }

    /// Number of cells holding a value.
    pub fn valid_cells(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Iterate `(x, y, value)` over cells holding a value, row-major.
    pub fn iter_valid(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, &v)| {
                let (x, y) = self.axes.node(i);
                (x, y, v)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> GridAxes {
        GridAxes {
            xs: vec![0.0, 10.0, 20.0],
            ys: vec![100.0, 110.0],
            resolution: 10.0,
        }
    }

    #[test]
    fn test_node_is_row_major_from_south() {
        let axes = axes();
        assert_eq!(axes.len(), 6);
        assert_eq!(axes.node(0), (0.0, 100.0));
        assert_eq!(axes.node(2), (20.0, 100.0));
        assert_eq!(axes.node(3), (0.0, 110.0));
        assert_eq!(axes.top_left(), Some((0.0, 110.0)));
    }

    #[test]
    fn test_grid_value_count_checked() {
        assert!(Grid::new(axes(), vec![0.0; 5]).is_err());
        assert!(Grid::new(axes(), vec![0.0; 6]).is_ok());
    }

    #[test]
    fn test_valid_cells() {
        let grid = Grid::new(axes(), vec![1.0, f64::NAN, 3.0, f64::NAN, 5.0, 6.0]).unwrap();
        assert_eq!(grid.valid_cells(), 4);
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(1, 2), Some(6.0));
        assert_eq!(grid.get(2, 0), None);

        let valid: Vec<_> = grid.iter_valid().collect();
        assert_eq!(valid[1], (20.0, 100.0, 3.0));
    }
}
