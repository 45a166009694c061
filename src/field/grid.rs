use serde::Serialize;

use crate::error::{WakeError, WakeResult};

/// Dense 2-D scalar field stored row-major.
///
/// Row index `y` is the grid model's flow axis, column index `x` is lateral.
/// Cell `(y, x)` lives at `data[y * cols + x]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// A `rows × cols` field of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// A `rows × cols` field with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a field from nested rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if there are no cells, rows differ in
    /// length, or any value is non-finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> WakeResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(WakeError::invalid("field", "must contain at least one cell"));
        }
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(WakeError::invalid(
                    "field",
                    format!("row {y} has {} columns, expected {cols}", row.len()),
                ));
            }
            if let Some(x) = row.iter().position(|v| !v.is_finite()) {
                return Err(WakeError::invalid(
                    "field",
                    format!("non-finite value at row {y}, column {x}"),
                ));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the field has no cells (zero rows or zero columns).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `(y, x)` addresses a cell of this field.
    pub fn contains(&self, y: usize, x: usize) -> bool {
        y < self.rows && x < self.cols
    }

    /// Value at row `y`, column `x`, or `None` outside the field.
    pub fn get(&self, y: usize, x: usize) -> Option<f64> {
        self.contains(y, x).then(|| self.data[y * self.cols + x])
    }

    /// Mutable row slice. Panics if `y` is out of range.
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [f64] {
        let start = y * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Read-only row-major view of every cell.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Owned nested-row copy, for exporters and plotting collaborators.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }

    /// Smallest cell value, or `None` for an empty field.
    pub fn min_value(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::min)
    }

    /// Largest cell value, or `None` for an empty field.
    pub fn max_value(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    /// Mean cell value (0.0 for an empty field).
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Elementwise maximum with another field of the same shape.
    pub(crate) fn max_assign(&mut self, other: &Grid) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a = a.max(*b);
        }
    }

    pub(crate) fn same_shape(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let g = Grid::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.get(1, 0), Some(4.0));
        assert_eq!(g.get(0, 2), Some(3.0));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn empty_rows_rejected() {
        assert!(Grid::from_rows(Vec::new()).is_err());
        assert!(Grid::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn non_finite_rejected() {
        assert!(Grid::from_rows(vec![vec![1.0, f64::NAN]]).is_err());
    }

    #[test]
    fn max_assign_is_elementwise() {
        let mut a = Grid::from_rows(vec![vec![1.0, 5.0]]).unwrap();
        let b = Grid::from_rows(vec![vec![3.0, 2.0]]).unwrap();
        a.max_assign(&b);
        assert_eq!(a.as_slice(), &[3.0, 5.0]);
    }

    #[test]
    fn to_rows_round_trips_shape() {
        let g = Grid::filled(3, 2, 7.0);
        let rows = g.to_rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r == &vec![7.0, 7.0]));
        assert_eq!(g.mean(), 7.0);
    }
}
