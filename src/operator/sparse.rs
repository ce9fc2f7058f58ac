//! Compressed sparse row storage for operator matrices.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// Square complex matrix in CSR format.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<Complex64>,
}

impl CsrMatrix {
    /// Build from per-row `(column, value)` lists. Columns must be sorted within a row.
    pub fn from_rows(rows: Vec<Vec<(usize, Complex64)>>) -> Self {
        let n = rows.len();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for row in rows {
            debug_assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
            for (col, value) in row {
                debug_assert!(col < n);
                col_idx.push(col);
                values.push(value);
            }
            row_ptr.push(col_idx.len());
        }
        Self { n, row_ptr, col_idx, values }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Element `(row, col)`, zero if not stored.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        match self.col_idx[range.clone()].binary_search(&col) {
            Ok(k) => self.values[range.start + k],
            Err(_) => Complex64::new(0.0, 0.0),
        }
    }

    /// Sparse matrix-vector product `y = A x`.
    pub fn matvec(&self, x: &DVector<Complex64>) -> DVector<Complex64> {
        assert_eq!(x.len(), self.n, "dimension mismatch in matvec");
        DVector::from_fn(self.n, |i, _| {
            (self.row_ptr[i]..self.row_ptr[i + 1])
                .map(|k| self.values[k] * x[self.col_idx[k]])
                .sum()
        })
    }

    pub fn to_dense(&self) -> DMatrix<Complex64> {
        let mut dense = DMatrix::zeros(self.n, self.n);
        for i in 0..self.n {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                dense[(i, self.col_idx[k])] += self.values[k];
            }
        }
        dense
    }

    /// Whether `A[i, j] == conj(A[j, i])` for every stored element, within `tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        (0..self.n).all(|i| {
            (self.row_ptr[i]..self.row_ptr[i + 1]).all(|k| {
                let j = self.col_idx[k];
                (self.values[k] - self.get(j, i).conj()).norm() <= tol
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_matvec_matches_dense() {
        // 3x3 tridiagonal: d = [1, 2, 3], off-diagonal -1
        let a = CsrMatrix::from_rows(vec![
            vec![(0, c(1.0)), (1, c(-1.0))],
            vec![(0, c(-1.0)), (1, c(2.0)), (2, c(-1.0))],
            vec![(1, c(-1.0)), (2, c(3.0))],
        ]);
        let x = DVector::from_vec(vec![c(1.0), c(2.0), c(3.0)]);
        let y = a.matvec(&x);
        let y_dense = a.to_dense() * &x;
        for i in 0..3 {
            assert_relative_eq!(y[i].re, y_dense[i].re, epsilon = 1e-12);
        }
        assert_eq!(a.nnz(), 7);
        assert_relative_eq!(y[2].re, 7.0, epsilon = 1e-12);
        assert!(a.is_hermitian(1e-12));
    }

    #[test]
    fn test_non_hermitian_detected() {
        let a = CsrMatrix::from_rows(vec![
            vec![(1, Complex64::new(0.0, 1.0))],
            vec![(0, Complex64::new(0.0, 1.0))],
        ]);
        assert!(!a.is_hermitian(1e-12));
        assert_eq!(a.get(0, 0), c(0.0));
    }
}
