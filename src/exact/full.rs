//! Dense diagonalization for very small Hilbert spaces.

use nalgebra::SymmetricEigen;
use crate::error::EigenError;
use crate::operator::LocalOperator;

/// Full spectrum of a Hermitian operator, in ascending order.
pub fn full_ed(op: &LocalOperator) -> Result<Vec<f64>, EigenError> {
    if !op.is_hermitian(1e-12) {
        return Err(EigenError::NotHermitian);
    }
    let eig = SymmetricEigen::new(op.to_dense());
    let mut values: Vec<f64> = eig.eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}
