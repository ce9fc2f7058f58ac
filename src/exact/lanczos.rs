//! Lanczos eigensolver for the lowest eigenvalues of a sparse Hermitian matrix.
//!
//! Builds the Krylov basis with full reorthogonalization and diagonalizes the
//! tridiagonal projection T after every iteration. A Ritz value θᵢ is accepted
//! once its residual |β_m yᵢ[m]| falls below `tolerance · max(1, |θᵢ|)`.

use log::debug;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::error::EigenError;
use crate::operator::{CsrMatrix, LocalOperator};

/// β below which the Krylov space is treated as invariant.
const BREAKDOWN: f64 = 1e-12;

/// Settings for the Lanczos iteration.
#[derive(Copy, Clone, Debug)]
pub struct LanczosParams {
    /// Number of lowest eigenvalues to return
    pub k: usize,
    /// Maximum Krylov dimension
    pub max_iterations: usize,
    /// Relative residual tolerance
    pub tolerance: f64,
    /// Seed of the random start vector
    pub seed: u64,
}

impl Default for LanczosParams {
    fn default() -> Self {
        Self {
            k: 1,
            max_iterations: 300,
            tolerance: 1e-10,
            seed: 0,
        }
    }
}

/// Lowest `params.k` eigenvalues of `op`, in ascending order.
pub fn lanczos_ed(op: &LocalOperator, params: &LanczosParams) -> Result<Vec<f64>, EigenError> {
    lanczos_eigenvalues(&op.to_sparse(), params)
}

/// Ground-state energy of `op` with default settings.
pub fn smallest_eigenvalue(op: &LocalOperator) -> Result<f64, EigenError> {
    let values = lanczos_ed(op, &LanczosParams::default())?;
    Ok(values[0])
}

/// Ritz values of the tridiagonal matrix with diagonal `alphas` and
/// off-diagonal `betas`, paired with their residual estimates, sorted ascending.
fn ritz_pairs(alphas: &[f64], betas: &[f64], beta_next: f64) -> Vec<(f64, f64)> {
    let m = alphas.len();
    let mut t = DMatrix::zeros(m, m);
    for i in 0..m {
        t[(i, i)] = alphas[i];
        if i + 1 < m {
            t[(i, i + 1)] = betas[i];
            t[(i + 1, i)] = betas[i];
        }
    }
    let eig = SymmetricEigen::new(t);
    let mut pairs: Vec<(f64, f64)> = (0..m)
        .map(|i| (eig.eigenvalues[i], (beta_next * eig.eigenvectors[(m - 1, i)]).abs()))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

/// Lowest `params.k` eigenvalues of a Hermitian CSR matrix, in ascending order.
pub fn lanczos_eigenvalues(
    matrix: &CsrMatrix,
    params: &LanczosParams,
) -> Result<Vec<f64>, EigenError> {
    let n = matrix.dim();
    if params.k == 0 || params.k > n {
        return Err(EigenError::TooManyEigenvalues { requested: params.k, dimension: n });
    }
    if !matrix.is_hermitian(1e-12) {
        return Err(EigenError::NotHermitian);
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut v: DVector<Complex64> =
        DVector::from_fn(n, |_, _| Complex64::new(rng.gen::<f64>() - 0.5, 0.0));
    v /= Complex64::new(v.norm(), 0.0);

    let m_max = params.max_iterations.min(n);
    let mut basis: Vec<DVector<Complex64>> = Vec::with_capacity(m_max);
    let mut alphas = Vec::with_capacity(m_max);
    let mut betas = Vec::with_capacity(m_max);
    let mut worst_residual = f64::INFINITY;

    for j in 0..m_max {
        let mut w = matrix.matvec(&v);
        alphas.push(v.dotc(&w).re);
        basis.push(v);

        // Two passes of Gram-Schmidt against the whole basis.
        for _ in 0..2 {
            for u in basis.iter() {
                let overlap = u.dotc(&w);
                w.axpy(-overlap, u, Complex64::new(1.0, 0.0));
            }
        }
        let beta = w.norm();

        if alphas.len() >= params.k {
            let pairs = ritz_pairs(&alphas, &betas, beta);
            let wanted = &pairs[..params.k];
            worst_residual = wanted.iter()
                .map(|&(theta, r)| r / theta.abs().max(1.0))
                .fold(0.0, f64::max);
            debug!("lanczos iter {}: θ₀ = {:.12}, residual = {:.3e}", j + 1, pairs[0].0, worst_residual);

            if worst_residual <= params.tolerance || beta < BREAKDOWN || j + 1 == n {
                return Ok(wanted.iter().map(|&(theta, _)| theta).collect());
            }
        } else if beta < BREAKDOWN {
            // Invariant subspace smaller than the number of wanted eigenvalues.
            return Err(EigenError::NotConverged { iterations: j + 1, residual: beta });
        }

        betas.push(beta);
        v = w / Complex64::new(beta, 0.0);
    }

    Err(EigenError::NotConverged { iterations: m_max, residual: worst_residual })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::graph;
    use crate::hilbert::SpinHilbert;
    use crate::operator::{sigma_x, sigma_z, transverse_field_ising};

    #[test]
    fn test_complete_graph_reference_energy() {
        let g = graph::complete(4);
        let ham = transverse_field_ising(SpinHilbert::from_graph(&g), &g, 1.0, 0.5).unwrap();
        let e0 = smallest_eigenvalue(&ham).unwrap();
        assert_relative_eq!(e0, -4.247303334275872, epsilon = 1e-6);
    }

    #[test]
    fn test_critical_chain_matches_free_fermions() {
        // E₀ = -Σₖ 2|sin(k/2)| with k = (2n+1)π/L for the periodic chain at J = h = 1.
        let length = 8;
        let g = graph::chain(length, true).unwrap();
        let ham = transverse_field_ising(SpinHilbert::from_graph(&g), &g, 1.0, 1.0).unwrap();
        let exact: f64 = -(0..length)
            .map(|n| {
                let k = std::f64::consts::PI * (2 * n + 1) as f64 / length as f64;
                (2.0 - 2.0 * k.cos()).sqrt()
            })
            .sum::<f64>();
        assert_relative_eq!(exact, -10.251661790966025, epsilon = 1e-9);
        assert_relative_eq!(smallest_eigenvalue(&ham).unwrap(), exact, epsilon = 1e-8);
    }

    #[test]
    fn test_several_eigenvalues_in_order() {
        let g = graph::chain(6, true).unwrap();
        let ham = transverse_field_ising(SpinHilbert::from_graph(&g), &g, 0.7, 1.0).unwrap();
        let params = LanczosParams { k: 3, ..Default::default() };
        let values = lanczos_ed(&ham, &params).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[0] <= values[1] && values[1] <= values[2]);
    }

    #[test]
    fn test_not_converged_is_reported() {
        let g = graph::chain(8, true).unwrap();
        let ham = transverse_field_ising(SpinHilbert::from_graph(&g), &g, 1.0, 1.0).unwrap();
        let params = LanczosParams { max_iterations: 2, tolerance: 1e-14, ..Default::default() };
        let err = lanczos_ed(&ham, &params).unwrap_err();
        assert!(matches!(err, EigenError::NotConverged { iterations: 2, .. }));
    }

    #[test]
    fn test_invalid_requests() {
        let hi = SpinHilbert::new(2);
        let x = sigma_x(hi, 0).unwrap();
        let params = LanczosParams { k: 5, ..Default::default() };
        assert_eq!(
            lanczos_ed(&x, &params),
            Err(EigenError::TooManyEigenvalues { requested: 5, dimension: 4 })
        );
        let non_hermitian = x.checked_mul(&sigma_z(hi, 0).unwrap()).unwrap();
        assert_eq!(
            lanczos_ed(&non_hermitian, &LanczosParams::default()),
            Err(EigenError::NotHermitian)
        );
    }
}
