//! Stochastic Reconfiguration (SR) preconditioner.
//!
//! Natural gradient on the energy. The update direction solves
//!
//!   (S + ε·1) · δp = f
//!
//! where:
//! - S_ij = Re ⟨(O_i - ⟨O_i⟩)* (O_j - ⟨O_j⟩)⟩  (quantum geometric tensor)
//! - f_i  = Re ⟨(O_i - ⟨O_i⟩)* (E_L - ⟨E_L⟩)⟩ = G_i / 2  (energy-parameter covariance)
//! - O_i  = ∂ ln ψ / ∂p_i                     (log-derivatives)

use log::warn;
use nalgebra::{DMatrix, DVector};
use crate::vqs::SampleStatistics;
use super::traits::Preconditioner;

#[derive(Clone, Debug)]
pub struct StochasticReconfiguration {
    /// Levenberg-Marquardt regularization added to the diagonal of S
    pub diag_shift: f64,
}

impl Default for StochasticReconfiguration {
    fn default() -> Self {
        Self { diag_shift: 0.01 }
    }
}

impl StochasticReconfiguration {
    pub fn new(diag_shift: f64) -> Self {
        Self { diag_shift }
    }

    /// Regularized S matrix.
    pub fn s_matrix(&self, stats: &SampleStatistics) -> DMatrix<f64> {
        let mut s = stats.quantum_geometric_tensor();
        for i in 0..s.nrows() {
            s[(i, i)] += self.diag_shift;
        }
        s
    }
}

impl Preconditioner for StochasticReconfiguration {
    fn apply(&self, gradient: &DVector<f64>, stats: &SampleStatistics) -> DVector<f64> {
        let s_matrix = self.s_matrix(stats);
        let force = gradient * 0.5;

        if let Some(update) = s_matrix.clone().cholesky().map(|chol| chol.solve(&force)) {
            if update.iter().all(|x| x.is_finite()) {
                return update;
            }
        }
        s_matrix.lu().solve(&force).unwrap_or_else(|| {
            // Fallback to the unpreconditioned force if S is singular
            warn!("SR matrix is singular, using the plain gradient");
            force.clone()
        })
    }
}
