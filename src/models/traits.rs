//! Ansatz trait for variational wavefunctions on discrete configurations.
//!
//! Parameters are real and owned by the caller, so the same ansatz can be
//! evaluated at any parameter vector. Log-amplitudes are complex in general.

use nalgebra::DVector;
use num_complex::Complex64;
use rand::Rng;
use crate::hilbert::Configuration;

/// Parameterized trial wavefunction ψ_θ(σ), evaluated through ln ψ.
pub trait Ansatz {
    /// Number of variational parameters.
    fn n_params(&self) -> usize;

    /// Draw an initial parameter vector.
    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64>;

    /// ln ψ_θ(σ) for a single configuration.
    fn log_psi(&self, params: &DVector<f64>, config: &Configuration) -> Complex64;

    /// O_k = ∂ ln ψ_θ(σ) / ∂θ_k for all parameters.
    fn log_derivatives(&self, params: &DVector<f64>, config: &Configuration) -> DVector<Complex64>;

    /// ln ψ for a batch of configurations.
    fn evaluate(&self, params: &DVector<f64>, configs: &[Configuration]) -> Vec<Complex64> {
        configs.iter().map(|c| self.log_psi(params, c)).collect()
    }

    /// Log-derivatives by central differences.
    fn numerical_log_derivatives(
        &self,
        params: &DVector<f64>,
        config: &Configuration,
        h: f64,
    ) -> DVector<Complex64> {
        let mut grad = DVector::zeros(params.len());
        for k in 0..params.len() {
            let mut p_fwd = params.clone();
            let mut p_bwd = params.clone();
            p_fwd[k] += h;
            p_bwd[k] -= h;
            grad[k] = (self.log_psi(&p_fwd, config) - self.log_psi(&p_bwd, config)) / (2.0 * h);
        }
        grad
    }
}
