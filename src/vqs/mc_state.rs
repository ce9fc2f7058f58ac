//! Monte Carlo variational state.
//!
//! Owns the ansatz parameters and the sampler. The current sample batch is
//! transient: it is dropped whenever the parameters change and redrawn on demand.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::error::{OperatorError, VmcError};
use crate::hilbert::SpinHilbert;
use crate::models::Ansatz;
use crate::operator::LocalOperator;
use crate::sampling::{Sampler, Samples, Stats};
use super::kernels::{local_value, local_value_squared};

/// Centered per-sample quantities needed by gradient preconditioners.
#[derive(Clone, Debug)]
pub struct SampleStatistics {
    /// O_k(σ) - ⟨O_k⟩, one row per sample
    pub centered_log_derivs: DMatrix<Complex64>,
    /// E_loc(σ) - ⟨E_loc⟩, one entry per sample
    pub centered_energies: DVector<Complex64>,
}

impl SampleStatistics {
    pub fn n_samples(&self) -> usize {
        self.centered_log_derivs.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.centered_log_derivs.ncols()
    }

    /// S_kl = Re ⟨(O_k - ⟨O_k⟩)* (O_l - ⟨O_l⟩)⟩.
    pub fn quantum_geometric_tensor(&self) -> DMatrix<f64> {
        let n = self.n_samples() as f64;
        self.centered_log_derivs
            .ad_mul(&self.centered_log_derivs)
            .map(|s| s.re / n)
    }
}

/// Variational state sampled by Markov chain (or exact) Monte Carlo.
pub struct MCState<A: Ansatz, S: Sampler> {
    ansatz: A,
    sampler: S,
    params: DVector<f64>,
    samples: Option<Samples>,
}

impl<A: Ansatz, S: Sampler> MCState<A, S> {
    /// New state with parameters drawn by the ansatz from a seeded generator.
    pub fn new(ansatz: A, sampler: S, seed: u64) -> Self {
        let params = ansatz.init_params(&mut StdRng::seed_from_u64(seed));
        Self { ansatz, sampler, params, samples: None }
    }

    /// New state at the given parameters, which must match `ansatz.n_params()`.
    pub fn with_params(ansatz: A, sampler: S, params: DVector<f64>) -> Result<Self, VmcError> {
        check_length(ansatz.n_params(), &params)?;
        Ok(Self { ansatz, sampler, params, samples: None })
    }

    pub fn hilbert(&self) -> &SpinHilbert {
        self.sampler.hilbert()
    }

    pub fn ansatz(&self) -> &A {
        &self.ansatz
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &DVector<f64> {
        &self.params
    }

    /// Replace the parameters and invalidate the current samples.
    pub fn set_params(&mut self, params: DVector<f64>) -> Result<(), VmcError> {
        check_length(self.params.len(), &params)?;
        self.params = params;
        self.samples = None;
        Ok(())
    }

    /// Drop the current samples and the sampler's chain state.
    pub fn reset(&mut self) {
        self.samples = None;
        self.sampler.reset();
    }

    /// Draw a fresh batch with the current parameters.
    pub fn sample(&mut self) -> &Samples {
        let batch = self.sampler.draw_batch(&self.ansatz, &self.params);
        self.samples.insert(batch)
    }

    /// Current batch, drawing one if needed.
    pub fn samples(&mut self) -> &Samples {
        if self.samples.is_none() {
            self.sample();
        }
        self.samples.get_or_insert_with(Samples::default)
    }

    fn check_hilbert(&self, op: &LocalOperator) -> Result<(), VmcError> {
        if op.hilbert() != self.hilbert() {
            return Err(OperatorError::HilbertMismatch {
                left: self.hilbert().size(),
                right: op.hilbert().size(),
            }
            .into());
        }
        Ok(())
    }

    /// Local estimator of `op` on every sample, grouped by chain.
    pub fn local_estimators(&mut self, op: &LocalOperator) -> Result<Vec<Vec<Complex64>>, VmcError> {
        self.check_hilbert(op)?;
        self.samples();
        let samples = self.samples.as_ref().map(Samples::chains).unwrap_or(&[]);
        Ok(samples.iter()
            .map(|chain| {
                chain.iter()
                    .map(|config| local_value(&self.ansatz, &self.params, op, config))
                    .collect()
            })
            .collect())
    }

    /// Monte Carlo estimate of ⟨op⟩.
    pub fn expect(&mut self, op: &LocalOperator) -> Result<Stats, VmcError> {
        let local = self.local_estimators(op)?;
        Ok(Stats::from_chains(&local))
    }

    /// Monte Carlo estimate of ⟨op† op⟩ from |O_loc|².
    pub fn expect_squared(&mut self, op: &LocalOperator) -> Result<Stats, VmcError> {
        self.check_hilbert(op)?;
        self.samples();
        let samples = self.samples.as_ref().map(Samples::chains).unwrap_or(&[]);
        let local: Vec<Vec<Complex64>> = samples.iter()
            .map(|chain| {
                chain.iter()
                    .map(|config| {
                        let value = local_value_squared(&self.ansatz, &self.params, op, config);
                        Complex64::new(value, 0.0)
                    })
                    .collect()
            })
            .collect();
        Ok(Stats::from_chains(&local))
    }

    /// Estimate of ⟨op⟩ together with its gradient with respect to the parameters.
    ///
    /// The gradient is G_k = 2 Re ⟨(O_k - ⟨O_k⟩)* (O_loc - ⟨O_loc⟩)⟩.
    pub fn expect_and_grad(
        &mut self,
        op: &LocalOperator,
    ) -> Result<(Stats, DVector<f64>, SampleStatistics), VmcError> {
        let local = self.local_estimators(op)?;
        let stats = Stats::from_chains(&local);

        let samples = self.samples.as_ref().map(Samples::chains).unwrap_or(&[]);
        let log_derivs: Vec<DVector<Complex64>> = samples.iter()
            .flatten()
            .map(|config| self.ansatz.log_derivatives(&self.params, config))
            .collect();
        let energies: Vec<Complex64> = local.into_iter().flatten().collect();

        let n_samples = energies.len();
        let n_params = self.params.len();
        let n = Complex64::new(n_samples as f64, 0.0);

        let mut o_mean = DVector::<Complex64>::zeros(n_params);
        for od in log_derivs.iter() {
            o_mean += od;
        }
        o_mean /= n;
        let e_mean = energies.iter().sum::<Complex64>() / n;

        let centered_log_derivs =
            DMatrix::from_fn(n_samples, n_params, |i, k| log_derivs[i][k] - o_mean[k]);
        let centered_energies = DVector::from_fn(n_samples, |i, _| energies[i] - e_mean);

        let force = centered_log_derivs.ad_mul(&centered_energies) / n;
        let gradient = force.map(|f| 2.0 * f.re);

        Ok((stats, gradient, SampleStatistics { centered_log_derivs, centered_energies }))
    }

    /// Normalized wavefunction over the whole basis, in index order.
    pub fn to_array(&self) -> DVector<Complex64> {
        let basis = self.hilbert().all_states();
        let log_psis = self.ansatz.evaluate(&self.params, &basis);
        let max = log_psis.iter().map(|l| l.re).fold(f64::NEG_INFINITY, f64::max);
        let psi = DVector::from_iterator(
            log_psis.len(),
            log_psis.iter().map(|l| (l - Complex64::new(max, 0.0)).exp()),
        );
        let norm = psi.norm();
        psi / Complex64::new(norm, 0.0)
    }

    /// Exact ⟨ψ|op|ψ⟩ by full summation over the basis.
    pub fn expect_exact(&self, op: &LocalOperator) -> Result<f64, VmcError> {
        self.check_hilbert(op)?;
        let psi = self.to_array();
        let h_psi = op.to_sparse().matvec(&psi);
        Ok(psi.dotc(&h_psi).re)
    }
}

fn check_length(expected: usize, params: &DVector<f64>) -> Result<(), VmcError> {
    if params.len() != expected {
        return Err(VmcError::ParameterLength { expected, got: params.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::graph;
    use crate::models::{Activation, Ffnn};
    use crate::operator::{sigma_z, transverse_field_ising};
    use crate::sampling::{ExactSampler, MetropolisLocal, MetropolisParams};

    fn ising_k4() -> LocalOperator {
        let g = graph::complete(4);
        transverse_field_ising(SpinHilbert::from_graph(&g), &g, 1.0, 0.5).unwrap()
    }

    #[test]
    fn test_to_array_is_normalized() {
        let hi = SpinHilbert::new(4);
        let model = Ffnn::new(4, 1, Activation::LogCosh).with_init_std(0.8);
        let state = MCState::new(model, ExactSampler::new(hi, 1, 10, 0), 3);
        assert_relative_eq!(state.to_array().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sampled_energy_matches_exact_expectation() {
        let ham = ising_k4();
        let hi = *ham.hilbert();
        let model = Ffnn::new(4, 1, Activation::LogCosh).with_init_std(0.6);
        let mut state = MCState::new(model, ExactSampler::new(hi, 8, 16000, 21), 5);
        let exact = state.expect_exact(&ham).unwrap();
        let stats = state.expect(&ham).unwrap();
        assert!((stats.mean - exact).abs() < 5.0 * stats.error_of_mean + 1e-3,
            "sampled {} vs exact {}", stats, exact);
        assert_relative_eq!(stats.mean_imag, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_matches_exact_gradient() {
        // Exact gradient of E(θ) = ⟨ψ|H|ψ⟩/⟨ψ|ψ⟩ by central differences.
        let ham = ising_k4();
        let hi = *ham.hilbert();
        let model = Ffnn::new(4, 1, Activation::LogCosh).with_init_std(0.5);
        let mut state = MCState::new(model.clone(), ExactSampler::new(hi, 8, 40000, 2), 7);
        let (_, gradient, sample_stats) = state.expect_and_grad(&ham).unwrap();
        assert_eq!(sample_stats.n_samples(), 40000);
        assert_eq!(sample_stats.n_params(), model.n_params());

        let h = 1e-5;
        for k in 0..model.n_params() {
            let mut p_fwd = state.params().clone();
            let mut p_bwd = state.params().clone();
            p_fwd[k] += h;
            p_bwd[k] -= h;
            let e_fwd = MCState::with_params(model.clone(), ExactSampler::new(hi, 1, 1, 0), p_fwd)
                .unwrap()
                .expect_exact(&ham).unwrap();
            let e_bwd = MCState::with_params(model.clone(), ExactSampler::new(hi, 1, 1, 0), p_bwd)
                .unwrap()
                .expect_exact(&ham).unwrap();
            let exact = (e_fwd - e_bwd) / (2.0 * h);
            assert!((gradient[k] - exact).abs() < 0.05 + 0.1 * exact.abs(),
                "param {}: sampled {} vs exact {}", k, gradient[k], exact);
        }
    }

    #[test]
    fn test_samples_are_invalidated_by_new_params() {
        let hi = SpinHilbert::new(3);
        let model = Ffnn::new(3, 1, Activation::LogCosh);
        let sampler = MetropolisLocal::new(hi, MetropolisParams { n_chains: 2, n_samples: 8, ..Default::default() }, 0);
        let mut state = MCState::new(model, sampler, 0);
        assert_eq!(state.samples().len(), 8);
        let params = state.params().map(|p| p + 0.1);
        state.set_params(params).unwrap();
        assert!(state.samples.is_none());
        assert_eq!(state.samples().len(), 8);
    }

    #[test]
    fn test_hilbert_mismatch_is_rejected() {
        let model = Ffnn::new(3, 1, Activation::LogCosh);
        let mut state = MCState::new(model, ExactSampler::new(SpinHilbert::new(3), 1, 4, 0), 0);
        let op = sigma_z(SpinHilbert::new(4), 0).unwrap();
        assert_eq!(
            state.expect(&op),
            Err(VmcError::Operator(OperatorError::HilbertMismatch { left: 3, right: 4 }))
        );
    }

    #[test]
    fn test_squared_estimate_matches_exact_square() {
        let ham = ising_k4();
        let hi = *ham.hilbert();
        let ham_squared = ham.checked_mul(&ham).unwrap();
        let model = Ffnn::new(4, 1, Activation::LogCosh).with_init_std(0.6);
        let mut state = MCState::new(model, ExactSampler::new(hi, 8, 16000, 13), 5);
        let exact = state.expect_exact(&ham_squared).unwrap();
        let stats = state.expect_squared(&ham).unwrap();
        assert!((stats.mean - exact).abs() < 5.0 * stats.error_of_mean + 1e-3,
            "sampled {} vs exact {}", stats, exact);

        // ⟨H²⟩ - ⟨H⟩² is non-negative.
        let energy = state.expect_exact(&ham).unwrap();
        assert!(exact - energy * energy >= -1e-10);
    }

    #[test]
    fn test_wrong_parameter_length_is_rejected() {
        let hi = SpinHilbert::new(3);
        let model = Ffnn::new(3, 1, Activation::LogCosh);
        let n = model.n_params();
        let err = MCState::with_params(model.clone(), ExactSampler::new(hi, 1, 4, 0), DVector::zeros(n + 1));
        assert!(matches!(err, Err(VmcError::ParameterLength { expected, got }) if expected == n && got == n + 1));

        let mut state = MCState::with_params(model, ExactSampler::new(hi, 1, 4, 0), DVector::zeros(n)).unwrap();
        assert_eq!(
            state.set_params(DVector::zeros(2)),
            Err(VmcError::ParameterLength { expected: n, got: 2 })
        );
        assert_eq!(state.params(), &DVector::<f64>::zeros(n));
    }

    #[test]
    fn test_reset_clears_sampler_state() {
        let hi = SpinHilbert::new(3);
        let model = Ffnn::new(3, 1, Activation::LogCosh);
        let sampler = MetropolisLocal::new(hi, MetropolisParams { n_chains: 2, n_samples: 8, ..Default::default() }, 0);
        let mut state = MCState::new(model, sampler, 0);
        state.sample();
        assert!(state.sampler().acceptance().is_some());
        state.reset();
        assert!(state.samples.is_none());
        assert!(state.sampler().acceptance().is_none());
    }
}
