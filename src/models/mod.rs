//! Models module - variational ansätze mapping spin configurations to log-amplitudes.

mod traits;
mod activation;
mod ffnn;
mod rbm;

pub use traits::Ansatz;
pub use activation::Activation;
pub use ffnn::Ffnn;
pub use rbm::Rbm;

use nalgebra::DVector;
use num_complex::Complex64;
use rand::Rng;
use crate::hilbert::Configuration;

/// Ansatz chosen at runtime, e.g. from a run configuration.
#[derive(Clone, Debug)]
pub enum Model {
    Ffnn(Ffnn),
    Rbm(Rbm),
}

impl Ansatz for Model {
    fn n_params(&self) -> usize {
        match self {
            Model::Ffnn(m) => m.n_params(),
            Model::Rbm(m) => m.n_params(),
        }
    }

    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        match self {
            Model::Ffnn(m) => m.init_params(rng),
            Model::Rbm(m) => m.init_params(rng),
        }
    }

    fn log_psi(&self, params: &DVector<f64>, config: &Configuration) -> Complex64 {
        match self {
            Model::Ffnn(m) => m.log_psi(params, config),
            Model::Rbm(m) => m.log_psi(params, config),
        }
    }

    fn log_derivatives(&self, params: &DVector<f64>, config: &Configuration) -> DVector<Complex64> {
        match self {
            Model::Ffnn(m) => m.log_derivatives(params, config),
            Model::Rbm(m) => m.log_derivatives(params, config),
        }
    }
}
