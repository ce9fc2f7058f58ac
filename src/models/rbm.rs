//! Restricted Boltzmann machine with the hidden units traced out.
//!
//! ln ψ(σ) = Σₖ aₖ σₖ + Σⱼ ln cosh(Σₖ Wⱼₖ σₖ + bⱼ)
//!
//! Parameters are laid out as `[a | b | W (row-major, n_hidden × n_visible)]`.

use nalgebra::DVector;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use crate::hilbert::Configuration;
use super::activation::log_cosh;
use super::traits::Ansatz;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rbm {
    pub n_visible: usize,
    pub n_hidden: usize,
    pub init_std: f64,
}

impl Rbm {
    /// Machine with hidden-unit density `alpha`.
    pub fn new(n_visible: usize, alpha: usize) -> Self {
        Self {
            n_visible,
            n_hidden: alpha * n_visible,
            init_std: 0.01,
        }
    }

    pub fn with_init_std(mut self, std: f64) -> Self {
        self.init_std = std;
        self
    }

    fn weights_offset(&self) -> usize {
        self.n_visible + self.n_hidden
    }

    fn thetas(&self, params: &DVector<f64>, config: &Configuration) -> DVector<f64> {
        let nv = self.n_visible;
        let w0 = self.weights_offset();
        DVector::from_fn(self.n_hidden, |j, _| {
            let row = &params.as_slice()[w0 + j * nv..w0 + (j + 1) * nv];
            params[nv + j] + row.iter().zip(config.iter()).map(|(w, s)| w * s).sum::<f64>()
        })
    }
}

impl Ansatz for Rbm {
    fn n_params(&self) -> usize {
        self.weights_offset() + self.n_hidden * self.n_visible
    }

    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        DVector::from_fn(self.n_params(), |_, _| {
            self.init_std * rng.sample::<f64, _>(StandardNormal)
        })
    }

    fn log_psi(&self, params: &DVector<f64>, config: &Configuration) -> Complex64 {
        let visible: f64 = config.iter()
            .enumerate()
            .map(|(k, s)| params[k] * s)
            .sum();
        let hidden: f64 = self.thetas(params, config).iter().map(|&t| log_cosh(t)).sum();
        Complex64::new(visible + hidden, 0.0)
    }

    fn log_derivatives(&self, params: &DVector<f64>, config: &Configuration) -> DVector<Complex64> {
        let nv = self.n_visible;
        let w0 = self.weights_offset();
        let mut grad = DVector::zeros(self.n_params());
        for k in 0..nv {
            grad[k] = Complex64::new(config[k], 0.0);
        }
        for (j, theta) in self.thetas(params, config).iter().enumerate() {
            let t = theta.tanh();
            grad[nv + j] = Complex64::new(t, 0.0);
            for k in 0..nv {
                grad[w0 + j * nv + k] = Complex64::new(t * config[k], 0.0);
            }
        }
        grad
    }
}
