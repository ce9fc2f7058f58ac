//! Feed-forward network with one dense hidden layer.
//!
//! ln ψ(σ) = Σⱼ f(Σₖ Wⱼₖ σₖ + bⱼ)
//!
//! Parameters are laid out as `[W (row-major, n_hidden × n_visible) | b]`.

use nalgebra::DVector;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use crate::hilbert::Configuration;
use super::activation::Activation;
use super::traits::Ansatz;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ffnn {
    pub n_visible: usize,
    pub n_hidden: usize,
    pub activation: Activation,
    /// Standard deviation of the initial weights
    pub init_std: f64,
}

impl Ffnn {
    /// Network with `alpha · n_visible` hidden units.
    pub fn new(n_visible: usize, alpha: usize, activation: Activation) -> Self {
        Self {
            n_visible,
            n_hidden: alpha * n_visible,
            activation,
            init_std: 0.1,
        }
    }

    pub fn with_init_std(mut self, std: f64) -> Self {
        self.init_std = std;
        self
    }

    fn n_weights(&self) -> usize {
        self.n_hidden * self.n_visible
    }

    /// Hidden-layer inputs W σ + b.
    fn pre_activations(&self, params: &DVector<f64>, config: &Configuration) -> DVector<f64> {
        let nv = self.n_visible;
        let bias_offset = self.n_weights();
        DVector::from_fn(self.n_hidden, |j, _| {
            let row = &params.as_slice()[j * nv..(j + 1) * nv];
            row.iter().zip(config.iter()).map(|(w, s)| w * s).sum::<f64>()
                + params[bias_offset + j]
        })
    }
}

impl Ansatz for Ffnn {
    fn n_params(&self) -> usize {
        self.n_weights() + self.n_hidden
    }

    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        let n_weights = self.n_weights();
        DVector::from_fn(self.n_params(), |k, _| {
            if k < n_weights {
                self.init_std * rng.sample::<f64, _>(StandardNormal)
            } else {
                0.0
            }
        })
    }

    fn log_psi(&self, params: &DVector<f64>, config: &Configuration) -> Complex64 {
        let value = self.pre_activations(params, config)
            .iter()
            .map(|&y| self.activation.apply(y))
            .sum::<f64>();
        Complex64::new(value, 0.0)
    }

    fn log_derivatives(&self, params: &DVector<f64>, config: &Configuration) -> DVector<Complex64> {
        let nv = self.n_visible;
        let bias_offset = self.n_weights();
        let slopes: Vec<f64> = self.pre_activations(params, config)
            .iter()
            .map(|&y| self.activation.derivative(y))
            .collect();
        let mut grad = DVector::zeros(self.n_params());
        for (j, &slope) in slopes.iter().enumerate() {
            for k in 0..nv {
                grad[j * nv + k] = Complex64::new(slope * config[k], 0.0);
            }
            grad[bias_offset + j] = Complex64::new(slope, 0.0);
        }
        grad
    }
}
