//! Direct sampling from |ψ|² by enumerating the whole Hilbert space.
//!
//! Samples are independent, so chains carry no autocorrelation. Only usable
//! for small systems.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::hilbert::{Configuration, SpinHilbert};
use crate::models::Ansatz;
use super::traits::{Sampler, Samples};

pub struct ExactSampler {
    hilbert: SpinHilbert,
    n_chains: usize,
    n_samples: usize,
    rng: StdRng,
    basis: Vec<Configuration>,
}

impl ExactSampler {
    pub fn new(hilbert: SpinHilbert, n_chains: usize, n_samples: usize, seed: u64) -> Self {
        Self {
            hilbert,
            n_chains: n_chains.max(1),
            n_samples,
            rng: StdRng::seed_from_u64(seed),
            basis: hilbert.all_states(),
        }
    }

    /// Normalized Born probabilities |ψ(σ)|² over the basis, in index order.
    pub fn probabilities<A: Ansatz>(&self, ansatz: &A, params: &DVector<f64>) -> Vec<f64> {
        let log_psis = ansatz.evaluate(params, &self.basis);
        let max = log_psis.iter().map(|l| l.re).fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = log_psis.iter().map(|l| (2.0 * (l.re - max)).exp()).collect();
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }
}

impl Sampler for ExactSampler {
    fn hilbert(&self) -> &SpinHilbert {
        &self.hilbert
    }

    fn draw_batch<A: Ansatz>(&mut self, ansatz: &A, params: &DVector<f64>) -> Samples {
        let probabilities = self.probabilities(ansatz, params);
        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut acc = 0.0;
        for p in probabilities {
            acc += p;
            cumulative.push(acc);
        }

        let chain_length = self.n_samples.div_ceil(self.n_chains).max(1);
        let last = self.basis.len() - 1;
        let chains = (0..self.n_chains)
            .map(|_| {
                (0..chain_length)
                    .map(|_| {
                        let r = acc * self.rng.gen::<f64>();
                        let index = cumulative.partition_point(|&c| c <= r).min(last);
                        self.basis[index].clone()
                    })
                    .collect()
            })
            .collect();
        Samples::new(chains)
    }
}
