//! Metropolis-Hastings sampling with single-spin-flip proposals.
//!
//! Each chain keeps its configuration between batches. Moves flip one
//! uniformly chosen site and are accepted with probability
//! min(1, |ψ(σ')/ψ(σ)|^machine_pow).

use log::debug;
use nalgebra::DVector;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::hilbert::{Configuration, SpinHilbert};
use crate::models::Ansatz;
use super::traits::{Sampler, Samples};

/// Parameters for Metropolis sampling.
#[derive(Copy, Clone, Debug)]
pub struct MetropolisParams {
    /// Number of independent chains
    pub n_chains: usize,
    /// Requested samples per batch, rounded up to a multiple of `n_chains`
    pub n_samples: usize,
    /// Sweeps thrown away at the start of every batch
    pub n_discard_per_chain: usize,
    /// Proposals per sweep, defaults to the number of sites
    pub sweep_size: Option<usize>,
    /// Exponent of |ψ| in the sampled distribution
    pub machine_pow: f64,
}

impl Default for MetropolisParams {
    fn default() -> Self {
        Self {
            n_chains: 16,
            n_samples: 1008,
            n_discard_per_chain: 5,
            sweep_size: None,
            machine_pow: 2.0,
        }
    }
}

impl MetropolisParams {
    /// Samples collected from each chain per batch.
    pub fn chain_length(&self) -> usize {
        self.n_samples.div_ceil(self.n_chains.max(1)).max(1)
    }
}

/// Local-flip Metropolis sampler.
pub struct MetropolisLocal {
    hilbert: SpinHilbert,
    params: MetropolisParams,
    rng: StdRng,
    states: Vec<Configuration>,
    log_psis: Vec<Complex64>,
    accepted: usize,
    proposed: usize,
}

impl MetropolisLocal {
    pub fn new(hilbert: SpinHilbert, params: MetropolisParams, seed: u64) -> Self {
        Self {
            hilbert,
            params,
            rng: StdRng::seed_from_u64(seed),
            states: Vec::new(),
            log_psis: Vec::new(),
            accepted: 0,
            proposed: 0,
        }
    }

    pub fn params(&self) -> &MetropolisParams {
        &self.params
    }

    fn sweep_size(&self) -> usize {
        self.params.sweep_size.unwrap_or(self.hilbert.size()).max(1)
    }

    /// Perform one sweep on every chain.
    fn sweep<A: Ansatz>(&mut self, ansatz: &A, params: &DVector<f64>) {
        let n_sites = self.hilbert.size();
        if n_sites == 0 {
            return;
        }
        for _ in 0..self.sweep_size() {
            for chain in 0..self.states.len() {
                if self.metropolis_step(ansatz, params, chain, n_sites) {
                    self.accepted += 1;
                }
                self.proposed += 1;
            }
        }
    }

    /// Propose a single flip on one chain.
    fn metropolis_step<A: Ansatz>(
        &mut self,
        ansatz: &A,
        params: &DVector<f64>,
        chain: usize,
        n_sites: usize,
    ) -> bool {
        let site = self.rng.gen_range(0..n_sites);
        let state = &mut self.states[chain];
        state[site] = -state[site];
        let new_log_psi = ansatz.log_psi(params, state);
        let acceptance_ratio =
            (self.params.machine_pow * (new_log_psi - self.log_psis[chain]).re).exp();

        if self.rng.gen::<f64>() < acceptance_ratio {
            self.log_psis[chain] = new_log_psi;
            true
        } else {
            let state = &mut self.states[chain];
            state[site] = -state[site];
            false
        }
    }
}

impl Sampler for MetropolisLocal {
    fn hilbert(&self) -> &SpinHilbert {
        &self.hilbert
    }

    fn draw_batch<A: Ansatz>(&mut self, ansatz: &A, params: &DVector<f64>) -> Samples {
        let n_chains = self.params.n_chains.max(1);
        if self.states.len() != n_chains {
            let hilbert = self.hilbert;
            self.states = (0..n_chains).map(|_| hilbert.random_state(&mut self.rng)).collect();
        }
        // Parameters may have changed since the last batch.
        self.log_psis = ansatz.evaluate(params, &self.states);
        self.accepted = 0;
        self.proposed = 0;

        for _ in 0..self.params.n_discard_per_chain {
            self.sweep(ansatz, params);
        }

        let chain_length = self.params.chain_length();
        let mut chains: Vec<Vec<Configuration>> = vec![Vec::with_capacity(chain_length); n_chains];
        for _ in 0..chain_length {
            self.sweep(ansatz, params);
            for (chain, state) in chains.iter_mut().zip(self.states.iter()) {
                chain.push(state.clone());
            }
        }

        debug!("metropolis batch: {} x {} samples, acceptance {:.3}",
            n_chains, chain_length, self.acceptance().unwrap_or(f64::NAN));
        Samples::new(chains)
    }

    fn reset(&mut self) {
        self.states.clear();
        self.log_psis.clear();
        self.accepted = 0;
        self.proposed = 0;
    }

    fn acceptance(&self) -> Option<f64> {
        if self.proposed == 0 {
            None
        } else {
            Some(self.accepted as f64 / self.proposed as f64)
        }
    }
}
