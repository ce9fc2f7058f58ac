//! Traits for Monte Carlo sampling of spin configurations.

use nalgebra::DVector;
use crate::hilbert::{Configuration, SpinHilbert};
use crate::models::Ansatz;

/// A batch of configurations, organised as independent chains of equal length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Samples {
    chains: Vec<Vec<Configuration>>,
}

impl Samples {
    pub fn new(chains: Vec<Vec<Configuration>>) -> Self {
        debug_assert!(chains.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { chains }
    }

    pub fn n_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn chain_length(&self) -> usize {
        self.chains.first().map_or(0, Vec::len)
    }

    /// Total number of configurations.
    pub fn len(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chains(&self) -> &[Vec<Configuration>] {
        &self.chains
    }

    /// All configurations, chain by chain.
    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.chains.iter().flatten()
    }
}

/// Produces configuration batches distributed as |ψ_θ(σ)|².
pub trait Sampler {
    /// Hilbert space the samples live in.
    fn hilbert(&self) -> &SpinHilbert;

    /// Draw a new batch for the ansatz at parameters `params`.
    fn draw_batch<A: Ansatz>(&mut self, ansatz: &A, params: &DVector<f64>) -> Samples;

    /// Forget any persistent chain state.
    fn reset(&mut self) {}

    /// Acceptance rate of the last batch, for samplers that reject moves.
    fn acceptance(&self) -> Option<f64> {
        None
    }
}
