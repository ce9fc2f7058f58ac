//! Spin-1/2 Hilbert space on a set of sites.
//!
//! Each site carries a local state in `[-1, +1]`. A configuration is a
//! vector of these values, one per site. Basis states are numbered with
//! site 0 as the most significant binary digit and `-1 → 0`, `+1 → 1`.

use nalgebra::DVector;
use rand::Rng;
use crate::graph::Graph;

/// A spin configuration, one ±1 entry per site.
pub type Configuration = DVector<f64>;

/// Local states of a spin-1/2 site, in basis order.
const LOCAL_STATES: [f64; 2] = [-1.0, 1.0];

/// Largest number of sites whose basis may be enumerated (exact sampling, dense vectors).
pub const MAX_ENUMERABLE_SITES: usize = 20;

/// Spin-1/2 Hilbert space `(C²)^⊗n_sites`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinHilbert {
    n_sites: usize,
}

impl SpinHilbert {
    pub fn new(n_sites: usize) -> Self {
        Self { n_sites }
    }

    /// One spin per node of the graph.
    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(graph.n_nodes())
    }

    pub fn size(&self) -> usize {
        self.n_sites
    }

    pub fn local_size(&self) -> usize {
        LOCAL_STATES.len()
    }

    pub fn local_states(&self) -> &'static [f64] {
        &LOCAL_STATES
    }

    /// Number of basis states, `2^n_sites`.
    ///
    /// # Panics
    /// If `2^n_sites` does not fit in a `usize`.
    pub fn n_states(&self) -> usize {
        u32::try_from(self.n_sites)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .unwrap_or_else(|| {
                panic!("Hilbert space of {} sites is too large to index", self.n_sites)
            })
    }

    /// Whether the basis is small enough to enumerate.
    pub fn is_enumerable(&self) -> bool {
        self.n_sites <= MAX_ENUMERABLE_SITES
    }

    /// Index of a local state value in `local_states`.
    pub fn local_index(value: f64) -> usize {
        if value > 0.0 { 1 } else { 0 }
    }

    pub fn state_to_index(&self, config: &Configuration) -> usize {
        config.iter()
            .fold(0, |acc, &s| (acc << 1) | Self::local_index(s))
    }

    pub fn index_to_state(&self, index: usize) -> Configuration {
        DVector::from_fn(self.n_sites, |i, _| {
            LOCAL_STATES[(index >> (self.n_sites - 1 - i)) & 1]
        })
    }

    /// Every basis configuration, in index order.
    pub fn all_states(&self) -> Vec<Configuration> {
        (0..self.n_states()).map(|i| self.index_to_state(i)).collect()
    }

    /// Uniformly random configuration.
    pub fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Configuration {
        DVector::from_fn(self.n_sites, |_, _| LOCAL_STATES[rng.gen_range(0..LOCAL_STATES.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_index_round_trip() {
        let hi = SpinHilbert::new(5);
        assert_eq!(hi.n_states(), 32);
        for (i, state) in hi.all_states().iter().enumerate() {
            assert_eq!(hi.state_to_index(state), i);
        }
    }

    #[test]
    fn test_site_zero_is_most_significant() {
        let hi = SpinHilbert::new(3);
        let state = hi.index_to_state(4);
        assert_eq!(state.as_slice(), &[1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_random_state_values() {
        let hi = SpinHilbert::new(8);
        let mut rng = StdRng::seed_from_u64(1);
        let state = hi.random_state(&mut rng);
        assert_eq!(state.len(), 8);
        assert!(state.iter().all(|&s| s == 1.0 || s == -1.0));
    }

    #[test]
    fn test_enumerable_bound() {
        assert!(SpinHilbert::new(MAX_ENUMERABLE_SITES).is_enumerable());
        assert!(!SpinHilbert::new(MAX_ENUMERABLE_SITES + 1).is_enumerable());
        assert_eq!(SpinHilbert::new(63).n_states(), 1usize << 63);
    }

    #[test]
    #[should_panic(expected = "too large to index")]
    fn test_n_states_overflow_panics() {
        SpinHilbert::new(64).n_states();
    }
}
