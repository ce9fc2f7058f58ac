//! Sampling module - Monte Carlo sampling of spin configurations and estimator statistics.

mod traits;
mod metropolis;
mod exact;
mod stats;

pub use traits::{Sampler, Samples};
pub use metropolis::{MetropolisLocal, MetropolisParams};
pub use exact::ExactSampler;
pub use stats::Stats;

use nalgebra::DVector;
use crate::hilbert::SpinHilbert;
use crate::models::Ansatz;

/// Sampler chosen at runtime, e.g. from a run configuration.
pub enum AnySampler {
    Metropolis(MetropolisLocal),
    Exact(ExactSampler),
}

impl Sampler for AnySampler {
    fn hilbert(&self) -> &SpinHilbert {
        match self {
            AnySampler::Metropolis(s) => s.hilbert(),
            AnySampler::Exact(s) => s.hilbert(),
        }
    }

    fn draw_batch<A: Ansatz>(&mut self, ansatz: &A, params: &DVector<f64>) -> Samples {
        match self {
            AnySampler::Metropolis(s) => s.draw_batch(ansatz, params),
            AnySampler::Exact(s) => s.draw_batch(ansatz, params),
        }
    }

    fn reset(&mut self) {
        match self {
            AnySampler::Metropolis(s) => s.reset(),
            AnySampler::Exact(s) => s.reset(),
        }
    }

    fn acceptance(&self) -> Option<f64> {
        match self {
            AnySampler::Metropolis(s) => s.acceptance(),
            AnySampler::Exact(s) => s.acceptance(),
        }
    }
}
