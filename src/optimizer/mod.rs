//! Optimizer module - parameter updates and gradient preconditioning.

mod traits;
mod sgd;
mod adam;
mod sr;

pub use traits::{IdentityPreconditioner, Optimizer, Preconditioner};
pub use sgd::Sgd;
pub use adam::Adam;
pub use sr::StochasticReconfiguration;

use nalgebra::DVector;
use crate::vqs::SampleStatistics;

/// Optimizer chosen at runtime.
#[derive(Clone, Debug)]
pub enum AnyOptimizer {
    Sgd(Sgd),
    Adam(Adam),
}

impl Optimizer for AnyOptimizer {
    fn step(&mut self, params: &DVector<f64>, gradient: &DVector<f64>) -> DVector<f64> {
        match self {
            AnyOptimizer::Sgd(o) => o.step(params, gradient),
            AnyOptimizer::Adam(o) => o.step(params, gradient),
        }
    }
}

/// Preconditioner chosen at runtime.
#[derive(Clone, Debug)]
pub enum AnyPreconditioner {
    Identity(IdentityPreconditioner),
    Sr(StochasticReconfiguration),
}

impl Preconditioner for AnyPreconditioner {
    fn apply(&self, gradient: &DVector<f64>, stats: &SampleStatistics) -> DVector<f64> {
        match self {
            AnyPreconditioner::Identity(p) => p.apply(gradient, stats),
            AnyPreconditioner::Sr(p) => p.apply(gradient, stats),
        }
    }
}
