//! Traits for parameter updates.

use nalgebra::DVector;
use crate::vqs::SampleStatistics;

/// Turns a (preconditioned) gradient into new parameters.
pub trait Optimizer {
    fn step(&mut self, params: &DVector<f64>, gradient: &DVector<f64>) -> DVector<f64>;
}

/// Transforms the raw energy gradient using sample statistics.
pub trait Preconditioner {
    fn apply(&self, gradient: &DVector<f64>, stats: &SampleStatistics) -> DVector<f64>;
}

/// Leaves the gradient untouched: plain gradient descent.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityPreconditioner;

impl Preconditioner for IdentityPreconditioner {
    fn apply(&self, gradient: &DVector<f64>, _stats: &SampleStatistics) -> DVector<f64> {
        gradient.clone()
    }
}
