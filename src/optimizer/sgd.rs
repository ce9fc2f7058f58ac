//! Plain stochastic gradient descent.

use nalgebra::DVector;
use super::traits::Optimizer;

#[derive(Clone, Debug)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &DVector<f64>, gradient: &DVector<f64>) -> DVector<f64> {
        params - gradient * self.learning_rate
    }
}
