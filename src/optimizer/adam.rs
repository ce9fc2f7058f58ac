//! Adam optimizer with bias-corrected moment estimates.

use nalgebra::DVector;
use super::traits::Optimizer;

#[derive(Clone, Debug)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    m: DVector<f64>,
    v: DVector<f64>,
    t: i32,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            m: DVector::zeros(0),
            v: DVector::zeros(0),
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &DVector<f64>, gradient: &DVector<f64>) -> DVector<f64> {
        if self.m.len() != params.len() {
            self.m = DVector::zeros(params.len());
            self.v = DVector::zeros(params.len());
            self.t = 0;
        }
        self.t += 1;
        self.m = &self.m * self.beta1 + gradient * (1.0 - self.beta1);
        self.v = &self.v * self.beta2 + gradient.map(|g| g * g) * (1.0 - self.beta2);
        let m_scale = 1.0 / (1.0 - self.beta1.powi(self.t));
        let v_scale = 1.0 / (1.0 - self.beta2.powi(self.t));
        let (eps, lr) = (self.epsilon, self.learning_rate);
        params - self.m.zip_map(&self.v, |m, v| lr * m * m_scale / ((v * v_scale).sqrt() + eps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_step_has_learning_rate_size() {
        let mut opt = Adam::new(0.01);
        let x = DVector::from_vec(vec![1.0, 1.0]);
        let grad = DVector::from_vec(vec![3.0, -0.5]);
        let y = opt.step(&x, &grad);
        assert_relative_eq!(y[0], 0.99, epsilon = 1e-6);
        assert_relative_eq!(y[1], 1.01, epsilon = 1e-6);
    }

    #[test]
    fn test_descends_quadratic() {
        let mut opt = Adam::new(0.05);
        let mut x = DVector::from_vec(vec![1.0, -2.0, 0.5]);
        for _ in 0..2000 {
            let grad = &x * 2.0;
            x = opt.step(&x, &grad);
        }
        assert!(x.norm() < 1e-2);
    }
}
