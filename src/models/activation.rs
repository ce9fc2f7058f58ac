//! Elementwise nonlinearities for the hidden layer.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    #[default]
    LogCosh,
    Tanh,
}

/// ln cosh(x), stable for large |x|.
pub fn log_cosh(x: f64) -> f64 {
    let a = x.abs();
    a + (-2.0 * a).exp().ln_1p() - std::f64::consts::LN_2
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::LogCosh => log_cosh(x),
            Activation::Tanh => x.tanh(),
        }
    }

    /// Derivative with respect to the input. ReLU uses 0 at the kink.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::LogCosh => x.tanh(),
            Activation::Tanh => 1.0 - x.tanh().powi(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_cosh_is_stable() {
        assert_relative_eq!(log_cosh(0.3), 0.3f64.cosh().ln(), epsilon = 1e-14);
        assert_relative_eq!(log_cosh(-800.0), 800.0 - std::f64::consts::LN_2, epsilon = 1e-9);
        assert!(log_cosh(1e5).is_finite());
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-6;
        for act in [Activation::LogCosh, Activation::Tanh, Activation::Relu] {
            for &x in &[-1.3, 0.4, 2.1] {
                let numerical = (act.apply(x + h) - act.apply(x - h)) / (2.0 * h);
                assert_relative_eq!(act.derivative(x), numerical, epsilon = 1e-6);
            }
        }
    }
}
