//! Variational states - parameters, sampler and the estimators built on them.

mod kernels;
mod mc_state;

pub use kernels::{local_value, local_value_squared};
pub use mc_state::{MCState, SampleStatistics};
