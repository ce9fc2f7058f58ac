//! Spin VMC - Variational Monte Carlo for quantum spin Hamiltonians in Rust
//!
//! This crate finds approximate ground states of the transverse-field Ising
//! model on arbitrary graphs with neural-network ansätze, Metropolis sampling
//! and stochastic reconfiguration, and validates them against exact
//! diagonalization.

pub mod error;
pub mod graph;
pub mod hilbert;
pub mod operator;
pub mod exact;
pub mod models;
pub mod sampling;
pub mod vqs;
pub mod optimizer;
pub mod driver;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{EigenError, GraphError, IoError, OperatorError, VmcError};
pub use graph::Graph;
pub use hilbert::{Configuration, SpinHilbert};
pub use operator::{transverse_field_ising, LocalOperator};
pub use exact::{full_ed, lanczos_ed, smallest_eigenvalue, LanczosParams};
pub use models::{Activation, Ansatz, Ffnn, Model, Rbm};
pub use sampling::{AnySampler, ExactSampler, MetropolisLocal, MetropolisParams, Sampler, Stats};
pub use vqs::MCState;
pub use optimizer::{Adam, Optimizer, Preconditioner, Sgd, StochasticReconfiguration};
pub use driver::{RuntimeLog, TrainingRecord, Vmc};
pub use io::{read_run_config, RunConfig};

#[cfg(test)]
mod tests;
