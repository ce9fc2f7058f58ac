//! Operator module - Hamiltonians as sums of local terms.

mod local;
mod pauli;
mod ising;
mod sparse;

pub use local::LocalOperator;
pub use pauli::{identity, sigma_x, sigma_y, sigma_z};
pub use ising::transverse_field_ising;
pub use sparse::CsrMatrix;
