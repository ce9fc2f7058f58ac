//! Graph module - sites and bonds on which spin Hamiltonians are defined.

mod undirected;
mod generators;

pub use undirected::Graph;
pub use generators::{chain, complete, hypercube, random};
