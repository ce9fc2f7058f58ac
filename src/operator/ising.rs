//! Transverse-field Ising model on an arbitrary graph.

use num_complex::Complex64;
use crate::error::OperatorError;
use crate::graph::Graph;
use crate::hilbert::SpinHilbert;
use super::local::LocalOperator;
use super::pauli::{sigma_x, sigma_z};

/// `H = -h Σᵢ σˣᵢ + J Σ₍ᵢⱼ₎ σᶻᵢ σᶻⱼ`, with the coupling sum over the edges of `graph`.
pub fn transverse_field_ising(
    hilbert: SpinHilbert,
    graph: &Graph,
    field: f64,
    coupling: f64,
) -> Result<LocalOperator, OperatorError> {
    let mut ham = LocalOperator::new(hilbert);
    for site in graph.nodes() {
        ham.add_operator(&sigma_x(hilbert, site)?.scale(Complex64::new(-field, 0.0)))?;
    }
    for &(i, j) in graph.edges() {
        let zz = sigma_z(hilbert, i)?.checked_mul(&sigma_z(hilbert, j)?)?;
        ham.add_operator(&(coupling * zz))?;
    }
    Ok(ham)
}
