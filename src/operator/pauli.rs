//! Single-site Pauli operators.
//!
//! Matrices are written in the local basis `[-1, +1]`, so `σᶻ` has the
//! spin value as its eigenvalue.

use nalgebra::DMatrix;
use num_complex::Complex64;
use crate::error::OperatorError;
use crate::hilbert::SpinHilbert;
use super::local::LocalOperator;

fn single_site(
    hilbert: SpinHilbert,
    site: usize,
    entries: [Complex64; 4],
) -> Result<LocalOperator, OperatorError> {
    LocalOperator::from_term(hilbert, DMatrix::from_row_slice(2, 2, &entries), &[site])
}

const fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

const fn im(x: f64) -> Complex64 {
    Complex64::new(0.0, x)
}

pub fn sigma_x(hilbert: SpinHilbert, site: usize) -> Result<LocalOperator, OperatorError> {
    single_site(hilbert, site, [re(0.0), re(1.0), re(1.0), re(0.0)])
}

pub fn sigma_y(hilbert: SpinHilbert, site: usize) -> Result<LocalOperator, OperatorError> {
    single_site(hilbert, site, [re(0.0), im(1.0), im(-1.0), re(0.0)])
}

pub fn sigma_z(hilbert: SpinHilbert, site: usize) -> Result<LocalOperator, OperatorError> {
    single_site(hilbert, site, [re(-1.0), re(0.0), re(0.0), re(1.0)])
}

/// Identity on the whole space, stored as a constant term.
pub fn identity(hilbert: SpinHilbert) -> LocalOperator {
    LocalOperator::from_term(hilbert, DMatrix::from_element(1, 1, re(1.0)), &[])
        .unwrap_or_else(|_| unreachable!("constant term has no sites to validate"))
}
