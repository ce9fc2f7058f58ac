//! Local operators: weighted sums of small dense matrices acting on tuples of sites.
//!
//! A term with matrix `M` on sites `(s₀, s₁, …)` acts as `M` on those sites and
//! as the identity everywhere else. Within a term, `s₀` is the most significant
//! digit of the local basis index and local states are ordered as in
//! [`SpinHilbert::local_states`]. Terms are stored with their sites sorted, so
//! two terms on the same set of sites are merged into one matrix.

use std::collections::BTreeMap;
use nalgebra::DMatrix;
use num_complex::Complex64;
use crate::error::OperatorError;
use crate::hilbert::{Configuration, SpinHilbert};
use super::sparse::CsrMatrix;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Sum of local terms on a spin Hilbert space.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalOperator {
    hilbert: SpinHilbert,
    terms: BTreeMap<Vec<usize>, DMatrix<Complex64>>,
}

impl LocalOperator {
    /// The zero operator.
    pub fn new(hilbert: SpinHilbert) -> Self {
        Self { hilbert, terms: BTreeMap::new() }
    }

    /// Operator consisting of a single term.
    pub fn from_term(
        hilbert: SpinHilbert,
        matrix: DMatrix<Complex64>,
        sites: &[usize],
    ) -> Result<Self, OperatorError> {
        let mut op = Self::new(hilbert);
        op.add_term(matrix, sites)?;
        Ok(op)
    }

    pub fn hilbert(&self) -> &SpinHilbert {
        &self.hilbert
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Terms as `(sorted sites, matrix)` pairs.
    pub fn terms(&self) -> impl Iterator<Item = (&[usize], &DMatrix<Complex64>)> {
        self.terms.iter().map(|(sites, m)| (sites.as_slice(), m))
    }

    /// Accumulate `matrix` acting on `sites` into this operator.
    pub fn add_term(
        &mut self,
        matrix: DMatrix<Complex64>,
        sites: &[usize],
    ) -> Result<(), OperatorError> {
        let n_sites = self.hilbert.size();
        for (k, &site) in sites.iter().enumerate() {
            if site >= n_sites {
                return Err(OperatorError::SiteOutOfBounds { site, n_sites });
            }
            if sites[..k].contains(&site) {
                return Err(OperatorError::DuplicateSite(site));
            }
        }
        let expected = self.hilbert.local_size().pow(sites.len() as u32);
        if matrix.nrows() != expected || matrix.ncols() != expected {
            return Err(OperatorError::ShapeMismatch {
                n_sites: sites.len(),
                expected,
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }

        let mut sorted = sites.to_vec();
        sorted.sort_unstable();
        let matrix = if sorted.as_slice() == sites {
            matrix
        } else {
            embed(&matrix, sites, &sorted)
        };
        self.accumulate(sorted, matrix);
        Ok(())
    }

    fn accumulate(&mut self, sites: Vec<usize>, matrix: DMatrix<Complex64>) {
        match self.terms.get_mut(&sites) {
            Some(existing) => *existing += matrix,
            None => {
                self.terms.insert(sites, matrix);
            }
        }
    }

    fn check_hilbert(&self, other: &LocalOperator) -> Result<(), OperatorError> {
        if self.hilbert != other.hilbert {
            return Err(OperatorError::HilbertMismatch {
                left: self.hilbert.size(),
                right: other.hilbert.size(),
            });
        }
        Ok(())
    }

    /// `self += other`.
    pub fn add_operator(&mut self, other: &LocalOperator) -> Result<(), OperatorError> {
        self.check_hilbert(other)?;
        for (sites, m) in other.terms.iter() {
            self.accumulate(sites.clone(), m.clone());
        }
        Ok(())
    }

    /// `self + other`.
    pub fn checked_add(&self, other: &LocalOperator) -> Result<LocalOperator, OperatorError> {
        let mut out = self.clone();
        out.add_operator(other)?;
        Ok(out)
    }

    /// `self - other`.
    pub fn checked_sub(&self, other: &LocalOperator) -> Result<LocalOperator, OperatorError> {
        self.checked_add(&other.scale(Complex64::new(-1.0, 0.0)))
    }

    /// Operator product `self · other`.
    ///
    /// Each pair of terms is embedded into the union of their sites and multiplied.
    pub fn checked_mul(&self, other: &LocalOperator) -> Result<LocalOperator, OperatorError> {
        self.check_hilbert(other)?;
        let mut out = LocalOperator::new(self.hilbert);
        for (sites_a, a) in self.terms.iter() {
            for (sites_b, b) in other.terms.iter() {
                let mut union = sites_a.clone();
                union.extend(sites_b.iter().filter(|s| !sites_a.contains(s)));
                union.sort_unstable();
                let product = embed(a, sites_a, &union) * embed(b, sites_b, &union);
                out.accumulate(union, product);
            }
        }
        Ok(out)
    }

    /// Multiply every term by `factor`.
    pub fn scale(&self, factor: Complex64) -> LocalOperator {
        LocalOperator {
            hilbert: self.hilbert,
            terms: self.terms.iter()
                .map(|(sites, m)| (sites.clone(), m * factor))
                .collect(),
        }
    }

    /// Configurations connected to `config` and their matrix elements `⟨config|O|config'⟩`.
    ///
    /// The first entry is always `config` itself with the summed diagonal element.
    pub fn get_conn(&self, config: &Configuration) -> Vec<(Configuration, Complex64)> {
        let mut diagonal = ZERO;
        let mut conn = Vec::new();
        let local_states = self.hilbert.local_states();
        for (sites, m) in self.terms.iter() {
            let row = sites.iter()
                .fold(0, |acc, &s| (acc << 1) | SpinHilbert::local_index(config[s]));
            for col in 0..m.ncols() {
                let mel = m[(row, col)];
                if mel == ZERO {
                    continue;
                }
                if col == row {
                    diagonal += mel;
                    continue;
                }
                let mut connected = config.clone();
                for (k, &s) in sites.iter().enumerate() {
                    let bit = (col >> (sites.len() - 1 - k)) & 1;
                    connected[s] = local_states[bit];
                }
                conn.push((connected, mel));
            }
        }
        conn.insert(0, (config.clone(), diagonal));
        conn
    }

    /// Matrix in the computational basis, in CSR format.
    pub fn to_sparse(&self) -> CsrMatrix {
        let rows: Vec<Vec<(usize, Complex64)>> = (0..self.hilbert.n_states())
            .map(|i| {
                let config = self.hilbert.index_to_state(i);
                let mut row: BTreeMap<usize, Complex64> = BTreeMap::new();
                for (connected, mel) in self.get_conn(&config) {
                    *row.entry(self.hilbert.state_to_index(&connected)).or_insert(ZERO) += mel;
                }
                row.into_iter().filter(|(_, v)| *v != ZERO).collect()
            })
            .collect();
        CsrMatrix::from_rows(rows)
    }

    /// Dense matrix in the computational basis.
    pub fn to_dense(&self) -> DMatrix<Complex64> {
        self.to_sparse().to_dense()
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.to_sparse().is_hermitian(tol)
    }
}

/// Embed a term acting on `sites` into the larger site tuple `target`.
///
/// `target` must contain every element of `sites`. The result acts as the
/// identity on the sites of `target` missing from `sites`.
fn embed(matrix: &DMatrix<Complex64>, sites: &[usize], target: &[usize]) -> DMatrix<Complex64> {
    let n = target.len();
    let dim = 1usize << n;
    let shifts: Vec<usize> = sites.iter()
        .map(|s| {
            let pos = target.iter().position(|t| t == s).unwrap_or_else(|| {
                unreachable!("site {} missing from embedding target", s)
            });
            n - 1 - pos
        })
        .collect();
    let acted: usize = shifts.iter().map(|&sh| 1 << sh).sum();
    let spectator = (dim - 1) & !acted;
    let extract = |x: usize| shifts.iter().fold(0, |acc, &sh| (acc << 1) | ((x >> sh) & 1));

    DMatrix::from_fn(dim, dim, |r, c| {
        if r & spectator != c & spectator {
            ZERO
        } else {
            matrix[(extract(r), extract(c))]
        }
    })
}

impl std::ops::Mul<f64> for LocalOperator {
    type Output = LocalOperator;

    fn mul(self, rhs: f64) -> LocalOperator {
        self.scale(Complex64::new(rhs, 0.0))
    }
}

impl std::ops::Mul<LocalOperator> for f64 {
    type Output = LocalOperator;

    fn mul(self, rhs: LocalOperator) -> LocalOperator {
        rhs * self
    }
}

impl std::ops::Neg for LocalOperator {
    type Output = LocalOperator;

    fn neg(self) -> LocalOperator {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::operator::{sigma_x, sigma_z};

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_add_term_validates_sites() {
        let hi = SpinHilbert::new(3);
        let mut op = LocalOperator::new(hi);
        let m2 = DMatrix::from_element(2, 2, c(1.0));
        let m4 = DMatrix::from_element(4, 4, c(1.0));

        assert_eq!(
            op.add_term(m2.clone(), &[3]),
            Err(OperatorError::SiteOutOfBounds { site: 3, n_sites: 3 })
        );
        assert_eq!(op.add_term(m4.clone(), &[1, 1]), Err(OperatorError::DuplicateSite(1)));
        assert!(matches!(
            op.add_term(m2.clone(), &[0, 1]),
            Err(OperatorError::ShapeMismatch { expected: 4, rows: 2, .. })
        ));
        assert!(op.add_term(m4, &[2, 0]).is_ok());
        assert_eq!(op.n_terms(), 1);
    }

    #[test]
    fn test_terms_on_same_sites_are_merged() {
        let hi = SpinHilbert::new(2);
        let x = sigma_x(hi, 1).unwrap();
        let z = sigma_z(hi, 1).unwrap();
        let sum = x.checked_add(&z).unwrap();
        assert_eq!(sum.n_terms(), 1);
        let m = sum.terms().next().unwrap().1.clone();
        assert_relative_eq!(m[(0, 1)].re, 1.0);
        assert_relative_eq!(m[(1, 1)].re, 1.0);
    }

    #[test]
    fn test_pauli_algebra() {
        let hi = SpinHilbert::new(2);
        let x = sigma_x(hi, 0).unwrap();
        let z = sigma_z(hi, 0).unwrap();
        // σx σx = 1
        let xx = x.checked_mul(&x).unwrap().to_dense();
        assert_relative_eq!((xx - DMatrix::identity(4, 4)).norm(), 0.0, epsilon = 1e-12);
        // σz σx + σx σz = 0
        let anti = z.checked_mul(&x).unwrap()
            .checked_add(&x.checked_mul(&z).unwrap()).unwrap()
            .to_dense();
        assert_relative_eq!(anti.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_get_conn_for_field_term() {
        let hi = SpinHilbert::new(3);
        let op = -1.0 * sigma_x(hi, 1).unwrap();
        let config = hi.index_to_state(0);
        let conn = op.get_conn(&config);
        assert_eq!(conn.len(), 2);
        assert_eq!(conn[0].1, c(0.0));
        assert_eq!(conn[1].0.as_slice(), &[-1.0, 1.0, -1.0]);
        assert_eq!(conn[1].1, c(-1.0));
    }

    #[test]
    fn test_hilbert_mismatch() {
        let a = sigma_z(SpinHilbert::new(2), 0).unwrap();
        let b = sigma_z(SpinHilbert::new(3), 0).unwrap();
        assert_eq!(
            a.checked_add(&b),
            Err(OperatorError::HilbertMismatch { left: 2, right: 3 })
        );
    }
}
