//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised while building a graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("edge ({0}, {1}) references a node outside 0..{2}")]
    NodeOutOfRange(usize, usize, usize),
    #[error("self-loop on node {0}")]
    SelfLoop(usize),
    #[error("edge probability {0} is not in [0, 1]")]
    InvalidProbability(f64),
    #[error("lattice must have a positive extent, got length={length}, ndim={ndim}")]
    EmptyLattice { length: usize, ndim: usize },
}

/// Errors raised while assembling operators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperatorError {
    #[error("site {site} is out of bounds for a Hilbert space of {n_sites} sites")]
    SiteOutOfBounds { site: usize, n_sites: usize },
    #[error("site {0} appears more than once in a term")]
    DuplicateSite(usize),
    #[error("term on {n_sites} site(s) needs a {expected}x{expected} matrix, got {rows}x{cols}")]
    ShapeMismatch {
        n_sites: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("non matching hilbert spaces: {left} and {right} sites")]
    HilbertMismatch { left: usize, right: usize },
}

/// Errors raised by the exact eigensolvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EigenError {
    #[error("Lanczos did not converge after {iterations} iterations (residual {residual:.3e})")]
    NotConverged { iterations: usize, residual: f64 },
    #[error("requested {requested} eigenvalues from a space of dimension {dimension}")]
    TooManyEigenvalues { requested: usize, dimension: usize },
    #[error("operator is not hermitian")]
    NotHermitian,
}

/// Errors raised by variational estimation and the training loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmcError {
    #[error("non-finite energy estimate at step {step}: {mean} ± {error}")]
    NonFiniteEnergy { step: usize, mean: f64, error: f64 },
    #[error("non-finite gradient or parameter update at step {step}")]
    NonFiniteGradient { step: usize },
    #[error("logging interval must be at least 1")]
    InvalidInterval,
    #[error("parameter vector has length {got}, the ansatz expects {expected}")]
    ParameterLength { expected: usize, got: usize },
    #[error(transparent)]
    Operator(#[from] OperatorError),
}

/// Errors raised while reading a run configuration or writing run history.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
