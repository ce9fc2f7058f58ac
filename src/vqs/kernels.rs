//! Local estimators of operators on sampled configurations.

use nalgebra::DVector;
use num_complex::Complex64;
use crate::hilbert::Configuration;
use crate::models::Ansatz;
use crate::operator::LocalOperator;

/// O_loc(σ) = Σ_σ' ⟨σ|O|σ'⟩ ψ(σ')/ψ(σ).
pub fn local_value<A: Ansatz>(
    ansatz: &A,
    params: &DVector<f64>,
    op: &LocalOperator,
    config: &Configuration,
) -> Complex64 {
    let log_psi = ansatz.log_psi(params, config);
    let conn = op.get_conn(config);
    // The first connected element is the diagonal, where the ratio is 1.
    let diagonal = conn[0].1;
    diagonal + conn[1..].iter()
        .map(|(connected, mel)| mel * (ansatz.log_psi(params, connected) - log_psi).exp())
        .sum::<Complex64>()
}

/// |O_loc(σ)|², whose average over |ψ|² is ⟨O†O⟩.
pub fn local_value_squared<A: Ansatz>(
    ansatz: &A,
    params: &DVector<f64>,
    op: &LocalOperator,
    config: &Configuration,
) -> f64 {
    local_value(ansatz, params, op, config).norm_sqr()
}
