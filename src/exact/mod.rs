//! Exact diagonalization - reference ground-state energies for small systems.

mod lanczos;
mod full;

pub use lanczos::{lanczos_ed, lanczos_eigenvalues, smallest_eigenvalue, LanczosParams};
pub use full::full_ed;
