//! Exact Ground State of the Periodic Ising Chain
//!
//! Diagonalizes the critical transverse-field Ising chain (J = h = 1) with
//! Lanczos and compares against the free-fermion closed form
//! E₀ = -Σₖ 2|sin(k/2)|, k = (2n+1)π/L. For L = 20 the ground state energy
//! per site is -1.274549484318.
//!
//! Usage:
//!   cargo run --example ising_chain_ed --release -- [LENGTH]

use std::f64::consts::PI;
use anyhow::{Context, Result};
use spin_vmc::{full_ed, graph, lanczos_ed, transverse_field_ising, LanczosParams, SpinHilbert};

const E0_PER_SITE_L20: f64 = -1.274549484318;

fn free_fermion_energy(length: usize) -> f64 {
    -(0..length)
        .map(|n| 2.0 * ((2 * n + 1) as f64 * PI / (2 * length) as f64).sin().abs())
        .sum::<f64>()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let length: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid chain length {}", arg))?,
        None => 16,
    };

    println!("Periodic Transverse-Field Ising Chain, L = {}", length);
    println!("==========================================\n");

    let g = graph::hypercube(length, 1, true)?;
    let hilbert = SpinHilbert::from_graph(&g);
    let hamiltonian = transverse_field_ising(hilbert, &g, 1.0, 1.0)?;
    println!("Hilbert space dimension: {}", hilbert.n_states());

    let params = LanczosParams { k: 3, ..Default::default() };
    let eigenvalues = lanczos_ed(&hamiltonian, &params)?;
    println!("Lowest eigenvalues (Lanczos): {:?}", eigenvalues);

    if length <= 8 {
        let dense = full_ed(&hamiltonian)?;
        println!("Lowest eigenvalues (dense):   {:?}", &dense[..3.min(dense.len())]);
    }

    let e0 = eigenvalues[0];
    let reference = free_fermion_energy(length);
    println!("\nGround state energy:  {:.10}", e0);
    println!("Free-fermion result:  {:.10}", reference);
    println!("Energy per site:      {:.10}", e0 / length as f64);
    if length == 20 {
        println!("Reference per site:   {:.10}", E0_PER_SITE_L20);
    }
    println!("Absolute difference:  {:.3e}", (e0 - reference).abs());
    Ok(())
}
