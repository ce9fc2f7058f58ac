//! Standard graph generators: complete graphs, Erdős–Rényi random graphs
//! and hypercubic lattices.

use rand::Rng;
use crate::error::GraphError;
use super::undirected::Graph;

/// Complete graph on `n` nodes.
pub fn complete(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    Graph::from_valid_edges(n, edges)
}

/// Erdős–Rényi graph G(n, p): every pair is joined independently with probability `p`.
pub fn random<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Graph, GraphError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GraphError::InvalidProbability(p));
    }
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(p) {
                edges.push((i, j));
            }
        }
    }
    Graph::new(n, &edges)
}

/// Hypercubic lattice with `length` sites per side in `ndim` dimensions.
///
/// Sites are numbered in row-major order of their coordinates. With `pbc`,
/// the last site of each row is bonded back to the first.
pub fn hypercube(length: usize, ndim: usize, pbc: bool) -> Result<Graph, GraphError> {
    if length == 0 || ndim == 0 {
        return Err(GraphError::EmptyLattice { length, ndim });
    }
    let n_nodes = length.pow(ndim as u32);
    let mut edges = Vec::with_capacity(n_nodes * ndim);
    for site in 0..n_nodes {
        let mut stride = 1;
        for _ in 0..ndim {
            let coord = (site / stride) % length;
            if coord + 1 < length {
                edges.push((site, site + stride));
            } else if pbc && length > 2 {
                edges.push((site, site - coord * stride));
            }
            stride *= length;
        }
    }
    Graph::new(n_nodes, &edges)
}

/// One-dimensional chain, the `ndim = 1` hypercube.
pub fn chain(length: usize, pbc: bool) -> Result<Graph, GraphError> {
    hypercube(length, 1, pbc)
}
