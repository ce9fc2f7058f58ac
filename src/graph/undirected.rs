//! Simple undirected graph over the nodes `0..n_nodes`.

use std::collections::BTreeSet;
use crate::error::GraphError;

/// Undirected graph without self-loops or repeated edges.
///
/// Edges are stored as `(i, j)` with `i < j`, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    n_nodes: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Build a graph from an edge list, validating every endpoint.
    pub fn new(n_nodes: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut unique = BTreeSet::new();
        for &(a, b) in edges {
            if a >= n_nodes || b >= n_nodes {
                return Err(GraphError::NodeOutOfRange(a, b, n_nodes));
            }
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            unique.insert((a.min(b), a.max(b)));
        }
        Ok(Self {
            n_nodes,
            edges: unique.into_iter().collect(),
        })
    }

    /// Build from edges already known to satisfy `i < j < n_nodes` without repeats.
    pub(super) fn from_valid_edges(n_nodes: usize, edges: Vec<(usize, usize)>) -> Self {
        debug_assert!(edges.iter().all(|&(a, b)| a < b && b < n_nodes));
        Self { n_nodes, edges }
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> std::ops::Range<usize> {
        0..self.n_nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Nodes sharing an edge with `node`, in ascending order.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.edges.iter()
            .filter_map(|&(a, b)| {
                if a == node {
                    Some(b)
                } else if b == node {
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Whether every node can be reached from node 0.
    pub fn is_connected(&self) -> bool {
        if self.n_nodes == 0 {
            return true;
        }
        let mut seen = vec![false; self.n_nodes];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(node) = stack.pop() {
            for next in self.neighbors(node) {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_normalized_and_deduplicated() {
        let g = Graph::new(3, &[(1, 0), (0, 1), (2, 1)]).unwrap();
        assert_eq!(g.edges(), &[(0, 1), (1, 2)]);
        assert_eq!(g.neighbors(1), vec![0, 2]);
        assert!(g.is_connected());
    }

    #[test]
    fn test_rejects_invalid_edges() {
        assert_eq!(Graph::new(2, &[(0, 2)]), Err(GraphError::NodeOutOfRange(0, 2, 2)));
        assert_eq!(Graph::new(2, &[(1, 1)]), Err(GraphError::SelfLoop(1)));
    }

    #[test]
    fn test_disconnected_graph() {
        let g = Graph::new(4, &[(0, 1), (2, 3)]).unwrap();
        assert!(!g.is_connected());
    }
}
