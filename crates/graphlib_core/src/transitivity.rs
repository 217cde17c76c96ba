//! `Transitivity`: a public facade gathering the closure/reduction
//! operations under one namespace as inherent functions, so callers reach
//! for `Transitivity::closure(&g)` rather than hunting down free functions
//! scattered across modules.

use crate::digraph::{Digraph, MutableDigraph, NodeId};
use crate::engine::CompactClosure;
use crate::error::Result;
use crate::matrix::{DenseBitMatrix, Matrix};
use crate::reduction;
use crate::simple_digraph::SimpleDigraph;
use std::collections::HashMap;

/// Zero-sized namespace for the closure/reduction operations.
pub struct Transitivity;

/// A read-only view over a built [`CompactClosure`], implementing [`Matrix`]
/// with `get` only — `set` inherits the trait's default
/// `UnsupportedOperation` error, since this type never owns any bits to
/// mutate; it only ever answers queries against the engine it wraps.
pub struct CompactMatrixView<'g, G: Digraph> {
    engine: CompactClosure<'g, G>,
    dg: &'g G,
}

impl<'g, G: Digraph> Matrix for CompactMatrixView<'g, G> {
    fn get(&self, u: usize, v: usize) -> bool {
        let (Some(un), Some(vn)) = (self.dg.node(u), self.dg.node(v)) else {
            return false;
        };
        self.engine.reaches(un, vn).unwrap_or(false)
    }
}

impl Transitivity {
    /// `compactClosure(dg) -> Matrix`: a lazy, query-backed read-only view.
    /// Building it runs the full SCC + quotient + interval-closure pipeline
    /// once; every subsequent `get` is an O(log k) binary search.
    pub fn compact_closure<G: Digraph>(dg: &G) -> CompactMatrixView<'_, G> {
        CompactMatrixView {
            engine: CompactClosure::build(dg),
            dg,
        }
    }

    /// `closure(dg) -> DenseBitMatrix`: the fully materialized `n x n`
    /// reachability matrix, built by enumerating every non-filtered ordered
    /// pair against the compact closure engine.
    pub fn closure<G: Digraph>(dg: &G) -> Result<DenseBitMatrix> {
        let engine = CompactClosure::build(dg);
        let n = dg.node_attr_size();
        let filter = dg.filter();
        let mut matrix = DenseBitMatrix::empty(n);
        let nodes: Vec<G::Node> = dg
            .nodes()
            .filter(|&node| !filter.map(|f| f.filter_node(node)).unwrap_or(false))
            .collect();
        for &u in &nodes {
            for &v in &nodes {
                if engine.reaches(u, v)? {
                    matrix.set(dg.node_id(u), dg.node_id(v), true)?;
                }
            }
        }
        Ok(matrix)
    }

    /// `acyclicClosure(dg[, topoList]) -> DenseBitMatrix`.
    pub fn acyclic_closure<G: Digraph>(
        dg: &G,
        topo: Option<&[G::Node]>,
    ) -> Result<DenseBitMatrix> {
        reduction::acyclic_closure(dg, topo)
    }

    /// `close(mdg) -> list<Edge>`.
    pub fn close<M: MutableDigraph>(mdg: &mut M) -> Vec<(M::Node, M::Node)> {
        reduction::close(mdg)
    }

    /// `acyclicReduce(mdg) -> list<Edge>`.
    pub fn acyclic_reduce<M: MutableDigraph>(mdg: &mut M) -> Result<Vec<(M::Node, M::Node)>> {
        reduction::acyclic_reduce(mdg)
    }

    /// `reduce(dg, nMap) -> Digraph`.
    pub fn reduce<G: Digraph>(dg: &G) -> (SimpleDigraph, HashMap<usize, NodeId>) {
        reduction::reduce(dg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digraph::NodeId as N;

    #[test]
    fn closure_matches_reaches_for_every_pair() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..3 {
            g.add_edge(N(i), N(i + 1));
        }
        let dense = Transitivity::closure(&g).unwrap();
        assert!(dense.get(0, 3));
        assert!(!dense.get(3, 0));
        // P1: every node reaches itself, so the diagonal is always set.
        assert!(dense.get(0, 0));
    }

    #[test]
    fn compact_closure_view_rejects_mutation() {
        let g = SimpleDigraph::with_nodes(2);
        let view = Transitivity::compact_closure(&g);
        assert!(!view.get(0, 1));
    }

    #[test]
    fn p6_compact_and_dense_closure_agree() {
        let mut g = SimpleDigraph::with_nodes(6);
        g.add_edge(N(0), N(1));
        g.add_edge(N(1), N(2));
        g.add_edge(N(2), N(0));
        g.add_edge(N(2), N(3));
        g.add_edge(N(4), N(5));

        let compact = Transitivity::compact_closure(&g);
        let dense = Transitivity::closure(&g).unwrap();
        for u in 0..6 {
            for v in 0..6 {
                assert_eq!(compact.get(u, v), dense.get(u, v), "disagreement at ({u}, {v})");
            }
        }
    }
}
