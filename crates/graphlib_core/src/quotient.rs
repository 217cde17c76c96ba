//! Construction of the condensed quotient DAG from a [`StrongComponents`]
//! result.

use crate::digraph::{Digraph, QuotientId};
use crate::scc::StrongComponents;
use fixedbitset::FixedBitSet;

/// A condensed DAG with exactly one node per strongly connected component
/// of the original digraph.
///
/// Built by a second pass over all unfiltered edges of the original graph;
/// a `component_count x component_count` dedup bitmap (released once this
/// pass completes, so it doesn't linger as dead weight for the rest of the
/// engine's lifetime) suppresses parallel quotient edges. Same-component
/// edges are dropped.
pub struct QuotientGraph {
    /// `out_edges[q]` are the distinct quotient nodes `q` has an edge to.
    out_edges: Vec<Vec<QuotientId>>,
}

impl QuotientGraph {
    /// Builds the quotient DAG for `dg` given its already-computed strong
    /// components.
    pub fn build<G, N>(dg: &G, components: &StrongComponents<N>) -> Self
    where
        G: Digraph<Node = N>,
        N: Copy,
    {
        let c = components.component_count();
        let mut dedup = FixedBitSet::with_capacity(c * c);
        let mut out_edges: Vec<Vec<QuotientId>> = vec![Vec::new(); c];

        let filter = dg.filter();
        for node in dg.nodes() {
            if filter.map(|f| f.filter_node(node)).unwrap_or(false) {
                continue;
            }
            let Some(c1) = components.component_of(dg.node_id(node)) else {
                continue;
            };
            for (source, target) in dg.out_edges(node) {
                if filter.map(|f| f.filter_edge(source, target)).unwrap_or(false) {
                    continue;
                }
                let Some(c2) = components.component_of(dg.node_id(target)) else {
                    continue;
                };
                if c1 == c2 {
                    continue;
                }
                let bit = c1.index() * c + c2.index();
                if !dedup.put(bit) {
                    out_edges[c1.index()].push(c2);
                }
            }
        }

        // `dedup` is scratch for this phase only and is dropped here.
        QuotientGraph { out_edges }
    }

    pub fn node_count(&self) -> usize {
        self.out_edges.len()
    }

    pub fn out_neighbors(&self, q: QuotientId) -> impl Iterator<Item = QuotientId> + '_ {
        self.out_edges[q.index()].iter().copied()
    }

    /// Reifies this quotient into a standalone [`crate::SimpleDigraph`] whose
    /// node `i` is exactly `QuotientId(i)`. The back-map from a reified node
    /// to its original members is `StrongComponents::members`, keyed by the
    /// same index — no separate attribute table is needed since the indices
    /// already line up by construction.
    pub fn reify(&self) -> crate::simple_digraph::SimpleDigraph {
        let mut g = crate::simple_digraph::SimpleDigraph::with_nodes(self.node_count());
        for idx in 0..self.node_count() {
            let q = QuotientId(idx);
            for t in self.out_neighbors(q) {
                g.add_edge(crate::digraph::NodeId(idx), crate::digraph::NodeId(t.index()));
            }
        }
        g
    }
}
