//! Transitive-reduction driver: an acyclic variant (topological backward
//! pass building a closure matrix, then stripping edges that a shorter
//! sibling path already implies) and a general variant (SCC + quotient +
//! acyclic-reduce-the-quotient + reintroduce-a-cycle-per-component) for
//! digraphs that aren't themselves acyclic.

use crate::digraph::{Digraph, MutableDigraph, NodeId};
use crate::error::Result;
use crate::hash::FixedHasher;
use crate::matrix::{DenseBitMatrix, Matrix};
use crate::quotient::QuotientGraph;
use crate::scc::StrongComponents;
use crate::simple_digraph::SimpleDigraph;
use crate::toposort::topo_order;
use fixedbitset::FixedBitSet;
use std::collections::HashMap;

/// Deterministic-hash map alias used for the small lookup tables this module
/// builds (topological rank, original-to-reduced node id), matching the
/// fixed-seed hasher the quotient dedup pass uses elsewhere in this crate.
type FastMap<K, V> = HashMap<K, V, FixedHasher>;

/// Builds the transitive closure of an acyclic `dg`, as a dense bit matrix
/// indexed by dense node id.
///
/// One backward pass over a topological order (sinks first): for node `a`,
/// the reachable set is the union of `{b} | reachable(b)` over every
/// successor `b`, and a `visited` scratch bitset (cleared per source node)
/// skips re-adding bits a sibling edge already contributed. Since the result
/// is a union of sets this is correct regardless of which order `a`'s
/// out-edges are visited in — the `visited` bitset is purely an optimization
/// here, not a correctness requirement (c.f. [`acyclic_reduce`], where edge
/// order *is* significant).
///
/// `topo` must be a topological order over every live, unfiltered node of
/// `dg` (callers that already have one from elsewhere can pass it directly
/// rather than have this function recompute it); if absent, one is
/// computed.
///
/// ## Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] if `dg` is not acyclic.
pub fn acyclic_closure<G: Digraph>(
    dg: &G,
    topo: Option<&[G::Node]>,
) -> Result<DenseBitMatrix> {
    let owned_topo;
    let topo: &[G::Node] = match topo {
        Some(t) => t,
        None => {
            owned_topo = topo_order(dg)?;
            &owned_topo
        }
    };

    let n = dg.node_attr_size();
    let filter = dg.filter();
    let mut reachable = DenseBitMatrix::empty(n);
    let mut visited = FixedBitSet::with_capacity(n);

    for &a in topo.iter().rev() {
        if filter.map(|f| f.filter_node(a)).unwrap_or(false) {
            continue;
        }
        let a_id = dg.node_id(a);
        for (source, b) in dg.out_edges(a) {
            if filter.map(|f| f.filter_edge(source, b)).unwrap_or(false) {
                continue;
            }
            if filter.map(|f| f.filter_node(b)).unwrap_or(false) {
                continue;
            }
            let b_id = dg.node_id(b);
            if visited[b_id] {
                continue;
            }
            visited.insert(b_id);
            reachable.set(a_id, b_id, true)?;
            for c_id in 0..n {
                if reachable.get(b_id, c_id) && !visited[c_id] {
                    visited.insert(c_id);
                    reachable.set(a_id, c_id, true)?;
                }
            }
        }
        visited.clear();
    }

    Ok(reachable)
}

/// `acyclicReduce(mdg)`: removes every edge implied by a longer path,
/// leaving the unique minimal edge set with the same transitive closure.
///
/// Builds the acyclic closure first, then for each node `i` walks its
/// out-edges sorted by target's topological rank (ascending — this order is
/// load-bearing, not an optimization: processing a nearer successor before a
/// farther one is what makes "already implied by an earlier sibling" a valid
/// redundancy test). An edge `(i, k)` is redundant if some earlier-processed
/// sibling edge `(i, j)` has `j` reaching `k`.
///
/// ## Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] if `mdg` is not acyclic.
pub fn acyclic_reduce<M: MutableDigraph>(mdg: &mut M) -> Result<Vec<(M::Node, M::Node)>> {
    let topo = topo_order(&*mdg)?;
    let rank: FastMap<usize, usize> = topo
        .iter()
        .enumerate()
        .map(|(pos, &node)| (mdg.node_id(node), pos))
        .collect();
    let closure = acyclic_closure(&*mdg, Some(&topo))?;

    let mut redundant: Vec<(M::Node, M::Node)> = Vec::new();
    for &i in &topo {
        let filter = mdg.filter();
        let mut out: Vec<M::Node> = mdg
            .out_edges(i)
            .filter(|&(s, t)| !filter.map(|f| f.filter_edge(s, t)).unwrap_or(false))
            .map(|(_, t)| t)
            .filter(|&t| !filter.map(|f| f.filter_node(t)).unwrap_or(false))
            .collect();
        out.sort_by_key(|&t| rank.get(&mdg.node_id(t)).copied().unwrap_or(usize::MAX));

        let mut cleared = vec![false; out.len()];
        for idx in 0..out.len() {
            if cleared[idx] {
                redundant.push((i, out[idx]));
                continue;
            }
            let j_id = mdg.node_id(out[idx]);
            for later in (idx + 1)..out.len() {
                let k_id = mdg.node_id(out[later]);
                if closure.get(j_id, k_id) {
                    cleared[later] = true;
                }
            }
        }
    }

    for &(source, target) in &redundant {
        if let Some(edge_id) = mdg.find_edge(source, target) {
            mdg.remove_edge(source, target, edge_id)?;
        }
    }

    log::debug!(
        "acyclic reduction: {} edges removed out of {}",
        redundant.len(),
        mdg.edge_count() + redundant.len()
    );
    Ok(redundant)
}

/// `close(mdg)`: adds every edge `u -> v` with `reaches(u, v)` but no direct
/// edge yet, so the graph becomes its own transitive closure. Returns the
/// added edges.
///
/// The read-only [`crate::CompactClosure`] pass is scoped to a block so its
/// borrow of `mdg` ends before the edges it found are actually added.
pub fn close<M: MutableDigraph>(mdg: &mut M) -> Vec<(M::Node, M::Node)> {
    let to_add: Vec<(M::Node, M::Node)> = {
        let engine = crate::engine::CompactClosure::build(&*mdg);
        let nodes: Vec<M::Node> = mdg.nodes().collect();
        let mut pairs = Vec::new();
        for &u in &nodes {
            for &v in &nodes {
                if mdg.node_id(u) == mdg.node_id(v) {
                    continue;
                }
                if mdg.has_edge(u, v) {
                    continue;
                }
                if engine.reaches(u, v).unwrap_or(false) {
                    pairs.push((u, v));
                }
            }
        }
        pairs
    };

    for &(u, v) in &to_add {
        mdg.add_edge(u, v);
    }
    log::debug!("transitive close: {} edges added", to_add.len());
    to_add
}

/// `reduce(dg) -> (reduced digraph, nMap)`: general transitive reduction.
///
/// Computes SCCs, takes the quotient, runs [`acyclic_reduce`] on the
/// (necessarily acyclic) quotient, then reifies the kept quotient edges back
/// onto representative original nodes and reintroduces, for every
/// non-trivial component, a minimal simple cycle through its members so
/// strong connectivity within that component survives the reduction. The
/// returned map sends every original live node id to its [`NodeId`] in the
/// fresh reduced graph, which has exactly the same node set as `dg`.
pub fn reduce<G: Digraph>(dg: &G) -> (SimpleDigraph, HashMap<usize, NodeId>) {
    let components = StrongComponents::compute(dg);
    let quotient = QuotientGraph::build(dg, &components);
    let mut reified = quotient.reify();
    // The reified quotient is acyclic by construction (a condensation of any
    // digraph is always a DAG), so this cannot fail.
    acyclic_reduce(&mut reified)
        .expect("a condensation DAG is always acyclic");

    let mut out = SimpleDigraph::new();
    let mut n_map: HashMap<usize, NodeId> = HashMap::new();
    for node in dg.nodes() {
        let id = dg.node_id(node);
        n_map.insert(id, out.add_node());
    }

    // One representative original node per quotient node: its first member.
    let representative = |q: crate::digraph::QuotientId| -> NodeId {
        let member = components.members(q)[0];
        n_map[&dg.node_id(member)]
    };

    for source_id in 0..reified.node_count() {
        let q = crate::digraph::QuotientId(source_id);
        for (s, t) in reified.out_edges(NodeId(source_id)) {
            debug_assert_eq!(s.0, source_id);
            out.add_edge(representative(q), representative(crate::digraph::QuotientId(t.0)));
        }
    }

    for q in components.quotient_ids() {
        let members = components.members(q);
        if members.len() < 2 {
            continue;
        }
        for window in 0..members.len() {
            let a = n_map[&dg.node_id(members[window])];
            let b = n_map[&dg.node_id(members[(window + 1) % members.len()])];
            out.add_edge(a, b);
        }
    }

    (out, n_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digraph::NodeId;

    #[test]
    fn acyclic_closure_of_a_chain_is_fully_transitive() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..3 {
            g.add_edge(NodeId(i), NodeId(i + 1));
        }
        let closure = acyclic_closure(&g, None).unwrap();
        assert!(closure.get(0, 3));
        assert!(closure.get(1, 3));
        assert!(!closure.get(3, 0));
        assert!(!closure.get(0, 0));
    }

    #[test]
    fn s5_complete_dag_reduces_to_hamilton_path() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..4usize {
            for j in (i + 1)..4 {
                g.add_edge(NodeId(i), NodeId(j));
            }
        }
        let removed = acyclic_reduce(&mut g).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.has_edge(NodeId(0), NodeId(1)));
        assert!(g.has_edge(NodeId(1), NodeId(2)));
        assert!(g.has_edge(NodeId(2), NodeId(3)));
        assert!(!g.has_edge(NodeId(0), NodeId(2)));
        assert!(!g.has_edge(NodeId(0), NodeId(3)));
        assert!(!g.has_edge(NodeId(1), NodeId(3)));
    }

    #[test]
    fn close_adds_exactly_the_missing_transitive_edges() {
        let mut g = SimpleDigraph::with_nodes(3);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(2));
        let added = close(&mut g);
        assert_eq!(added, vec![(NodeId(0), NodeId(2))]);
        assert!(g.has_edge(NodeId(0), NodeId(2)));
    }

    #[test]
    fn close_is_a_no_op_on_an_already_closed_graph() {
        let mut g = SimpleDigraph::with_nodes(2);
        g.add_edge(NodeId(0), NodeId(1));
        let added = close(&mut g);
        assert!(added.is_empty());
    }

    #[test]
    fn s6_cycle_plus_tail_reduces_to_cycle_plus_one_edge() {
        let mut g = SimpleDigraph::with_nodes(4);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(2));
        g.add_edge(NodeId(2), NodeId(0));
        g.add_edge(NodeId(0), NodeId(3));

        let (reduced, n_map) = reduce(&g);
        assert_eq!(reduced.node_count(), 4);
        assert_eq!(reduced.edge_count(), 4);

        let n0 = n_map[&0];
        let n3 = n_map[&3];
        assert!(reduced.has_edge(n0, n3) || {
            // the tail edge may leave from any member of the 3-cycle
            (0..3).any(|m| reduced.has_edge(n_map[&m], n3))
        });
    }

    #[test]
    fn reduce_of_an_already_acyclic_graph_matches_acyclic_reduce() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..4usize {
            for j in (i + 1)..4 {
                g.add_edge(NodeId(i), NodeId(j));
            }
        }
        let (reduced, _n_map) = reduce(&g);
        assert_eq!(reduced.edge_count(), 3);
    }

    #[test]
    fn acyclic_reduce_preserves_closure_and_leaves_no_removable_edge() {
        // A diamond (0 -> {1,2} -> 3) plus two shortcuts into the sink that a
        // longer path through the diamond already implies.
        let mut g = SimpleDigraph::with_nodes(5);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(0), NodeId(2));
        g.add_edge(NodeId(0), NodeId(3));
        g.add_edge(NodeId(0), NodeId(4));
        g.add_edge(NodeId(1), NodeId(3));
        g.add_edge(NodeId(2), NodeId(3));
        g.add_edge(NodeId(3), NodeId(4));

        let before = acyclic_closure(&g, None).unwrap();
        let removed = acyclic_reduce(&mut g).unwrap();
        assert!(!removed.is_empty());
        let after = acyclic_closure(&g, None).unwrap();

        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(before.get(i, j), after.get(i, j), "closure changed for ({i}, {j})");
            }
        }

        // No remaining edge is still removable: for every node, none of its
        // surviving out-neighbors reaches another of its surviving
        // out-neighbors (that would make the edge into the latter redundant).
        for i in 0..5 {
            let out: Vec<NodeId> = g.out_edges(NodeId(i)).map(|(_, t)| t).collect();
            for &j in &out {
                for &k in &out {
                    if j != k {
                        assert!(
                            !after.get(j.0, k.0),
                            "edge ({i}, {}) is still redundant via sibling {}",
                            k.0,
                            j.0
                        );
                    }
                }
            }
        }
    }
}
