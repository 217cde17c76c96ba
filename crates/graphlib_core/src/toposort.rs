//! A standard, general-purpose topological sort over an arbitrary acyclic
//! digraph.
//!
//! The SCC-derived quotient DAG never needs this: Tarjan's emission order
//! already *is* a topological order (see [`crate::scc`]). This module
//! exists for the other caller of a topological order in this crate —
//! [`crate::reduction`]'s acyclic transitive reduction/closure, which works
//! against a caller-supplied DAG that was never run through the SCC engine
//! at all.

use crate::digraph::Digraph;
use crate::error::{GraphError, Result};
use std::collections::VecDeque;

/// Computes a topological order (sources first) over `dg` via Kahn's
/// algorithm.
///
/// ## Errors
///
/// Returns [`GraphError::InvalidArgument`] if `dg` is not acyclic.
pub fn topo_order<G: Digraph>(dg: &G) -> Result<Vec<G::Node>> {
    let n = dg.node_attr_size();
    let filter = dg.filter();
    let mut in_degree: Vec<usize> = vec![0; n];
    let mut live = vec![false; n];

    for node in dg.nodes() {
        if filter.map(|f| f.filter_node(node)).unwrap_or(false) {
            continue;
        }
        live[dg.node_id(node)] = true;
    }

    for node in dg.nodes() {
        let id = dg.node_id(node);
        if !live[id] {
            continue;
        }
        for (source, target) in dg.out_edges(node) {
            if filter.map(|f| f.filter_edge(source, target)).unwrap_or(false) {
                continue;
            }
            let target_id = dg.node_id(target);
            if live[target_id] {
                in_degree[target_id] += 1;
            }
        }
    }

    let mut queue: VecDeque<G::Node> = dg
        .nodes()
        .filter(|&node| live[dg.node_id(node)] && in_degree[dg.node_id(node)] == 0)
        .collect();

    let mut order = Vec::with_capacity(dg.node_count());
    let mut visited = 0usize;
    let live_count = live.iter().filter(|&&b| b).count();

    while let Some(node) = queue.pop_front() {
        order.push(node);
        visited += 1;
        for (source, target) in dg.out_edges(node) {
            if filter.map(|f| f.filter_edge(source, target)).unwrap_or(false) {
                continue;
            }
            let target_id = dg.node_id(target);
            if !live[target_id] {
                continue;
            }
            in_degree[target_id] -= 1;
            if in_degree[target_id] == 0 {
                if let Some(target_node) = dg.node(target_id) {
                    queue.push_back(target_node);
                }
            }
        }
    }

    if visited != live_count {
        return Err(GraphError::invalid_argument(
            "graph contains a cycle; acyclic operation requires a DAG",
        ));
    }

    Ok(order)
}
