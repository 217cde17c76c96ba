//! A minimal concrete [`Digraph`]/[`MutableDigraph`] implementation.
//!
//! The closure engine only consumes the read-only [`Digraph`] capability;
//! it has no opinion on how a caller actually stores and edits their graph.
//! A library still needs *some* concrete graph to test against and for
//! callers who don't already have their own graph type to plug in, so this
//! module provides one. It is deliberately simple — dense node ids,
//! `Vec`-backed adjacency — and carries no closure logic of its own.

use crate::digraph::{Digraph, EdgeId, Filter, MutableDigraph, NodeId};
use crate::error::{GraphError, Result};

/// A plain adjacency-list digraph supporting self-loops and parallel edges.
///
/// Maintains two monotonic modification counters (one for node structure,
/// one for edge structure) so that long-lived iterators can detect that the
/// graph changed underneath them — a fail-fast contract that belongs to the
/// graph container itself, not the closure engine that merely consumes it.
pub struct SimpleDigraph {
    present: Vec<bool>,
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<Option<(NodeId, NodeId)>>,
    node_count: usize,
    edge_count: usize,
    node_mod_count: u64,
    edge_mod_count: u64,
    filter: Option<Box<dyn Filter<NodeId>>>,
}

impl Default for SimpleDigraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleDigraph {
    pub fn new() -> Self {
        SimpleDigraph {
            present: Vec::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
            node_count: 0,
            edge_count: 0,
            node_mod_count: 0,
            edge_mod_count: 0,
            filter: None,
        }
    }

    /// Builds a graph with `n` nodes and no edges.
    pub fn with_nodes(n: usize) -> Self {
        let mut g = Self::new();
        for _ in 0..n {
            g.add_node();
        }
        g
    }

    /// Adds a fresh node, returning its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.present.len());
        self.present.push(true);
        self.adjacency.push(Vec::new());
        self.node_count += 1;
        self.node_mod_count += 1;
        id
    }

    /// Removes a node, leaving a hole in the dense id space. Edges incident
    /// on it are left dangling in `adjacency`/`edges` but filtered out of
    /// all iteration; the engine is documented to tolerate such holes.
    pub fn remove_node(&mut self, id: NodeId) {
        if self.present.get(id.0).copied().unwrap_or(false) {
            self.present[id.0] = false;
            self.node_count -= 1;
            self.node_mod_count += 1;
        }
    }

    /// Installs a read-only filter.
    pub fn set_filter(&mut self, filter: Box<dyn Filter<NodeId>>) {
        self.filter = Some(filter);
    }

    fn is_live_edge(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(id.0).copied().flatten()
    }

    /// An iterator over node ids that checks, on every step, whether the
    /// graph's node structure has been mutated since the iterator was
    /// created, raising [`GraphError::ConcurrentModification`] instead of
    /// silently iterating over stale state. [`Digraph::nodes`] itself stays
    /// a plain non-panicking iterator because the engine never mutates its
    /// source graph mid-run.
    pub fn checked_nodes_iter(&self) -> CheckedNodesIter<'_> {
        CheckedNodesIter {
            graph: self,
            snapshot: self.node_mod_count,
            next: 0,
        }
    }
}

/// Fail-fast node iterator; see [`SimpleDigraph::checked_nodes_iter`].
pub struct CheckedNodesIter<'a> {
    graph: &'a SimpleDigraph,
    snapshot: u64,
    next: usize,
}

impl<'a> Iterator for CheckedNodesIter<'a> {
    type Item = Result<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.graph.node_mod_count != self.snapshot {
            return Some(Err(GraphError::ConcurrentModification));
        }
        while self.next < self.graph.present.len() {
            let id = self.next;
            self.next += 1;
            if self.graph.present[id] {
                return Some(Ok(NodeId(id)));
            }
        }
        None
    }
}

impl Digraph for SimpleDigraph {
    type Node = NodeId;

    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(id, _)| NodeId(id))
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node_attr_size(&self) -> usize {
        self.present.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn out_edges(&self, node: Self::Node) -> impl Iterator<Item = (Self::Node, Self::Node)> + '_ {
        self.adjacency
            .get(node.0)
            .into_iter()
            .flatten()
            .filter_map(move |&edge_id| self.is_live_edge(edge_id))
    }

    fn node_id(&self, node: Self::Node) -> usize {
        node.0
    }

    fn node(&self, id: usize) -> Option<Self::Node> {
        if self.present.get(id).copied().unwrap_or(false) {
            Some(NodeId(id))
        } else {
            None
        }
    }

    fn filter(&self) -> Option<&dyn Filter<Self::Node>> {
        self.filter.as_deref()
    }
}

impl MutableDigraph for SimpleDigraph {
    fn add_edge(&mut self, source: Self::Node, target: Self::Node) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Some((source, target)));
        self.adjacency[source.0].push(id);
        self.edge_count += 1;
        self.edge_mod_count += 1;
        id
    }

    fn remove_edge(&mut self, source: Self::Node, target: Self::Node, edge_id: EdgeId) -> Result<()> {
        match self.is_live_edge(edge_id) {
            Some((s, t)) if s == source && t == target => {
                self.edges[edge_id.0] = None;
                if let Some(pos) = self.adjacency[source.0].iter().position(|&e| e == edge_id) {
                    self.adjacency[source.0].remove(pos);
                }
                self.edge_count -= 1;
                self.edge_mod_count += 1;
                Ok(())
            }
            _ => Err(GraphError::invalid_argument(format_args!(
                "no live edge {edge_id:?} from {source:?} to {target:?}"
            ))),
        }
    }

    fn has_edge(&self, source: Self::Node, target: Self::Node) -> bool {
        self.adjacency
            .get(source.0)
            .into_iter()
            .flatten()
            .any(|&id| matches!(self.is_live_edge(id), Some((_, t)) if t == target))
    }

    fn find_edge(&self, source: Self::Node, target: Self::Node) -> Option<EdgeId> {
        self.adjacency.get(source.0).into_iter().flatten().find_map(|&id| {
            matches!(self.is_live_edge(id), Some((_, t)) if t == target).then_some(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_iterate_nodes() {
        let mut g = SimpleDigraph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, b);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_edges(a).collect::<Vec<_>>(), vec![(a, b)]);
    }

    #[test]
    fn remove_node_leaves_a_hole() {
        let mut g = SimpleDigraph::with_nodes(3);
        let n1 = NodeId(1);
        g.remove_node(n1);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_attr_size(), 3);
        assert_eq!(g.node(1), None);
        let ids: Vec<_> = g.nodes().collect();
        assert_eq!(ids, vec![NodeId(0), NodeId(2)]);
    }

    #[test]
    fn parallel_and_self_loop_edges_allowed() {
        let mut g = SimpleDigraph::with_nodes(2);
        let (a, b) = (NodeId(0), NodeId(1));
        g.add_edge(a, b);
        g.add_edge(a, b);
        g.add_edge(a, a);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.out_edges(a).count(), 3);
    }

    #[test]
    fn checked_iterator_detects_mutation() {
        let mut g = SimpleDigraph::with_nodes(2);
        let mut iter = g.checked_nodes_iter();
        assert!(matches!(iter.next(), Some(Ok(_))));
        g.add_node();
        assert!(matches!(iter.next(), Some(Err(GraphError::ConcurrentModification))));
    }

    #[test]
    fn remove_edge_rejects_mismatched_endpoints() {
        let mut g = SimpleDigraph::with_nodes(2);
        let (a, b) = (NodeId(0), NodeId(1));
        let e = g.add_edge(a, b);
        assert!(g.remove_edge(b, a, e).is_err());
        assert!(g.remove_edge(a, b, e).is_ok());
        assert!(!g.has_edge(a, b));
    }

    #[test]
    fn find_edge_locates_a_live_edge() {
        let mut g = SimpleDigraph::with_nodes(2);
        let (a, b) = (NodeId(0), NodeId(1));
        assert!(g.find_edge(a, b).is_none());
        let e = g.add_edge(a, b);
        assert_eq!(g.find_edge(a, b), Some(e));
        g.remove_edge(a, b, e).unwrap();
        assert!(g.find_edge(a, b).is_none());
    }
}
