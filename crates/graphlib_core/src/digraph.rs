//! The read-only graph capability this crate's engines consume.
//!
//! The editable graph container itself — mutable adjacency lists, node/edge
//! id recycling, generic DFS traversal — is an external collaborator; this
//! module specifies only the interface the engine needs from it, plus the
//! narrow mutation surface that `Transitivity::close`/`acyclic_reduce`
//! require.

use std::fmt::Debug;
use std::hash::Hash;

/// A node id in the original digraph, dense after `trim_to_size` but the
/// engine tolerates sparse ids (holes left by removals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A stable id for an edge, used to distinguish parallel edges between the
/// same pair of nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// The id of a node in a condensed quotient DAG. Kept as a distinct type
/// from [`NodeId`] so original-graph and quotient-graph indices can't be
/// mixed up at a call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuotientId(pub usize);

impl QuotientId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A read-only predicate skipping nodes and edges during traversal.
///
/// Returning `true` means "skip this element".
pub trait Filter<N> {
    fn filter_node(&self, node: N) -> bool;
    fn filter_edge(&self, source: N, target: N) -> bool;
}

/// No-op filter that excludes nothing. Used when a `Digraph` has no filter
/// installed.
pub struct NoFilter;

impl<N> Filter<N> for NoFilter {
    #[inline]
    fn filter_node(&self, _node: N) -> bool {
        false
    }

    #[inline]
    fn filter_edge(&self, _source: N, _target: N) -> bool {
        false
    }
}

/// Read-only digraph capability consumed by the SCC engine, closure
/// builder, and reduction driver.
///
/// Ids returned by [`Digraph::node_id`] must lie in `[0, node_attr_size())`.
/// Self-loops and parallel edges are both permitted; the engine treats
/// edges as a multiset but reachability itself is set-valued.
pub trait Digraph {
    /// The node handle type used by this graph. Usually cheap to copy
    /// (an index or a newtype around one).
    type Node: Copy + Eq + Hash + Debug;

    /// Iterates over every node in the graph, in some stable-within-a-run
    /// but otherwise unspecified order.
    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_;

    /// Number of nodes actually present.
    fn node_count(&self) -> usize;

    /// Size of the dense id space; node ids are in `[0, node_attr_size())`
    /// even if some of those ids are holes left by removed nodes.
    fn node_attr_size(&self) -> usize;

    /// Number of edges present (parallel edges counted individually).
    fn edge_count(&self) -> usize;

    /// Iterates over the outgoing edges of `node` as `(source, target)`
    /// pairs with `source == node`.
    fn out_edges(&self, node: Self::Node) -> impl Iterator<Item = (Self::Node, Self::Node)> + '_;

    /// The dense integer id for `node`.
    fn node_id(&self, node: Self::Node) -> usize;

    /// The node for a given id, if present.
    fn node(&self, id: usize) -> Option<Self::Node>;

    /// The filter installed on this graph, if any.
    fn filter(&self) -> Option<&dyn Filter<Self::Node>> {
        None
    }
}

/// Narrow mutation surface required by `Transitivity::close` and
/// `Transitivity::acyclic_reduce`, which both need to add or remove edges
/// without owning a full graph-editing API.
pub trait MutableDigraph: Digraph {
    /// Adds a directed edge `source -> target`, returning its id.
    fn add_edge(&mut self, source: Self::Node, target: Self::Node) -> EdgeId;

    /// Removes one edge `source -> target` with the given id.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::GraphError::InvalidArgument`] if no such edge exists.
    fn remove_edge(
        &mut self,
        source: Self::Node,
        target: Self::Node,
        edge_id: EdgeId,
    ) -> crate::Result<()>;

    /// True iff a direct edge `source -> target` already exists.
    fn has_edge(&self, source: Self::Node, target: Self::Node) -> bool;

    /// The id of some live edge `source -> target`, if any. When parallel
    /// edges exist between the pair, which one is returned is unspecified.
    fn find_edge(&self, source: Self::Node, target: Self::Node) -> Option<EdgeId>;
}
