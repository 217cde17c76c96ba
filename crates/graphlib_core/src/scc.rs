//! Strongly-connected-components engine.
//!
//! One DFS pass, iterative rather than recursive (a chain of tens of
//! thousands of nodes would blow the call stack otherwise): an explicit
//! `visitation_stack` of `(node, is_local_root)` pairs stands in for the
//! call stack, and each node's "root index" is a niche-optimized
//! `Option<NonZeroUsize>` rather than a sentinel integer. Component ids are
//! assigned in the order SCCs are popped off, which is already reverse
//! topological (sinks first) — so the topological number for a quotient
//! node falls directly out of its emission order; no separate DFS-based
//! topological sort is needed (see [`crate::toposort`] for the general
//! case used on caller-supplied DAGs).

use crate::digraph::{Digraph, QuotientId};
use smallvec::SmallVec;
use std::num::NonZeroUsize;

/// The result of running the SCC engine over a digraph.
///
/// `component`, `leader`, and the per-id node table are all indexed by the
/// dense integer id `Digraph::node_id` assigns, sized to
/// `Digraph::node_attr_size`. Filtered or absent nodes carry `None`.
pub struct StrongComponents<N> {
    component: Vec<Option<QuotientId>>,
    leader: Vec<Option<N>>,
    /// Each entry is the set of original node ids collapsed into that
    /// quotient node, in the order SCCs were emitted (reverse topological:
    /// sinks first). `sccs[q.index()]` are the members of quotient node `q`.
    sccs: Vec<SmallVec<[N; 4]>>,
    nodes_by_id: Vec<Option<N>>,
}

impl<N: Copy> StrongComponents<N> {
    /// Runs the SCC engine over `dg`.
    pub fn compute<G>(dg: &G) -> Self
    where
        G: Digraph<Node = N>,
    {
        let n = dg.node_attr_size();
        let filter = dg.filter();
        let node_of = |id: usize| dg.node(id);

        let mut nodes_by_id: Vec<Option<N>> = vec![None; n];
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut is_filtered: Vec<bool> = vec![true; n];

        for node in dg.nodes() {
            let id = dg.node_id(node);
            nodes_by_id[id] = Some(node);
            let filtered_out = filter.map(|f| f.filter_node(node)).unwrap_or(false);
            is_filtered[id] = filtered_out;
        }

        for node in dg.nodes() {
            let id = dg.node_id(node);
            if is_filtered[id] {
                continue;
            }
            for (source, target) in dg.out_edges(node) {
                debug_assert_eq!(dg.node_id(source), id);
                if filter.map(|f| f.filter_edge(source, target)).unwrap_or(false) {
                    continue;
                }
                let target_id = dg.node_id(target);
                if is_filtered[target_id] {
                    continue;
                }
                adjacency[id].push(target_id);
            }
        }

        let engine = TarjanScc::run(n, &is_filtered, &adjacency);

        let mut component = vec![None; n];
        let mut leader = vec![None; n];
        let mut sccs: Vec<SmallVec<[N; 4]>> = Vec::with_capacity(engine.sccs.len());

        for (q, members) in engine.sccs.into_iter().enumerate() {
            let qid = QuotientId(q);
            let leader_id = members[0];
            let leader_node = node_of(leader_id).expect("component member must have a node");
            let mut members_as_nodes = SmallVec::with_capacity(members.len());
            for &member_id in &members {
                component[member_id] = Some(qid);
                leader[member_id] = Some(leader_node);
                members_as_nodes.push(node_of(member_id).expect("component member must have a node"));
            }
            sccs.push(members_as_nodes);
        }

        log::debug!(
            "strong components: {} nodes, {} components",
            dg.node_count(),
            sccs.len()
        );

        StrongComponents {
            component,
            leader,
            sccs,
            nodes_by_id,
        }
    }

    /// The number of strongly connected components found.
    pub fn component_count(&self) -> usize {
        self.sccs.len()
    }

    /// The component a node belongs to, or `None` if it was filtered out or
    /// absent.
    pub fn component_of(&self, dg_node_id: usize) -> Option<QuotientId> {
        self.component.get(dg_node_id).copied().flatten()
    }

    /// The representative leader node for a given node id, or `None` if it
    /// was filtered out or absent.
    pub fn leader_of(&self, dg_node_id: usize) -> Option<N> {
        self.leader.get(dg_node_id).copied().flatten()
    }

    /// The original-graph nodes collapsed into quotient node `q`, in no
    /// particular order within the component.
    pub fn members(&self, q: QuotientId) -> &[N] {
        &self.sccs[q.index()]
    }

    /// Quotient nodes in the order SCCs were emitted: reverse topological,
    /// i.e. sinks first. `QuotientId(i)` is exactly `i`, so this order also
    /// *is* the topological numbering the closure builder consumes.
    pub fn quotient_ids(&self) -> impl Iterator<Item = QuotientId> + '_ {
        (0..self.sccs.len()).map(QuotientId)
    }

    /// `components(dg) -> int[]`: the whole per-node component assignment,
    /// indexed by dense node id.
    pub fn components(&self) -> &[Option<QuotientId>] {
        &self.component
    }

    /// `leaders(dg) -> NodeMap<Node>`: the whole per-node leader assignment,
    /// indexed by dense node id.
    pub fn leaders(&self) -> &[Option<N>] {
        &self.leader
    }

    pub(crate) fn node_at(&self, id: usize) -> Option<N> {
        self.nodes_by_id.get(id).copied().flatten()
    }
}

struct TarjanScc {
    sccs: Vec<SmallVec<[usize; 4]>>,
}

struct NodeState {
    root_index: Option<NonZeroUsize>,
    next_neighbor: usize,
}

impl TarjanScc {
    fn run(n: usize, is_filtered: &[bool], adjacency: &[Vec<usize>]) -> Self {
        let mut nodes: Vec<NodeState> = (0..n)
            .map(|_| NodeState {
                root_index: None,
                next_neighbor: 0,
            })
            .collect();
        let mut stack: Vec<usize> = Vec::new();
        let mut visitation_stack: Vec<(usize, bool)> = Vec::new();
        let mut index = 1usize;
        let mut component_count = usize::MAX;
        let mut sccs: Vec<SmallVec<[usize; 4]>> = Vec::new();

        for start in 0..n {
            if is_filtered[start] || nodes[start].root_index.is_some() {
                continue;
            }
            visitation_stack.push((start, true));

            while let Some((v, mut v_is_local_root)) = visitation_stack.pop() {
                if nodes[v].root_index.is_none() {
                    nodes[v].root_index = NonZeroUsize::new(index);
                    index += 1;
                }

                let mut suspended = false;
                while nodes[v].next_neighbor < adjacency[v].len() {
                    let w = adjacency[v][nodes[v].next_neighbor];
                    nodes[v].next_neighbor += 1;

                    if nodes[w].root_index.is_none() {
                        visitation_stack.push((v, v_is_local_root));
                        visitation_stack.push((w, true));
                        suspended = true;
                        break;
                    }

                    if nodes[w].root_index < nodes[v].root_index {
                        nodes[v].root_index = nodes[w].root_index;
                        v_is_local_root = false;
                    }
                }

                if suspended {
                    continue;
                }

                if v_is_local_root {
                    let mut index_adjustment = 1;
                    let c = NonZeroUsize::new(component_count);
                    let start_pos = stack
                        .iter()
                        .rposition(|&w| {
                            if nodes[v].root_index > nodes[w].root_index {
                                true
                            } else {
                                nodes[w].root_index = c;
                                index_adjustment += 1;
                                false
                            }
                        })
                        .map(|x| x + 1)
                        .unwrap_or(0);
                    nodes[v].root_index = c;
                    stack.push(v);

                    let mut members: SmallVec<[usize; 4]> =
                        SmallVec::from_slice(&stack[start_pos..]);
                    // Put the finalizing node first so it can serve as a stable
                    // leader/representative for the component.
                    if let Some(pos) = members.iter().position(|&m| m == v) {
                        members.swap(0, pos);
                    }
                    sccs.push(members);

                    stack.truncate(start_pos);
                    index -= index_adjustment;
                    component_count -= 1;
                } else {
                    stack.push(v);
                }
            }
        }

        debug_assert!(stack.is_empty());
        TarjanScc { sccs }
    }
}
