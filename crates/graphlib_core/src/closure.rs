//! The interval-encoded reachability index: the distinguishing subsystem of
//! this crate. Builds, for every quotient node, a sorted list of half-open
//! intervals over topological numbers describing exactly the set of
//! quotient nodes it can reach (including itself), stored in one flat
//! append-only pool shared by all quotient nodes.

use crate::digraph::QuotientId;
use crate::interval::IRange;
use crate::quotient::QuotientGraph;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// `(component, tsNum, start, end, range pool)` — the artifacts that
/// together support O(log k) reachability queries. This type holds the
/// latter four; [`crate::scc::StrongComponents`] holds `component`.
pub struct ClosureIndex {
    ranges: Vec<IRange>,
    start: Vec<usize>,
    end: Vec<usize>,
}

impl ClosureIndex {
    /// Builds the range pool for `quotient`, walking its nodes in ascending
    /// `QuotientId` order.
    ///
    /// `QuotientId`s are already assigned by the SCC pass in reverse
    /// topological order (sinks first), which is exactly the processing
    /// order the k-way merge needs: every out-neighbor `t` of `n` has
    /// `t.index() < n.index()` and so has already been fully built by the
    /// time `n` is processed, meaning `t`'s head interval sits at
    /// `ranges[start[t]]` ready to be streamed into the merge via its
    /// arena-local `next` chain.
    pub fn build(quotient: &QuotientGraph) -> Self {
        let c = quotient.node_count();
        let mut arena: Vec<IRange> = Vec::new();
        let mut next: Vec<Option<usize>> = Vec::new();
        let mut start = vec![0usize; c];
        let mut end = vec![0usize; c];

        for idx in 0..c {
            let q = QuotientId(idx);
            start[idx] = arena.len();

            let mut heap: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
            for t in quotient.out_neighbors(q) {
                let head = start[t.index()];
                heap.push(Reverse((arena[head].lo(), head)));
            }

            let mut current = IRange::empty_at(0);
            let mut tail_idx: Option<usize> = None;

            while let Some(Reverse((_, m_idx))) = heap.pop() {
                let m = arena[m_idx];
                if !IRange::mergeable(&current, &m) {
                    flush(&mut current, &mut arena, &mut next, &mut tail_idx);
                }
                current.merge(&m);
                if let Some(nxt) = next[m_idx] {
                    heap.push(Reverse((arena[nxt].lo(), nxt)));
                }
            }
            flush(&mut current, &mut arena, &mut next, &mut tail_idx);

            // Add self: every node reaches itself.
            let me = IRange::new(idx as i64, idx as i64 + 1);
            match tail_idx {
                Some(t) if IRange::mergeable(&arena[t], &me) => {
                    let mut merged = arena[t];
                    merged.merge(&me);
                    arena[t] = merged;
                }
                _ => {
                    let new_idx = arena.len();
                    arena.push(me);
                    next.push(None);
                    if let Some(t) = tail_idx {
                        next[t] = Some(new_idx);
                    }
                }
            }

            end[idx] = arena.len() - 1;
            log::trace!(
                "closure builder: quotient node {idx} owns ranges[{}..={}]",
                start[idx],
                end[idx]
            );
        }

        ClosureIndex {
            ranges: arena,
            start,
            end,
        }
    }

    /// The slice of intervals owned by quotient node `q`: sorted by `lo`,
    /// pairwise disjoint and non-adjacent, union equal to the set of
    /// topological numbers `q` can reach (including itself).
    pub fn ranges_of(&self, q: QuotientId) -> &[IRange] {
        &self.ranges[self.start[q.index()]..=self.end[q.index()]]
    }

    pub fn total_ranges(&self) -> usize {
        self.ranges.len()
    }

    /// True iff quotient node `q` can reach topological number `target`.
    ///
    /// Binary search over `ranges_of(q)`, halving the `[low, high]` window
    /// and comparing `ranges[mid].lo()` against `target`, terminating once
    /// the window has size <= 1 and testing both remaining endpoints
    /// directly (this also correctly handles the degenerate single-interval
    /// case where `low == high` on entry).
    pub fn reaches_ts(&self, q: QuotientId, target: i64) -> bool {
        let slice = self.ranges_of(q);
        if slice.is_empty() {
            return false;
        }
        let mut low = 0usize;
        let mut high = slice.len() - 1;
        while high > low {
            let mid = low + (high - low) / 2;
            if slice[mid].contains(target) {
                return true;
            }
            if slice[mid].lo() <= target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        slice[low].contains(target)
    }
}

fn flush(
    current: &mut IRange,
    arena: &mut Vec<IRange>,
    next: &mut Vec<Option<usize>>,
    tail_idx: &mut Option<usize>,
) {
    if current.is_empty() {
        return;
    }
    let idx = arena.len();
    arena.push(*current);
    next.push(None);
    if let Some(t) = *tail_idx {
        next[t] = Some(idx);
    }
    *tail_idx = Some(idx);
    *current = IRange::empty_at(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digraph::NodeId;
    use crate::scc::StrongComponents;
    use crate::simple_digraph::SimpleDigraph;

    fn build_index(g: &SimpleDigraph) -> (StrongComponents<NodeId>, QuotientGraph, ClosureIndex) {
        let sc = StrongComponents::compute(g);
        let quotient = QuotientGraph::build(g, &sc);
        let index = ClosureIndex::build(&quotient);
        (sc, quotient, index)
    }

    #[test]
    fn chain_of_four_node_zero_reaches_everything() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..3 {
            g.add_edge(NodeId(i), NodeId(i + 1));
        }
        let (sc, _q, index) = build_index(&g);
        let c0 = sc.component_of(0).unwrap();
        // node 0's component has the largest tsNum (source); its range set
        // must be one contiguous interval covering every tsNum 0..4.
        let ranges = index.ranges_of(c0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].lo(), 0);
        assert_eq!(ranges[0].hi(), 4);
    }

    #[test]
    fn sink_component_reaches_only_itself() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..3 {
            g.add_edge(NodeId(i), NodeId(i + 1));
        }
        let (sc, _q, index) = build_index(&g);
        let c3 = sc.component_of(3).unwrap();
        let ranges = index.ranges_of(c3);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].hi() - ranges[0].lo(), 1);
    }

    #[test]
    fn invariants_hold_on_a_small_dag() {
        // A fan-in/fan-out DAG exercising a real k-way merge.
        let mut g = SimpleDigraph::with_nodes(5);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(0), NodeId(2));
        g.add_edge(NodeId(1), NodeId(3));
        g.add_edge(NodeId(2), NodeId(3));
        g.add_edge(NodeId(3), NodeId(4));
        let (sc, quotient, index) = build_index(&g);

        for idx in 0..quotient.node_count() {
            let q = crate::digraph::QuotientId(idx);
            let ranges = index.ranges_of(q);
            // I1
            assert!(!ranges.is_empty());
            // I2: sorted strictly by lo and pairwise non-mergeable
            for w in ranges.windows(2) {
                assert!(w[0].lo() < w[1].lo());
                assert!(!IRange::mergeable(&w[0], &w[1]));
            }
            // I3: q reaches itself
            assert!(index.reaches_ts(q, idx as i64));
        }

        // I4: every quotient edge's target range set is a subset of the source's.
        for idx in 0..quotient.node_count() {
            let q = crate::digraph::QuotientId(idx);
            for t in quotient.out_neighbors(q) {
                for r in index.ranges_of(t) {
                    for v in r.lo()..r.hi() {
                        assert!(index.reaches_ts(q, v), "{idx} should reach {v} via {t:?}");
                    }
                }
            }
        }

        let _ = sc;
    }

    #[test]
    fn degenerate_single_interval_binary_search_terminates() {
        let mut g = SimpleDigraph::with_nodes(1);
        g.add_edge(NodeId(0), NodeId(0));
        let (sc, _q, index) = build_index(&g);
        let c0 = sc.component_of(0).unwrap();
        assert!(index.reaches_ts(c0, 0));
        assert!(!index.reaches_ts(c0, 1));
    }
}
