//! The compact transitive-closure engine: wires the SCC pass, quotient
//! construction, and interval-encoded closure builder together behind a
//! `Fresh -> Ready -> Built` lifecycle.

use crate::digraph::{Digraph, QuotientId};
use crate::closure::ClosureIndex;
use crate::error::{GraphError, Result};
use crate::quotient::QuotientGraph;
use crate::scc::StrongComponents;

/// Lifecycle state of a [`CompactClosure`] engine.
///
/// Query operations are only valid in `Built`. Calling `run` while `Built`
/// transitions back through `Ready` first via an internal reset. Mutating
/// the source digraph after `run` completes (without calling `reset`) is
/// documented as undefined behavior — queries consult stale `component`,
/// `start`/`end`, and range-pool artifacts that no longer correspond to the
/// live graph, which this type has no way to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Fresh,
    Ready,
    Built,
}

/// The compact closure artifacts: strongly connected components, the
/// quotient DAG, and the interval-encoded reachability index, plus the
/// source digraph they were built from.
///
/// Query methods (`reaches`, `components`, `quotient`) borrow `&self` only
/// and never mutate these artifacts, so concurrent read-only queries from
/// multiple threads are sound for `G: Sync` once `Built`.
pub struct CompactClosure<'g, G: Digraph> {
    state: EngineState,
    dg: Option<&'g G>,
    components: Option<StrongComponents<G::Node>>,
    quotient: Option<QuotientGraph>,
    index: Option<ClosureIndex>,
}

impl<'g, G: Digraph> Default for CompactClosure<'g, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g, G: Digraph> CompactClosure<'g, G> {
    /// A fresh, unbuilt engine.
    pub fn new() -> Self {
        CompactClosure {
            state: EngineState::Fresh,
            dg: None,
            components: None,
            quotient: None,
            index: None,
        }
    }

    /// Builds and runs an engine against `dg` in one step.
    pub fn build(dg: &'g G) -> Self {
        let mut engine = Self::new();
        engine.run(dg);
        engine
    }

    /// Discards all built artifacts, returning to `Ready`.
    pub fn reset(&mut self) {
        self.state = EngineState::Ready;
        self.dg = None;
        self.components = None;
        self.quotient = None;
        self.index = None;
    }

    /// Runs the SCC pass, builds the quotient DAG, and builds the
    /// interval-encoded closure, in that order. If the engine was already
    /// `Built`, it is reset first.
    pub fn run(&mut self, dg: &'g G) {
        if self.state == EngineState::Built {
            self.reset();
        }
        let components = StrongComponents::compute(dg);
        let quotient = QuotientGraph::build(dg, &components);
        let index = ClosureIndex::build(&quotient);
        log::debug!(
            "compact closure built: {} nodes, {} components, {} ranges in the pool",
            dg.node_count(),
            components.component_count(),
            index.total_ranges(),
        );
        self.dg = Some(dg);
        self.components = Some(components);
        self.quotient = Some(quotient);
        self.index = Some(index);
        self.state = EngineState::Built;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    fn ensure_built(&self) -> Result<()> {
        if self.state != EngineState::Built {
            return Err(GraphError::UnsupportedOperation(
                "queries are only valid once run() has completed",
            ));
        }
        Ok(())
    }

    /// `reaches(u, v)`: component lookup, then (if `u` and `v` are in
    /// different components) a binary search over `u`'s component's
    /// interval slice for `v`'s topological number.
    pub fn reaches(&self, u: G::Node, v: G::Node) -> Result<bool> {
        self.ensure_built()?;
        let dg = self.dg.expect("dg is set whenever state is Built");
        let components = self.components.as_ref().unwrap();
        let index = self.index.as_ref().unwrap();

        let cu = components.component_of(dg.node_id(u));
        let cv = components.component_of(dg.node_id(v));
        let (cu, cv) = match (cu, cv) {
            (Some(cu), Some(cv)) => (cu, cv),
            _ => return Ok(false),
        };
        if cu == cv {
            return Ok(true);
        }
        Ok(index.reaches_ts(cu, cv.index() as i64))
    }

    pub fn components(&self) -> Result<&StrongComponents<G::Node>> {
        self.ensure_built()?;
        Ok(self.components.as_ref().unwrap())
    }

    pub fn quotient(&self) -> Result<&QuotientGraph> {
        self.ensure_built()?;
        Ok(self.quotient.as_ref().unwrap())
    }

    pub fn index(&self) -> Result<&ClosureIndex> {
        self.ensure_built()?;
        Ok(self.index.as_ref().unwrap())
    }

    pub fn ts_num(&self, q: QuotientId) -> i64 {
        q.index() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digraph::NodeId;
    use crate::simple_digraph::SimpleDigraph;

    #[test]
    fn queries_before_run_are_rejected() {
        let engine: CompactClosure<'_, SimpleDigraph> = CompactClosure::new();
        assert!(engine.reaches(NodeId(0), NodeId(0)).is_err());
    }

    #[test]
    fn chain_reachability() {
        let mut g = SimpleDigraph::with_nodes(4);
        for i in 0..3 {
            g.add_edge(NodeId(i), NodeId(i + 1));
        }
        let engine = CompactClosure::build(&g);
        assert!(engine.reaches(NodeId(0), NodeId(3)).unwrap());
        assert!(!engine.reaches(NodeId(3), NodeId(0)).unwrap());
        for i in 0..4 {
            assert!(engine.reaches(NodeId(i), NodeId(i)).unwrap());
        }
    }

    #[test]
    fn rerunning_resets_first() {
        let mut g1 = SimpleDigraph::with_nodes(2);
        g1.add_edge(NodeId(0), NodeId(1));
        let mut engine = CompactClosure::build(&g1);
        assert!(engine.reaches(NodeId(0), NodeId(1)).unwrap());

        let mut g2 = SimpleDigraph::with_nodes(2);
        g2.add_edge(NodeId(1), NodeId(0));
        engine.run(&g2);
        assert!(engine.reaches(NodeId(1), NodeId(0)).unwrap());
        assert!(!engine.reaches(NodeId(0), NodeId(1)).unwrap());
    }

    #[test]
    fn single_node_no_edges_reaches_itself() {
        let g = SimpleDigraph::with_nodes(1);
        let engine = CompactClosure::build(&g);
        assert!(engine.reaches(NodeId(0), NodeId(0)).unwrap());
    }

    #[test]
    fn two_node_cycle_all_pairs_reach() {
        let mut g = SimpleDigraph::with_nodes(2);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(0));
        let engine = CompactClosure::build(&g);
        for i in 0..2 {
            for j in 0..2 {
                assert!(engine.reaches(NodeId(i), NodeId(j)).unwrap());
            }
        }
    }
}
