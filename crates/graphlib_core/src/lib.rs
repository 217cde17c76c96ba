//! Compact transitive-closure and strongly-connected-components engine for
//! sparse directed graphs.
//!
//! The core pipeline is: [`scc::StrongComponents`] (one iterative Tarjan
//! pass) feeds [`quotient::QuotientGraph`] (the condensed DAG), which feeds
//! [`closure::ClosureIndex`] (an interval-encoded reachability index giving
//! O(log k) `reaches(u, v)` queries). [`engine::CompactClosure`] wires the
//! three together behind a `Fresh -> Ready -> Built` lifecycle. On top of
//! that, [`transitivity::Transitivity`] and `StrongComponents` expose the
//! closure/reduction operations a caller actually wants:
//! transitive-closure materialization, transitive reduction, and making a
//! digraph transitive in place.
//!
//! Callers bring their own graph by implementing [`digraph::Digraph`] (and
//! [`digraph::MutableDigraph`] for the operations that add or remove
//! edges); [`simple_digraph::SimpleDigraph`] is a minimal concrete
//! implementation provided for tests and for callers without one already.

pub mod closure;
pub mod digraph;
pub mod engine;
pub mod error;
mod hash;
pub mod interval;
pub mod matrix;
pub mod quotient;
pub mod reduction;
pub mod scc;
pub mod simple_digraph;
pub mod toposort;
pub mod transitivity;

pub use digraph::{Digraph, EdgeId, Filter, MutableDigraph, NoFilter, NodeId, QuotientId};
pub use engine::{CompactClosure, EngineState};
pub use error::{GraphError, Result};
pub use interval::IRange;
pub use quotient::QuotientGraph;
pub use scc::StrongComponents;
pub use simple_digraph::SimpleDigraph;
pub use transitivity::{CompactMatrixView, Transitivity};

pub(crate) use hash::FixedHasher;
