//! Dense reachability matrices: the secondary, enumerable output of the
//! engine.
//!
//! Both the lazy, query-backed view over a [`crate::CompactClosure`] and the
//! fully materialized bit matrix implement the same [`Matrix`] trait so
//! callers can treat them uniformly; only the materialized variant supports
//! `set`, since a query-backed view has no bits of its own to mutate.
//!
//! All matrices here are indexed by dense node id (`0..node_attr_size`),
//! not by the caller's node handle type, since the materializer has to walk
//! every pair in that id space regardless of what the handle type is.

use crate::error::{GraphError, Result};
use fixedbitset::FixedBitSet;

/// A boolean matrix over node ids. `get` is always supported; `set` is only
/// supported on matrices that actually own their bits.
pub trait Matrix {
    fn get(&self, u: usize, v: usize) -> bool;

    fn set(&mut self, _u: usize, _v: usize, _value: bool) -> Result<()> {
        Err(GraphError::UnsupportedOperation(
            "this matrix view does not support mutation",
        ))
    }
}

/// A dense reachability matrix backed by one growable bitset per row,
/// rather than a single contiguous `n*n`-bit buffer.
///
/// This keeps chains longer than `sqrt(2^31)` nodes addressable: a single
/// contiguous bit buffer would need a 64-bit byte-offset computation that
/// risks overflow on 32-bit address arithmetic for huge `n`, whereas
/// per-row bitsets only ever need a `usize` index within one row.
pub struct DenseBitMatrix {
    rows: Vec<FixedBitSet>,
}

impl DenseBitMatrix {
    /// An all-`false` matrix over `n` node ids.
    pub fn empty(n: usize) -> Self {
        DenseBitMatrix {
            rows: (0..n).map(|_| FixedBitSet::with_capacity(n)).collect(),
        }
    }

    pub fn node_attr_size(&self) -> usize {
        self.rows.len()
    }
}

impl Matrix for DenseBitMatrix {
    fn get(&self, u: usize, v: usize) -> bool {
        self.rows[u][v]
    }

    fn set(&mut self, u: usize, v: usize, value: bool) -> Result<()> {
        self.rows[u].set(v, value);
        Ok(())
    }
}
