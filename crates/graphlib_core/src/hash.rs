//! Deterministic hasher used for the quotient dedup set and adjacency maps.
//!
//! Construction (SCC pass, quotient-edge dedup) must be reproducible run to
//! run for the same input, so a fixed-seed hasher is used instead of the
//! std default's randomized one.

use std::hash::BuildHasher;

pub use foldhash::fast::{FixedState, FoldHasher as DefaultHasher};

const FIXED_HASHER: FixedState =
    FixedState::with_seed(0b1001010111101110000001001100010000000011001001101011001001111000);

/// Deterministic hasher based on a random but fixed state.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHasher;

impl BuildHasher for FixedHasher {
    type Hasher = DefaultHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASHER.build_hasher()
    }
}
