//! Error kinds raised by this crate.
//!
//! Mirrors the three failure categories a closure/reachability engine can
//! surface to a caller: a malformed argument, an operation the result type
//! doesn't support (e.g. mutating a [`CompactClosure`](crate::CompactClosure)
//! view), and a concurrent-modification hazard detected on a long-lived
//! iterator.

use std::fmt;

/// Errors raised by `graphlib_core` operations.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// A node or edge handed to a mutating operation didn't come from the
    /// digraph it was supposed to belong to, or refers to an edge that was
    /// already removed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not supported on this result type (e.g. `set` on a
    /// [`CompactClosure`](crate::CompactClosure) matrix view).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// A long-lived iterator observed that its source digraph was mutated
    /// after the iterator was created.
    #[error("digraph was modified after this iterator was created")]
    ConcurrentModification,
}

impl GraphError {
    pub(crate) fn invalid_argument(msg: impl fmt::Display) -> Self {
        GraphError::InvalidArgument(msg.to_string())
    }
}

/// Convenience alias for this crate's fallible return type.
pub type Result<T> = std::result::Result<T, GraphError>;
