use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by the fallible operations of the tree and the map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested key is not stored in the map.
    #[error("no such key")]
    KeyNotFound,
    /// The arena could not grow to hold one more node.
    #[error("failed to allocate a tree node: {0}")]
    Alloc(#[from] TryReserveError),
    /// The index type cannot address one more node.
    #[error("reached maximum number of nodes")]
    CapacityExceeded,
}

pub type Result<T> = std::result::Result<T, Error>;
