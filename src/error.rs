//! Error types returned by `ChainedHashMap`.

use thiserror::Error;

/// Result alias for fallible map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every error is local to the call that produced it; the map is left
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `add` was called with a key that is already present.
    #[error("duplicate key")]
    DuplicateKey,

    /// `get`/`get_mut` was called with a key that is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A constructor argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
