//! Error types for hotlru

use thiserror::Error;

/// Result type alias for hotlru operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the cache and its recency sequence.
///
/// A missing key is not an error: lookups return `Option`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Capacity must be at least 1
    #[error("Invalid capacity: {0} (must be greater than 0)")]
    InvalidCapacity(usize),

    /// `pop_least_recent` was called on an empty sequence
    #[error("Recency sequence is empty")]
    EmptySequence,
}
