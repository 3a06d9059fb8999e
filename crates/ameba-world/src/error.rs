//! Error types for the `ameba-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use ameba_types::KeyData;

/// Errors that can occur during pool and world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// Every slot in the pool is in use.
    #[error("{pool} pool exhausted (capacity {capacity})")]
    PoolExhausted {
        /// Name of the pool that ran out of slots.
        pool: &'static str,
        /// Maximum number of slots.
        capacity: usize,
    },

    /// The handle refers to a slot that was released or reacquired.
    #[error("stale handle into {pool} pool: {key:?}")]
    StaleHandle {
        /// Name of the pool the handle was used against.
        pool: &'static str,
        /// Raw key named by the handle.
        key: KeyData,
    },
}
