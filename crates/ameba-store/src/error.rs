//! Error types for the persistence layer.
//!
//! The simulation never aborts on a [`StoreError`]. The
//! [`Recorder`](crate::Recorder) logs them and moves on.

use std::path::PathBuf;

/// Errors that can occur while saving, deleting or exporting snapshots.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A snapshot could not be serialized or parsed.
    #[error("snapshot JSON error in {path}: {source}")]
    Json {
        /// The snapshot file involved.
        path: PathBuf,
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// A dataset row could not be written.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// The dataset file involved.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// The session directory is missing or is not a directory.
    #[error("invalid session directory: {path}")]
    InvalidSessionDir {
        /// The path that was expected to be a session directory.
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
