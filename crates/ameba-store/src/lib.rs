//! Persistence for the Ameba simulation.
//!
//! Snapshots are plain JSON files in a per-session directory. At the end
//! of a run the session is folded into one cumulative CSV dataset.
//!
//! ```text
//! death / shutdown
//!     |
//!     +-- Recorder (threshold policy, logs failures)
//!           |
//!           +-- SessionStore  --> <base>/Sim_YYYY-MM-DD_HH-MM-SS/<id>.json
//!
//! end of run
//!     +-- export_dataset      --> <base>/Global_Dataset.csv
//! ```
//!
//! # Modules
//!
//! - [`session`] -- Session directory and the `SnapshotSink` trait
//! - [`recorder`] -- Which lives to save, delete or flush
//! - [`dataset`] -- CSV export with write-once header
//! - [`error`] -- Error types

pub mod dataset;
pub mod error;
pub mod recorder;
pub mod session;

pub use dataset::{DATASET_COLUMNS, export_dataset};
pub use error::StoreError;
pub use recorder::{DeathOutcome, Recorder};
pub use session::{SessionStore, SnapshotSink};
