//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the run, so
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ameba_core::config::ConfigError,
    },

    /// The simulated clock rejected the configuration.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ameba_core::clock::ClockError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ameba_core::runner::RunnerError,
    },

    /// The session directory or dataset could not be written.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: ameba_store::StoreError,
    },
}
