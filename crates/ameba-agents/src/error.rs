//! Error types for the ameba-agents crate.
//!
//! Only programming errors surface here. Contested claims, stale
//! handles and unknown stimuli are ordinary outcomes and never become
//! errors.

use ameba_types::{LifeState, OrganismId};

/// Errors that can occur during organism state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Behavior was requested from an organism whose phenotype was never
    /// resolved, i.e. a pool slot that skipped the reset contract.
    #[error("organism {id} has no resolved phenotype")]
    MissingPhenotype {
        /// The organism that was queried.
        id: OrganismId,
    },

    /// A lifecycle transition was requested from a state that does not allow it.
    #[error("organism {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// The organism whose state was changed.
        id: OrganismId,
        /// The state it was in.
        from: LifeState,
        /// The state that was requested.
        to: LifeState,
    },

    /// An operation that needs a living organism was given a dead one.
    #[error("organism {id} is not alive")]
    NotAlive {
        /// The dead organism.
        id: OrganismId,
    },
}
