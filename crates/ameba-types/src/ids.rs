//! Identifiers and pool handles.
//!
//! Two kinds of identity exist in the simulation:
//!
//! - [`OrganismId`] is the persistent identity of one organism's life. It
//!   keys snapshot files and dataset rows and is regenerated every time a
//!   pool slot is reset.
//! - Pool handles ([`OrganismHandle`], [`NutrientHandle`]) are
//!   `slotmap` keys. A handle stays valid only while the slot
//!   it names has not been released, so a released-and-reacquired slot
//!   never aliases an older reference.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Persistent identity of a single organism life.
    OrganismId
}

new_key_type! {
    /// Handle to an organism slot (living, dormant, or corpse).
    pub struct OrganismHandle;

    /// Handle to a nutrient slot.
    pub struct NutrientHandle;
}
