//! Shared type definitions for the Ameba organism simulation.
//!
//! Every crate in the workspace speaks in these types. They carry no
//! behavior beyond small geometric helpers.
//!
//! # Modules
//!
//! - [`ids`] -- Persistent organism identifiers and slotmap pool handles
//! - [`enums`] -- Alleles, species, life states, stimulus tags, death causes
//! - [`geometry`] -- `Vec2` and the kinematic `Body`
//! - [`perception`] -- Sightings returned by the spatial query
//! - [`snapshot`] -- The persisted organism snapshot

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod perception;
pub mod snapshot;

pub use enums::{Allele, Category, DeathCause, LifeState, Species, Stimulus};
pub use geometry::{Body, Vec2};
pub use ids::{NutrientHandle, OrganismHandle, OrganismId};
pub use perception::{Sighting, SightingTarget};
pub use snapshot::OrganismSnapshot;
pub use slotmap::{Key, KeyData};
