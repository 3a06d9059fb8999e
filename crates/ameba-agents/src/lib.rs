//! Organism mechanics for the Ameba simulation.
//!
//! This crate owns everything that happens to one organism or to a pair
//! of organisms: how a genome resolves into traits, how memory learns,
//! how a species steers, how energy flows, and how lives end and begin.
//! World iteration and pool management live in `ameba-core`.
//!
//! # Modules
//!
//! - [`organism`] -- The organism record and its reset contract
//! - [`genome`] -- Genomes, allele counts and phenotype resolution
//! - [`memory`] -- Per-stimulus opinions and the learning rule
//! - [`temperament`] -- Curiosity, greed and fear weights
//! - [`behavior`] -- Species strategies, desire and proximity decisions
//! - [`lifecycle`] -- Active, Digesting, Dormant and Dead transitions
//! - [`vitals`] -- Metabolism, feeding, growth and kill rewards
//! - [`combat`] -- Bites, engulfment, cyst rejection and scavenging
//! - [`death`] -- The single entry into Dead, and corpse biomass
//! - [`mitosis`] -- Splitting a parent into two halves
//! - [`config`] -- Tunable constants
//! - [`error`] -- Error types

pub mod behavior;
pub mod combat;
pub mod config;
pub mod death;
pub mod error;
pub mod genome;
pub mod lifecycle;
pub mod memory;
pub mod mitosis;
pub mod organism;
pub mod temperament;
pub mod vitals;

pub use behavior::{Desire, DesireSource, Engagement, calculate_desire, handle_proximity};
pub use combat::{AttackOutcome, CorpseBite, DrainStep};
pub use config::OrganismConfig;
pub use death::DeathRecord;
pub use error::AgentError;
pub use genome::{Genome, Phenotype, resolve_phenotype};
pub use memory::Memory;
pub use mitosis::MitosisPlan;
pub use organism::{FeedingTarget, Inheritance, Lineage, Organism, OrganismSeed};
pub use temperament::Temperament;
