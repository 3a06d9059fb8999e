//! Persisted organism snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Allele, Species, Stimulus};
use crate::ids::OrganismId;

/// Everything persistence stores about one organism life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismSnapshot {
    /// Persistent identity.
    pub id: OrganismId,
    /// Number of mitosis events between this organism and its gen-0 ancestor.
    pub generation: u32,
    /// Genome, in gene order.
    pub genome: Vec<Allele>,
    /// Dominant species.
    pub species: Species,
    /// Learned opinions. Absent tags are unknown.
    pub memory: BTreeMap<Stimulus, f64>,
    /// Seconds alive.
    pub time_alive: f64,
    /// Total distance moved.
    pub distance_traveled: f64,
    /// Total energy taken in from food, prey and corpses.
    pub energy_consumed: f64,
}
