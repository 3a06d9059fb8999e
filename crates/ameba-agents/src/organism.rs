//! The organism record and its reset contract.
//!
//! An [`Organism`] lives in a pool slot. Every acquire runs
//! [`Resettable::reset`] with an [`OrganismSeed`], which fully
//! reinitializes the record from either a fresh genome or an inheritance
//! produced by mitosis. Both paths resolve the phenotype from the genome.
//! No other code path initializes an organism.

use ameba_types::{
    Body, DeathCause, LifeState, NutrientHandle, OrganismHandle, OrganismId, OrganismSnapshot,
    Species, Stimulus, Vec2,
};
use ameba_world::{Placement, Resettable};

use crate::config::OrganismConfig;
use crate::error::AgentError;
use crate::genome::{Genome, Phenotype, resolve_phenotype};
use crate::memory::Memory;
use crate::temperament::Temperament;
use crate::vitals;

/// Current and maximum energy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vitals {
    /// Current energy.
    pub energy: f64,
    /// Energy capacity. Drives size.
    pub max_energy: f64,
}

/// Write-only accumulators read by persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Seconds alive.
    pub time_alive: f64,
    /// Total distance moved.
    pub distance_traveled: f64,
    /// Total energy taken in.
    pub energy_consumed: f64,
}

/// What a digesting organism is consuming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedingTarget {
    /// A claimed nutrient and the energy it will yield.
    Nutrient {
        /// The claimed pellet.
        handle: NutrientHandle,
        /// Energy value captured at claim time.
        energy_value: f64,
    },
    /// Engulfed prey being drained.
    Prey(OrganismHandle),
}

/// A feeding in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feeding {
    /// What is being consumed.
    pub target: FeedingTarget,
    /// Seconds spent so far.
    pub elapsed: f64,
    /// Seconds the feeding lasts at most.
    pub duration: f64,
}

impl Feeding {
    /// Whether the feeding has run its full duration.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Everything a child receives from its parent at mitosis.
#[derive(Debug, Clone, PartialEq)]
pub struct Inheritance {
    /// The parent's genome, verbatim.
    pub genome: Genome,
    /// The parent's temperament, verbatim.
    pub temperament: Temperament,
    /// Deep copy of the parent's memory.
    pub memory: Memory,
    /// Parent generation plus one.
    pub generation: u32,
    /// Starting energy.
    pub energy: f64,
    /// Starting capacity.
    pub max_energy: f64,
}

/// Where an organism's initial state comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Lineage {
    /// A generation-zero organism.
    Fresh {
        /// Newly generated genome.
        genome: Genome,
        /// Newly drawn temperament.
        temperament: Temperament,
    },
    /// A child produced by mitosis.
    Inherited(Inheritance),
}

/// Seed passed to the reset contract.
#[derive(Debug, Clone)]
pub struct OrganismSeed<'a> {
    /// Tunables for phenotype resolution.
    pub config: &'a OrganismConfig,
    /// Fresh or inherited starting state.
    pub lineage: Lineage,
}

/// One organism: a pool slot's worth of state.
#[derive(Debug, Clone)]
pub struct Organism {
    id: OrganismId,
    generation: u32,
    genome: Genome,
    phenotype: Option<Phenotype>,
    temperament: Temperament,
    memory: Memory,
    learned: bool,
    pub(crate) state: LifeState,
    pub(crate) feeding: Option<Feeding>,
    /// Energy and capacity.
    pub vitals: Vitals,
    /// Kinematic body.
    pub body: Body,
    /// Persistence accumulators.
    pub metrics: Metrics,
    /// Held wander destination.
    pub wander_target: Option<Vec2>,
    /// Seconds accumulated toward the next movement impulse.
    pub move_timer: f64,
    /// Seconds until the next attack is allowed.
    pub attack_cooldown: f64,
    /// Predator currently engulfing this organism.
    pub captured_by: Option<OrganismHandle>,
    /// Whether the body overlapped a wall at the last contact pass.
    pub in_hazard: bool,
    /// Residual biomass once dead.
    pub corpse_biomass: f64,
    /// Cause of death once dead.
    pub death: Option<DeathCause>,
    /// Set when capacity reached the reproduction threshold.
    pub mitosis_pending: bool,
}

impl Default for Organism {
    /// A vacant slot: dead, no phenotype, waiting for its first reset.
    fn default() -> Self {
        Self {
            id: OrganismId::new(),
            generation: 0,
            genome: Genome::default(),
            phenotype: None,
            temperament: Temperament::default(),
            memory: Memory::new(),
            learned: false,
            state: LifeState::Dead,
            feeding: None,
            vitals: Vitals::default(),
            body: Body::default(),
            metrics: Metrics::default(),
            wander_target: None,
            move_timer: 0.0,
            attack_cooldown: 0.0,
            captured_by: None,
            in_hazard: false,
            corpse_biomass: 0.0,
            death: None,
            mitosis_pending: false,
        }
    }
}

impl Resettable<OrganismSeed<'_>> for Organism {
    fn reset(&mut self, seed: OrganismSeed<'_>, placement: Placement) {
        let (genome, temperament, memory, generation, vitals) = match seed.lineage {
            Lineage::Fresh {
                genome,
                temperament,
            } => {
                let capacity = resolve_phenotype(&genome, &seed.config.traits).starting_capacity;
                let vitals = Vitals {
                    energy: capacity,
                    max_energy: capacity,
                };
                (genome, temperament, Memory::innate(), 0, vitals)
            }
            Lineage::Inherited(inheritance) => {
                let vitals = Vitals {
                    energy: inheritance.energy.min(inheritance.max_energy),
                    max_energy: inheritance.max_energy,
                };
                (
                    inheritance.genome,
                    inheritance.temperament,
                    inheritance.memory,
                    inheritance.generation,
                    vitals,
                )
            }
        };

        self.id = OrganismId::new();
        self.generation = generation;
        self.phenotype = Some(resolve_phenotype(&genome, &seed.config.traits));
        self.genome = genome;
        self.temperament = temperament;
        self.memory = memory;
        self.learned = false;
        self.state = LifeState::Active;
        self.feeding = None;
        self.vitals = vitals;
        self.body = Body::at_rest(placement.position, placement.rotation);
        self.metrics = Metrics::default();
        self.wander_target = None;
        self.move_timer = 0.0;
        self.attack_cooldown = 0.0;
        self.captured_by = None;
        self.in_hazard = false;
        self.corpse_biomass = 0.0;
        self.death = None;
        self.mitosis_pending = false;
    }
}

impl Organism {
    /// Build a standalone organism through the reset contract.
    pub fn spawn(seed: OrganismSeed<'_>, placement: Placement) -> Self {
        let mut organism = Self::default();
        organism.reset(seed, placement);
        organism
    }

    /// Persistent identity of this life.
    pub const fn id(&self) -> OrganismId {
        self.id
    }

    /// Generation counter.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// The immutable genome.
    pub const fn genome(&self) -> &Genome {
        &self.genome
    }

    /// The resolved phenotype.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingPhenotype`] for a slot that never went
    /// through the reset contract.
    pub fn phenotype(&self) -> Result<&Phenotype, AgentError> {
        self.phenotype
            .as_ref()
            .ok_or(AgentError::MissingPhenotype { id: self.id })
    }

    /// Dominant species, if resolved.
    pub fn species(&self) -> Option<Species> {
        self.phenotype.as_ref().map(|p| p.species)
    }

    /// Temperament weights.
    pub const fn temperament(&self) -> Temperament {
        self.temperament
    }

    /// Override the temperament weights.
    pub const fn set_temperament(&mut self, temperament: Temperament) {
        self.temperament = temperament;
    }

    /// Read-only view of the learned opinions.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Record a learning event.
    pub fn learn(&mut self, tag: Stimulus, signed_delta: f64) -> f64 {
        self.learned = true;
        self.memory.learn(tag, signed_delta)
    }

    /// Whether anything was learned since the last call. Clears the flag.
    pub const fn take_learned(&mut self) -> bool {
        let learned = self.learned;
        self.learned = false;
        learned
    }

    /// Current life state.
    pub const fn state(&self) -> LifeState {
        self.state
    }

    /// Whether the organism is alive (any state but Dead).
    pub const fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// The feeding in progress, if Digesting.
    pub const fn feeding(&self) -> Option<&Feeding> {
        self.feeding.as_ref()
    }

    /// Size derived from capacity.
    pub fn size(&self) -> f64 {
        vitals::size_for_capacity(self.vitals.max_energy)
    }

    /// Mass used for impulses. Equal to size.
    pub fn mass(&self) -> f64 {
        self.size()
    }

    /// Radius of the body circle.
    pub fn radius(&self) -> f64 {
        self.size() * 0.5
    }

    /// Perception radius: the phenotype's sensor radius scaled by size.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
    pub fn sensor_radius(&self) -> Result<f64, AgentError> {
        Ok(self.phenotype()?.sensor_radius * self.size())
    }

    /// Snapshot for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
    pub fn snapshot(&self) -> Result<OrganismSnapshot, AgentError> {
        Ok(OrganismSnapshot {
            id: self.id,
            generation: self.generation,
            genome: self.genome.alleles().to_vec(),
            species: self.phenotype()?.species,
            memory: self.memory.to_map(),
            time_alive: self.metrics.time_alive,
            distance_traveled: self.metrics.distance_traveled,
            energy_consumed: self.metrics.energy_consumed,
        })
    }
}
