//! Species behavior strategies.
//!
//! Each species is a `Strategy`: a small table of pure functions that
//! decide how a sighting is appraised, whether it counts as food, and
//! whether it is worth engaging at close range. [`calculate_desire`]
//! folds the appraisals through the organism's memory and temperament
//! into one unit steering vector.
//!
//! For every appraised sighting the contribution is, with
//! `prox = 1 / (distance + epsilon)`:
//!
//! ```text
//! unknown tag     Curious    +dir * curiosity * prox
//!                 Wary       -dir * fear * prox
//!                 Drawn(w)   +dir * greed * w * prox
//! opinion > 0                +dir * opinion * value * greed * prox
//! opinion < 0                -dir * |opinion| * value * fear * prox
//! opinion = 0                nothing
//! ```
//!
//! plus an instinct term `dir * instinct * prox` that memory cannot
//! change. Predators value prey energy and corpse biomass as a fraction
//! of their own capacity. Walls are measured to their nearest boundary
//! point and keep their sighting's heading, so an organism pressed
//! against or inside a wall is still pushed out of it.

use std::f64::consts::TAU;

use ameba_types::{Category, OrganismHandle, Sighting, Species, Stimulus, Vec2};
use ameba_world::Bounds;
use rand::Rng;

use crate::combat;
use crate::config::{BehaviorConfig, CombatConfig};
use crate::error::AgentError;
use crate::organism::Organism;

/// How an organism reacts to a tag it has never learned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Explore it with the curiosity weight.
    Curious,
    /// Avoid it with the fear weight.
    Wary,
    /// Ignore it until something is learned.
    Indifferent,
    /// Pursue it with the greed weight times this factor.
    Drawn(f64),
}

/// A strategy's reading of one sighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appraisal {
    /// Memory tag the sighting is judged by.
    pub stimulus: Stimulus,
    /// Perceived value.
    pub value: f64,
    /// Reaction while the tag is unknown.
    pub unknown: Response,
    /// Fixed signed pull that memory does not affect.
    pub instinct: f64,
}

impl Appraisal {
    const fn new(stimulus: Stimulus, value: f64, unknown: Response) -> Self {
        Self {
            stimulus,
            value,
            unknown,
            instinct: 0.0,
        }
    }

    const fn with_instinct(mut self, instinct: f64) -> Self {
        self.instinct = instinct;
        self
    }
}

/// What produced a desire vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesireSource {
    /// The summed stimulus force.
    Stimuli,
    /// A random direction after forces cancelled around visible food.
    TieBreak,
    /// Steering toward the held wander destination.
    Wander,
    /// Nothing to do (zero sensor radius).
    Idle,
}

/// Result of one desire computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Desire {
    /// Unit steering vector, or zero when idle.
    pub direction: Vec2,
    /// Whether anything this species eats was perceived.
    pub food_seen: bool,
    /// Which branch produced the direction.
    pub source: DesireSource,
}

/// A close-range action chosen by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engagement {
    /// Attack a living organism.
    Attack(OrganismHandle),
    /// Bite a corpse.
    Scavenge(OrganismHandle),
}

/// What a strategy knows about the organism running it.
#[derive(Debug, Clone, Copy)]
struct Observer {
    size: f64,
    capacity: f64,
    can_attack: bool,
}

impl Observer {
    const fn meal_share(&self, biomass: f64) -> f64 {
        if self.capacity > 0.0 {
            biomass / self.capacity
        } else {
            biomass
        }
    }
}

struct Strategy {
    appraise: fn(&Observer, &Sighting, &BehaviorConfig) -> Option<Appraisal>,
    is_food: fn(&Observer, &Sighting) -> bool,
    engage: fn(&Observer, &Sighting) -> Option<Engagement>,
}

const fn strategy(species: Species) -> &'static Strategy {
    match species {
        Species::Pacifist => &PACIFIST,
        Species::Predator => &PREDATOR,
        Species::Neutral => &NEUTRAL,
    }
}

fn is_corpse_with_biomass(sighting: &Sighting) -> bool {
    sighting.category == Category::Corpse && sighting.value > 0.0
}

// ---------------------------------------------------------------------------
// Pacifist: eats nutrients, flees walls and large predators, never attacks
// ---------------------------------------------------------------------------

const PACIFIST: Strategy = Strategy {
    appraise: pacifist_appraise,
    is_food: grazer_is_food,
    engage: never_engage,
};

fn pacifist_appraise(
    observer: &Observer,
    sighting: &Sighting,
    config: &BehaviorConfig,
) -> Option<Appraisal> {
    match sighting.category {
        Category::Food => Some(Appraisal::new(
            Stimulus::Food,
            sighting.value,
            Response::Curious,
        )),
        Category::Wall => Some(Appraisal::new(Stimulus::Wall, 1.0, Response::Wary)),
        Category::Organism
            if sighting.species == Some(Species::Predator)
                && sighting.size >= observer.size * config.threat_size_ratio =>
        {
            Some(Appraisal::new(Stimulus::Predator, 1.0, Response::Wary))
        }
        Category::Organism => Some(Appraisal::new(
            Stimulus::Organism,
            1.0,
            Response::Indifferent,
        )),
        Category::Corpse => None,
    }
}

const fn never_engage(_: &Observer, _: &Sighting) -> Option<Engagement> {
    None
}

fn grazer_is_food(_: &Observer, sighting: &Sighting) -> bool {
    sighting.category == Category::Food
}

// ---------------------------------------------------------------------------
// Predator: hunts smaller organisms and corpses, ignores nutrients
// ---------------------------------------------------------------------------

const PREDATOR: Strategy = Strategy {
    appraise: predator_appraise,
    is_food: predator_is_food,
    engage: predator_engage,
};

fn predator_appraise(
    observer: &Observer,
    sighting: &Sighting,
    config: &BehaviorConfig,
) -> Option<Appraisal> {
    match sighting.category {
        Category::Food => None,
        Category::Wall => Some(Appraisal::new(Stimulus::Wall, 1.0, Response::Curious)),
        Category::Corpse if sighting.value > 0.0 => Some(Appraisal::new(
            Stimulus::Corpse,
            observer.meal_share(sighting.value),
            Response::Drawn(config.corpse_weight),
        )),
        Category::Corpse => None,
        Category::Organism if sighting.dormant => {
            Some(Appraisal::new(Stimulus::Cyst, 1.0, Response::Curious))
        }
        Category::Organism if sighting.species == Some(Species::Predator) => Some(
            Appraisal::new(Stimulus::Predator, 1.0, Response::Indifferent)
                .with_instinct(-config.personal_space_weight),
        ),
        Category::Organism if sighting.size < observer.size => Some(
            Appraisal::new(
                Stimulus::Organism,
                observer.meal_share(sighting.value),
                Response::Curious,
            )
            .with_instinct(config.prey_instinct_weight),
        ),
        Category::Organism => Some(Appraisal::new(
            Stimulus::Organism,
            observer.meal_share(sighting.value),
            Response::Indifferent,
        )),
    }
}

fn predator_is_food(_: &Observer, sighting: &Sighting) -> bool {
    match sighting.category {
        Category::Corpse => is_corpse_with_biomass(sighting),
        Category::Organism => !sighting.dormant && sighting.species != Some(Species::Predator),
        Category::Food | Category::Wall => false,
    }
}

fn predator_engage(_: &Observer, sighting: &Sighting) -> Option<Engagement> {
    let handle = sighting.organism()?;
    match sighting.category {
        Category::Organism if sighting.species != Some(Species::Predator) => {
            Some(Engagement::Attack(handle))
        }
        Category::Corpse if is_corpse_with_biomass(sighting) => Some(Engagement::Scavenge(handle)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Neutral: eats nutrients, ignores organisms, bites back at predators
// ---------------------------------------------------------------------------

const NEUTRAL: Strategy = Strategy {
    appraise: neutral_appraise,
    is_food: grazer_is_food,
    engage: neutral_engage,
};

fn neutral_appraise(_: &Observer, sighting: &Sighting, _: &BehaviorConfig) -> Option<Appraisal> {
    match sighting.category {
        Category::Food => Some(Appraisal::new(
            Stimulus::Food,
            sighting.value,
            Response::Curious,
        )),
        Category::Wall => Some(Appraisal::new(Stimulus::Wall, 1.0, Response::Curious)),
        Category::Organism | Category::Corpse => None,
    }
}

fn neutral_engage(observer: &Observer, sighting: &Sighting) -> Option<Engagement> {
    if observer.can_attack
        && sighting.category == Category::Organism
        && sighting.species == Some(Species::Predator)
    {
        sighting.organism().map(Engagement::Attack)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Desire and proximity
// ---------------------------------------------------------------------------

fn observe(organism: &Organism) -> Result<(Species, Observer), AgentError> {
    let phenotype = organism.phenotype()?;
    Ok((
        phenotype.species,
        Observer {
            size: organism.size(),
            capacity: organism.vitals.max_energy,
            can_attack: phenotype.can_attack,
        },
    ))
}

/// Whether any sighting is something this organism eats.
///
/// Dormant organisms use this to decide when to wake.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn perceives_food(organism: &Organism, sightings: &[Sighting]) -> Result<bool, AgentError> {
    let (species, observer) = observe(organism)?;
    let is_food = strategy(species).is_food;
    Ok(sightings.iter().any(|s| is_food(&observer, s)))
}

fn contribution(
    organism: &Organism,
    appraisal: &Appraisal,
    direction: Vec2,
    proximity: f64,
) -> Vec2 {
    let temperament = organism.temperament();
    let memory = organism.memory();
    let instinct = direction * (appraisal.instinct * proximity);
    let learned = if memory.is_unknown(appraisal.stimulus) {
        match appraisal.unknown {
            Response::Curious => direction * (temperament.curiosity * proximity),
            Response::Wary => -direction * (temperament.fear * proximity),
            Response::Drawn(weight) => direction * (temperament.greed * weight * proximity),
            Response::Indifferent => Vec2::ZERO,
        }
    } else {
        let opinion = memory.opinion(appraisal.stimulus);
        let weight = if opinion > 0.0 {
            temperament.greed
        } else {
            temperament.fear
        };
        direction * (opinion * appraisal.value * weight * proximity)
    };
    instinct + learned
}

/// Compute the organism's steering vector for this tick.
///
/// Also maintains the held wander destination: it is cleared whenever a
/// stimulus force wins and replaced only once the organism comes within
/// `wander_epsilon` of it. New destinations lie on the sensor circle,
/// clamped to `bounds`.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn calculate_desire(
    organism: &mut Organism,
    sightings: &[Sighting],
    config: &BehaviorConfig,
    bounds: &Bounds,
    rng: &mut impl Rng,
) -> Result<Desire, AgentError> {
    let (species, observer) = observe(organism)?;
    let strategy = strategy(species);
    let position = organism.body.position;

    let mut force = Vec2::ZERO;
    let mut food_seen = false;
    for sighting in sightings {
        food_seen |= (strategy.is_food)(&observer, sighting);
        let Some(appraisal) = (strategy.appraise)(&observer, sighting, config) else {
            continue;
        };
        let offset = sighting.focus() - position;
        let direction = sighting.direction_from(position);
        if direction.is_zero() {
            continue;
        }
        let proximity = (offset.length() + config.proximity_epsilon).recip();
        force += contribution(organism, &appraisal, direction, proximity);
    }

    if !force.is_zero() {
        organism.wander_target = None;
        return Ok(Desire {
            direction: force.normalized(),
            food_seen,
            source: DesireSource::Stimuli,
        });
    }
    if food_seen {
        return Ok(Desire {
            direction: Vec2::from_angle(rng.random_range(0.0..TAU)),
            food_seen,
            source: DesireSource::TieBreak,
        });
    }

    let radius = organism.sensor_radius()?;
    if radius <= 0.0 {
        return Ok(Desire {
            direction: Vec2::ZERO,
            food_seen,
            source: DesireSource::Idle,
        });
    }
    let target = match organism.wander_target {
        Some(target) if target.distance(position) > config.wander_epsilon => target,
        _ => bounds.clamp(position + Vec2::from_angle(rng.random_range(0.0..TAU)) * radius),
    };
    organism.wander_target = Some(target);
    Ok(Desire {
        direction: (target - position).normalized(),
        food_seen,
        source: DesireSource::Wander,
    })
}

/// Decide whether to act on a nearby organism or corpse.
///
/// `distance` is center to center. The target must be within attack
/// range plus its own radius, and the organism must be off cooldown.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn handle_proximity(
    organism: &Organism,
    other: &Sighting,
    distance: f64,
    config: &CombatConfig,
) -> Result<Option<Engagement>, AgentError> {
    let (species, observer) = observe(organism)?;
    if !combat::is_ready(organism)
        || distance > combat::attack_range(organism, config) + other.size * 0.5
    {
        return Ok(None);
    }
    Ok((strategy(species).engage)(&observer, other))
}
