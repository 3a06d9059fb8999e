//! Tick cycle: the fixed-order loop that drives the Ameba simulation.
//!
//! Each tick runs these phases in order:
//!
//! 1. **Clock** -- advance simulated time by one step.
//! 2. **Order** -- collect the living organisms and shuffle them with the
//!    seeded RNG so no slot index is favored.
//! 3. **Step** -- every organism still alive perceives, decides, moves,
//!    fights and pays its metabolism according to its life state.
//! 4. **Contacts** -- wall damage, then nutrient claims.
//! 5. **Kinematics** -- integrate bodies. Engulfed prey rides along
//!    inside its predator.
//! 6. **Corpses** -- decay, and release the used-up ones.
//! 7. **Mitosis** -- split every flagged organism that has room.
//! 8. **Balance** -- replenish food and the population floor when due.
//! 9. **Summary** -- census, births, deaths and learners.
//!
//! A death anywhere in a tick makes the organism invisible to every later
//! interaction of that tick. Claims it held are dropped at once.

use ameba_agents::behavior::{self, Engagement};
use ameba_agents::combat::{self, AttackOutcome, DrainStep};
use ameba_agents::{
    AgentError, DeathRecord, FeedingTarget, Lineage, OrganismConfig, OrganismSeed, death, lifecycle,
    mitosis, vitals,
};
use ameba_types::{DeathCause, LifeState, OrganismHandle, OrganismId, OrganismSnapshot, Sighting, Species, Stimulus};
use ameba_world::kinematics::{self, Motion};
use ameba_world::spatial::circles_overlap;
use ameba_world::{NUTRIENT_RADIUS, SpatialQuery, WorldError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::balance::{self, BalanceReport};
use crate::clock::{ClockError, SimClock};
use crate::config::SimulationConfig;
use crate::ecosystem::{Census, Ecosystem};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An organism rule was violated.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A pool operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// A death that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathReport {
    /// Facts about the death.
    pub record: DeathRecord,
    /// The life as it ended, for persistence.
    pub snapshot: Option<OrganismSnapshot>,
}

/// A birth by mitosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthReport {
    /// The organism that split.
    pub parent: OrganismId,
    /// The new organism.
    pub child: OrganismId,
    /// The child's generation.
    pub generation: u32,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulated seconds elapsed at the end of the tick.
    pub time: f64,
    /// Headcount at the end of the tick.
    pub census: Census,
    /// Organisms born this tick.
    pub births: Vec<BirthReport>,
    /// Organisms that died this tick.
    pub deaths: Vec<DeathReport>,
    /// Living organisms that learned something this tick. Only filled
    /// when `persistence.persist_on_learn` is set.
    pub learned: Vec<OrganismSnapshot>,
    /// What balancing added, if it ran this tick.
    pub balance: Option<BalanceReport>,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The simulated clock.
    pub clock: SimClock,
    /// Pools, walls and bounds.
    pub ecosystem: Ecosystem,
    /// Everything tunable.
    pub config: SimulationConfig,
    /// The single seeded source of randomness.
    pub rng: StdRng,
}

impl SimulationState {
    /// Build an empty world from `config`, seeding the RNG from `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a bad tick length.
    pub fn new(config: SimulationConfig) -> Result<Self, ClockError> {
        let clock = SimClock::new(&config.world)?;
        let ecosystem = Ecosystem::new(&config.world, config.hazards.zones(&config.world));
        let rng = StdRng::seed_from_u64(config.world.seed);
        Ok(Self {
            clock,
            ecosystem,
            config,
            rng,
        })
    }

    /// Spawn `count` fresh organisms. Returns how many fit in the pool.
    pub fn seed_population(&mut self, count: usize) -> usize {
        let mut spawned: usize = 0;
        for _ in 0..count {
            match self
                .ecosystem
                .spawn_fresh(&self.config.organism, &mut self.rng)
            {
                Ok(_) => spawned = spawned.saturating_add(1),
                Err(error) => {
                    warn!(%error, requested = count, spawned, "Initial population truncated");
                    break;
                }
            }
        }
        spawned
    }
}

/// Per-tick constants threaded through the phases.
#[derive(Clone, Copy)]
struct Step<'a> {
    tick: u64,
    dt: f64,
    config: &'a OrganismConfig,
}

/// Births and deaths collected while the phases run.
#[derive(Default)]
struct Events {
    births: Vec<BirthReport>,
    deaths: Vec<DeathReport>,
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or an organism invariant
/// is broken. Pool exhaustion and stale handles are not errors.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let SimulationState {
        clock,
        ecosystem,
        config,
        rng,
    } = state;

    let tick = clock.advance()?;
    let step = Step {
        tick,
        dt: clock.dt(),
        config: &config.organism,
    };
    debug!(tick, "Tick started");

    let mut order: Vec<OrganismHandle> = ecosystem
        .organisms
        .iter()
        .filter(|(_, organism)| organism.is_alive())
        .map(|(handle, _)| handle)
        .collect();
    order.shuffle(rng);

    let mut events = Events::default();
    for &handle in &order {
        step_organism(ecosystem, step, handle, rng, &mut events)?;
    }

    for &handle in &order {
        hazard_contact(ecosystem, step, handle, &mut events);
    }
    for &handle in &order {
        nutrient_contact(ecosystem, step, handle)?;
    }

    integrate_bodies(ecosystem, step);
    release_corpses(ecosystem, step)?;
    run_mitosis(ecosystem, step, rng, &mut events)?;

    let balance = clock
        .take_balance_due(config.balance.interval_seconds)
        .then(|| balance::replenish(ecosystem, &config.balance, &config.organism, rng));

    let learned = collect_learners(ecosystem, config.persistence.persist_on_learn);
    let census = ecosystem.census();
    info!(
        tick,
        organisms = census.living(),
        corpses = census.corpses,
        nutrients = census.nutrients,
        births = events.births.len(),
        deaths = events.deaths.len(),
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        time: clock.elapsed(),
        census,
        births: events.births,
        deaths: events.deaths,
        learned,
        balance,
    })
}

// ---------------------------------------------------------------------------
// Phase 3: per-organism step
// ---------------------------------------------------------------------------

fn step_organism(
    eco: &mut Ecosystem,
    step: Step<'_>,
    handle: OrganismHandle,
    rng: &mut StdRng,
    events: &mut Events,
) -> Result<(), TickError> {
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    if !organism.is_alive() {
        return Ok(());
    }
    organism.metrics.time_alive += step.dt;
    organism.attack_cooldown = (organism.attack_cooldown - step.dt).max(0.0);

    if organism.captured_by.is_some() {
        step_captured(eco, step, handle)?;
    } else {
        match organism.state() {
            LifeState::Active => step_active(eco, step, handle, rng, events)?,
            LifeState::Digesting => step_digesting(eco, step, handle, events)?,
            LifeState::Dormant => step_dormant(eco, handle)?,
            LifeState::Dead => {}
        }
    }

    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    vitals::apply_metabolism(organism, step.dt, &step.config.metabolism);
    if vitals::is_exhausted(organism) {
        let cause = death::exhaustion_cause(organism);
        if let Some(record) = death::kill(organism, cause) {
            record_death(eco, step.tick, handle, record, events);
        }
    }
    Ok(())
}

fn perceive(eco: &Ecosystem, handle: OrganismHandle) -> Result<Vec<Sighting>, AgentError> {
    let Some(organism) = eco.organisms.get(handle) else {
        return Ok(Vec::new());
    };
    let radius = organism.sensor_radius()?;
    Ok(eco.query_radius(organism.body.position, radius, Some(handle)))
}

fn step_active(
    eco: &mut Ecosystem,
    step: Step<'_>,
    handle: OrganismHandle,
    rng: &mut StdRng,
    events: &mut Events,
) -> Result<(), TickError> {
    let sightings = perceive(eco, handle)?;
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    let desire = behavior::calculate_desire(
        organism,
        &sightings,
        &step.config.behavior,
        &eco.bounds,
        rng,
    )?;

    let phenotype = *organism.phenotype()?;
    organism.move_timer += step.dt;
    if organism.move_timer >= phenotype.move_interval {
        organism.move_timer = 0.0;
        if !desire.direction.is_zero() {
            let mass = organism.mass();
            organism
                .body
                .apply_impulse(desire.direction * (phenotype.move_force * mass), mass);
            vitals::charge_movement(organism, &step.config.metabolism);
        }
    }

    if lifecycle::should_encyst(organism, desire.food_seen, &step.config.metabolism) {
        let abandoned = lifecycle::enter_dormancy(organism)?;
        debug!(tick = step.tick, id = %organism.id(), "Organism encysted");
        eco.release_claim(handle, abandoned);
        return Ok(());
    }

    let position = organism.body.position;
    for sighting in &sightings {
        if sighting.organism().is_none() {
            continue;
        }
        let Some(organism) = eco.organisms.get(handle) else {
            break;
        };
        let distance = position.distance(sighting.position);
        let Some(engagement) =
            behavior::handle_proximity(organism, sighting, distance, &step.config.combat)?
        else {
            continue;
        };
        if engage(eco, step, handle, engagement, events)? {
            break;
        }
    }
    Ok(())
}

/// Carry out an engagement. Returns whether anything happened.
fn engage(
    eco: &mut Ecosystem,
    step: Step<'_>,
    handle: OrganismHandle,
    engagement: Engagement,
    events: &mut Events,
) -> Result<bool, TickError> {
    match engagement {
        Engagement::Attack(target) => {
            let Some((attacker, victim)) = eco.organisms.get_pair_mut(handle, target) else {
                return Ok(false);
            };
            let attacker_id = attacker.id();
            let victim_id = victim.id();
            match combat::resolve_attack(attacker, handle, victim, target, step.config)? {
                AttackOutcome::Unable => Ok(false),
                AttackOutcome::Rejected => {
                    debug!(tick = step.tick, attacker = %attacker_id, target = %victim_id, "Attack rejected by cyst");
                    Ok(true)
                }
                AttackOutcome::Wounded { damage } => {
                    debug!(tick = step.tick, attacker = %attacker_id, target = %victim_id, damage, "Bite");
                    Ok(true)
                }
                AttackOutcome::Engulfed { abandoned } => {
                    debug!(tick = step.tick, predator = %attacker_id, prey = %victim_id, "Prey engulfed");
                    eco.release_claim(target, abandoned);
                    Ok(true)
                }
                AttackOutcome::Killed {
                    death, reward, ..
                } => {
                    debug!(tick = step.tick, attacker = %attacker_id, reward = ?reward, "Kill");
                    record_death(eco, step.tick, target, death, events);
                    Ok(true)
                }
            }
        }
        Engagement::Scavenge(corpse) => {
            let Some((eater, remains)) = eco.organisms.get_pair_mut(handle, corpse) else {
                return Ok(false);
            };
            Ok(combat::bite_corpse(eater, remains, step.config)?.is_some())
        }
    }
}

fn step_digesting(
    eco: &mut Ecosystem,
    step: Step<'_>,
    handle: OrganismHandle,
    events: &mut Events,
) -> Result<(), TickError> {
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    kinematics::settle(
        &mut organism.body,
        step.dt,
        step.config.motion.digesting_settle_rate,
    );

    match organism.feeding().map(|feeding| feeding.target) {
        Some(FeedingTarget::Nutrient {
            handle: pellet,
            energy_value,
        }) => {
            let still_claimed = eco
                .nutrients
                .get(pellet)
                .is_some_and(|nutrient| nutrient.claimant() == Some(handle));
            if !still_claimed {
                let _ = lifecycle::cancel_feeding(organism);
            } else if lifecycle::advance_feeding(organism, step.dt)
                .is_some_and(|feeding| feeding.is_complete())
            {
                let _ = lifecycle::finish_feeding(organism)?;
                let intake = vitals::feed_nutrient(organism, energy_value, &step.config.metabolism)?;
                debug!(
                    tick = step.tick,
                    id = %organism.id(),
                    value = intake.value,
                    mitosis_ready = intake.mitosis_ready,
                    "Nutrient digested"
                );
                eco.nutrients.release(pellet)?;
            }
        }
        Some(FeedingTarget::Prey(prey)) => {
            let Some((predator, victim)) = eco.organisms.get_pair_mut(handle, prey) else {
                if let Some(predator) = eco.organisms.get_mut(handle) {
                    let _ = lifecycle::cancel_feeding(predator);
                }
                return Ok(());
            };
            match combat::drain_prey(predator, handle, victim, step.dt, step.config)? {
                DrainStep::Consumed { death, reward } => {
                    debug!(tick = step.tick, predator = %predator.id(), reward, "Prey consumed");
                    record_death(eco, step.tick, prey, death, events);
                }
                DrainStep::Escaped => {
                    debug!(tick = step.tick, prey = %victim.id(), "Prey escaped as a cyst");
                }
                DrainStep::Continuing { .. } | DrainStep::Lost => {}
            }
        }
        None => {
            let _ = lifecycle::cancel_feeding(organism);
        }
    }

    encyst_if_starving(eco, step, handle)
}

/// Encyst a digesting organism that is starving and sees no food.
fn encyst_if_starving(
    eco: &mut Ecosystem,
    step: Step<'_>,
    handle: OrganismHandle,
) -> Result<(), TickError> {
    let Some(organism) = eco.organisms.get(handle) else {
        return Ok(());
    };
    if organism.state() != LifeState::Digesting
        || organism.vitals.energy >= organism.vitals.max_energy * step.config.metabolism.dormancy_fraction
    {
        return Ok(());
    }
    let sightings = perceive(eco, handle)?;
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    let food_seen = behavior::perceives_food(organism, &sightings)?;
    if lifecycle::should_encyst(organism, food_seen, &step.config.metabolism) {
        let abandoned = lifecycle::enter_dormancy(organism)?;
        debug!(tick = step.tick, id = %organism.id(), "Digesting organism encysted");
        eco.release_claim(handle, abandoned);
    }
    Ok(())
}

fn step_dormant(eco: &mut Ecosystem, handle: OrganismHandle) -> Result<(), TickError> {
    let sightings = perceive(eco, handle)?;
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    let food_seen = behavior::perceives_food(organism, &sightings)?;
    if lifecycle::should_wake(organism, food_seen) {
        lifecycle::wake(organism)?;
        debug!(id = %organism.id(), "Cyst woke");
    }
    Ok(())
}

/// Engulfed prey sees nothing. It can only encyst to break free.
fn step_captured(eco: &mut Ecosystem, step: Step<'_>, handle: OrganismHandle) -> Result<(), TickError> {
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    if lifecycle::should_encyst(organism, false, &step.config.metabolism) {
        let abandoned = lifecycle::enter_dormancy(organism)?;
        debug!(tick = step.tick, id = %organism.id(), "Captured prey encysted");
        eco.release_claim(handle, abandoned);
    }
    Ok(())
}

fn record_death(
    eco: &mut Ecosystem,
    tick: u64,
    handle: OrganismHandle,
    record: DeathRecord,
    events: &mut Events,
) {
    eco.release_claim(handle, record.abandoned);
    if record.cause != DeathCause::Consumed {
        eco.release_captors(handle);
    }
    let snapshot = eco
        .organisms
        .get(handle)
        .and_then(|organism| organism.snapshot().ok());
    info!(
        tick,
        id = %record.id,
        cause = ?record.cause,
        species = ?record.species,
        generation = record.generation,
        time_alive = record.time_alive,
        "Organism died"
    );
    events.deaths.push(DeathReport { record, snapshot });
}

// ---------------------------------------------------------------------------
// Phase 4: contacts
// ---------------------------------------------------------------------------

fn hazard_contact(eco: &mut Ecosystem, step: Step<'_>, handle: OrganismHandle, events: &mut Events) {
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return;
    };
    if !organism.is_alive() {
        return;
    }
    let (position, radius) = (organism.body.position, organism.radius());
    if !eco
        .hazards
        .iter()
        .any(|hazard| hazard.overlaps_circle(position, radius))
    {
        organism.in_hazard = false;
        return;
    }

    let metabolism = &step.config.metabolism;
    if !organism.in_hazard && organism.state() == LifeState::Active {
        let _ = organism.learn(Stimulus::Wall, metabolism.hazard_contact_signal);
    }
    organism.in_hazard = true;
    let damage = metabolism.hazard_damage_rate * step.dt;
    vitals::spend(organism, damage);
    let _ = organism.learn(Stimulus::Wall, -2.0 * damage);

    if vitals::is_exhausted(organism) {
        let cause = death::exhaustion_cause(organism);
        if let Some(record) = death::kill(organism, cause) {
            record_death(eco, step.tick, handle, record, events);
        }
    }
}

fn nutrient_contact(eco: &mut Ecosystem, step: Step<'_>, handle: OrganismHandle) -> Result<(), TickError> {
    let Some(organism) = eco.organisms.get_mut(handle) else {
        return Ok(());
    };
    if organism.state() != LifeState::Active
        || organism.captured_by.is_some()
        || organism.species() == Some(Species::Predator)
    {
        return Ok(());
    }
    let (position, radius) = (organism.body.position, organism.radius());
    let touched = eco
        .nutrients
        .iter()
        .find(|(_, nutrient)| {
            !nutrient.is_being_consumed()
                && circles_overlap(position, radius, nutrient.position, NUTRIENT_RADIUS)
        })
        .map(|(pellet, nutrient)| (pellet, nutrient.energy_value));
    let Some((pellet, energy_value)) = touched else {
        return Ok(());
    };
    let Some(nutrient) = eco.nutrients.get_mut(pellet) else {
        return Ok(());
    };
    if !nutrient.try_claim(handle) {
        return Ok(());
    }
    lifecycle::begin_digesting(
        organism,
        FeedingTarget::Nutrient {
            handle: pellet,
            energy_value,
        },
        step.config.metabolism.digestion_time,
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Phases 5-7: kinematics, corpses, mitosis
// ---------------------------------------------------------------------------

fn integrate_bodies(eco: &mut Ecosystem, step: Step<'_>) {
    let motion = Motion {
        linear_damping: step.config.motion.linear_damping,
        max_speed: step.config.motion.max_speed,
    };
    for handle in eco.organisms.handles() {
        let Some(organism) = eco.organisms.get_mut(handle) else {
            continue;
        };
        if organism.captured_by.is_some() {
            continue;
        }
        match organism.state() {
            LifeState::Dormant | LifeState::Dead => kinematics::halt(&mut organism.body),
            LifeState::Active | LifeState::Digesting => {
                let distance = kinematics::integrate(&mut organism.body, step.dt, motion, &eco.bounds);
                organism.metrics.distance_traveled += distance;
            }
        }
    }

    let carried: Vec<_> = eco
        .organisms
        .iter()
        .filter_map(|(handle, organism)| {
            let captor = eco.organisms.get(organism.captured_by?)?;
            Some((handle, captor.body.position))
        })
        .collect();
    for (handle, position) in carried {
        if let Some(prey) = eco.organisms.get_mut(handle) {
            prey.body.position = position;
            kinematics::halt(&mut prey.body);
        }
    }
}

fn release_corpses(eco: &mut Ecosystem, step: Step<'_>) -> Result<(), TickError> {
    for handle in eco.organisms.handles() {
        let Some(organism) = eco.organisms.get_mut(handle) else {
            continue;
        };
        if organism.is_alive() {
            continue;
        }
        death::decay_corpse(organism, step.dt, &step.config.metabolism);
        if death::is_depleted(organism, &step.config.metabolism) {
            let id = organism.id();
            eco.organisms.release(handle)?;
            debug!(tick = step.tick, %id, "Corpse released");
        }
    }
    Ok(())
}

fn run_mitosis(
    eco: &mut Ecosystem,
    step: Step<'_>,
    rng: &mut StdRng,
    events: &mut Events,
) -> Result<(), TickError> {
    for handle in eco.organisms.handles() {
        let Some(parent) = eco.organisms.get(handle) else {
            continue;
        };
        if !parent.is_alive() || !parent.mitosis_pending {
            continue;
        }
        let parent_id = parent.id();
        if eco.organisms.is_full() {
            debug!(tick = step.tick, id = %parent_id, "Mitosis deferred, organism pool full");
            continue;
        }
        let Some(mut plan) = mitosis::plan_mitosis(parent, rng)? else {
            continue;
        };
        plan.child_placement.position = eco.bounds.clamp(plan.child_placement.position);

        let seed = OrganismSeed {
            config: step.config,
            lineage: Lineage::Inherited(plan.child.clone()),
        };
        let child = match eco.organisms.acquire(seed, plan.child_placement) {
            Ok(child) => child,
            Err(WorldError::PoolExhausted { .. }) => {
                debug!(tick = step.tick, id = %parent_id, "Mitosis deferred, organism pool full");
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        let abandoned = eco
            .organisms
            .get_mut(handle)
            .and_then(|parent| mitosis::apply_mitosis(parent, &plan, &step.config.combat));
        eco.release_claim(handle, abandoned);

        if let Some(offspring) = eco.organisms.get_mut(child) {
            mitosis::push_child(offspring, &plan, &step.config.combat);
            let birth = BirthReport {
                parent: parent_id,
                child: offspring.id(),
                generation: offspring.generation(),
            };
            info!(
                tick = step.tick,
                parent = %birth.parent,
                child = %birth.child,
                generation = birth.generation,
                "Mitosis"
            );
            events.births.push(birth);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Phase 9: summary helpers
// ---------------------------------------------------------------------------

/// Clear every learned flag. Snapshot the learners when `keep` is set.
fn collect_learners(eco: &mut Ecosystem, keep: bool) -> Vec<OrganismSnapshot> {
    let mut learned = Vec::new();
    for handle in eco.organisms.handles() {
        let Some(organism) = eco.organisms.get_mut(handle) else {
            continue;
        };
        if !organism.take_learned() || !keep || !organism.is_alive() {
            continue;
        }
        learned.extend(organism.snapshot().ok());
    }
    learned
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ameba_agents::{Genome, Inheritance, Memory, Temperament};
    use ameba_types::Vec2;
    use ameba_world::{Hazard, Placement};

    use super::*;

    fn quiet_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.organism_capacity = 8;
        config.world.nutrient_capacity = 8;
        config.hazards.enclose = false;
        config.balance.max_food = 0;
        config
    }

    fn state_with(config: SimulationConfig) -> SimulationState {
        SimulationState::new(config).unwrap()
    }

    fn place(state: &mut SimulationState, genome: Genome, pos: Vec2, capacity: f64) -> OrganismHandle {
        let seed = OrganismSeed {
            config: &state.config.organism,
            lineage: Lineage::Inherited(Inheritance {
                genome,
                temperament: Temperament::new(1.0, 5.0, 4.0),
                memory: Memory::innate(),
                generation: 0,
                energy: capacity,
                max_energy: capacity,
            }),
        };
        state
            .ecosystem
            .organisms
            .acquire(seed, Placement::at(pos))
            .unwrap()
    }

    fn pellet_at(state: &mut SimulationState, pos: Vec2) -> ameba_types::NutrientHandle {
        let pellet = state
            .ecosystem
            .spawn_nutrient(10.0, &mut state.rng)
            .unwrap();
        state.ecosystem.nutrients.get_mut(pellet).unwrap().position = pos;
        pellet
    }

    fn run(state: &mut SimulationState, ticks: usize) -> Vec<TickSummary> {
        (0..ticks).map(|_| run_tick(state).unwrap()).collect()
    }

    #[test]
    fn summary_reports_tick_time_and_census() {
        let mut state = state_with(quiet_config());
        assert_eq!(state.seed_population(3), 3);
        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.tick, 1);
        assert!((summary.time - 0.1).abs() < 1e-9);
        assert_eq!(summary.census.living(), 3);
        assert!(summary.births.is_empty());
        assert!(summary.deaths.is_empty());
    }

    #[test]
    fn seeding_stops_at_pool_capacity() {
        let mut state = state_with(quiet_config());
        assert_eq!(state.seed_population(20), 8);
    }

    #[test]
    fn touching_a_nutrient_digests_it_then_releases_it() {
        let mut state = state_with(quiet_config());
        let pos = Vec2::new(20.0, 20.0);
        let eater = place(&mut state, Genome::from_counts(9, 0, 0), pos, 100.0);
        let pellet = pellet_at(&mut state, pos);

        let _ = run_tick(&mut state).unwrap();
        let organism = state.ecosystem.organisms.get(eater).unwrap();
        assert_eq!(organism.state(), LifeState::Digesting);
        assert_eq!(
            state.ecosystem.nutrients.get(pellet).unwrap().claimant(),
            Some(eater)
        );

        let _ = run(&mut state, 25);
        let organism = state.ecosystem.organisms.get(eater).unwrap();
        assert!(!state.ecosystem.nutrients.contains(pellet));
        assert!((organism.metrics.energy_consumed - 10.0).abs() < 1e-9);
        assert!(organism.memory().opinion(Stimulus::Food) > 0.0);
    }

    #[test]
    fn two_organisms_cannot_claim_the_same_nutrient() {
        let mut state = state_with(quiet_config());
        let pos = Vec2::new(20.0, 20.0);
        let a = place(&mut state, Genome::from_counts(9, 0, 0), pos, 100.0);
        let b = place(&mut state, Genome::from_counts(0, 0, 9), pos, 100.0);
        let pellet = pellet_at(&mut state, pos);

        let _ = run_tick(&mut state).unwrap();
        let digesting = [a, b]
            .iter()
            .filter(|h| state.ecosystem.organisms.get(**h).unwrap().state() == LifeState::Digesting)
            .count();
        assert_eq!(digesting, 1);
        let claimant = state.ecosystem.nutrients.get(pellet).unwrap().claimant();
        assert!(claimant == Some(a) || claimant == Some(b));
    }

    #[test]
    fn predators_ignore_nutrients() {
        let mut state = state_with(quiet_config());
        let pos = Vec2::new(20.0, 20.0);
        let hunter = place(&mut state, Genome::from_counts(0, 9, 0), pos, 100.0);
        let pellet = pellet_at(&mut state, pos);
        let _ = run_tick(&mut state).unwrap();
        assert_eq!(
            state.ecosystem.organisms.get(hunter).unwrap().state(),
            LifeState::Active
        );
        assert!(!state.ecosystem.nutrients.get(pellet).unwrap().is_being_consumed());
    }

    #[test]
    fn starvation_leaves_a_corpse_that_is_released_once() {
        let mut state = state_with(quiet_config());
        let body = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(5.0, 5.0), 100.0);
        state.ecosystem.organisms.get_mut(body).unwrap().vitals.energy = 0.1;

        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.deaths.len(), 1);
        let report = summary.deaths.first().unwrap();
        assert_eq!(report.record.cause, DeathCause::Starvation);
        assert!(report.snapshot.is_some());
        assert_eq!(summary.census.corpses, 1);
        assert_eq!(summary.census.living(), 0);

        state.ecosystem.organisms.get_mut(body).unwrap().corpse_biomass = 0.05;
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.deaths.is_empty());
        assert_eq!(summary.census.corpses, 0);
        assert!(!state.ecosystem.organisms.contains(body));

        let summary = run_tick(&mut state).unwrap();
        assert!(summary.deaths.is_empty());
    }

    #[test]
    fn walls_teach_and_kill() {
        let mut config = quiet_config();
        config.hazards.walls = vec![Hazard::new(Vec2::new(9.0, 9.0), Vec2::new(11.0, 11.0))];
        let mut state = state_with(config);
        let survivor = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(10.0, 10.0), 100.0);
        let doomed = place(&mut state, Genome::from_counts(0, 0, 9), Vec2::new(10.5, 10.5), 100.0);
        state.ecosystem.organisms.get_mut(doomed).unwrap().vitals.energy = 0.5;

        let summary = run_tick(&mut state).unwrap();
        let death = summary
            .deaths
            .iter()
            .find(|report| {
                Some(report.record.id) == state.ecosystem.organisms.get(doomed).map(|o| o.id())
            })
            .unwrap();
        assert_eq!(death.record.cause, DeathCause::Hazard);

        let organism = state.ecosystem.organisms.get(survivor).unwrap();
        assert!(organism.in_hazard);
        assert!(organism.memory().opinion(Stimulus::Wall) < 0.0);
        assert!(organism.vitals.energy < 100.0);
    }

    #[test]
    fn learners_are_reported_only_when_enabled() {
        for enabled in [false, true] {
            let mut config = quiet_config();
            config.persistence.persist_on_learn = enabled;
            config.hazards.walls = vec![Hazard::new(Vec2::new(9.0, 9.0), Vec2::new(11.0, 11.0))];
            let mut state = state_with(config);
            let _ = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(10.0, 10.0), 100.0);
            let summary = run_tick(&mut state).unwrap();
            assert_eq!(summary.learned.len(), usize::from(enabled));
        }
    }

    #[test]
    fn predator_engulfs_and_consumes_smaller_prey() {
        let mut state = state_with(quiet_config());
        let hunter = place(&mut state, Genome::from_counts(0, 9, 0), Vec2::new(20.0, 20.0), 400.0);
        let prey = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(21.5, 20.0), 200.0);
        let prey_id = state.ecosystem.organisms.get(prey).unwrap().id();
        let hunter_id = state.ecosystem.organisms.get(hunter).unwrap().id();

        let _ = run_tick(&mut state).unwrap();
        let captured = state.ecosystem.organisms.get(prey).unwrap();
        assert_eq!(captured.captured_by, Some(hunter));
        assert_eq!(
            captured.body.position,
            state.ecosystem.organisms.get(hunter).unwrap().body.position
        );
        assert_eq!(
            state.ecosystem.organisms.get(hunter).unwrap().state(),
            LifeState::Digesting
        );

        let summaries = run(&mut state, 60);
        let consumed = summaries
            .iter()
            .flat_map(|s| s.deaths.iter())
            .find(|report| report.record.id == prey_id)
            .unwrap();
        assert_eq!(consumed.record.cause, DeathCause::Consumed);
        assert!(!state.ecosystem.organisms.contains(prey));
        assert!(
            summaries
                .iter()
                .flat_map(|s| s.births.iter())
                .any(|birth| birth.parent == hunter_id)
        );
    }

    #[test]
    fn cysts_teach_predators_to_stay_away() {
        let mut state = state_with(quiet_config());
        let hunter = place(&mut state, Genome::from_counts(0, 9, 0), Vec2::new(20.0, 20.0), 300.0);
        let prey = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(21.0, 20.0), 100.0);
        state.ecosystem.organisms.get_mut(prey).unwrap().vitals.energy = 30.0;

        let _ = run(&mut state, 15);
        let hunter = state.ecosystem.organisms.get(hunter).unwrap();
        assert!(hunter.memory().opinion(Stimulus::Cyst) < 0.0);
        let prey = state.ecosystem.organisms.get(prey).unwrap();
        assert!(prey.is_alive());
        assert!(prey.captured_by.is_none());
    }

    #[test]
    fn flagged_organisms_split_when_a_slot_is_free() {
        let mut state = state_with(quiet_config());
        let parent = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(20.0, 20.0), 200.0);
        state.ecosystem.organisms.get_mut(parent).unwrap().mitosis_pending = true;

        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.births.len(), 1);
        assert_eq!(summary.census.living(), 2);
        let birth = summary.births.first().unwrap();
        assert_eq!(birth.generation, 1);
        let parent = state.ecosystem.organisms.get(parent).unwrap();
        assert!(!parent.mitosis_pending);
        assert!((parent.vitals.max_energy - 100.0).abs() < 1e-9);
    }

    #[test]
    fn mitosis_waits_for_a_free_slot() {
        let mut config = quiet_config();
        config.world.organism_capacity = 1;
        let mut state = state_with(config);
        let parent = place(&mut state, Genome::from_counts(9, 0, 0), Vec2::new(20.0, 20.0), 200.0);
        state.ecosystem.organisms.get_mut(parent).unwrap().mitosis_pending = true;

        let summary = run_tick(&mut state).unwrap();
        assert!(summary.births.is_empty());
        assert!(state.ecosystem.organisms.get(parent).unwrap().mitosis_pending);
    }

    #[test]
    fn balancing_runs_on_its_interval() {
        let mut config = quiet_config();
        config.balance.max_food = 5;
        let mut state = state_with(config);
        let summaries = run(&mut state, 5);
        let ran: Vec<u64> = summaries
            .iter()
            .filter(|s| s.balance.is_some())
            .map(|s| s.tick)
            .collect();
        assert_eq!(ran, vec![5]);
        assert_eq!(summaries.last().unwrap().census.nutrients, 5);
    }
}
