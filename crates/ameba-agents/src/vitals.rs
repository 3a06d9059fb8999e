//! Energy economy and growth.
//!
//! All energy arithmetic on an organism goes through this module:
//!
//! - metabolic drain by life state and the per-impulse movement cost
//! - nutrient intake, capped at capacity, with the capacity growth bonus
//!   that stops at `growth_cap_factor` times the reproduction threshold
//! - absorption with overflow: energy beyond capacity becomes capacity
//! - the kill reward, which grows capacity and refills energy
//!
//! Size is never stored. It is recomputed from capacity each time it is
//! read, so it only changes when capacity does.

use ameba_types::{LifeState, Species, Stimulus};

use crate::config::{CombatConfig, MetabolismConfig};
use crate::error::AgentError;
use crate::organism::Organism;

/// Smallest size an organism can shrink to.
pub const MIN_SIZE: f64 = 0.5;

/// Capacity per unit of size.
pub const ENERGY_PER_SIZE: f64 = 100.0;

/// Size for a given capacity. Monotonically non-decreasing.
pub fn size_for_capacity(max_energy: f64) -> f64 {
    (max_energy / ENERGY_PER_SIZE).max(MIN_SIZE)
}

/// Drain energy for `dt` seconds at the rate of the current state.
///
/// Energy never goes below zero. The dead do not metabolize.
pub fn apply_metabolism(organism: &mut Organism, dt: f64, config: &MetabolismConfig) {
    let rate = match organism.state() {
        LifeState::Active => config.active_drain,
        LifeState::Digesting => config.digesting_drain,
        LifeState::Dormant => config.dormant_drain,
        LifeState::Dead => return,
    };
    spend(organism, rate * dt);
}

/// Charge the cost of one movement impulse.
pub fn charge_movement(organism: &mut Organism, config: &MetabolismConfig) {
    let cost = config.move_cost_per_size * organism.size();
    spend(organism, cost);
}

/// Remove `amount` of energy, flooring at zero.
pub fn spend(organism: &mut Organism, amount: f64) {
    organism.vitals.energy = (organism.vitals.energy - amount.max(0.0)).max(0.0);
}

/// Whether the organism's energy is exhausted.
pub fn is_exhausted(organism: &Organism) -> bool {
    organism.vitals.energy <= 0.0
}

/// Result of digesting one nutrient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientIntake {
    /// Energy value after the species multiplier.
    pub value: f64,
    /// Energy actually added below the cap.
    pub energy_gained: f64,
    /// Capacity added by the growth bonus.
    pub capacity_gained: f64,
    /// Whether the organism is now ready to split.
    pub mitosis_ready: bool,
}

/// Digest a nutrient of `energy_value`.
///
/// Energy is capped at the current capacity first. Then, while capacity
/// is below `growth_cap_factor` times the reproduction threshold, it
/// grows by the same value. Finally the organism learns that food is good.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn feed_nutrient(
    organism: &mut Organism,
    energy_value: f64,
    config: &MetabolismConfig,
) -> Result<NutrientIntake, AgentError> {
    let (species, threshold) = {
        let phenotype = organism.phenotype()?;
        (phenotype.species, phenotype.reproduction_threshold)
    };
    let value = if species == Species::Neutral {
        energy_value * config.neutral_food_multiplier
    } else {
        energy_value
    };

    let before = organism.vitals.energy;
    organism.vitals.energy = (before + value).min(organism.vitals.max_energy);
    let energy_gained = organism.vitals.energy - before;

    let capacity_gained = if organism.vitals.max_energy < threshold * config.growth_cap_factor {
        organism.vitals.max_energy += value;
        value
    } else {
        0.0
    };

    organism.metrics.energy_consumed += value;
    let _ = organism.learn(Stimulus::Food, value);
    let mitosis_ready = flag_mitosis(organism)?;

    Ok(NutrientIntake {
        value,
        energy_gained,
        capacity_gained,
        mitosis_ready,
    })
}

/// Add `amount` of energy, turning any excess over capacity into capacity.
///
/// Returns the capacity gained through overflow.
pub fn absorb(organism: &mut Organism, amount: f64) -> f64 {
    let amount = amount.max(0.0);
    organism.vitals.energy += amount;
    organism.metrics.energy_consumed += amount;
    let overflow = (organism.vitals.energy - organism.vitals.max_energy).max(0.0);
    organism.vitals.max_energy += overflow;
    overflow
}

/// Grant the kill reward for a victim of `victim_capacity`.
///
/// The reward is added to capacity and energy is refilled to the new
/// capacity. Returns the reward.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn receive_kill_reward(
    killer: &mut Organism,
    victim_capacity: f64,
    config: &CombatConfig,
) -> Result<f64, AgentError> {
    let reward = victim_capacity.max(0.0) * config.kill_reward_fraction;
    killer.vitals.max_energy += reward;
    killer.vitals.energy = killer.vitals.max_energy;
    killer.metrics.energy_consumed += reward;
    let _ = killer.learn(Stimulus::Organism, reward);
    let _ = flag_mitosis(killer)?;
    Ok(reward)
}

/// Set the mitosis flag if capacity reached the reproduction threshold.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn flag_mitosis(organism: &mut Organism) -> Result<bool, AgentError> {
    let threshold = organism.phenotype()?.reproduction_threshold;
    if organism.is_alive() && organism.vitals.max_energy >= threshold {
        organism.mitosis_pending = true;
    }
    Ok(organism.mitosis_pending)
}
