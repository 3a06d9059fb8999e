//! Initial world population.
//!
//! Seeds `world.initial_organisms` random organisms, then runs one
//! balancing pass so the run starts with a full larder instead of
//! waiting for the first balance interval.

use ameba_core::balance;
use ameba_core::tick::SimulationState;
use tracing::warn;

/// What seeding placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Organisms spawned.
    pub organisms: usize,
    /// Nutrients spawned.
    pub nutrients: usize,
}

/// Populate an empty world.
pub fn seed_world(state: &mut SimulationState) -> SeedReport {
    let requested = state.config.world.initial_organisms;
    let organisms = state.seed_population(requested);
    if organisms < requested {
        warn!(
            requested,
            spawned = organisms,
            capacity = state.config.world.organism_capacity,
            "Organism pool is smaller than the initial population"
        );
    }

    let food = balance::replenish(
        &mut state.ecosystem,
        &state.config.balance,
        &state.config.organism,
        &mut state.rng,
    );

    SeedReport {
        organisms: organisms.saturating_add(food.organisms_spawned),
        nutrients: food.nutrients_spawned,
    }
}
