//! World balancing.
//!
//! Runs every `balance.interval_seconds` of simulated time. Nutrients are
//! topped up to `max_food` at random positions, and fresh organisms are
//! respawned while the living population is below `min_organisms`.
//! Running out of pool slots ends the pass early. It is not an error.

use ameba_agents::OrganismConfig;
use rand::Rng;
use tracing::debug;

use crate::config::BalanceConfig;
use crate::ecosystem::Ecosystem;

/// What one balancing pass added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceReport {
    /// Nutrients placed.
    pub nutrients_spawned: usize,
    /// Fresh organisms spawned to hold the population floor.
    pub organisms_spawned: usize,
}

/// Top up nutrients and hold the population floor.
pub fn replenish(
    ecosystem: &mut Ecosystem,
    balance: &BalanceConfig,
    organism: &OrganismConfig,
    rng: &mut impl Rng,
) -> BalanceReport {
    let mut report = BalanceReport::default();

    let missing_food = balance
        .max_food
        .saturating_sub(ecosystem.nutrients.active_count());
    for _ in 0..missing_food {
        match ecosystem.spawn_nutrient(balance.nutrient_energy, rng) {
            Ok(_) => report.nutrients_spawned = report.nutrients_spawned.saturating_add(1),
            Err(error) => {
                debug!(%error, "Nutrient replenishment stopped early");
                break;
            }
        }
    }

    let missing_organisms = balance
        .min_organisms
        .saturating_sub(ecosystem.living_count());
    for _ in 0..missing_organisms {
        match ecosystem.spawn_fresh(organism, rng) {
            Ok(_) => report.organisms_spawned = report.organisms_spawned.saturating_add(1),
            Err(error) => {
                debug!(%error, "Population floor respawn stopped early");
                break;
            }
        }
    }

    if report != BalanceReport::default() {
        debug!(
            nutrients = report.nutrients_spawned,
            organisms = report.organisms_spawned,
            "World balanced"
        );
    }
    report
}
