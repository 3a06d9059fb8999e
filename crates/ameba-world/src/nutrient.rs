//! Passive nutrient pellets.
//!
//! A nutrient carries a fixed energy value and a single-writer claim. The
//! first organism to touch it claims it for the length of its digestion.
//! Any later claimant is refused without error. When digestion completes,
//! the nutrient is released back to its pool. If digestion is cancelled,
//! the claim is dropped and the pellet becomes edible again.

use ameba_types::{OrganismHandle, Vec2};

use crate::pool::{Placement, Resettable};

/// Body radius of a nutrient pellet.
pub const NUTRIENT_RADIUS: f64 = 0.25;

/// A nutrient pellet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nutrient {
    /// Energy granted to the organism that digests it.
    pub energy_value: f64,
    /// Where the pellet sits.
    pub position: Vec2,
    claimed_by: Option<OrganismHandle>,
}

impl Nutrient {
    /// Whether some organism is currently digesting this pellet.
    pub const fn is_being_consumed(&self) -> bool {
        self.claimed_by.is_some()
    }

    /// The organism holding the claim, if any.
    pub const fn claimant(&self) -> Option<OrganismHandle> {
        self.claimed_by
    }

    /// Try to claim the pellet for `organism`.
    ///
    /// Returns `true` only for the first claimant. A second claim in the
    /// same tick (or any tick before release) is a no-op returning `false`.
    pub fn try_claim(&mut self, organism: OrganismHandle) -> bool {
        if self.claimed_by.is_some() {
            return false;
        }
        self.claimed_by = Some(organism);
        true
    }

    /// Drop the claim held by `organism`. Claims held by others are untouched.
    pub fn abandon(&mut self, organism: OrganismHandle) {
        if self.claimed_by == Some(organism) {
            self.claimed_by = None;
        }
    }
}

/// Seed for a freshly placed nutrient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientSeed {
    /// Energy value of the new pellet.
    pub energy_value: f64,
}

impl Resettable<NutrientSeed> for Nutrient {
    fn reset(&mut self, seed: NutrientSeed, placement: Placement) {
        self.energy_value = seed.energy_value;
        self.position = placement.position;
        self.claimed_by = None;
    }
}
