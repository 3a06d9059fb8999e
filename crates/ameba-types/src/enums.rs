//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

/// One gene in a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Allele {
    /// Favors speed and wide perception, never attacks.
    Pacifist,
    /// Favors force and damage, enables attacks.
    Predator,
    /// Favors capacity and late reproduction.
    Neutral,
}

impl Allele {
    /// All allele kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Pacifist, Self::Predator, Self::Neutral];
}

/// Dominant species resolved from a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Forager that flees threats.
    Pacifist,
    /// Hunter of smaller organisms and scavenger of corpses.
    Predator,
    /// Forager that defends itself against predators.
    Neutral,
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Pacifist => "pacifist",
            Self::Predator => "predator",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Life stage of an organism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeState {
    /// Perceiving, moving and feeding (trophozoite).
    Active,
    /// Consuming a nutrient or engulfed prey.
    Digesting,
    /// Low-metabolism cyst waiting for food.
    Dormant,
    /// Terminal. The organism lingers as a corpse until depleted.
    Dead,
}

impl LifeState {
    /// Whether the organism still takes part in the simulation as a living cell.
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Dead)
    }
}

/// Category reported by the spatial query for every overlapping entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A nutrient pellet.
    Food,
    /// A hazard rectangle.
    Wall,
    /// A living organism, active or dormant.
    Organism,
    /// A dead organism with residual biomass.
    Corpse,
}

/// Stimulus tag keying an organism's learned opinions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stimulus {
    /// Nutrient pellets.
    Food,
    /// Hazard walls.
    Wall,
    /// Other organisms in general (prey, from a hunter's point of view).
    Organism,
    /// Organisms of the Predator species.
    Predator,
    /// Corpse biomass.
    Corpse,
    /// Dormant organisms that reject attacks.
    Cyst,
}

/// Why an organism died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Energy exhausted by metabolism.
    Starvation,
    /// Energy driven to zero by a bite.
    Combat,
    /// Fully consumed by an engulfing predator. Leaves no corpse.
    Consumed,
    /// Energy exhausted while standing in a hazard wall.
    Hazard,
}

impl DeathCause {
    /// Whether this death leaves a corpse behind.
    pub const fn leaves_corpse(self) -> bool {
        !matches!(self, Self::Consumed)
    }
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Combat => write!(f, "combat"),
            Self::Consumed => write!(f, "consumed"),
            Self::Hazard => write!(f, "hazard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dead_is_not_alive() {
        assert!(LifeState::Active.is_alive());
        assert!(LifeState::Digesting.is_alive());
        assert!(LifeState::Dormant.is_alive());
        assert!(!LifeState::Dead.is_alive());
    }

    #[test]
    fn consumed_prey_leaves_no_corpse() {
        assert!(!DeathCause::Consumed.leaves_corpse());
        assert!(DeathCause::Combat.leaves_corpse());
        assert!(DeathCause::Starvation.leaves_corpse());
    }

    #[test]
    fn stimulus_serializes_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Stimulus::Food, 0.5_f64);
        let json = serde_json::to_string(&map).ok();
        assert_eq!(json.as_deref(), Some(r#"{"Food":0.5}"#));
    }
}
