//! Death and corpses.
//!
//! [`kill`] is the single entry into the Dead state. It is idempotent:
//! killing an organism that is already dead returns `None`, so whoever
//! lands the fatal blow first is the only one that sees a
//! [`DeathRecord`]. Everything else (kill rewards, persistence) keys off
//! that record.

use ameba_types::{DeathCause, LifeState, OrganismId, Species};

use crate::config::MetabolismConfig;
use crate::organism::{FeedingTarget, Organism};

/// Facts about a death, produced exactly once per organism life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathRecord {
    /// Who died.
    pub id: OrganismId,
    /// Why.
    pub cause: DeathCause,
    /// Their species.
    pub species: Option<Species>,
    /// Their generation.
    pub generation: u32,
    /// Capacity at the moment of death.
    pub capacity: f64,
    /// Seconds they lived.
    pub time_alive: f64,
    /// The feeding they abandoned, so claims can be released.
    pub abandoned: Option<FeedingTarget>,
}

/// Pick the cause for an organism whose energy ran out on its own.
pub const fn exhaustion_cause(organism: &Organism) -> DeathCause {
    if organism.in_hazard {
        DeathCause::Hazard
    } else {
        DeathCause::Starvation
    }
}

/// Kill a living organism.
///
/// Remaining energy is discarded. The capacity becomes corpse biomass
/// unless the cause consumes the body entirely.
pub fn kill(organism: &mut Organism, cause: DeathCause) -> Option<DeathRecord> {
    if !organism.is_alive() {
        return None;
    }
    let capacity = organism.vitals.max_energy;
    let abandoned = organism.feeding.take().map(|feeding| feeding.target);
    organism.state = LifeState::Dead;
    organism.death = Some(cause);
    organism.vitals.energy = 0.0;
    organism.corpse_biomass = if cause.leaves_corpse() { capacity } else { 0.0 };
    organism.captured_by = None;
    organism.mitosis_pending = false;
    organism.wander_target = None;
    ameba_world::kinematics::halt(&mut organism.body);
    Some(DeathRecord {
        id: organism.id(),
        cause,
        species: organism.species(),
        generation: organism.generation(),
        capacity,
        time_alive: organism.metrics.time_alive,
        abandoned,
    })
}

/// Whether a dead organism still has biomass above the floor.
pub fn is_edible_corpse(organism: &Organism, config: &MetabolismConfig) -> bool {
    !organism.is_alive() && organism.corpse_biomass > config.corpse_floor
}

/// Remove up to `amount` biomass from a corpse.
///
/// Returns the biomass actually removed. Residual biomass never goes
/// negative. Once it reaches the floor it is zeroed, and later bites
/// remove nothing.
pub fn take_biomass(corpse: &mut Organism, amount: f64, config: &MetabolismConfig) -> f64 {
    if !is_edible_corpse(corpse, config) {
        return 0.0;
    }
    let taken = amount.max(0.0).min(corpse.corpse_biomass);
    corpse.corpse_biomass -= taken;
    if corpse.corpse_biomass <= config.corpse_floor {
        corpse.corpse_biomass = 0.0;
    }
    taken
}

/// Let a corpse decay for `dt` seconds.
pub fn decay_corpse(corpse: &mut Organism, dt: f64, config: &MetabolismConfig) {
    let _ = take_biomass(corpse, config.corpse_decay_rate * dt, config);
}

/// Whether a corpse is used up and ready to be released.
pub fn is_depleted(organism: &Organism, config: &MetabolismConfig) -> bool {
    !organism.is_alive() && organism.corpse_biomass <= config.corpse_floor
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ameba_types::Vec2;

    use super::*;
    use crate::config::OrganismConfig;
    use crate::genome::Genome;
    use crate::organism::tests::organism_with;

    fn organism(config: &OrganismConfig) -> Organism {
        organism_with(config, Genome::from_counts(9, 0, 0), Vec2::ZERO)
    }

    #[test]
    fn kill_is_reported_once() {
        let config = OrganismConfig::default();
        let mut victim = organism(&config);
        let record = kill(&mut victim, DeathCause::Combat).unwrap();
        assert_eq!(record.cause, DeathCause::Combat);
        assert!((record.capacity - 100.0).abs() < f64::EPSILON);
        assert!(kill(&mut victim, DeathCause::Starvation).is_none());
        assert_eq!(victim.death, Some(DeathCause::Combat));
    }

    #[test]
    fn consumed_organisms_leave_no_biomass() {
        let config = OrganismConfig::default();
        let mut victim = organism(&config);
        let _ = kill(&mut victim, DeathCause::Consumed);
        assert!(victim.corpse_biomass.abs() < f64::EPSILON);
        assert!(is_depleted(&victim, &config.metabolism));
    }

    #[test]
    fn corpse_depletes_strictly_and_never_goes_negative() {
        let config = OrganismConfig::default();
        let mut corpse = organism(&config);
        let _ = kill(&mut corpse, DeathCause::Starvation);
        let mut previous = corpse.corpse_biomass;
        let mut bites = 0;
        while !is_depleted(&corpse, &config.metabolism) {
            let taken = take_biomass(&mut corpse, 15.0, &config.metabolism);
            assert!(taken > 0.0);
            assert!(corpse.corpse_biomass < previous);
            assert!(corpse.corpse_biomass >= 0.0);
            previous = corpse.corpse_biomass;
            bites += 1;
        }
        assert_eq!(bites, 7);
        assert!(take_biomass(&mut corpse, 15.0, &config.metabolism).abs() < f64::EPSILON);
    }

    #[test]
    fn living_organisms_are_not_corpses() {
        let config = OrganismConfig::default();
        let mut living = organism(&config);
        assert!(!is_edible_corpse(&living, &config.metabolism));
        assert!(take_biomass(&mut living, 5.0, &config.metabolism).abs() < f64::EPSILON);
    }

    #[test]
    fn hazard_exhaustion_is_attributed() {
        let config = OrganismConfig::default();
        let mut organism = organism(&config);
        assert_eq!(exhaustion_cause(&organism), DeathCause::Starvation);
        organism.in_hazard = true;
        assert_eq!(exhaustion_cause(&organism), DeathCause::Hazard);
    }
}
