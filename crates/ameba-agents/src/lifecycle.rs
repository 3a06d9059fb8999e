//! Lifecycle state machine.
//!
//! ```text
//!   Active ──touch food/prey──▶ Digesting ──done/cancel──▶ Active
//!     │ ▲                           │
//!     │ └──────food seen─────┐      │ starving, no food
//!     ▼                      │      ▼
//!   Dormant ◀────────────────┴── (Active or Digesting)
//!
//!   any living state ──energy ≤ 0──▶ Dead
//! ```
//!
//! Digestion is explicit state with a progress counter advanced every
//! tick. Transitions that leave Digesting hand the abandoned
//! [`FeedingTarget`] back to the caller so that it can drop claims on
//! shared resources.

use ameba_types::LifeState;

use crate::config::MetabolismConfig;
use crate::error::AgentError;
use crate::organism::{Feeding, FeedingTarget, Organism};

fn invalid(organism: &Organism, to: LifeState) -> AgentError {
    AgentError::InvalidTransition {
        id: organism.id(),
        from: organism.state(),
        to,
    }
}

/// Whether a starving organism without visible food should encyst.
pub fn should_encyst(organism: &Organism, food_seen: bool, config: &MetabolismConfig) -> bool {
    matches!(organism.state(), LifeState::Active | LifeState::Digesting)
        && !food_seen
        && organism.vitals.energy < organism.vitals.max_energy * config.dormancy_fraction
}

/// Whether a dormant organism should wake.
pub const fn should_wake(organism: &Organism, food_seen: bool) -> bool {
    matches!(organism.state(), LifeState::Dormant) && food_seen
}

/// Active → Digesting.
///
/// # Errors
///
/// Returns [`AgentError::InvalidTransition`] unless the organism is Active.
pub fn begin_digesting(
    organism: &mut Organism,
    target: FeedingTarget,
    duration: f64,
) -> Result<(), AgentError> {
    if organism.state() != LifeState::Active {
        return Err(invalid(organism, LifeState::Digesting));
    }
    organism.state = LifeState::Digesting;
    organism.feeding = Some(Feeding {
        target,
        elapsed: 0.0,
        duration,
    });
    Ok(())
}

/// Advance the feeding progress by `dt` and return a copy of it.
pub fn advance_feeding(organism: &mut Organism, dt: f64) -> Option<Feeding> {
    if organism.state() != LifeState::Digesting {
        return None;
    }
    let feeding = organism.feeding.as_mut()?;
    feeding.elapsed += dt;
    Some(*feeding)
}

/// Digesting → Active after a completed feeding.
///
/// # Errors
///
/// Returns [`AgentError::InvalidTransition`] unless the organism is Digesting.
pub fn finish_feeding(organism: &mut Organism) -> Result<Feeding, AgentError> {
    if organism.state() != LifeState::Digesting {
        return Err(invalid(organism, LifeState::Active));
    }
    let feeding = organism
        .feeding
        .take()
        .ok_or_else(|| invalid(organism, LifeState::Active))?;
    organism.state = LifeState::Active;
    Ok(feeding)
}

/// Digesting → Active without any reward.
///
/// Used when the target became unavailable. Returns the abandoned
/// target, or `None` if the organism was not digesting.
pub fn cancel_feeding(organism: &mut Organism) -> Option<FeedingTarget> {
    if organism.state() != LifeState::Digesting {
        return None;
    }
    organism.state = LifeState::Active;
    organism.feeding.take().map(|feeding| feeding.target)
}

/// Active or Digesting → Dormant.
///
/// Any feeding in progress is cancelled and its target returned.
///
/// # Errors
///
/// Returns [`AgentError::InvalidTransition`] from Dormant or Dead.
pub fn enter_dormancy(organism: &mut Organism) -> Result<Option<FeedingTarget>, AgentError> {
    if !matches!(organism.state(), LifeState::Active | LifeState::Digesting) {
        return Err(invalid(organism, LifeState::Dormant));
    }
    let abandoned = organism.feeding.take().map(|feeding| feeding.target);
    organism.state = LifeState::Dormant;
    organism.wander_target = None;
    ameba_world::kinematics::halt(&mut organism.body);
    Ok(abandoned)
}

/// Dormant → Active.
///
/// # Errors
///
/// Returns [`AgentError::InvalidTransition`] unless the organism is Dormant.
pub fn wake(organism: &mut Organism) -> Result<(), AgentError> {
    if organism.state() != LifeState::Dormant {
        return Err(invalid(organism, LifeState::Active));
    }
    organism.state = LifeState::Active;
    Ok(())
}

/// Force a living organism back to Active, dropping any feeding.
///
/// Mitosis uses this on the parent. Returns the abandoned target.
pub fn reactivate(organism: &mut Organism) -> Option<FeedingTarget> {
    if !organism.is_alive() {
        return None;
    }
    organism.state = LifeState::Active;
    organism.feeding.take().map(|feeding| feeding.target)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ameba_types::{KeyData, NutrientHandle, Vec2};

    use super::*;
    use crate::config::OrganismConfig;
    use crate::genome::Genome;
    use crate::organism::tests::organism_with;

    fn nutrient_target() -> FeedingTarget {
        FeedingTarget::Nutrient {
            handle: NutrientHandle::from(KeyData::from_ffi(0)),
            energy_value: 10.0,
        }
    }

    fn organism() -> Organism {
        organism_with(&OrganismConfig::default(), Genome::from_counts(9, 0, 0), Vec2::ZERO)
    }

    #[test]
    fn feeding_cycle_returns_to_active() {
        let mut organism = organism();
        begin_digesting(&mut organism, nutrient_target(), 2.0).unwrap();
        assert_eq!(organism.state(), LifeState::Digesting);
        assert!(!advance_feeding(&mut organism, 1.0).unwrap().is_complete());
        assert!(advance_feeding(&mut organism, 1.0).unwrap().is_complete());
        let feeding = finish_feeding(&mut organism).unwrap();
        assert_eq!(feeding.target, nutrient_target());
        assert_eq!(organism.state(), LifeState::Active);
        assert!(organism.feeding().is_none());
    }

    #[test]
    fn cannot_start_digesting_twice() {
        let mut organism = organism();
        begin_digesting(&mut organism, nutrient_target(), 2.0).unwrap();
        let err = begin_digesting(&mut organism, nutrient_target(), 2.0);
        assert!(matches!(
            err,
            Err(AgentError::InvalidTransition {
                from: LifeState::Digesting,
                to: LifeState::Digesting,
                ..
            })
        ));
    }

    #[test]
    fn cancellation_reverts_without_reward() {
        let mut organism = organism();
        let energy = organism.vitals.energy;
        begin_digesting(&mut organism, nutrient_target(), 2.0).unwrap();
        let abandoned = cancel_feeding(&mut organism);
        assert_eq!(abandoned, Some(nutrient_target()));
        assert_eq!(organism.state(), LifeState::Active);
        assert!((organism.vitals.energy - energy).abs() < f64::EPSILON);
        assert!(cancel_feeding(&mut organism).is_none());
    }

    #[test]
    fn starving_organism_without_food_encysts() {
        let config = OrganismConfig::default();
        let mut organism = organism();
        organism.vitals.energy = 10.0;
        assert!(should_encyst(&organism, false, &config.metabolism));
        assert!(!should_encyst(&organism, true, &config.metabolism));
        organism.vitals.energy = 50.0;
        assert!(!should_encyst(&organism, false, &config.metabolism));
    }

    #[test]
    fn dormancy_cancels_digestion_and_wakes_on_food() {
        let mut organism = organism();
        organism.body.velocity = Vec2::new(1.0, 0.0);
        begin_digesting(&mut organism, nutrient_target(), 2.0).unwrap();
        let abandoned = enter_dormancy(&mut organism).unwrap();
        assert_eq!(abandoned, Some(nutrient_target()));
        assert_eq!(organism.state(), LifeState::Dormant);
        assert!(organism.body.velocity.is_zero());
        assert!(enter_dormancy(&mut organism).is_err());
        assert!(!should_wake(&organism, false));
        assert!(should_wake(&organism, true));
        wake(&mut organism).unwrap();
        assert_eq!(organism.state(), LifeState::Active);
    }
}
