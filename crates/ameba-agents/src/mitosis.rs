//! Reproduction by splitting.
//!
//! Mitosis happens in two steps so the caller can acquire a pool slot in
//! between:
//!
//! 1. [`plan_mitosis`] reads the parent and computes both halves plus
//!    the [`Inheritance`] for the child. Nothing is mutated, so a full
//!    pool simply means the plan is dropped and retried later.
//! 2. [`apply_mitosis`] shrinks the parent once the child exists, and
//!    [`push_child`] gives the child its separation impulse.
//!
//! The child goes through the same reset contract as any fresh spawn.

use std::f64::consts::TAU;

use ameba_types::{OrganismId, Vec2};
use ameba_world::Placement;
use rand::Rng;

use crate::config::CombatConfig;
use crate::error::AgentError;
use crate::lifecycle;
use crate::organism::{FeedingTarget, Inheritance, Organism};

/// A split computed but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MitosisPlan {
    /// The parent being split.
    pub parent: OrganismId,
    /// Starting state for the child.
    pub child: Inheritance,
    /// Parent energy after the split.
    pub parent_energy: f64,
    /// Parent capacity after the split.
    pub parent_capacity: f64,
    /// Unit vector along which the parent is pushed. The child goes the
    /// opposite way.
    pub direction: Vec2,
    /// Where the child appears.
    pub child_placement: Placement,
}

/// Compute a split for a parent flagged as ready.
///
/// Returns `None` when the parent is not flagged or is held by a
/// predator.
///
/// # Errors
///
/// Returns [`AgentError::NotAlive`] for a dead parent and
/// [`AgentError::MissingPhenotype`] for an unreset slot.
pub fn plan_mitosis(
    parent: &Organism,
    rng: &mut impl Rng,
) -> Result<Option<MitosisPlan>, AgentError> {
    if !parent.is_alive() {
        return Err(AgentError::NotAlive { id: parent.id() });
    }
    let floor = parent.phenotype()?.min_capacity;
    if !parent.mitosis_pending || parent.captured_by.is_some() {
        return Ok(None);
    }

    let capacity = (parent.vitals.max_energy * 0.5).max(floor);
    let energy = (parent.vitals.energy * 0.5).min(capacity);
    let direction = Vec2::from_angle(rng.random_range(0.0..TAU));
    let child_placement = Placement {
        position: parent.body.position - direction * parent.radius(),
        rotation: parent.body.rotation,
    };

    Ok(Some(MitosisPlan {
        parent: parent.id(),
        child: Inheritance {
            genome: parent.genome().clone(),
            temperament: parent.temperament(),
            memory: parent.memory().clone(),
            generation: parent.generation().saturating_add(1),
            energy,
            max_energy: capacity,
        },
        parent_energy: energy,
        parent_capacity: capacity,
        direction,
        child_placement,
    }))
}

/// Shrink the parent to its half and push it away from the child.
///
/// The parent returns to Active. Any feeding it abandoned is returned so
/// the caller can release claims.
pub fn apply_mitosis(
    parent: &mut Organism,
    plan: &MitosisPlan,
    config: &CombatConfig,
) -> Option<FeedingTarget> {
    parent.vitals.max_energy = plan.parent_capacity;
    parent.vitals.energy = plan.parent_energy.min(plan.parent_capacity);
    parent.mitosis_pending = false;
    let abandoned = lifecycle::reactivate(parent);
    let mass = parent.mass();
    parent
        .body
        .apply_impulse(plan.direction * (config.mitosis_impulse * mass), mass);
    abandoned
}

/// Give a freshly spawned child the impulse opposite to its parent's.
pub fn push_child(child: &mut Organism, plan: &MitosisPlan, config: &CombatConfig) {
    let mass = child.mass();
    child
        .body
        .apply_impulse(-plan.direction * (config.mitosis_impulse * mass), mass);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ameba_types::{LifeState, Stimulus};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::OrganismConfig;
    use crate::genome::Genome;
    use crate::organism::tests::organism_with;
    use crate::organism::{Lineage, OrganismSeed};

    fn ready_parent(config: &OrganismConfig, capacity: f64) -> Organism {
        let mut parent = organism_with(config, Genome::from_counts(9, 0, 0), Vec2::new(5.0, 5.0));
        parent.vitals.max_energy = capacity;
        parent.vitals.energy = capacity;
        parent.mitosis_pending = true;
        parent
    }

    fn split(config: &OrganismConfig, parent: &mut Organism) -> (MitosisPlan, Organism) {
        let mut rng = SmallRng::seed_from_u64(11);
        let plan = plan_mitosis(parent, &mut rng).unwrap().unwrap();
        let mut child = Organism::spawn(
            OrganismSeed {
                config,
                lineage: Lineage::Inherited(plan.child.clone()),
            },
            plan.child_placement,
        );
        let _ = apply_mitosis(parent, &plan, &config.combat);
        push_child(&mut child, &plan, &config.combat);
        (plan, child)
    }

    #[test]
    fn split_conserves_capacity_and_bumps_generation() {
        let config = OrganismConfig::default();
        let mut parent = ready_parent(&config, 200.0);
        let before = parent.vitals.max_energy;
        let (_, child) = split(&config, &mut parent);
        assert!((child.vitals.max_energy + parent.vitals.max_energy - before).abs() < 1e-9);
        assert_eq!(child.generation(), parent.generation() + 1);
        assert_eq!(parent.generation(), 0);
        assert_eq!(child.genome(), parent.genome());
        assert!(!parent.mitosis_pending);
        assert_eq!(parent.state(), LifeState::Active);
        assert_eq!(child.state(), LifeState::Active);
    }

    #[test]
    fn halves_are_floor_clamped() {
        let config = OrganismConfig::default();
        let mut parent = ready_parent(&config, 80.0);
        let (_, child) = split(&config, &mut parent);
        assert!((parent.vitals.max_energy - 50.0).abs() < 1e-9);
        assert!((child.vitals.max_energy - 50.0).abs() < 1e-9);
        assert!(child.vitals.energy <= child.vitals.max_energy);
        assert!(parent.vitals.energy <= parent.vitals.max_energy);
    }

    #[test]
    fn child_memory_is_an_independent_copy() {
        let config = OrganismConfig::default();
        let mut parent = ready_parent(&config, 200.0);
        let _ = parent.learn(Stimulus::Wall, -1.0);
        let (_, mut child) = split(&config, &mut parent);
        assert_eq!(child.memory(), parent.memory());
        let _ = child.learn(Stimulus::Wall, 1.0);
        let _ = child.learn(Stimulus::Food, 1.0);
        assert!(parent.memory().opinion(Stimulus::Wall) < 0.0);
        assert!(parent.memory().is_unknown(Stimulus::Food));
        assert_ne!(child.id(), parent.id());
        assert_eq!(child.temperament(), parent.temperament());
    }

    #[test]
    fn separation_impulses_are_opposite() {
        let config = OrganismConfig::default();
        let mut parent = ready_parent(&config, 200.0);
        let (plan, child) = split(&config, &mut parent);
        let sum = parent.body.velocity + child.body.velocity;
        assert!(sum.length() < 1e-9);
        assert!(parent.body.velocity.dot(plan.direction) > 0.0);
    }

    #[test]
    fn unflagged_or_captured_parents_do_not_split() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut parent = ready_parent(&config, 200.0);
        parent.mitosis_pending = false;
        assert!(plan_mitosis(&parent, &mut rng).unwrap().is_none());
        parent.mitosis_pending = true;
        parent.captured_by = Some(ameba_types::OrganismHandle::from(ameba_types::KeyData::from_ffi(1)));
        assert!(plan_mitosis(&parent, &mut rng).unwrap().is_none());
    }

    #[test]
    fn dead_parent_is_an_error() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut parent = ready_parent(&config, 200.0);
        let _ = crate::death::kill(&mut parent, ameba_types::DeathCause::Starvation);
        assert!(matches!(
            plan_mitosis(&parent, &mut rng),
            Err(AgentError::NotAlive { .. })
        ));
    }
}
