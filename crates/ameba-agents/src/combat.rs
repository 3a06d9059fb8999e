//! Combat and predation resolution.
//!
//! Three interactions are resolved here, each between exactly two
//! organisms borrowed mutably at once:
//!
//! - [`resolve_attack`]: a bite, an engulfment (phagocytosis) or a
//!   rejection by a cyst
//! - [`drain_prey`]: one tick of an engulfment in progress
//! - [`bite_corpse`]: scavenging corpse biomass
//!
//! Deaths go through [`death::kill`], which fires once per life. A
//! victim that is already dead cannot be killed again, so a kill reward
//! can only be granted once.

use ameba_types::{DeathCause, LifeState, OrganismHandle, Species, Stimulus, Vec2};

use crate::config::{CombatConfig, OrganismConfig};
use crate::death::{self, DeathRecord};
use crate::error::AgentError;
use crate::lifecycle;
use crate::organism::{FeedingTarget, Organism};
use crate::vitals;

/// Outcome of one attack attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    /// The attack could not happen (cooldown, range, target unavailable).
    Unable,
    /// The target was a cyst and repelled the attacker.
    Rejected,
    /// The target was small enough to engulf and is now being digested.
    Engulfed {
        /// Feeding the prey abandoned when it was captured.
        abandoned: Option<FeedingTarget>,
    },
    /// The target took damage and survived.
    Wounded {
        /// Damage dealt.
        damage: f64,
    },
    /// The target died from the bite.
    Killed {
        /// Damage dealt.
        damage: f64,
        /// The victim's death record.
        death: DeathRecord,
        /// Kill reward granted to a Predator attacker.
        reward: Option<f64>,
    },
}

/// One tick of an engulfment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrainStep {
    /// Energy flowed from prey to predator and digestion continues.
    Continuing {
        /// Energy transferred this tick.
        drained: f64,
    },
    /// The prey encysted and broke free. No reward.
    Escaped,
    /// The prey is no longer available. Digestion was cancelled.
    Lost,
    /// The prey was fully consumed.
    Consumed {
        /// The prey's death record.
        death: DeathRecord,
        /// Kill reward granted to the predator.
        reward: f64,
    },
}

/// Result of a successful corpse bite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorpseBite {
    /// Biomass transferred.
    pub taken: f64,
    /// Whether the corpse is now used up.
    pub depleted: bool,
}

/// Reach of an organism's attacks.
pub fn attack_range(attacker: &Organism, config: &CombatConfig) -> f64 {
    attacker.size() * config.attack_range_factor
}

/// Whether the organism can strike right now.
pub fn is_ready(attacker: &Organism) -> bool {
    attacker.state() == LifeState::Active
        && attacker.captured_by.is_none()
        && attacker.attack_cooldown <= 0.0
        && attacker.phenotype().is_ok_and(|p| p.can_attack)
}

fn direction(from: &Organism, to: &Organism) -> Vec2 {
    let heading = (to.body.position - from.body.position).normalized();
    if heading.is_zero() { Vec2::new(1.0, 0.0) } else { heading }
}

fn in_range(attacker: &Organism, target: &Organism, config: &CombatConfig) -> bool {
    attacker.body.position.distance(target.body.position)
        <= attack_range(attacker, config) + target.radius()
}

/// Resolve an attack by `attacker` on a living `target`.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] if the attacker was never reset.
pub fn resolve_attack(
    attacker: &mut Organism,
    attacker_handle: OrganismHandle,
    target: &mut Organism,
    target_handle: OrganismHandle,
    config: &OrganismConfig,
) -> Result<AttackOutcome, AgentError> {
    let phenotype = *attacker.phenotype()?;
    if !is_ready(attacker)
        || !target.is_alive()
        || target.captured_by.is_some()
        || !in_range(attacker, target, &config.combat)
    {
        return Ok(AttackOutcome::Unable);
    }
    attacker.attack_cooldown = phenotype.attack_cooldown;
    let heading = direction(attacker, target);

    if target.state() == LifeState::Dormant {
        let _ = attacker.learn(Stimulus::Cyst, config.combat.cyst_rejection_signal);
        let mass = target.mass();
        target
            .body
            .apply_impulse(heading * config.combat.rejection_impulse, mass);
        return Ok(AttackOutcome::Rejected);
    }

    if phenotype.species == Species::Predator
        && target.size() <= attacker.size() * config.combat.phagocytosis_ratio
    {
        lifecycle::begin_digesting(
            attacker,
            FeedingTarget::Prey(target_handle),
            config.metabolism.prey_digestion_time,
        )?;
        let abandoned = lifecycle::cancel_feeding(target);
        target.captured_by = Some(attacker_handle);
        target.wander_target = None;
        ameba_world::kinematics::halt(&mut target.body);
        return Ok(AttackOutcome::Engulfed { abandoned });
    }

    let damage = phenotype.attack_damage * attacker.size();
    vitals::spend(target, damage);
    let mass = target.mass();
    target.body.apply_impulse(
        heading * (attacker.size() * config.combat.knockback_factor),
        mass,
    );
    let attacker_tag = if phenotype.species == Species::Predator {
        Stimulus::Predator
    } else {
        Stimulus::Organism
    };
    let _ = target.learn(attacker_tag, -damage);

    if !vitals::is_exhausted(target) {
        return Ok(AttackOutcome::Wounded { damage });
    }
    let Some(death) = death::kill(target, DeathCause::Combat) else {
        return Ok(AttackOutcome::Wounded { damage });
    };
    let reward = if phenotype.species == Species::Predator {
        Some(vitals::receive_kill_reward(
            attacker,
            death.capacity,
            &config.combat,
        )?)
    } else {
        None
    };
    Ok(AttackOutcome::Killed {
        damage,
        death,
        reward,
    })
}

/// Advance an engulfment by `dt` seconds.
///
/// `predator` must be digesting `prey`. If the prey is gone, dead, or
/// held by someone else, the feeding is cancelled. A prey that has
/// encysted escapes and teaches the predator to avoid cysts.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] if the predator was never reset.
pub fn drain_prey(
    predator: &mut Organism,
    predator_handle: OrganismHandle,
    prey: &mut Organism,
    dt: f64,
    config: &OrganismConfig,
) -> Result<DrainStep, AgentError> {
    if !prey.is_alive() || prey.captured_by != Some(predator_handle) {
        let _ = lifecycle::cancel_feeding(predator);
        return Ok(DrainStep::Lost);
    }

    if prey.state() == LifeState::Dormant {
        let _ = lifecycle::cancel_feeding(predator);
        let _ = predator.learn(Stimulus::Cyst, config.combat.cyst_rejection_signal);
        prey.captured_by = None;
        let heading = direction(predator, prey);
        let mass = prey.mass();
        prey.body
            .apply_impulse(heading * config.combat.rejection_impulse, mass);
        return Ok(DrainStep::Escaped);
    }

    let Some(feeding) = lifecycle::advance_feeding(predator, dt) else {
        prey.captured_by = None;
        return Ok(DrainStep::Lost);
    };
    let drained = (config.metabolism.prey_drain_rate * dt).min(prey.vitals.energy);
    vitals::spend(prey, drained);
    let _ = prey.learn(Stimulus::Predator, -drained);
    let _ = vitals::absorb(predator, drained);

    if !vitals::is_exhausted(prey) && !feeding.is_complete() {
        return Ok(DrainStep::Continuing { drained });
    }
    let Some(death) = death::kill(prey, DeathCause::Consumed) else {
        let _ = lifecycle::cancel_feeding(predator);
        return Ok(DrainStep::Lost);
    };
    let _ = lifecycle::finish_feeding(predator)?;
    let reward = vitals::receive_kill_reward(predator, death.capacity, &config.combat)?;
    Ok(DrainStep::Consumed { death, reward })
}

/// Take one bite out of a corpse.
///
/// Returns `None` when the bite could not happen (cooldown, range, or
/// the corpse is used up). The biomass removed is absorbed with
/// overflow into capacity.
///
/// # Errors
///
/// Returns [`AgentError::MissingPhenotype`] if the attacker was never reset.
pub fn bite_corpse(
    attacker: &mut Organism,
    corpse: &mut Organism,
    config: &OrganismConfig,
) -> Result<Option<CorpseBite>, AgentError> {
    let phenotype = *attacker.phenotype()?;
    if !is_ready(attacker)
        || !death::is_edible_corpse(corpse, &config.metabolism)
        || !in_range(attacker, corpse, &config.combat)
    {
        return Ok(None);
    }
    attacker.attack_cooldown = phenotype.attack_cooldown;
    let taken = death::take_biomass(
        corpse,
        phenotype.attack_damage * attacker.size(),
        &config.metabolism,
    );
    let _ = vitals::absorb(attacker, taken);
    let _ = attacker.learn(Stimulus::Corpse, taken);
    let _ = vitals::flag_mitosis(attacker)?;
    Ok(Some(CorpseBite {
        taken,
        depleted: death::is_depleted(corpse, &config.metabolism),
    }))
}
