//! Tunable parameters for organism mechanics.
//!
//! [`OrganismConfig`] bundles every constant the genome resolver,
//! metabolism, combat, behavior and motion code read. It deserializes
//! from the `organism` section of `ameba-config.yaml`. Every field is
//! optional there and falls back to the defaults below.

use serde::Deserialize;

/// All organism tunables, grouped by concern.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrganismConfig {
    /// Genome-to-phenotype bases and per-allele bonuses.
    pub traits: TraitConfig,
    /// Energy drains, digestion timings and growth limits.
    pub metabolism: MetabolismConfig,
    /// Attack, reward and impulse parameters.
    pub combat: CombatConfig,
    /// Desire computation weights.
    pub behavior: BehaviorConfig,
    /// Damping and speed limits for the kinematic stand-in.
    pub motion: MotionConfig,
}

/// Bases and per-allele bonuses for phenotype resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraitConfig {
    /// Number of genes in a freshly generated genome (default: 9).
    pub genome_length: usize,
    /// Seconds between movement impulses before bonuses (default: 2.0).
    pub base_move_interval: f64,
    /// Interval reduction per Pacifist allele (default: 0.2).
    pub pacifist_interval_step: f64,
    /// Lower bound on the movement interval (default: 0.5).
    pub min_move_interval: f64,
    /// Sensor radius at size 1 before bonuses (default: 2.0).
    pub base_sensor_radius: f64,
    /// Sensor radius bonus per Pacifist allele (default: 1.0).
    pub pacifist_sensor_bonus: f64,
    /// Movement impulse before bonuses (default: 2.0).
    pub base_move_force: f64,
    /// Movement impulse bonus per Predator allele (default: 1.0).
    pub predator_force_bonus: f64,
    /// Bite damage at size 1 before bonuses (default: 5.0).
    pub base_attack_damage: f64,
    /// Bite damage bonus per Predator allele (default: 3.0).
    pub predator_damage_bonus: f64,
    /// Seconds between attacks before the Neutral factor (default: 1.0).
    pub base_attack_cooldown: f64,
    /// Relative cooldown increase per Neutral allele (default: 0.25).
    pub neutral_cooldown_factor: f64,
    /// Capacity at which mitosis triggers, before bonuses (default: 180).
    pub base_reproduction_threshold: f64,
    /// Threshold increase per Neutral allele (default: 30).
    pub neutral_threshold_bonus: f64,
    /// Starting capacity of a fresh organism (default: 100).
    pub base_capacity: f64,
    /// Starting capacity bonus per Neutral allele (default: 20).
    pub neutral_capacity_bonus: f64,
    /// Capacity floor applied to both halves of a mitosis (default: 50).
    pub min_capacity: f64,
    /// Capacity floor bonus per Neutral allele (default: 10).
    pub neutral_min_capacity_bonus: f64,
    /// Temperament points split across curiosity, greed and fear (default: 10).
    pub temperament_points: f64,
}

impl Default for TraitConfig {
    fn default() -> Self {
        Self {
            genome_length: 9,
            base_move_interval: 2.0,
            pacifist_interval_step: 0.2,
            min_move_interval: 0.5,
            base_sensor_radius: 2.0,
            pacifist_sensor_bonus: 1.0,
            base_move_force: 2.0,
            predator_force_bonus: 1.0,
            base_attack_damage: 5.0,
            predator_damage_bonus: 3.0,
            base_attack_cooldown: 1.0,
            neutral_cooldown_factor: 0.25,
            base_reproduction_threshold: 180.0,
            neutral_threshold_bonus: 30.0,
            base_capacity: 100.0,
            neutral_capacity_bonus: 20.0,
            min_capacity: 50.0,
            neutral_min_capacity_bonus: 10.0,
            temperament_points: 10.0,
        }
    }
}

/// Energy economy parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetabolismConfig {
    /// Energy per second drained while Active (default: 3.0).
    pub active_drain: f64,
    /// Energy per second drained while Digesting (default: 1.0).
    pub digesting_drain: f64,
    /// Energy per second drained while Dormant (default: 0.1).
    pub dormant_drain: f64,
    /// Energy per unit of size charged for each movement impulse (default: 0.5).
    pub move_cost_per_size: f64,
    /// Fraction of capacity below which an organism without food encysts (default: 0.2).
    pub dormancy_fraction: f64,
    /// Seconds to digest a nutrient (default: 2.0).
    pub digestion_time: f64,
    /// Maximum seconds to digest engulfed prey (default: 4.0).
    pub prey_digestion_time: f64,
    /// Energy per second drained from engulfed prey (default: 20).
    pub prey_drain_rate: f64,
    /// Nutrients grow capacity only while it is below this multiple of the
    /// reproduction threshold (default: 1.5).
    pub growth_cap_factor: f64,
    /// Nutrient value multiplier for the Neutral species (default: 2.0).
    pub neutral_food_multiplier: f64,
    /// Corpse biomass lost per second (default: 1.0).
    pub corpse_decay_rate: f64,
    /// Residual biomass at or below which a corpse is gone (default: 0.01).
    pub corpse_floor: f64,
    /// Energy per second lost while overlapping a wall (default: 10).
    pub hazard_damage_rate: f64,
    /// Learning delta applied on first contact with a wall (default: -5).
    pub hazard_contact_signal: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            active_drain: 3.0,
            digesting_drain: 1.0,
            dormant_drain: 0.1,
            move_cost_per_size: 0.5,
            dormancy_fraction: 0.2,
            digestion_time: 2.0,
            prey_digestion_time: 4.0,
            prey_drain_rate: 20.0,
            growth_cap_factor: 1.5,
            neutral_food_multiplier: 2.0,
            corpse_decay_rate: 1.0,
            corpse_floor: 0.01,
            hazard_damage_rate: 10.0,
            hazard_contact_signal: -5.0,
        }
    }
}

/// Combat and predation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Attack range as a multiple of attacker size (default: 1.25).
    pub attack_range_factor: f64,
    /// Targets at or below this fraction of attacker size are engulfed (default: 0.6).
    pub phagocytosis_ratio: f64,
    /// Share of the victim's capacity awarded to a Predator killer (default: 0.5).
    pub kill_reward_fraction: f64,
    /// Knockback impulse per unit of attacker size (default: 3.0).
    pub knockback_factor: f64,
    /// Impulse pushing a cyst away from a rejected attacker (default: 8.0).
    pub rejection_impulse: f64,
    /// Learning delta for an attacker rejected by a cyst (default: -5).
    pub cyst_rejection_signal: f64,
    /// Separation impulse per unit of mass applied at mitosis (default: 2.0).
    pub mitosis_impulse: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_range_factor: 1.25,
            phagocytosis_ratio: 0.6,
            kill_reward_fraction: 0.5,
            knockback_factor: 3.0,
            rejection_impulse: 8.0,
            cyst_rejection_signal: -5.0,
            mitosis_impulse: 2.0,
        }
    }
}

/// Desire computation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Added to distances before inverting them into proximity weights (default: 0.1).
    pub proximity_epsilon: f64,
    /// Distance at which a wander destination counts as reached (default: 1.0).
    pub wander_epsilon: f64,
    /// Repulsion weight between Predators (default: 1.0).
    pub personal_space_weight: f64,
    /// Greed multiplier for unknown corpses seen by Predators (default: 2.0).
    pub corpse_weight: f64,
    /// Constant pull toward smaller prey seen by Predators (default: 1.0).
    pub prey_instinct_weight: f64,
    /// Pacifists flee Predators at least this multiple of their own size (default: 1.0).
    pub threat_size_ratio: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            proximity_epsilon: 0.1,
            wander_epsilon: 1.0,
            personal_space_weight: 1.0,
            corpse_weight: 2.0,
            prey_instinct_weight: 1.0,
            threat_size_ratio: 1.0,
        }
    }
}

/// Kinematic stand-in parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Linear damping per second (default: 5.0).
    pub linear_damping: f64,
    /// Speed cap in units per second (default: 3.0).
    pub max_speed: f64,
    /// Extra velocity bleed per second while Digesting (default: 2.0).
    pub digesting_settle_rate: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            linear_damping: 5.0,
            max_speed: 3.0,
            digesting_settle_rate: 2.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = OrganismConfig::default();
        assert_eq!(config.traits.genome_length, 9);
        assert!((config.traits.base_reproduction_threshold - 180.0).abs() < f64::EPSILON);
        assert!((config.combat.kill_reward_fraction - 0.5).abs() < f64::EPSILON);
        assert!((config.metabolism.active_drain - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "traits:\n  genome_length: 5\ncombat:\n  kill_reward_fraction: 0.25\n";
        let config: OrganismConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.traits.genome_length, 5);
        assert!((config.traits.base_capacity - 100.0).abs() < f64::EPSILON);
        assert!((config.combat.kill_reward_fraction - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.motion, MotionConfig::default());
    }
}
