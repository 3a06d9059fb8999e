//! Genome and phenotype resolution.
//!
//! A [`Genome`] is a fixed list of alleles. [`resolve_phenotype`] counts
//! each allele kind and derives the dominant species and every numeric
//! trait from those counts. It is pure and is re-run on every reset,
//! for fresh and inherited genomes alike.

use ameba_types::{Allele, Species};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TraitConfig;

/// An immutable, ordered list of alleles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(Vec<Allele>);

impl Genome {
    /// Wrap an explicit allele list.
    pub const fn new(alleles: Vec<Allele>) -> Self {
        Self(alleles)
    }

    /// A genome of `length` alleles, each drawn uniformly.
    pub fn random(length: usize, rng: &mut impl Rng) -> Self {
        let alleles = (0..length)
            .map(|_| match rng.random_range(0..3_u8) {
                0 => Allele::Pacifist,
                1 => Allele::Predator,
                _ => Allele::Neutral,
            })
            .collect();
        Self(alleles)
    }

    /// A genome made of `pacifist`, `predator` and `neutral` alleles in that order.
    pub fn from_counts(pacifist: usize, predator: usize, neutral: usize) -> Self {
        let mut alleles = Vec::with_capacity(pacifist.saturating_add(predator).saturating_add(neutral));
        alleles.extend(std::iter::repeat_n(Allele::Pacifist, pacifist));
        alleles.extend(std::iter::repeat_n(Allele::Predator, predator));
        alleles.extend(std::iter::repeat_n(Allele::Neutral, neutral));
        Self(alleles)
    }

    /// The alleles in gene order.
    pub fn alleles(&self) -> &[Allele] {
        &self.0
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count each allele kind.
    pub fn counts(&self) -> AlleleCounts {
        self.0.iter().fold(AlleleCounts::default(), |mut counts, allele| {
            match allele {
                Allele::Pacifist => counts.pacifist = counts.pacifist.saturating_add(1),
                Allele::Predator => counts.predator = counts.predator.saturating_add(1),
                Allele::Neutral => counts.neutral = counts.neutral.saturating_add(1),
            }
            counts
        })
    }
}

/// Per-kind allele counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlleleCounts {
    /// Pacifist alleles.
    pub pacifist: u32,
    /// Predator alleles.
    pub predator: u32,
    /// Neutral alleles.
    pub neutral: u32,
}

impl AlleleCounts {
    /// Dominant species under the tie-break rule.
    ///
    /// Predator needs a strict majority over both others. Neutral wins any
    /// tie it is part of. Pacifist takes what is left.
    pub const fn dominant(self) -> Species {
        if self.predator > self.pacifist && self.predator > self.neutral {
            Species::Predator
        } else if self.neutral >= self.pacifist && self.neutral >= self.predator {
            Species::Neutral
        } else {
            Species::Pacifist
        }
    }
}

/// Traits derived from a genome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phenotype {
    /// Dominant species, which selects the behavior strategy.
    pub species: Species,
    /// Allele counts the traits were derived from.
    pub counts: AlleleCounts,
    /// Seconds between movement impulses.
    pub move_interval: f64,
    /// Movement impulse per unit of mass.
    pub move_force: f64,
    /// Sensor radius at size 1. Perception scales it by size.
    pub sensor_radius: f64,
    /// Bite damage at size 1. Bites scale it by attacker size.
    pub attack_damage: f64,
    /// Whether the organism can attack at all.
    pub can_attack: bool,
    /// Seconds between attacks.
    pub attack_cooldown: f64,
    /// Capacity at which mitosis triggers.
    pub reproduction_threshold: f64,
    /// Capacity of a fresh organism with this genome.
    pub starting_capacity: f64,
    /// Floor for either half of a mitosis split.
    pub min_capacity: f64,
}

/// Resolve a genome into its phenotype.
pub fn resolve_phenotype(genome: &Genome, traits: &TraitConfig) -> Phenotype {
    let counts = genome.counts();
    let pacifist = f64::from(counts.pacifist);
    let predator = f64::from(counts.predator);
    let neutral = f64::from(counts.neutral);

    Phenotype {
        species: counts.dominant(),
        counts,
        move_interval: traits
            .pacifist_interval_step
            .mul_add(-pacifist, traits.base_move_interval)
            .max(traits.min_move_interval),
        move_force: traits.predator_force_bonus.mul_add(predator, traits.base_move_force),
        sensor_radius: traits
            .pacifist_sensor_bonus
            .mul_add(pacifist, traits.base_sensor_radius)
            .max(0.0),
        attack_damage: traits
            .predator_damage_bonus
            .mul_add(predator, traits.base_attack_damage),
        can_attack: counts.predator > 0,
        attack_cooldown: traits.base_attack_cooldown
            * traits.neutral_cooldown_factor.mul_add(neutral, 1.0),
        reproduction_threshold: traits
            .neutral_threshold_bonus
            .mul_add(neutral, traits.base_reproduction_threshold),
        starting_capacity: traits
            .neutral_capacity_bonus
            .mul_add(neutral, traits.base_capacity),
        min_capacity: traits
            .neutral_min_capacity_bonus
            .mul_add(neutral, traits.min_capacity),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_way_tie_resolves_to_neutral() {
        let genome = Genome::from_counts(3, 3, 3);
        let phenotype = resolve_phenotype(&genome, &TraitConfig::default());
        assert_eq!(phenotype.species, Species::Neutral);
    }

    #[test]
    fn dominance_rule_over_every_nine_gene_split() {
        for pacifist in 0..=9_u32 {
            for predator in 0..=(9 - pacifist) {
                let neutral = 9 - pacifist - predator;
                let counts = AlleleCounts {
                    pacifist,
                    predator,
                    neutral,
                };
                let expected = if predator > pacifist && predator > neutral {
                    Species::Predator
                } else if neutral >= pacifist && neutral >= predator {
                    Species::Neutral
                } else {
                    Species::Pacifist
                };
                assert_eq!(counts.dominant(), expected, "{counts:?}");
            }
        }
    }

    #[test]
    fn predator_needs_strict_majority() {
        let tie_with_neutral = Genome::from_counts(1, 4, 4);
        let tie_with_pacifist = Genome::from_counts(4, 4, 1);
        let traits = TraitConfig::default();
        assert_eq!(resolve_phenotype(&tie_with_neutral, &traits).species, Species::Neutral);
        assert_eq!(resolve_phenotype(&tie_with_pacifist, &traits).species, Species::Pacifist);
    }

    #[test]
    fn traits_follow_allele_counts() {
        let traits = TraitConfig::default();
        let phenotype = resolve_phenotype(&Genome::from_counts(2, 3, 4), &traits);
        assert!(approx(phenotype.move_interval, 1.6));
        assert!(approx(phenotype.sensor_radius, 4.0));
        assert!(approx(phenotype.move_force, 5.0));
        assert!(approx(phenotype.attack_damage, 14.0));
        assert!(phenotype.can_attack);
        assert!(approx(phenotype.attack_cooldown, 2.0));
        assert!(approx(phenotype.reproduction_threshold, 300.0));
        assert!(approx(phenotype.starting_capacity, 180.0));
        assert!(approx(phenotype.min_capacity, 90.0));
    }

    #[test]
    fn move_interval_is_floored() {
        let phenotype = resolve_phenotype(&Genome::from_counts(9, 0, 0), &TraitConfig::default());
        assert!(approx(phenotype.move_interval, 0.5));
        assert!(!phenotype.can_attack);
        assert_eq!(phenotype.species, Species::Pacifist);
    }

    #[test]
    fn empty_genome_degrades_to_base_neutral() {
        let traits = TraitConfig::default();
        let phenotype = resolve_phenotype(&Genome::default(), &traits);
        assert_eq!(phenotype.species, Species::Neutral);
        assert!(approx(phenotype.starting_capacity, traits.base_capacity));
        assert!(!phenotype.can_attack);
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut rng = SmallRng::seed_from_u64(11);
        let traits = TraitConfig::default();
        for _ in 0..50 {
            let genome = Genome::random(traits.genome_length, &mut rng);
            assert_eq!(genome.len(), 9);
            assert_eq!(
                resolve_phenotype(&genome, &traits),
                resolve_phenotype(&genome.clone(), &traits)
            );
        }
    }
}
