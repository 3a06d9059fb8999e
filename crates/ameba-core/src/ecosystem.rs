//! The live world: organism and nutrient pools, walls and arena bounds.
//!
//! [`Ecosystem`] is also the authoritative [`SpatialQuery`]. The query is
//! a brute-force scan over every live slot, which is plenty at arena
//! scale. Engulfed prey is inside its predator and cannot be seen.
//! Claimed nutrients are being eaten and cannot be seen either. Used-up
//! corpses are gone even before their slot is released.

use std::f64::consts::TAU;

use ameba_agents::{
    FeedingTarget, Genome, Lineage, Organism, OrganismConfig, OrganismSeed, Temperament, lifecycle,
};
use ameba_types::{
    Category, LifeState, NutrientHandle, OrganismHandle, OrganismSnapshot, Sighting, SightingTarget,
    Species, Vec2,
};
use ameba_world::spatial::circles_overlap;
use ameba_world::{
    Bounds, Hazard, NUTRIENT_RADIUS, Nutrient, NutrientSeed, Placement, Pool, SpatialQuery, WorldError,
};
use rand::Rng;

use crate::config::WorldConfig;

/// Distance from the arena edge kept clear when spawning.
const SPAWN_MARGIN: f64 = 1.0;

/// Headcount of the world at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    /// Living Pacifists.
    pub pacifists: usize,
    /// Living Predators.
    pub predators: usize,
    /// Living Neutrals.
    pub neutrals: usize,
    /// Living organisms currently digesting.
    pub digesting: usize,
    /// Living organisms currently encysted.
    pub dormant: usize,
    /// Corpses still occupying a slot.
    pub corpses: usize,
    /// Nutrients on the map, claimed or not.
    pub nutrients: usize,
}

impl Census {
    /// Living organisms of every species. Corpses do not count.
    pub const fn living(&self) -> usize {
        self.pacifists
            .saturating_add(self.predators)
            .saturating_add(self.neutrals)
    }
}

/// Pools, walls and bounds of one simulation.
#[derive(Debug)]
pub struct Ecosystem {
    /// Living organisms and corpses.
    pub organisms: Pool<Organism, OrganismHandle>,
    /// Nutrient pellets.
    pub nutrients: Pool<Nutrient, NutrientHandle>,
    /// Hazard walls.
    pub hazards: Vec<Hazard>,
    /// Where bodies may move.
    pub bounds: Bounds,
}

impl Ecosystem {
    /// An empty world sized by `world`, with the given walls.
    pub fn new(world: &WorldConfig, hazards: Vec<Hazard>) -> Self {
        Self {
            organisms: Pool::new("organism", world.organism_capacity),
            nutrients: Pool::new("nutrient", world.nutrient_capacity),
            hazards,
            bounds: Bounds::of_size(world.width, world.height),
        }
    }

    /// Spawn a generation-zero organism with a random genome and
    /// temperament at a random position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PoolExhausted`] if no slot is free.
    pub fn spawn_fresh(
        &mut self,
        config: &OrganismConfig,
        rng: &mut impl Rng,
    ) -> Result<OrganismHandle, WorldError> {
        let lineage = Lineage::Fresh {
            genome: Genome::random(config.traits.genome_length, rng),
            temperament: Temperament::random(config.traits.temperament_points, rng),
        };
        let placement = Placement {
            position: self.bounds.random_point(SPAWN_MARGIN, rng),
            rotation: rng.random_range(0.0..TAU),
        };
        self.organisms
            .acquire(OrganismSeed { config, lineage }, placement)
    }

    /// Place a nutrient worth `energy_value` at a random position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PoolExhausted`] if no slot is free.
    pub fn spawn_nutrient(
        &mut self,
        energy_value: f64,
        rng: &mut impl Rng,
    ) -> Result<NutrientHandle, WorldError> {
        let placement = Placement::at(self.bounds.random_point(SPAWN_MARGIN, rng));
        self.nutrients
            .acquire(NutrientSeed { energy_value }, placement)
    }

    /// Drop whatever claim `holder` had on an abandoned feeding target.
    ///
    /// A nutrient becomes edible again. An engulfed prey is set free.
    /// Stale handles are ignored.
    pub fn release_claim(&mut self, holder: OrganismHandle, target: Option<FeedingTarget>) {
        match target {
            Some(FeedingTarget::Nutrient { handle, .. }) => {
                if let Some(nutrient) = self.nutrients.get_mut(handle) {
                    nutrient.abandon(holder);
                }
            }
            Some(FeedingTarget::Prey(prey)) => {
                if let Some(prey) = self
                    .organisms
                    .get_mut(prey)
                    .filter(|prey| prey.captured_by == Some(holder))
                {
                    prey.captured_by = None;
                }
            }
            None => {}
        }
    }

    /// Stop every predator that is digesting `prey`.
    ///
    /// Called when prey dies of anything but the drain itself, so no
    /// predator keeps feeding on a corpse or a released slot.
    pub fn release_captors(&mut self, prey: OrganismHandle) {
        for handle in self.organisms.handles() {
            let Some(predator) = self.organisms.get_mut(handle) else {
                continue;
            };
            let digesting_prey = predator
                .feeding()
                .is_some_and(|feeding| feeding.target == FeedingTarget::Prey(prey));
            if digesting_prey {
                let _ = lifecycle::cancel_feeding(predator);
            }
        }
    }

    /// Number of living organisms.
    pub fn living_count(&self) -> usize {
        self.organisms
            .iter()
            .filter(|(_, organism)| organism.is_alive())
            .count()
    }

    /// Snapshots of every living organism.
    pub fn live_snapshots(&self) -> Vec<OrganismSnapshot> {
        self.organisms
            .iter()
            .filter(|(_, organism)| organism.is_alive())
            .filter_map(|(_, organism)| organism.snapshot().ok())
            .collect()
    }

    /// Count the world.
    pub fn census(&self) -> Census {
        let mut census = Census {
            nutrients: self.nutrients.active_count(),
            ..Census::default()
        };
        for (_, organism) in self.organisms.iter() {
            let counter = match (organism.state(), organism.species()) {
                (LifeState::Dead, _) => &mut census.corpses,
                (_, Some(Species::Predator)) => &mut census.predators,
                (_, Some(Species::Neutral)) => &mut census.neutrals,
                (_, Some(Species::Pacifist) | None) => &mut census.pacifists,
            };
            *counter = counter.saturating_add(1);
            match organism.state() {
                LifeState::Digesting => census.digesting = census.digesting.saturating_add(1),
                LifeState::Dormant => census.dormant = census.dormant.saturating_add(1),
                LifeState::Active | LifeState::Dead => {}
            }
        }
        census
    }

    fn organism_sightings(
        &self,
        center: Vec2,
        radius: f64,
        exclude: Option<OrganismHandle>,
        out: &mut Vec<Sighting>,
    ) {
        for (handle, organism) in self.organisms.iter() {
            if Some(handle) == exclude || organism.captured_by.is_some() {
                continue;
            }
            let alive = organism.is_alive();
            if !alive && organism.corpse_biomass <= 0.0 {
                continue;
            }
            if !circles_overlap(center, radius, organism.body.position, organism.radius()) {
                continue;
            }
            out.push(Sighting {
                category: if alive {
                    Category::Organism
                } else {
                    Category::Corpse
                },
                target: SightingTarget::Organism(handle),
                position: organism.body.position,
                closest_point: None,
                heading: None,
                value: if alive {
                    organism.vitals.energy
                } else {
                    organism.corpse_biomass
                },
                size: organism.size(),
                species: organism.species(),
                dormant: organism.state() == LifeState::Dormant,
            });
        }
    }

    fn nutrient_sightings(&self, center: Vec2, radius: f64, out: &mut Vec<Sighting>) {
        for (handle, nutrient) in self.nutrients.iter() {
            if nutrient.is_being_consumed()
                || !circles_overlap(center, radius, nutrient.position, NUTRIENT_RADIUS)
            {
                continue;
            }
            out.push(Sighting {
                category: Category::Food,
                target: SightingTarget::Nutrient(handle),
                position: nutrient.position,
                closest_point: None,
                heading: None,
                value: nutrient.energy_value,
                size: NUTRIENT_RADIUS * 2.0,
                species: None,
                dormant: false,
            });
        }
    }

    fn wall_sightings(&self, center: Vec2, radius: f64, out: &mut Vec<Sighting>) {
        for (index, hazard) in self.hazards.iter().enumerate() {
            if !hazard.overlaps_circle(center, radius) {
                continue;
            }
            let contact = hazard.contact(center);
            out.push(Sighting {
                category: Category::Wall,
                target: SightingTarget::Hazard(index),
                position: hazard.center(),
                closest_point: Some(contact.point),
                heading: Some(contact.direction),
                value: 1.0,
                size: 1.0,
                species: None,
                dormant: false,
            });
        }
    }
}

impl SpatialQuery for Ecosystem {
    fn query_radius(
        &self,
        center: Vec2,
        radius: f64,
        exclude: Option<OrganismHandle>,
    ) -> Vec<Sighting> {
        let mut sightings = Vec::new();
        if radius <= 0.0 {
            return sightings;
        }
        self.organism_sightings(center, radius, exclude, &mut sightings);
        self.nutrient_sightings(center, radius, &mut sightings);
        self.wall_sightings(center, radius, &mut sightings);
        sightings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ameba_agents::death;
    use ameba_types::DeathCause;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn world(capacity: usize) -> WorldConfig {
        WorldConfig {
            organism_capacity: capacity,
            nutrient_capacity: capacity,
            ..WorldConfig::default()
        }
    }

    fn fresh_at(eco: &mut Ecosystem, config: &OrganismConfig, genome: Genome, pos: Vec2) -> OrganismHandle {
        let seed = OrganismSeed {
            config,
            lineage: Lineage::Fresh {
                genome,
                temperament: Temperament::new(1.0, 5.0, 4.0),
            },
        };
        eco.organisms.acquire(seed, Placement::at(pos)).unwrap()
    }

    fn categories(sightings: &[Sighting]) -> Vec<Category> {
        sightings.iter().map(|s| s.category).collect()
    }

    #[test]
    fn spawning_stops_at_capacity() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut eco = Ecosystem::new(&world(3), Vec::new());
        for _ in 0..3 {
            let handle = eco.spawn_fresh(&config, &mut rng).unwrap();
            let organism = eco.organisms.get(handle).unwrap();
            assert_eq!(organism.generation(), 0);
            assert!(eco.bounds.clamp(organism.body.position) == organism.body.position);
        }
        assert!(matches!(
            eco.spawn_fresh(&config, &mut rng),
            Err(WorldError::PoolExhausted { .. })
        ));
        assert_eq!(eco.living_count(), 3);
        assert_eq!(eco.live_snapshots().len(), 3);
    }

    #[test]
    fn query_excludes_self_and_tags_categories() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut eco = Ecosystem::new(&world(8), Hazard::enclosure(40.0, 40.0, 1.0));
        let me = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), Vec2::new(1.5, 20.0));
        let other = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), Vec2::new(2.5, 20.0));
        let _far = fresh_at(&mut eco, &config, Genome::from_counts(0, 0, 9), Vec2::new(30.0, 30.0));
        let pellet = eco.spawn_nutrient(10.0, &mut rng).unwrap();
        eco.nutrients.get_mut(pellet).unwrap().position = Vec2::new(1.5, 21.0);

        let sightings = eco.query_radius(Vec2::new(1.5, 20.0), 3.0, Some(me));
        let cats = categories(&sightings);
        assert_eq!(cats.iter().filter(|c| **c == Category::Organism).count(), 1);
        assert_eq!(cats.iter().filter(|c| **c == Category::Food).count(), 1);
        assert!(cats.contains(&Category::Wall));
        assert!(sightings.iter().all(|s| s.organism() != Some(me)));

        let wall = sightings.iter().find(|s| s.category == Category::Wall).unwrap();
        assert_eq!(wall.closest_point, Some(Vec2::new(0.0, 20.0)));
        assert_eq!(wall.heading, Some(Vec2::new(-1.0, 0.0)));
        let seen = sightings.iter().find(|s| s.organism() == Some(other)).unwrap();
        assert_eq!(seen.species, Some(Species::Predator));
    }

    #[test]
    fn wall_seen_from_the_arena_edge_keeps_a_direction() {
        let mut eco = Ecosystem::new(&world(2), Hazard::enclosure(40.0, 40.0, 1.0));
        let edge = eco.bounds.clamp(Vec2::new(-3.0, 20.0));
        let sightings = eco.query_radius(edge, 2.0, None);
        let wall = sightings.iter().find(|s| s.category == Category::Wall).unwrap();
        assert_eq!(wall.closest_point, Some(edge));
        assert_eq!(wall.direction_from(edge), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn hidden_entities_are_not_seen() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut eco = Ecosystem::new(&world(8), Vec::new());
        let center = Vec2::new(20.0, 20.0);
        let captor = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), center);
        let prey = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), center);
        eco.organisms.get_mut(prey).unwrap().captured_by = Some(captor);

        let pellet = eco.spawn_nutrient(10.0, &mut rng).unwrap();
        let nutrient = eco.nutrients.get_mut(pellet).unwrap();
        nutrient.position = center;
        assert!(nutrient.try_claim(captor));

        assert!(eco.query_radius(center, 5.0, Some(captor)).is_empty());
        assert!(eco.query_radius(center, 0.0, None).is_empty());
    }

    #[test]
    fn corpses_are_seen_until_used_up() {
        let config = OrganismConfig::default();
        let mut eco = Ecosystem::new(&world(4), Vec::new());
        let center = Vec2::new(10.0, 10.0);
        let body = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), center);
        let corpse = eco.organisms.get_mut(body).unwrap();
        let _ = death::kill(corpse, DeathCause::Starvation).unwrap();

        let sightings = eco.query_radius(center, 2.0, None);
        assert_eq!(categories(&sightings), vec![Category::Corpse]);
        assert_eq!(eco.census().corpses, 1);
        assert_eq!(eco.census().living(), 0);

        eco.organisms.get_mut(body).unwrap().corpse_biomass = 0.0;
        assert!(eco.query_radius(center, 2.0, None).is_empty());
    }

    #[test]
    fn census_counts_species_and_states() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut eco = Ecosystem::new(&world(8), Vec::new());
        let _p = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), Vec2::new(5.0, 5.0));
        let q = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), Vec2::new(6.0, 5.0));
        let _n = fresh_at(&mut eco, &config, Genome::from_counts(0, 0, 9), Vec2::new(7.0, 5.0));
        let _ = ameba_agents::lifecycle::enter_dormancy(eco.organisms.get_mut(q).unwrap()).unwrap();
        let _ = eco.spawn_nutrient(10.0, &mut rng).unwrap();

        let census = eco.census();
        assert_eq!(
            census,
            Census {
                pacifists: 1,
                predators: 1,
                neutrals: 1,
                digesting: 0,
                dormant: 1,
                corpses: 0,
                nutrients: 1,
            }
        );
        assert_eq!(census.living(), 3);
    }

    #[test]
    fn releasing_a_claim_frees_nutrient_and_prey() {
        let config = OrganismConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut eco = Ecosystem::new(&world(4), Vec::new());
        let holder = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), Vec2::new(5.0, 5.0));
        let prey = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), Vec2::new(5.0, 5.0));
        eco.organisms.get_mut(prey).unwrap().captured_by = Some(holder);
        let pellet = eco.spawn_nutrient(10.0, &mut rng).unwrap();
        assert!(eco.nutrients.get_mut(pellet).unwrap().try_claim(holder));

        eco.release_claim(
            holder,
            Some(FeedingTarget::Nutrient {
                handle: pellet,
                energy_value: 10.0,
            }),
        );
        eco.release_claim(holder, Some(FeedingTarget::Prey(prey)));
        assert!(!eco.nutrients.get(pellet).unwrap().is_being_consumed());
        assert!(eco.organisms.get(prey).unwrap().captured_by.is_none());
    }

    #[test]
    fn dead_prey_releases_its_captor() {
        let config = OrganismConfig::default();
        let mut eco = Ecosystem::new(&world(4), Vec::new());
        let center = Vec2::new(5.0, 5.0);
        let hunter = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), center);
        let prey = fresh_at(&mut eco, &config, Genome::from_counts(9, 0, 0), center);
        let bystander = fresh_at(&mut eco, &config, Genome::from_counts(0, 9, 0), center);
        lifecycle::begin_digesting(
            eco.organisms.get_mut(hunter).unwrap(),
            FeedingTarget::Prey(prey),
            4.0,
        )
        .unwrap();

        eco.release_captors(prey);
        assert_eq!(eco.organisms.get(hunter).unwrap().state(), LifeState::Active);
        assert!(eco.organisms.get(hunter).unwrap().feeding().is_none());
        assert_eq!(eco.organisms.get(bystander).unwrap().state(), LifeState::Active);
    }
}
