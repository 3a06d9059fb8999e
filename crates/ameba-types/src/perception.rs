//! Perception records produced by the spatial query.
//!
//! A [`Sighting`] is a copy of what an organism can see about one entity
//! at query time. Behavior strategies are pure functions over a slice of
//! sightings, so nothing here borrows from the world.

use serde::{Deserialize, Serialize};

use crate::enums::{Category, Species};
use crate::geometry::Vec2;
use crate::ids::{NutrientHandle, OrganismHandle};

/// What a sighting refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SightingTarget {
    /// A pooled organism or corpse.
    Organism(OrganismHandle),
    /// A pooled nutrient.
    Nutrient(NutrientHandle),
    /// A hazard wall, by index in the world's hazard list.
    Hazard(usize),
}

/// One entity overlapping a perception circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Category of the entity.
    pub category: Category,
    /// Handle for follow-up interaction.
    pub target: SightingTarget,
    /// Center of the entity.
    pub position: Vec2,
    /// Nearest point on the entity's boundary, for extended hazards.
    pub closest_point: Option<Vec2>,
    /// Unit direction from the observer toward the entity, for hazards.
    /// Stays meaningful when the observer touches or is inside the wall.
    pub heading: Option<Vec2>,
    /// Perceived value: nutrient energy, organism energy or corpse biomass.
    pub value: f64,
    /// Size of the entity (1.0 for entities without a size).
    pub size: f64,
    /// Species of an organism or corpse.
    pub species: Option<Species>,
    /// Whether an organism is currently a dormant cyst.
    pub dormant: bool,
}

impl Sighting {
    /// The point used for direction and distance.
    ///
    /// Hazards are measured to their nearest boundary point. Everything
    /// else is measured center to center.
    pub fn focus(&self) -> Vec2 {
        self.closest_point.unwrap_or(self.position)
    }

    /// Unit direction from `observer` toward the entity.
    ///
    /// Zero when a point-like entity sits exactly on the observer.
    pub fn direction_from(&self, observer: Vec2) -> Vec2 {
        self.heading
            .unwrap_or_else(|| (self.focus() - observer).normalized())
    }

    /// The organism handle, if this sighting is an organism or corpse.
    pub const fn organism(&self) -> Option<OrganismHandle> {
        match self.target {
            SightingTarget::Organism(handle) => Some(handle),
            SightingTarget::Nutrient(_) | SightingTarget::Hazard(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    #[test]
    fn hazards_focus_on_closest_point() {
        let sighting = Sighting {
            category: Category::Wall,
            target: SightingTarget::Hazard(0),
            position: Vec2::new(10.0, 0.0),
            closest_point: Some(Vec2::new(2.0, 0.0)),
            heading: None,
            value: 1.0,
            size: 1.0,
            species: None,
            dormant: false,
        };
        assert_eq!(sighting.focus(), Vec2::new(2.0, 0.0));
        assert_eq!(sighting.direction_from(Vec2::new(4.0, 0.0)), Vec2::new(-1.0, 0.0));
        assert!(sighting.organism().is_none());
    }

    #[test]
    fn heading_overrides_a_zero_offset() {
        let sighting = Sighting {
            category: Category::Wall,
            target: SightingTarget::Hazard(0),
            position: Vec2::new(-0.5, 20.0),
            closest_point: Some(Vec2::new(0.0, 20.0)),
            heading: Some(Vec2::new(-1.0, 0.0)),
            value: 1.0,
            size: 1.0,
            species: None,
            dormant: false,
        };
        assert_eq!(sighting.direction_from(Vec2::new(0.0, 20.0)), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn organisms_expose_their_handle() {
        let handle = OrganismHandle::from(KeyData::from_ffi(1));
        let sighting = Sighting {
            category: Category::Organism,
            target: SightingTarget::Organism(handle),
            position: Vec2::new(1.0, 1.0),
            closest_point: None,
            heading: None,
            value: 50.0,
            size: 1.0,
            species: Some(Species::Pacifist),
            dormant: false,
        };
        assert_eq!(sighting.focus(), Vec2::new(1.0, 1.0));
        assert_eq!(sighting.organism(), Some(handle));
    }
}
