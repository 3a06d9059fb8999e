//! Spatial query seam.
//!
//! The simulation core treats perception as a read-only, authoritative
//! query: give it a circle and it returns every live entity overlapping
//! it, already tagged and copied into [`Sighting`] records. Released pool
//! slots never appear in the result.

use ameba_types::{OrganismHandle, Sighting, Vec2};

/// Radius query over the live entities of a world.
pub trait SpatialQuery {
    /// Every live entity overlapping the circle at `center` with `radius`.
    ///
    /// `exclude` removes the querying organism from its own results. A
    /// non-positive radius yields no sightings.
    fn query_radius(
        &self,
        center: Vec2,
        radius: f64,
        exclude: Option<OrganismHandle>,
    ) -> Vec<Sighting>;
}

/// Whether two circles overlap or touch.
pub fn circles_overlap(a: Vec2, a_radius: f64, b: Vec2, b_radius: f64) -> bool {
    a.distance(b) <= a_radius + b_radius
}
