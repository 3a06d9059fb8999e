//! Hazard walls.
//!
//! Walls are axis-aligned rectangles. Perception measures them to their
//! nearest boundary point, so a long wall repels along its normal
//! instead of toward its distant center. An observer touching or inside
//! a wall is measured to the nearest edge and pointed along that edge's
//! inward normal, so contact never collapses to a zero direction.

use ameba_types::Vec2;
use serde::Deserialize;

/// Where a wall is, as seen from one observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Nearest point on the wall's boundary.
    pub point: Vec2,
    /// Unit direction from the observer toward the wall.
    pub direction: Vec2,
    /// Whether the observer is on or inside the boundary.
    pub inside: bool,
}

/// An axis-aligned wall rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Hazard {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Hazard {
    /// Build a wall from two opposite corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Nearest point of the rectangle to `point`.
    ///
    /// Points inside the rectangle are their own nearest point.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Nearest point on the rectangle's boundary, and the unit direction
    /// from `point` toward the wall.
    ///
    /// Outside the rectangle this is the clamped point and the direction
    /// to it. On or inside the boundary the point is projected onto the
    /// nearest edge and the direction is that edge's inward normal.
    pub fn contact(&self, point: Vec2) -> WallContact {
        let clamped = self.closest_point(point);
        let offset = clamped - point;
        if !offset.is_zero() {
            return WallContact {
                point: clamped,
                direction: offset.normalized(),
                inside: false,
            };
        }
        let edges = [
            (point.x - self.min.x, Vec2::new(self.min.x, point.y), Vec2::new(1.0, 0.0)),
            (self.max.x - point.x, Vec2::new(self.max.x, point.y), Vec2::new(-1.0, 0.0)),
            (point.y - self.min.y, Vec2::new(point.x, self.min.y), Vec2::new(0.0, 1.0)),
            (self.max.y - point.y, Vec2::new(point.x, self.max.y), Vec2::new(0.0, -1.0)),
        ];
        let (edge_point, inward) = edges
            .into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or((point, Vec2::ZERO), |(_, edge_point, inward)| (edge_point, inward));
        WallContact {
            point: edge_point,
            direction: inward,
            inside: true,
        }
    }

    /// Whether a circle overlaps the rectangle.
    pub fn overlaps_circle(&self, center: Vec2, radius: f64) -> bool {
        self.closest_point(center).distance(center) <= radius
    }

    /// Four walls of `thickness` enclosing the box `[0, width] x [0, height]`.
    pub fn enclosure(width: f64, height: f64, thickness: f64) -> Vec<Self> {
        vec![
            Self::new(Vec2::new(-thickness, -thickness), Vec2::new(width + thickness, 0.0)),
            Self::new(Vec2::new(-thickness, height), Vec2::new(width + thickness, height + thickness)),
            Self::new(Vec2::new(-thickness, 0.0), Vec2::new(0.0, height)),
            Self::new(Vec2::new(width, 0.0), Vec2::new(width + thickness, height)),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_is_on_the_boundary() {
        let wall = Hazard::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 1.0));
        let point = wall.closest_point(Vec2::new(3.0, 5.0));
        assert_eq!(point, Vec2::new(3.0, 1.0));
        // The center is much farther away than the boundary.
        assert!(wall.center().distance(Vec2::new(3.0, 5.0)) > 4.0);
    }

    #[test]
    fn inside_points_are_their_own_closest_point() {
        let wall = Hazard::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let inside = Vec2::new(1.0, 1.5);
        assert_eq!(wall.closest_point(inside), inside);
        assert!(wall.overlaps_circle(inside, 0.0));
    }

    #[test]
    fn outside_contact_points_at_the_boundary() {
        let wall = Hazard::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 1.0));
        let contact = wall.contact(Vec2::new(3.0, 5.0));
        assert_eq!(contact.point, Vec2::new(3.0, 1.0));
        assert_eq!(contact.direction, Vec2::new(0.0, -1.0));
        assert!(!contact.inside);
    }

    #[test]
    fn edge_contact_points_into_the_wall() {
        // Left enclosure wall, observer clamped onto its inner face.
        let wall = Hazard::new(Vec2::new(-1.0, 0.0), Vec2::new(0.0, 40.0));
        let contact = wall.contact(Vec2::new(0.0, 20.0));
        assert_eq!(contact.point, Vec2::new(0.0, 20.0));
        assert_eq!(contact.direction, Vec2::new(-1.0, 0.0));
        assert!(contact.inside);
    }

    #[test]
    fn inside_contact_uses_the_nearest_edge() {
        let wall = Hazard::new(Vec2::new(8.0, -2.0), Vec2::new(12.0, 2.0));
        let contact = wall.contact(Vec2::new(9.0, 0.0));
        assert_eq!(contact.point, Vec2::new(8.0, 0.0));
        assert_eq!(contact.direction, Vec2::new(1.0, 0.0));
        assert!(contact.inside);

        let contact = wall.contact(Vec2::new(10.5, 1.5));
        assert_eq!(contact.point, Vec2::new(10.5, 2.0));
        assert_eq!(contact.direction, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn corners_are_normalized() {
        let wall = Hazard::new(Vec2::new(5.0, 5.0), Vec2::new(1.0, 2.0));
        assert_eq!(wall.min, Vec2::new(1.0, 2.0));
        assert_eq!(wall.max, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn enclosure_surrounds_the_arena() {
        let walls = Hazard::enclosure(20.0, 10.0, 1.0);
        assert_eq!(walls.len(), 4);
        let center = Vec2::new(10.0, 5.0);
        assert!(walls.iter().all(|w| !w.overlaps_circle(center, 1.0)));
        assert!(walls.iter().any(|w| w.overlaps_circle(Vec2::new(0.2, 5.0), 0.5)));
    }

    #[test]
    fn parses_from_yaml() {
        let wall: Hazard = serde_yml::from_str("min: {x: 0.0, y: 0.0}\nmax: {x: 1.0, y: 2.0}\n").unwrap();
        assert_eq!(wall.max, Vec2::new(1.0, 2.0));
    }
}
