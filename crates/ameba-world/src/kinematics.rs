//! Minimal stand-in for the physical layer.
//!
//! Bodies receive impulses from the behavior and combat code. Once per
//! tick [`integrate`] damps their velocity, caps their speed, moves them
//! and keeps them inside the arena bounds.

use ameba_types::{Body, Vec2};
use rand::Rng;

/// Axis-aligned arena bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Bounds {
    /// Bounds of the box `[0, width] x [0, height]`.
    pub const fn of_size(width: f64, height: f64) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    /// Clamp a point into the bounds.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// A uniformly random point inside the bounds, `margin` away from the edges
    /// when the box is large enough.
    pub fn random_point(&self, margin: f64, rng: &mut impl Rng) -> Vec2 {
        let (lo_x, hi_x) = shrink(self.min.x, self.max.x, margin);
        let (lo_y, hi_y) = shrink(self.min.y, self.max.y, margin);
        Vec2::new(sample(lo_x, hi_x, rng), sample(lo_y, hi_y, rng))
    }
}

fn shrink(lo: f64, hi: f64, margin: f64) -> (f64, f64) {
    if hi - lo > 2.0 * margin {
        (lo + margin, hi - margin)
    } else {
        (lo, hi)
    }
}

fn sample(lo: f64, hi: f64, rng: &mut impl Rng) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Motion parameters shared by every body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Linear damping coefficient per second.
    pub linear_damping: f64,
    /// Speed cap in units per second.
    pub max_speed: f64,
}

/// Advance one body by `dt` seconds and return the distance it moved.
pub fn integrate(body: &mut Body, dt: f64, motion: Motion, bounds: &Bounds) -> f64 {
    let damping = motion.linear_damping.mul_add(dt, 1.0).recip();
    body.velocity = (body.velocity * damping).clamp_length(motion.max_speed);
    let start = body.position;
    body.position = bounds.clamp(start + body.velocity * dt);
    if !body.velocity.is_zero() {
        body.rotation = body.velocity.y.atan2(body.velocity.x);
    }
    start.distance(body.position)
}

/// Bleed velocity toward zero at `rate` per second.
pub fn settle(body: &mut Body, dt: f64, rate: f64) {
    let keep = (1.0 - (rate * dt).min(1.0)).max(0.0);
    body.velocity = body.velocity * keep;
}

/// Stop a body dead.
pub const fn halt(body: &mut Body) {
    body.velocity = Vec2::ZERO;
}
