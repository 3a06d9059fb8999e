//! Planar geometry: vectors and rigid bodies.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Squared length below which a vector is treated as zero.
const ZERO_LENGTH_SQUARED: f64 = 1e-12;

/// A 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a vector from components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from the +x axis.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Squared Euclidean length.
    pub fn length_squared(self) -> f64 {
        self.x.mul_add(self.x, self.y * self.y)
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Whether the vector is numerically zero.
    pub fn is_zero(self) -> bool {
        self.length_squared() < ZERO_LENGTH_SQUARED
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        self * self.length().recip()
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Shorten the vector to at most `max` length, preserving direction.
    pub fn clamp_length(self, max: f64) -> Self {
        let length = self.length();
        if length > max && length > 0.0 {
            self * (max / length)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Kinematic state of an organism's body.
///
/// The core only ever applies impulses and reads positions. Integration
/// lives in the world crate's kinematics module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Position of the body's center.
    pub position: Vec2,
    /// Linear velocity in units per second.
    pub velocity: Vec2,
    /// Heading in radians.
    pub rotation: f64,
}

impl Body {
    /// A body at rest at `position` facing `rotation`.
    pub const fn at_rest(position: Vec2, rotation: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation,
        }
    }

    /// Apply an instantaneous impulse to a body of the given mass.
    ///
    /// Non-positive masses are treated as unit mass.
    pub fn apply_impulse(&mut self, impulse: Vec2, mass: f64) {
        let mass = if mass > 0.0 { mass } else { 1.0 };
        self.velocity += impulse * mass.recip();
    }
}
