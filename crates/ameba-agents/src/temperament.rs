//! Temperament weights for desire computation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How strongly an organism explores, pursues and avoids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperament {
    /// Pull toward unknown stimuli.
    pub curiosity: f64,
    /// Pull toward liked stimuli.
    pub greed: f64,
    /// Push away from disliked stimuli.
    pub fear: f64,
}

impl Temperament {
    /// Explicit weights.
    pub const fn new(curiosity: f64, greed: f64, fear: f64) -> Self {
        Self {
            curiosity,
            greed,
            fear,
        }
    }

    /// `points` split evenly over the three weights.
    pub fn balanced(points: f64) -> Self {
        let share = points / 3.0;
        Self::new(share, share, share)
    }

    /// `points` split at two uniform cut points.
    ///
    /// Non-positive or non-finite `points` yield all-zero weights.
    pub fn random(points: f64, rng: &mut impl Rng) -> Self {
        if !points.is_finite() || points <= 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        let a = rng.random_range(0.0..=points);
        let b = rng.random_range(0.0..=points);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self::new(low, high - low, points - high)
    }
}

impl Default for Temperament {
    fn default() -> Self {
        Self::balanced(10.0)
    }
}
