//! Simulation clock.
//!
//! The clock is the single source of truth for simulated time. It counts
//! ticks with checked arithmetic, derives elapsed seconds from the tick
//! counter and a fixed step, and accumulates time toward the next world
//! balancing pass.

use crate::config::WorldConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. a non-positive tick length).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Fixed-step simulated clock.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Ticks completed so far. Incremented at the start of each tick.
    tick: u64,

    /// Simulated seconds per tick.
    dt: f64,

    /// Seconds accumulated since the last balancing pass.
    since_balance: f64,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] unless `tick_seconds` is a
    /// finite positive number.
    pub fn new(world: &WorldConfig) -> Result<Self, ClockError> {
        if !world.tick_seconds.is_finite() || world.tick_seconds <= 0.0 {
            return Err(ClockError::InvalidConfig {
                reason: format!("tick_seconds must be positive, got {}", world.tick_seconds),
            });
        }
        Ok(Self {
            tick: 0,
            dt: world.tick_seconds,
            since_balance: 0.0,
        })
    }

    /// Advance by one tick and return the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter is exhausted.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.since_balance += self.dt;
        Ok(self.tick)
    }

    /// The current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds per tick.
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulated seconds elapsed since tick 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed(&self) -> f64 {
        self.tick as f64 * self.dt
    }

    /// Whether `interval` seconds have passed since the last balancing
    /// pass. Resets the accumulator when they have.
    pub fn take_balance_due(&mut self, interval: f64) -> bool {
        if self.since_balance + f64::EPSILON < interval {
            return false;
        }
        self.since_balance = 0.0;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn world(tick_seconds: f64) -> WorldConfig {
        WorldConfig {
            tick_seconds,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn new_clock_starts_at_zero() {
        let clock = SimClock::new(&world(0.1)).unwrap();
        assert_eq!(clock.tick(), 0);
        assert!(clock.elapsed().abs() < f64::EPSILON);
    }

    #[test]
    fn advance_counts_ticks_and_time() {
        let mut clock = SimClock::new(&world(0.25)).unwrap();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert!((clock.elapsed() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn non_positive_tick_is_rejected() {
        assert!(matches!(
            SimClock::new(&world(0.0)),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(SimClock::new(&world(f64::NAN)).is_err());
    }

    #[test]
    fn overflow_is_detected() {
        let mut clock = SimClock::new(&world(0.1)).unwrap();
        clock.tick = u64::MAX;
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
    }

    #[test]
    fn balance_fires_every_interval() {
        let mut clock = SimClock::new(&world(0.1)).unwrap();
        let mut fired = Vec::new();
        for _ in 0..10 {
            let tick = clock.advance().unwrap();
            if clock.take_balance_due(0.5) {
                fired.push(tick);
            }
        }
        assert_eq!(fired, vec![5, 10]);
    }
}
