//! Operator control state for a running simulation.
//!
//! Shared between the tick loop and whatever stops it from outside (the
//! Ctrl-C handler in the binary, tests). The stop flag is an atomic, so
//! the loop reads it without locking.

use std::sync::atomic::{AtomicBool, Ordering};

/// Longest accepted tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    OperatorStop,
    /// No living organism is left. Corpses do not count.
    Extinction,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    stop_requested: AtomicBool,
    /// Pause between ticks in milliseconds, capped at [`MAX_TICK_INTERVAL_MS`].
    tick_interval_ms: u64,
    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl OperatorState {
    /// Create operator state with the given interval and tick limit.
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: tick_interval_ms.min(MAX_TICK_INTERVAL_MS),
            max_ticks,
        }
    }

    /// Request a clean simulation stop after the current tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Pause between ticks in milliseconds. Zero runs flat out.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Whether `current_tick` has reached a non-zero tick limit.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// The tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_limit_zero_is_unlimited() {
        let op = OperatorState::new(50, 0);
        assert!(!op.tick_limit_reached(u64::MAX));
        let op = OperatorState::new(50, 10);
        assert!(!op.tick_limit_reached(9));
        assert!(op.tick_limit_reached(10));
    }

    #[test]
    fn tick_interval_is_capped() {
        assert_eq!(OperatorState::new(50, 0).tick_interval_ms(), 50);
        let op = OperatorState::new(MAX_TICK_INTERVAL_MS + 1, 0);
        assert_eq!(op.tick_interval_ms(), MAX_TICK_INTERVAL_MS);
    }

    #[test]
    fn stop_flag_is_sticky() {
        let op = OperatorState::new(50, 0);
        assert!(!op.is_stop_requested());
        op.request_stop();
        assert!(op.is_stop_requested());
    }
}
