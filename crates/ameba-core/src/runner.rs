//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] wraps the single-tick [`run_tick`] function with the
//! control plane: the tick limit, extinction detection, the pause
//! between ticks and a clean stop.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// The persistence recorder in the engine binary is one. The callback
/// sees the summary and the state as the tick left it.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A tick callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        tick_interval_ms = operator.tick_interval_ms(),
        organisms = state.ecosystem.living_count(),
        "Simulation starting"
    );

    loop {
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return Ok(finish(SimulationEndReason::OperatorStop, last_summary, total_ticks));
        }

        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, state);

        if summary.census.living() == 0 {
            info!(tick = summary.tick, "No living organisms left -- extinction");
            return Ok(finish(SimulationEndReason::Extinction, Some(summary), total_ticks));
        }

        // summary.tick is the tick that just ran, so a limit of 5 stops
        // with five ticks completed.
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return Ok(finish(
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            ));
        }

        last_summary = Some(summary);

        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }
}

const fn finish(
    reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    SimulationResult {
        end_reason: reason,
        final_summary,
        total_ticks,
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            time = summary.time,
            pacifists = summary.census.pacifists,
            predators = summary.census.predators,
            neutrals = summary.census.neutrals,
            corpses = summary.census.corpses,
            nutrients = summary.census.nutrients,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    fn make_simulation_state(organisms: usize) -> SimulationState {
        let mut config = SimulationConfig::default();
        config.world.organism_capacity = 16;
        config.world.nutrient_capacity = 16;
        config.balance.max_food = 4;
        let mut state = SimulationState::new(config).unwrap();
        let _ = state.seed_population(organisms);
        state
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut state = make_simulation_state(4);
        let operator = Arc::new(OperatorState::new(0, 5));
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(5));
    }

    #[tokio::test]
    async fn operator_stop() {
        let mut state = make_simulation_state(4);
        let operator = Arc::new(OperatorState::new(0, 0));
        operator.request_stop();
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test]
    async fn empty_world_goes_extinct_after_one_tick() {
        let mut state = make_simulation_state(0);
        let operator = Arc::new(OperatorState::new(0, 0));
        let mut cb = NoOpCallback;

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Extinction);
        assert_eq!(result.total_ticks, 1);
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {
                self.count = self.count.saturating_add(1);
            }
        }

        let mut state = make_simulation_state(4);
        let operator = Arc::new(OperatorState::new(0, 3));
        let mut cb = CountCallback { count: 0 };

        let _ = run_simulation(&mut state, &operator, &mut cb).await.unwrap();
        assert_eq!(cb.count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_from_another_task_ends_a_paced_run() {
        let mut state = make_simulation_state(4);
        let operator = Arc::new(OperatorState::new(1_000, 0));
        let mut cb = NoOpCallback;

        let stopper = {
            let operator = Arc::clone(&operator);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(2_500)).await;
                operator.request_stop();
            })
        };

        let result = run_simulation(&mut state, &operator, &mut cb).await.unwrap();
        stopper.await.unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 3);
    }
}
