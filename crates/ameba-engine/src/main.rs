//! Simulation binary for Ameba.
//!
//! Wires the tick loop to configuration, seeding, persistence and the
//! operator controls, then runs until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ameba-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation state and seed the world
//! 4. Open the session directory for snapshots
//! 5. Create operator state and hook Ctrl-C to a clean stop
//! 6. Run the simulation loop
//! 7. Flush surviving organisms and export the dataset, also when the
//!    run fails

mod error;
mod recorder_callback;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use ameba_core::config::SimulationConfig;
use ameba_core::operator::OperatorState;
use ameba_core::runner::{self, NoOpCallback, RunnerError, SimulationResult};
use ameba_core::tick::SimulationState;
use ameba_store::{Recorder, SessionStore, export_dataset};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::recorder_callback::RecorderCallback;

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "ameba-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, from_file) = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("ameba-engine starting");
    if !from_file {
        info!(path = CONFIG_FILE, "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        tick_seconds = config.world.tick_seconds,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "Configuration loaded"
    );

    let mut state = SimulationState::new(config).map_err(EngineError::from)?;
    let seeded = spawner::seed_world(&mut state);
    let census = state.ecosystem.census();
    info!(
        organisms = seeded.organisms,
        nutrients = seeded.nutrients,
        pacifists = census.pacifists,
        predators = census.predators,
        neutrals = census.neutrals,
        "World seeded"
    );

    let operator = Arc::new(OperatorState::new(
        state.config.world.tick_interval_ms,
        state.config.world.max_ticks,
    ));
    spawn_stop_on_ctrl_c(Arc::clone(&operator));

    if state.config.persistence.enabled {
        let started_at = chrono::Local::now().naive_local();
        let store = SessionStore::create(&state.config.persistence.base_dir, started_at)
            .map_err(EngineError::from)?;
        info!(session = %store.dir().display(), "Session directory created");

        let recorder = Recorder::new(store, state.config.persistence.min_time_alive);
        let mut callback = RecorderCallback::new(recorder);
        let outcome = runner::run_simulation(&mut state, &operator, &mut callback).await;
        let result = close_session(outcome, &state, &mut callback)?;
        runner::log_simulation_end(&result);
        log_shutdown(&result);
    } else {
        info!("Persistence disabled");
        let result = runner::run_simulation(&mut state, &operator, &mut NoOpCallback)
            .await
            .map_err(EngineError::from)?;
        runner::log_simulation_end(&result);
        log_shutdown(&result);
    }

    Ok(())
}

/// Load the simulation configuration from [`CONFIG_FILE`].
///
/// Returns the config and whether it came from the file.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

/// Request a clean stop on the first Ctrl-C.
fn spawn_stop_on_ctrl_c(operator: Arc<OperatorState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current tick");
                operator.request_stop();
            }
            Err(error) => warn!(%error, "Failed to listen for Ctrl-C"),
        }
    });
}

/// Persist the session, then surface the run's outcome.
///
/// Survivors are flushed even when the run failed, so a tick error never
/// loses the organisms that were alive at that point.
fn close_session(
    outcome: Result<SimulationResult, RunnerError>,
    state: &SimulationState,
    callback: &mut RecorderCallback<SessionStore>,
) -> Result<SimulationResult, EngineError> {
    if let Err(error) = &outcome {
        error!(%error, "Simulation failed, persisting the session before exit");
    }
    finish_session(state, callback)?;
    outcome.map_err(EngineError::from)
}

/// Save the survivors and fold the session into the cumulative dataset.
fn finish_session(
    state: &SimulationState,
    callback: &mut RecorderCallback<SessionStore>,
) -> Result<(), EngineError> {
    let flushed = callback.flush(state);
    let (saved, discarded) = callback.totals();
    info!(
        flushed,
        deaths_saved = saved,
        deaths_discarded = discarded,
        failures = callback.recorder().failures(),
        "Session persisted"
    );

    let dataset = state.config.persistence.dataset_path();
    let rows = export_dataset(callback.recorder().sink(), &dataset)?;
    info!(rows, dataset = %dataset.display(), "Dataset exported");
    Ok(())
}

fn log_shutdown(result: &SimulationResult) {
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "ameba-engine shutdown complete"
    );
}
