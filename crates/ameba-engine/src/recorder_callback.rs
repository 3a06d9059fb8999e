//! Tick callback that persists lives as they end.
//!
//! Deaths go through the recorder's threshold policy. With
//! `persistence.persist_on_learn` set, living organisms that learned
//! something this tick are checkpointed too.

use ameba_core::runner::TickCallback;
use ameba_core::tick::{SimulationState, TickSummary};
use ameba_store::{DeathOutcome, Recorder, SnapshotSink};
use tracing::debug;

/// Callback that bridges the tick cycle to a snapshot recorder.
#[derive(Debug)]
pub struct RecorderCallback<S> {
    recorder: Recorder<S>,
    saved: u64,
    discarded: u64,
}

impl<S: SnapshotSink> RecorderCallback<S> {
    /// Wrap `recorder`.
    pub const fn new(recorder: Recorder<S>) -> Self {
        Self {
            recorder,
            saved: 0,
            discarded: 0,
        }
    }

    /// Save every qualifying living organism. Called once on shutdown.
    pub fn flush(&mut self, state: &SimulationState) -> usize {
        let live = state.ecosystem.live_snapshots();
        self.recorder.flush(&live)
    }

    /// The recorder, for the final export.
    pub const fn recorder(&self) -> &Recorder<S> {
        &self.recorder
    }

    /// Deaths saved and discarded so far.
    pub const fn totals(&self) -> (u64, u64) {
        (self.saved, self.discarded)
    }
}

impl<S: SnapshotSink + Send> TickCallback for RecorderCallback<S> {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        for snapshot in summary.deaths.iter().filter_map(|death| death.snapshot.as_ref()) {
            match self.recorder.record_death(snapshot) {
                DeathOutcome::Saved => self.saved = self.saved.saturating_add(1),
                DeathOutcome::Discarded => self.discarded = self.discarded.saturating_add(1),
                DeathOutcome::Failed => {}
            }
        }

        let checkpoints = summary
            .learned
            .iter()
            .filter(|snapshot| self.recorder.checkpoint(snapshot))
            .count();

        if !summary.deaths.is_empty() || checkpoints > 0 {
            debug!(
                tick = summary.tick,
                deaths = summary.deaths.len(),
                checkpoints,
                failures = self.recorder.failures(),
                "Persistence updated"
            );
        }
    }
}
