//! Persistence policy in front of a [`SnapshotSink`].
//!
//! The recorder decides which lives are worth keeping. Only organisms
//! that lived longer than `min_time_alive` are saved. When a short life
//! ends, any snapshot saved for it earlier is deleted. Sink failures are
//! logged with `warn!` and counted, never returned, so a full disk can
//! never stop the simulation.

use ameba_types::OrganismSnapshot;
use tracing::{debug, warn};

use crate::session::SnapshotSink;

/// What the recorder did with a death.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// The snapshot was saved.
    Saved,
    /// The life was too short. Any stored snapshot was removed.
    Discarded,
    /// The sink failed. The failure was logged.
    Failed,
}

/// Threshold policy over a snapshot sink.
#[derive(Debug)]
pub struct Recorder<S> {
    sink: S,
    min_time_alive: f64,
    failures: u64,
}

impl<S: SnapshotSink> Recorder<S> {
    /// Wrap `sink`, keeping lives longer than `min_time_alive` seconds.
    pub const fn new(sink: S, min_time_alive: f64) -> Self {
        Self {
            sink,
            min_time_alive,
            failures: 0,
        }
    }

    /// Whether a life of this length is kept.
    pub fn is_worth_keeping(&self, snapshot: &OrganismSnapshot) -> bool {
        snapshot.time_alive > self.min_time_alive
    }

    /// Record a death: save long lives, delete short ones.
    pub fn record_death(&mut self, snapshot: &OrganismSnapshot) -> DeathOutcome {
        if self.is_worth_keeping(snapshot) {
            if self.save(snapshot) {
                DeathOutcome::Saved
            } else {
                DeathOutcome::Failed
            }
        } else {
            match self.sink.delete(snapshot.id) {
                Ok(()) => DeathOutcome::Discarded,
                Err(error) => {
                    self.failures = self.failures.saturating_add(1);
                    warn!(id = %snapshot.id, %error, "Failed to delete snapshot");
                    DeathOutcome::Failed
                }
            }
        }
    }

    /// Save a living organism if it qualifies. Returns whether it was saved.
    pub fn checkpoint(&mut self, snapshot: &OrganismSnapshot) -> bool {
        self.is_worth_keeping(snapshot) && self.save(snapshot)
    }

    /// Force-save every qualifying snapshot. Returns how many were saved.
    pub fn flush<'a>(&mut self, snapshots: impl IntoIterator<Item = &'a OrganismSnapshot>) -> usize {
        let saved = snapshots
            .into_iter()
            .filter(|snapshot| self.checkpoint(snapshot))
            .count();
        debug!(saved, "Flushed live organisms");
        saved
    }

    /// Number of sink operations that failed so far.
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    /// The wrapped sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    fn save(&mut self, snapshot: &OrganismSnapshot) -> bool {
        match self.sink.save(snapshot) {
            Ok(()) => true,
            Err(error) => {
                self.failures = self.failures.saturating_add(1);
                warn!(id = %snapshot.id, %error, "Failed to save snapshot");
                false
            }
        }
    }
}
