//! Per-session snapshot directory.
//!
//! Every run writes into its own directory named after the moment it
//! started, e.g. `<base>/Sim_2026-10-14_09-30-00/`. Each organism life
//! that is worth keeping becomes one `<id>.json` file there. Saving the
//! same id again overwrites the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ameba_types::{OrganismId, OrganismSnapshot};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Prefix of every session directory name.
pub const SESSION_PREFIX: &str = "Sim_";

/// `chrono` format of the timestamp part of a session directory name.
pub const SESSION_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Destination for organism snapshots.
pub trait SnapshotSink {
    /// Store or overwrite the snapshot for `snapshot.id`.
    fn save(&mut self, snapshot: &OrganismSnapshot) -> Result<(), StoreError>;

    /// Remove any stored snapshot for `id`. Removing nothing is not an error.
    fn delete(&mut self, id: OrganismId) -> Result<(), StoreError>;
}

/// Directory name for a session started at `started_at`.
pub fn session_dir_name(started_at: NaiveDateTime) -> String {
    format!("{SESSION_PREFIX}{}", started_at.format(SESSION_TIME_FORMAT))
}

/// JSON snapshot files in one session directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create the session directory under `base` for a run started at
    /// `started_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn create(base: &Path, started_at: NaiveDateTime) -> Result<Self, StoreError> {
        let dir = base.join(session_dir_name(started_at));
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        debug!(dir = %dir.display(), "Session directory ready");
        Ok(Self { dir })
    }

    /// Open an existing session directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSessionDir`] if `dir` is not a directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StoreError::InvalidSessionDir { path: dir });
        }
        Ok(Self { dir })
    }

    /// The session directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for `id`.
    pub fn snapshot_path(&self, id: OrganismId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Read a single snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Json`] if it is not a valid snapshot.
    pub fn load(&self, id: OrganismId) -> Result<OrganismSnapshot, StoreError> {
        read_snapshot(&self.snapshot_path(id))
    }

    /// Read every snapshot in the session, in file name order.
    ///
    /// Files that fail to parse are logged and skipped so a single
    /// corrupt snapshot does not lose the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be listed.
    pub fn load_all(&self) -> Result<Vec<OrganismSnapshot>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut snapshots = Vec::with_capacity(paths.len());
        for path in paths {
            match read_snapshot(&path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(error) => warn!(%error, "Skipping unreadable snapshot"),
            }
        }
        Ok(snapshots)
    }
}

fn read_snapshot(path: &Path) -> Result<OrganismSnapshot, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StoreError::json(path, e))
}

impl SnapshotSink for SessionStore {
    fn save(&mut self, snapshot: &OrganismSnapshot) -> Result<(), StoreError> {
        let path = self.snapshot_path(snapshot.id);
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))
    }

    fn delete(&mut self, id: OrganismId) -> Result<(), StoreError> {
        let path = self.snapshot_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}
