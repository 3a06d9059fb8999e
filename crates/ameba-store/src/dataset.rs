//! Cumulative dataset export.
//!
//! At the end of a run every snapshot in the session directory is
//! appended as one CSV row to a dataset shared by all runs. The header
//! is written only when the dataset file does not exist yet or is empty.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use ameba_types::{OrganismId, OrganismSnapshot};
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::StoreError;
use crate::session::SessionStore;

/// Column names of the dataset, in row order.
pub const DATASET_COLUMNS: [&str; 5] = ["ID", "Generation", "TimeAlive", "Distance", "EnergyConsumed"];

/// One dataset row. Measurements are written with two decimals.
#[derive(Debug, Serialize)]
struct DatasetRow {
    id: OrganismId,
    generation: u32,
    #[serde(serialize_with = "two_decimals")]
    time_alive: f64,
    #[serde(serialize_with = "two_decimals")]
    distance: f64,
    #[serde(serialize_with = "two_decimals")]
    energy_consumed: f64,
}

impl From<&OrganismSnapshot> for DatasetRow {
    fn from(snapshot: &OrganismSnapshot) -> Self {
        Self {
            id: snapshot.id,
            generation: snapshot.generation,
            time_alive: snapshot.time_alive,
            distance: snapshot.distance_traveled,
            energy_consumed: snapshot.energy_consumed,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:.2}"))
}

/// Write `snapshots` as CSV rows to `writer`, preceded by the header
/// when `header` is set.
fn write_rows<W: Write>(
    writer: W,
    header: bool,
    snapshots: &[OrganismSnapshot],
) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    if header {
        out.write_record(DATASET_COLUMNS)?;
    }
    for snapshot in snapshots {
        out.serialize(DatasetRow::from(snapshot))?;
    }
    out.flush()?;
    Ok(())
}

/// Append every snapshot of `session` to the dataset at `dataset_path`.
///
/// Returns the number of rows appended.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the session cannot be listed or the
/// dataset cannot be opened, and [`StoreError::Csv`] if a row cannot be
/// written.
pub fn export_dataset(session: &SessionStore, dataset_path: &Path) -> Result<usize, StoreError> {
    let snapshots = session.load_all()?;
    let needs_header = !fs::metadata(dataset_path).is_ok_and(|meta| meta.len() > 0);

    if let Some(parent) = dataset_path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dataset_path)
        .map_err(|e| StoreError::io(dataset_path, e))?;
    write_rows(file, needs_header, &snapshots).map_err(|e| StoreError::csv(dataset_path, e))?;

    info!(
        rows = snapshots.len(),
        session = %session.dir().display(),
        dataset = %dataset_path.display(),
        "Dataset exported"
    );
    Ok(snapshots.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::session::SnapshotSink;
    use crate::session::tests::snapshot;

    fn session(base: &Path, second: u32) -> SessionStore {
        let started = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, second)
            .unwrap();
        SessionStore::create(base, started).unwrap()
    }

    fn header_line() -> String {
        DATASET_COLUMNS.join(",")
    }

    #[test]
    fn rows_use_two_decimals() {
        let snap = snapshot(3.456);
        let mut out = Vec::new();
        write_rows(&mut out, false, std::slice::from_ref(&snap)).unwrap();
        let row = String::from_utf8(out).unwrap();
        assert_eq!(row, format!("{},2,3.46,12.35,40.00\n", snap.id));
    }

    #[test]
    fn header_is_written_once_across_sessions() {
        let base = tempfile::tempdir().unwrap();
        let dataset = base.path().join("Global_Dataset.csv");

        let mut first = session(base.path(), 0);
        first.save(&snapshot(2.0)).unwrap();
        first.save(&snapshot(4.0)).unwrap();
        assert_eq!(export_dataset(&first, &dataset).unwrap(), 2);

        let mut second = session(base.path(), 1);
        second.save(&snapshot(6.0)).unwrap();
        assert_eq!(export_dataset(&second, &dataset).unwrap(), 1);

        let contents = fs::read_to_string(&dataset).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        let header = header_line();
        assert_eq!(lines.first().copied(), Some(header.as_str()));
        assert_eq!(lines.iter().filter(|l| **l == header).count(), 1);
    }

    #[test]
    fn empty_session_still_creates_the_dataset() {
        let base = tempfile::tempdir().unwrap();
        let dataset = base.path().join("out").join("Global_Dataset.csv");
        let empty = session(base.path(), 0);
        assert_eq!(export_dataset(&empty, &dataset).unwrap(), 0);
        assert_eq!(fs::read_to_string(&dataset).unwrap().trim(), header_line());
    }
}
