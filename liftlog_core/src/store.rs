//! CSV-backed record store.
//!
//! The backing file is a flat CSV with the columns
//! `Date, Exercise, Sets x Reps x Weight, RPE, Muscle Group`. Loading
//! produces an explicit in-memory snapshot ([`WorkoutLog`]) that callers
//! refresh with [`WorkoutLog::reload`]; rows that fail validation are
//! quarantined with their line number rather than dropped silently or
//! propagated untyped.
//!
//! A missing or zero-length file is an empty store, not an error.

use crate::{Config, Error, Result, WeightUnit, WorkoutEntry};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Required CSV columns, in on-disk order
pub const CSV_HEADERS: [&str; 5] = [
    "Date",
    "Exercise",
    "Sets x Reps x Weight",
    "RPE",
    "Muscle Group",
];

/// A row as stored on disk. All fields are strings so that validation
/// happens in one place with row-level quarantine.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Exercise")]
    exercise: String,
    #[serde(rename = "Sets x Reps x Weight")]
    sets: String,
    #[serde(rename = "RPE")]
    rpe: String,
    #[serde(rename = "Muscle Group")]
    muscle_group: String,
}

impl From<&WorkoutEntry> for CsvRow {
    fn from(entry: &WorkoutEntry) -> Self {
        CsvRow {
            date: entry.date.format("%Y-%m-%d").to_string(),
            exercise: entry.exercise.clone(),
            sets: entry.sets_notation.clone(),
            rpe: entry.rpe.to_string(),
            muscle_group: entry.muscle_group.clone(),
        }
    }
}

fn entry_from_row(row: CsvRow, default_unit: WeightUnit) -> Result<WorkoutEntry> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidEntry(format!("bad date {:?}: {}", row.date, e)))?;

    let rpe: u8 = row
        .rpe
        .trim()
        .parse()
        .map_err(|_| Error::InvalidEntry(format!("RPE {:?} is not an integer", row.rpe)))?;

    WorkoutEntry::new(
        date,
        &row.exercise,
        &row.sets,
        rpe,
        &row.muscle_group,
        default_unit,
    )
}

/// A quarantined CSV row that failed validation
#[derive(Clone, Debug)]
pub struct RejectedRow {
    /// 1-based line number in the backing file
    pub line: u64,
    pub reason: String,
}

/// In-memory snapshot of the backing CSV file.
///
/// Replaces implicit module-level caching: consumers hold a snapshot and
/// call [`WorkoutLog::reload`] when they want fresh data.
#[derive(Clone, Debug)]
pub struct WorkoutLog {
    path: PathBuf,
    pub entries: Vec<WorkoutEntry>,
    pub rejected: Vec<RejectedRow>,
    loaded_mtime: Option<SystemTime>,
}

impl WorkoutLog {
    /// Load a snapshot of the workout file.
    ///
    /// A missing file yields an empty snapshot. Rows that fail validation
    /// land in `rejected` and are logged as warnings; the load itself only
    /// fails on I/O errors or a structurally unusable file (missing
    /// required columns).
    pub fn load(path: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::info!("No workout file found at {:?}, starting empty", path);
            return Ok(Self {
                path,
                entries: Vec::new(),
                rejected: Vec::new(),
                loaded_mtime: None,
            });
        }

        let metadata = std::fs::metadata(&path)?;
        let loaded_mtime = metadata.modified().ok();

        if metadata.len() == 0 {
            tracing::info!("Workout file {:?} is empty", path);
            return Ok(Self {
                path,
                entries: Vec::new(),
                rejected: Vec::new(),
                loaded_mtime,
            });
        }

        let (entries, rejected) = read_entries(&path, config.units.default)?;
        tracing::debug!(
            "Loaded {} entries ({} rejected) from {:?}",
            entries.len(),
            rejected.len(),
            path
        );

        Ok(Self {
            path,
            entries,
            rejected,
            loaded_mtime,
        })
    }

    /// Re-read the backing file if it changed since this snapshot was taken.
    ///
    /// Returns `true` when a reload actually happened. Staleness is keyed on
    /// the file's modification time, so an untouched file is a no-op.
    pub fn reload(&mut self, config: &Config) -> Result<bool> {
        let current_mtime = std::fs::metadata(&self.path)
            .ok()
            .and_then(|meta| meta.modified().ok());

        if current_mtime == self.loaded_mtime {
            return Ok(false);
        }

        *self = Self::load(self.path.clone(), config)?;
        Ok(true)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn read_entries(
    path: &Path,
    default_unit: WeightUnit,
) -> Result<(Vec<WorkoutEntry>, Vec<RejectedRow>)> {
    let file = File::open(path)?;
    // Shared lock: readers may overlap, writers may not
    file.lock_shared()?;

    // Trim so a hand-edited `Date, Exercise, ...` header still matches
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(&file);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = CSV_HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|col| col.trim() == **required))
        .copied()
        .collect();
    if !missing.is_empty() {
        let _ = file.unlock();
        return Err(Error::Store(format!(
            "workout file is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut entries = Vec::new();
    let mut rejected = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                tracing::warn!("Skipping unreadable CSV record at line {}: {}", line, e);
                rejected.push(RejectedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        let row: CsvRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping undecodable CSV row at line {}: {}", line, e);
                rejected.push(RejectedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match entry_from_row(row, default_unit) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Quarantined workout row at line {}: {}", line, e);
                rejected.push(RejectedRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    drop(reader);
    file.unlock()?;

    Ok((entries, rejected))
}

/// Append one entry to the workout file, writing the header first when the
/// file is new or empty.
pub fn append_entry(path: &Path, entry: &WorkoutEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // Exclusive lock over the header check and the write
    file.lock_exclusive()?;

    let needs_headers = file.metadata()?.len() == 0;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(&file);

    writer.serialize(CsvRow::from(entry))?;
    writer.flush()?;
    drop(writer);

    file.unlock()?;

    tracing::debug!("Appended workout entry for {:?} to {:?}", entry.exercise, path);
    Ok(())
}

/// Overwrite the workout file with the given entries.
///
/// Writes to a temp file in the same directory and renames it over the
/// original, so a crash mid-write never leaves a truncated store.
pub fn save_entries(path: &Path, entries: &[WorkoutEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "workout path missing parent")
    })?)?;

    temp.as_file().lock_exclusive()?;

    {
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(temp.as_file());
        for entry in entries {
            writer.serialize(CsvRow::from(entry))?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} workout entries to {:?}", entries.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_entry(date: &str, exercise: &str, sets: &str) -> WorkoutEntry {
        WorkoutEntry::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            exercise,
            sets,
            8,
            "Legs",
            WeightUnit::Pound,
        )
        .unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let log = WorkoutLog::load(temp_dir.path().join("nonexistent.csv"), &config).unwrap();
        assert!(log.is_empty());
        assert!(log.rejected.is_empty());
    }

    #[test]
    fn test_load_zero_length_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");
        File::create(&csv_path).unwrap();

        let log = WorkoutLog::load(&csv_path, &Config::default()).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_then_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        append_entry(&csv_path, &test_entry("2025-03-01", "Squat", "3x5x225lb")).unwrap();
        append_entry(&csv_path, &test_entry("2025-03-03", "Deadlift", "1x5x315lb")).unwrap();

        let log = WorkoutLog::load(&csv_path, &Config::default()).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].exercise, "Squat");
        assert_eq!(log.entries[0].sets.len(), 3);
        assert_eq!(log.entries[1].exercise, "Deadlift");

        // Header must appear exactly once
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.matches("Date").count(), 1);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        append_entry(&csv_path, &test_entry("2025-03-01", "Squat", "3x5x225lb")).unwrap();

        let replacement = vec![test_entry("2025-03-05", "Bench Press", "5x5x185lb")];
        save_entries(&csv_path, &replacement).unwrap();

        let log = WorkoutLog::load(&csv_path, &Config::default()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries[0].exercise, "Bench Press");
    }

    #[test]
    fn test_invalid_rows_are_quarantined_not_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        std::fs::write(
            &csv_path,
            "Date,Exercise,Sets x Reps x Weight,RPE,Muscle Group\n\
             2025-03-01,Squat,3x5x225lb,8,Legs\n\
             not-a-date,Bench,3x5x185lb,8,Chest\n\
             2025-03-02,Row,abcx5x135lb,7,Back\n\
             2025-03-03,Curl,3x10x30lb,15,Biceps\n",
        )
        .unwrap();

        let log = WorkoutLog::load(&csv_path, &Config::default()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries[0].exercise, "Squat");
        assert_eq!(log.rejected.len(), 3);
        // Line numbers point at the offending rows (line 1 is the header)
        let lines: Vec<u64> = log.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        std::fs::write(&csv_path, "Date,Exercise\n2025-03-01,Squat\n").unwrap();

        let result = WorkoutLog::load(&csv_path, &Config::default());
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[test]
    fn test_reload_is_noop_when_unchanged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");
        let config = Config::default();

        append_entry(&csv_path, &test_entry("2025-03-01", "Squat", "3x5x225lb")).unwrap();

        let mut log = WorkoutLog::load(&csv_path, &config).unwrap();
        assert!(!log.reload(&config).unwrap());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_reload_picks_up_new_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");
        let config = Config::default();

        append_entry(&csv_path, &test_entry("2025-03-01", "Squat", "3x5x225lb")).unwrap();
        let mut log = WorkoutLog::load(&csv_path, &config).unwrap();

        // Push the mtime forward so the change is observable even on
        // filesystems with coarse timestamps
        append_entry(&csv_path, &test_entry("2025-03-02", "Bench Press", "3x8x155lb")).unwrap();
        let newer = std::time::SystemTime::now() + std::time::Duration::from_secs(2);
        File::options()
            .append(true)
            .open(&csv_path)
            .unwrap()
            .set_modified(newer)
            .unwrap();

        assert!(log.reload(&config).unwrap());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_kilogram_default_unit_applies_to_bare_weights() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        std::fs::write(
            &csv_path,
            "Date,Exercise,Sets x Reps x Weight,RPE,Muscle Group\n\
             2025-03-01,Squat,3x5x100,8,Legs\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.units.default = WeightUnit::Kilogram;

        let log = WorkoutLog::load(&csv_path, &config).unwrap();
        assert_eq!(log.entries[0].sets[0].unit, WeightUnit::Kilogram);
    }
}
