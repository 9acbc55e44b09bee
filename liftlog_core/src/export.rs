//! Export of (possibly filtered) workout entries.
//!
//! CSV output uses the store's five-column schema, so an exported file can
//! be loaded back as a workout log. JSON output serializes the full parsed
//! entries for downstream tooling.

use crate::store::CsvRow;
use crate::{Result, WorkoutEntry};
use csv::WriterBuilder;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write entries to `path` in the workout-file CSV schema
pub fn write_csv(path: &Path, entries: &[&WorkoutEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_writer(BufWriter::new(File::create(path)?));
    for entry in entries {
        writer.serialize(CsvRow::from(*entry))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(())
}

/// Write entries to `path` as a pretty-printed JSON array
pub fn write_json(path: &Path, entries: &[&WorkoutEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, entries)?;

    tracing::info!("Exported {} entries to {:?}", entries.len(), path);
    Ok(())
}
