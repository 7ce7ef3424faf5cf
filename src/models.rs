use chrono::{NaiveDateTime, Timelike};
use log::{info, warn};
use std::path::PathBuf;

/// One normalized meter reading. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub timestamp: NaiveDateTime,
    pub kwh: f64,
    pub building: String,
    /// Calendar month (1-12), taken from the source column or derived from
    /// the timestamp during normalization.
    pub month: u32,
}

impl MeterReading {
    /// Hour of day (0-23), used by the scatter chart and the cleaned export.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Per-building kWh statistics over the canonical dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

/// A file that contributed to the canonical dataset.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub rows: usize,
    /// Rows dropped during normalization (unparseable timestamp or kwh).
    pub dropped_rows: usize,
}

/// A file that was skipped entirely, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-file ingestion outcomes, kept as a diagnosability artifact. Skipped
/// files are a data-quality signal even when the run succeeds.
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl IngestionReport {
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|f| f.rows).sum()
    }

    pub fn log(&self) {
        for file in &self.loaded {
            info!(
                "loaded {}: {} rows ({} dropped)",
                file.path.display(),
                file.rows,
                file.dropped_rows
            );
        }
        for file in &self.skipped {
            warn!("skipped {}: {}", file.path.display(), file.reason);
        }
    }
}
