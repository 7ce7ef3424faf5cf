use crate::error::{NormalizeError, PipelineError};
use crate::models::{IngestionReport, LoadedFile, MeterReading, SkippedFile};
use crate::normalize::{self, RawTable};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

enum FileOutcome {
    Loaded {
        rows: Vec<MeterReading>,
        dropped: usize,
    },
    Skipped {
        reason: String,
    },
}

fn normalize_file(path: &Path) -> FileOutcome {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            // Vanished between discovery and read.
            return FileOutcome::Skipped {
                reason: NormalizeError::Missing.to_string(),
            };
        }
        Err(e) => {
            return FileOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    };

    match RawTable::from_reader(file, stem).and_then(|table| normalize::normalize(&table)) {
        Ok((rows, dropped)) => FileOutcome::Loaded { rows, dropped },
        Err(e) => FileOutcome::Skipped {
            reason: e.to_string(),
        },
    }
}

fn discover_csv_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = dir.join("*.csv");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .map(|paths| paths.filter_map(Result::ok).collect())
        .unwrap_or_default();
    // Discovery order is unspecified; sort so runs are reproducible.
    files.sort();
    files
}

/// Discover every `*.csv` under `dir`, normalize each file on the rayon
/// pool, and merge the survivors into one canonical dataset. Per-file
/// failures land in the `IngestionReport`; the merge is order-insensitive.
///
/// The report is logged before returning, so skipped files are visible even
/// when the run then fails with `EmptyDataset`.
pub fn ingest_directory(dir: &Path) -> Result<(Vec<MeterReading>, IngestionReport), PipelineError> {
    let files = discover_csv_files(dir);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let outcomes: Vec<(PathBuf, FileOutcome)> = files
        .par_iter()
        .map(|path| {
            let outcome = normalize_file(path);
            pb.inc(1);
            (path.clone(), outcome)
        })
        .collect();
    pb.finish_and_clear();

    let mut dataset = Vec::new();
    let mut report = IngestionReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            FileOutcome::Loaded { rows, dropped } => {
                report.loaded.push(LoadedFile {
                    path,
                    rows: rows.len(),
                    dropped_rows: dropped,
                });
                dataset.extend(rows);
            }
            FileOutcome::Skipped { reason } => report.skipped.push(SkippedFile { path, reason }),
        }
    }
    report.log();

    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset(format!(
            "no valid meter readings under {}",
            dir.display()
        )));
    }
    Ok((dataset, report))
}
