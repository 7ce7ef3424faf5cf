use crate::error::PipelineError;
use crate::models::MeterReading;
use crate::rollup::BuildingSummary;
use serde::Serialize;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize)]
struct CleanedRow<'a> {
    timestamp: String,
    kwh: f64,
    building: &'a str,
    month: u32,
    hour: u32,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    building: &'a str,
    mean: f64,
    min: f64,
    max: f64,
    sum: f64,
}

fn write_failed(path: &Path, err: impl ToString) -> PipelineError {
    PipelineError::OutputWrite {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Export the canonical dataset as `timestamp,kwh,building,month,hour`.
pub fn write_cleaned_dataset(path: &Path, readings: &[MeterReading]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| write_failed(path, e))?;
    for r in readings {
        wtr.serialize(CleanedRow {
            timestamp: r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            kwh: r.kwh,
            building: &r.building,
            month: r.month,
            hour: r.hour(),
        })
        .map_err(|e| write_failed(path, e))?;
    }
    wtr.flush().map_err(|e| write_failed(path, e))
}

/// Export the per-building summary as `building,mean,min,max,sum`.
pub fn write_building_summary(path: &Path, summary: &BuildingSummary) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| write_failed(path, e))?;
    for (building, stats) in summary {
        wtr.serialize(SummaryRow {
            building,
            mean: stats.mean,
            min: stats.min,
            max: stats.max,
            sum: stats.sum,
        })
        .map_err(|e| write_failed(path, e))?;
    }
    wtr.flush().map_err(|e| write_failed(path, e))
}

pub fn write_report(path: &Path, text: &str) -> Result<(), PipelineError> {
    std::fs::write(path, text).map_err(|e| write_failed(path, e))
}
