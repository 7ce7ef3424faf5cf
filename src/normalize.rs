use crate::error::NormalizeError;
use crate::models::MeterReading;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;

/// Accepted timestamp layouts, tried in order. A bare date parses to
/// midnight.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// As-loaded content of one input file, before schema repair.
#[derive(Debug)]
pub struct RawTable {
    /// File name without extension; becomes the building name when the data
    /// does not carry one.
    pub source_stem: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Lossy delimited parse: records that fail to parse are skipped, they
    /// do not abort the file.
    pub fn from_reader<R: Read>(reader: R, source_stem: &str) -> Result<Self, NormalizeError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| NormalizeError::Read(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            match record {
                Ok(rec) => rows.push(rec.iter().map(|field| field.to_string()).collect()),
                Err(_) => continue,
            }
        }

        Ok(Self {
            source_stem: source_stem.to_string(),
            headers,
            rows,
        })
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Repair one raw table into canonical readings.
///
/// A missing `building` column is synthesized from the file stem and a
/// missing `month` column is derived from the timestamp; an empty building
/// cell or unparseable month cell is repaired the same way. Populated values
/// are never overridden. Rows whose timestamp or kwh will not parse (or
/// whose kwh is negative or non-finite) are dropped and counted, never
/// fabricated.
///
/// Returns the surviving readings and the number of dropped rows. Pure
/// transform: nothing is printed here.
pub fn normalize(table: &RawTable) -> Result<(Vec<MeterReading>, usize), NormalizeError> {
    let col = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };
    let ts_col = col("timestamp").ok_or(NormalizeError::MissingColumn("timestamp"))?;
    let kwh_col = col("kwh").ok_or(NormalizeError::MissingColumn("kwh"))?;
    let building_col = col("building");
    let month_col = col("month");

    let mut readings = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;

    for row in &table.rows {
        let Some(timestamp) = row.get(ts_col).and_then(|cell| parse_timestamp(cell)) else {
            dropped += 1;
            continue;
        };
        let kwh = match row.get(kwh_col).and_then(|cell| cell.trim().parse::<f64>().ok()) {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => {
                dropped += 1;
                continue;
            }
        };
        let building = building_col
            .and_then(|i| row.get(i))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| table.source_stem.clone());
        let month = month_col
            .and_then(|i| row.get(i))
            .and_then(|cell| cell.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .unwrap_or_else(|| timestamp.month());

        readings.push(MeterReading {
            timestamp,
            kwh,
            building,
            month,
        });
    }

    Ok((readings, dropped))
}
