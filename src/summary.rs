use crate::error::PipelineError;
use crate::models::MeterReading;
use crate::rollup::{BuildingSummary, DailyTotals, WeeklyTotals};
use chrono::NaiveDateTime;

/// Entries shown per trend in the narrative report.
const PREVIEW_LEN: usize = 5;

/// Scalar facts derived from the canonical dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CampusSummary {
    pub total_consumption: f64,
    pub highest_building: String,
    pub peak_load_time: NaiveDateTime,
}

/// Extract total consumption, the highest-consuming building, and the peak
/// load timestamp.
///
/// Tie-breaks are deterministic: equal building sums resolve to the
/// lexicographically smallest name, equal peak kWh to the earliest
/// timestamp.
pub fn extract(
    readings: &[MeterReading],
    buildings: &BuildingSummary,
) -> Result<CampusSummary, PipelineError> {
    if readings.is_empty() || buildings.is_empty() {
        return Err(PipelineError::EmptyDataset(
            "summary requested over zero readings".to_string(),
        ));
    }

    let total_consumption = readings.iter().map(|r| r.kwh).sum();

    // The summary map iterates in name order and only a strictly greater sum
    // displaces the current champion, so ties go to the smallest name.
    let mut highest: Option<(&str, f64)> = None;
    for (name, stats) in buildings {
        if highest.map_or(true, |(_, best)| stats.sum > best) {
            highest = Some((name, stats.sum));
        }
    }
    let highest_building = highest
        .map(|(name, _)| name.to_string())
        .ok_or_else(|| PipelineError::EmptyDataset("no building summary rows".to_string()))?;

    let mut peak = &readings[0];
    for r in &readings[1..] {
        if r.kwh > peak.kwh || (r.kwh == peak.kwh && r.timestamp < peak.timestamp) {
            peak = r;
        }
    }

    Ok(CampusSummary {
        total_consumption,
        highest_building,
        peak_load_time: peak.timestamp,
    })
}

/// Render the narrative digest. Pure formatting over already-computed
/// aggregates; trends are truncated to the first few buckets.
pub fn render_report(
    summary: &CampusSummary,
    daily: &DailyTotals,
    weekly: &WeeklyTotals,
) -> String {
    let mut out = String::new();
    out.push_str("Campus Energy Summary Report\n");
    out.push_str("----------------------------\n");
    out.push_str(&format!(
        "Total Campus Consumption: {:.2} kWh\n",
        summary.total_consumption
    ));
    out.push_str(&format!(
        "Highest Consuming Building: {}\n",
        summary.highest_building
    ));
    out.push_str(&format!(
        "Peak Load Time: {}\n",
        summary.peak_load_time.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str("\nWeekly Trend (sample):\n");
    for (week, kwh) in weekly.iter().take(PREVIEW_LEN) {
        out.push_str(&format!("  {}  {:.2} kWh\n", week, kwh));
    }
    out.push_str("\nDaily Trend (sample):\n");
    for (day, kwh) in daily.iter().take(PREVIEW_LEN) {
        out.push_str(&format!("  {}  {:.2} kWh\n", day, kwh));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollup;
    use chrono::Datelike;

    fn reading(ts: &str, kwh: f64, building: &str) -> MeterReading {
        let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M").unwrap();
        MeterReading {
            timestamp,
            kwh,
            building: building.to_string(),
            month: timestamp.month(),
        }
    }

    fn two_building_scenario() -> Vec<MeterReading> {
        vec![
            reading("2025-01-01T08:00", 100.0, "A"),
            reading("2025-01-01T20:00", 50.0, "A"),
            reading("2025-01-02T08:00", 200.0, "B"),
        ]
    }

    #[test]
    fn extracts_scenario_scalars() {
        let readings = two_building_scenario();
        let buildings = rollup::building_summary(&readings);
        let summary = extract(&readings, &buildings).unwrap();

        assert_eq!(summary.total_consumption, 350.0);
        assert_eq!(summary.highest_building, "B");
        assert_eq!(
            summary.peak_load_time,
            NaiveDateTime::parse_from_str("2025-01-02T08:00", "%Y-%m-%dT%H:%M").unwrap()
        );
    }

    #[test]
    fn highest_building_tie_goes_to_lexicographically_smallest() {
        let readings = vec![
            reading("2025-01-01T08:00", 100.0, "Zeta"),
            reading("2025-01-01T09:00", 100.0, "Alpha"),
        ];
        let buildings = rollup::building_summary(&readings);
        let summary = extract(&readings, &buildings).unwrap();
        assert_eq!(summary.highest_building, "Alpha");
    }

    #[test]
    fn peak_tie_goes_to_earliest_timestamp() {
        let readings = vec![
            reading("2025-01-02T08:00", 100.0, "A"),
            reading("2025-01-01T08:00", 100.0, "A"),
        ];
        let buildings = rollup::building_summary(&readings);
        let summary = extract(&readings, &buildings).unwrap();
        assert_eq!(
            summary.peak_load_time,
            NaiveDateTime::parse_from_str("2025-01-01T08:00", "%Y-%m-%dT%H:%M").unwrap()
        );
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let buildings = BuildingSummary::new();
        assert!(matches!(
            extract(&[], &buildings),
            Err(PipelineError::EmptyDataset(_))
        ));
    }

    #[test]
    fn report_embeds_scalars_and_trend_previews() {
        let readings = two_building_scenario();
        let buildings = rollup::building_summary(&readings);
        let summary = extract(&readings, &buildings).unwrap();
        let daily = rollup::daily_totals(&readings);
        let weekly = rollup::weekly_totals(&readings);

        let text = render_report(&summary, &daily, &weekly);
        assert!(text.contains("Total Campus Consumption: 350.00 kWh"));
        assert!(text.contains("Highest Consuming Building: B"));
        assert!(text.contains("Peak Load Time: 2025-01-02 08:00:00"));
        assert!(text.contains("  2025-01-01  150.00 kWh"));
        assert!(text.contains("  2025-01-05  350.00 kWh"));
    }

    #[test]
    fn report_previews_are_truncated() {
        let readings: Vec<MeterReading> = (1..=9)
            .map(|day| reading(&format!("2025-01-0{day}T08:00"), day as f64, "A"))
            .collect();
        let buildings = rollup::building_summary(&readings);
        let summary = extract(&readings, &buildings).unwrap();
        let daily = rollup::daily_totals(&readings);
        let weekly = rollup::weekly_totals(&readings);

        let text = render_report(&summary, &daily, &weekly);
        assert!(text.contains("  2025-01-05  "));
        assert!(!text.contains("  2025-01-06  "));
    }
}
