use crate::models::{BuildingStats, MeterReading};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Campus-wide kWh per calendar day. Sparse: only days present in the data.
pub type DailyTotals = BTreeMap<NaiveDate, f64>;

/// Campus-wide kWh per Monday-Sunday week, keyed by the ending Sunday.
pub type WeeklyTotals = BTreeMap<NaiveDate, f64>;

/// Per-building statistics, keyed by building name.
pub type BuildingSummary = BTreeMap<String, BuildingStats>;

/// The Sunday that closes the Monday-Sunday week containing `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(days_to_sunday)
}

/// Sum kWh per calendar day. Bucketing is by key, so the result is
/// independent of row order.
pub fn daily_totals(readings: &[MeterReading]) -> DailyTotals {
    let mut totals = BTreeMap::new();
    for r in readings {
        *totals.entry(r.timestamp.date()).or_insert(0.0) += r.kwh;
    }
    totals
}

/// Sum kWh per week, labeled by the week-ending Sunday.
pub fn weekly_totals(readings: &[MeterReading]) -> WeeklyTotals {
    let mut totals = BTreeMap::new();
    for r in readings {
        *totals.entry(week_ending(r.timestamp.date())).or_insert(0.0) += r.kwh;
    }
    totals
}

/// Mean/min/max/sum of kWh per building. A building with a single reading
/// has mean = min = max = that value.
pub fn building_summary(readings: &[MeterReading]) -> BuildingSummary {
    // (sum, min, max, count) accumulators keyed by building name
    let mut acc: BTreeMap<String, (f64, f64, f64, usize)> = BTreeMap::new();
    for r in readings {
        let entry = acc
            .entry(r.building.clone())
            .or_insert((0.0, f64::INFINITY, f64::NEG_INFINITY, 0));
        entry.0 += r.kwh;
        entry.1 = entry.1.min(r.kwh);
        entry.2 = entry.2.max(r.kwh);
        entry.3 += 1;
    }

    acc.into_iter()
        .map(|(building, (sum, min, max, count))| {
            (
                building,
                BuildingStats {
                    mean: sum / count as f64,
                    min,
                    max,
                    sum,
                    count,
                },
            )
        })
        .collect()
}

/// Per-building mean kWh within each week, averaged across the weeks the
/// building reported in. Feeds the dashboard's bar chart.
pub fn weekly_mean_by_building(readings: &[MeterReading]) -> BTreeMap<String, f64> {
    let mut weeks: BTreeMap<(String, NaiveDate), (f64, usize)> = BTreeMap::new();
    for r in readings {
        let entry = weeks
            .entry((r.building.clone(), week_ending(r.timestamp.date())))
            .or_insert((0.0, 0));
        entry.0 += r.kwh;
        entry.1 += 1;
    }

    let mut per_building: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for ((building, _), (sum, count)) in weeks {
        let entry = per_building.entry(building).or_insert((0.0, 0));
        entry.0 += sum / count as f64;
        entry.1 += 1;
    }

    per_building
        .into_iter()
        .map(|(building, (total, week_count))| (building, total / week_count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_totals_sum_per_calendar_day() {
        let daily = daily_totals(&two_building_scenario());
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[&date(2025, 1, 1)], 150.0);
        assert_eq!(daily[&date(2025, 1, 2)], 200.0);
    }

    #[test]
    fn weeks_end_on_sunday() {
        // 2025-01-01 is a Wednesday, 2025-01-06 a Monday.
        assert_eq!(week_ending(date(2025, 1, 1)), date(2025, 1, 5));
        assert_eq!(week_ending(date(2025, 1, 6)), date(2025, 1, 12));
        assert_eq!(week_ending(date(2025, 1, 5)), date(2025, 1, 5));
    }

    #[test]
    fn weekly_totals_bucket_by_ending_sunday() {
        let readings = vec![
            reading("2025-01-01T08:00", 100.0, "A"),
            reading("2025-01-05T08:00", 50.0, "A"),
            reading("2025-01-06T08:00", 200.0, "B"),
        ];
        let weekly = weekly_totals(&readings);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[&date(2025, 1, 5)], 150.0);
        assert_eq!(weekly[&date(2025, 1, 12)], 200.0);
    }

    #[test]
    fn building_summary_stats() {
        let summary = building_summary(&two_building_scenario());
        let a = &summary["A"];
        assert_eq!(a.mean, 75.0);
        assert_eq!(a.min, 50.0);
        assert_eq!(a.max, 100.0);
        assert_eq!(a.sum, 150.0);
        assert_eq!(a.count, 2);
        let b = &summary["B"];
        assert_eq!(b.mean, 200.0);
        assert_eq!(b.min, 200.0);
        assert_eq!(b.max, 200.0);
        assert_eq!(b.sum, 200.0);
        assert_eq!(b.count, 1);
    }

    #[test]
    fn single_reading_building_has_mean_min_max_equal() {
        let summary = building_summary(&[reading("2025-06-01T12:00", 42.5, "Gym")]);
        let gym = &summary["Gym"];
        assert_eq!(gym.mean, 42.5);
        assert_eq!(gym.min, 42.5);
        assert_eq!(gym.max, 42.5);
        assert_eq!(gym.sum, 42.5);
    }

    #[test]
    fn aggregates_ignore_insertion_order() {
        let forward = two_building_scenario();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(daily_totals(&forward), daily_totals(&reversed));
        assert_eq!(weekly_totals(&forward), weekly_totals(&reversed));
        assert_eq!(building_summary(&forward), building_summary(&reversed));
    }

    #[test]
    fn daily_weekly_and_building_sums_partition_the_same_data() {
        let readings = vec![
            reading("2025-01-01T08:00", 100.5, "A"),
            reading("2025-01-03T20:00", 50.25, "A"),
            reading("2025-01-08T08:00", 200.0, "B"),
            reading("2025-02-14T23:00", 75.75, "C"),
        ];
        let total: f64 = readings.iter().map(|r| r.kwh).sum();
        let daily_sum: f64 = daily_totals(&readings).values().sum();
        let weekly_sum: f64 = weekly_totals(&readings).values().sum();
        let building_sum: f64 = building_summary(&readings).values().map(|s| s.sum).sum();

        assert!((daily_sum - total).abs() < 1e-9);
        assert!((weekly_sum - total).abs() < 1e-9);
        assert!((building_sum - total).abs() < 1e-9);
    }

    #[test]
    fn weekly_mean_by_building_averages_within_then_across_weeks() {
        // Building A: week 1 readings 10 and 30 (mean 20), week 2 reading 40.
        let readings = vec![
            reading("2025-01-01T08:00", 10.0, "A"),
            reading("2025-01-02T08:00", 30.0, "A"),
            reading("2025-01-06T08:00", 40.0, "A"),
        ];
        let means = weekly_mean_by_building(&readings);
        assert_eq!(means["A"], 30.0);
    }
}
