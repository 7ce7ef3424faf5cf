use crate::error::PipelineError;
use crate::models::MeterReading;
use crate::rollup::DailyTotals;
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Render the three-panel dashboard PNG: daily consumption trend, average
/// weekly usage per building, and hour-of-day consumption scatter.
pub fn render_dashboard(
    path: &Path,
    readings: &[MeterReading],
    daily: &DailyTotals,
    weekly_by_building: &BTreeMap<String, f64>,
) -> Result<(), PipelineError> {
    draw(path, readings, daily, weekly_by_building).map_err(|e| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn draw(
    path: &Path,
    readings: &[MeterReading],
    daily: &DailyTotals,
    weekly_by_building: &BTreeMap<String, f64>,
) -> Result<()> {
    let root = BitMapBackend::new(path, (1000, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 1));

    draw_daily_trend(&panels[0], daily)?;
    draw_weekly_bars(&panels[1], weekly_by_building)?;
    draw_hourly_scatter(&panels[2], readings)?;

    root.present()?;
    Ok(())
}

fn y_ceiling(max_value: f64) -> f64 {
    if max_value > 0.0 {
        max_value * 1.1
    } else {
        1.0
    }
}

fn draw_daily_trend(
    area: &DrawingArea<BitMapBackend, Shift>,
    daily: &DailyTotals,
) -> Result<()> {
    let points: Vec<(NaiveDate, f64)> = daily.iter().map(|(d, v)| (*d, *v)).collect();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(());
    };
    let min_date = first.0;
    // A single-day dataset still needs a non-degenerate axis.
    let max_date = if last.0 > min_date {
        last.0
    } else {
        min_date + Duration::days(1)
    };
    let max_kwh = points.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Consumption Trend", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_date, 0.0..y_ceiling(max_kwh))?;

    chart.configure_mesh().x_desc("Date").y_desc("kWh").draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().map(|(d, v)| (*d, *v)), &BLUE))?
        .label("Daily Consumption")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_weekly_bars(
    area: &DrawingArea<BitMapBackend, Shift>,
    weekly_by_building: &BTreeMap<String, f64>,
) -> Result<()> {
    let names: Vec<&String> = weekly_by_building.keys().collect();
    let values: Vec<f64> = weekly_by_building.values().copied().collect();
    if names.is_empty() {
        return Ok(());
    }
    let max_val = values.iter().fold(0.0f64, |a, &b| a.max(b));

    let mut chart = ChartBuilder::on(area)
        .caption(
            "Average Weekly Usage per Building",
            ("sans-serif", 24).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..names.len() as f64, 0.0..y_ceiling(max_val))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&|x: &f64| {
            names
                .get(x.floor() as usize)
                .map(|n| n.to_string())
                .unwrap_or_default()
        })
        .y_desc("kWh")
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        Rectangle::new(
            [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *v)],
            BLUE.filled(),
        )
    }))?;
    Ok(())
}

fn draw_hourly_scatter(
    area: &DrawingArea<BitMapBackend, Shift>,
    readings: &[MeterReading],
) -> Result<()> {
    let max_kwh = readings.iter().map(|r| r.kwh).fold(0.0f64, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption("Peak-Hour Consumption", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..24u32, 0.0..y_ceiling(max_kwh))?;

    chart
        .configure_mesh()
        .x_desc("Hour of Day")
        .y_desc("kWh")
        .draw()?;

    let mut buildings: Vec<&str> = readings.iter().map(|r| r.building.as_str()).collect();
    buildings.sort_unstable();
    buildings.dedup();

    for (idx, building) in buildings.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(
                readings
                    .iter()
                    .filter(|r| r.building == *building)
                    .map(|r| Circle::new((r.hour(), r.kwh), 3, color.filled())),
            )?
            .label(*building)
            .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
