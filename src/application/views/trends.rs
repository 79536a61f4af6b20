// Temporal views: multi-day trends and the weekly pollution matrix
use crate::application::statistics::{mean, pearson};
use crate::domain::chart::{ChartBody, ChartData, SeriesData, TileData, TimeSeriesPoint};
use crate::domain::observation::{HeatmapMatrix, HourlyBucket};
use crate::domain::page::{Page, PageView};
use chrono::{NaiveDateTime, TimeDelta};

fn dual_axis_chart(id: &str, title: &str, buckets: &[HourlyBucket], x_label: &str) -> ChartData {
    let traffic = buckets
        .iter()
        .map(|b| TimeSeriesPoint::new(b.timestamp, b.traffic_volume))
        .collect();
    let aqi = buckets
        .iter()
        .map(|b| TimeSeriesPoint::new(b.timestamp, b.aqi))
        .collect();

    ChartData::new(
        id,
        title,
        ChartBody::Line {
            series: vec![
                SeriesData::new("traffic_volume", "Traffic Volume", "#667eea", traffic),
                SeriesData::new("aqi", "AQI Level", "#ff6b6b", aqi).on_secondary_axis(),
            ],
        },
    )
    .labels(x_label, "Traffic Volume (vehicles/hour)")
    .secondary_label("Air Quality Index (AQI)")
}

pub fn render_time_trends(
    week: &[HourlyBucket],
    day: &[HourlyBucket],
    now: NaiveDateTime,
) -> PageView {
    let start = now - TimeDelta::days(7);
    let mut view = PageView::new(
        Page::TimeTrends,
        "Temporal Trend Analysis".to_string(),
        format!(
            "Analysis Period: {} to {}",
            start.format("%Y-%m-%d"),
            now.format("%Y-%m-%d")
        ),
        now,
    );

    view.charts.push(dual_axis_chart(
        "weekly_trend",
        "7-Day Traffic Volume vs Air Quality Trend",
        week,
        "Date & Time",
    ));
    view.charts.push(dual_axis_chart(
        "daily_pattern",
        "24-Hour Traffic vs Air Quality Pattern (Today)",
        day,
        "Hour of Day",
    ));

    let traffic: Vec<f64> = week.iter().map(|b| b.traffic_volume).collect();
    let aqi: Vec<f64> = week.iter().map(|b| b.aqi).collect();

    if let Some(avg) = mean(&traffic) {
        view.tiles.push(TileData::new(
            "avg_traffic",
            "Avg Traffic (7 Days)",
            " veh/hr",
            avg,
            1,
        ));
    }
    if let Some(avg) = mean(&aqi) {
        view.tiles
            .push(TileData::new("avg_aqi", "Avg AQI (7 Days)", "", avg, 1));
    }
    if let Some(r) = pearson(&traffic, &aqi) {
        view.tiles
            .push(TileData::new("correlation", "Correlation", "", r, 3));
    }
    // first maximum wins, matching idxmax
    let peak = week.iter().fold(None::<&HourlyBucket>, |best, b| match best {
        Some(best) if best.traffic_volume >= b.traffic_volume => Some(best),
        _ => Some(b),
    });
    if let Some(peak) = peak {
        view.tiles
            .push(TileData::new("peak_hour", "Peak Hour", ":00", peak.hour as f64, 0));
    }

    view
}

pub fn render_pollution_matrix(matrix: &HeatmapMatrix, now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::PollutionMatrix,
        "Pollution Intensity Matrix - Temporal Heatmap".to_string(),
        format!(
            "Weekly pattern analysis | Generated: {}",
            now.format("%Y-%m-%d %H:%M:%S")
        ),
        now,
    );

    view.charts.push(
        ChartData::new(
            "pollution_matrix",
            "AQI Heatmap by Hour of Day and Day of Week",
            ChartBody::Heatmap {
                rows: matrix.days.clone(),
                columns: matrix.hours.iter().map(|h| h.to_string()).collect(),
                values: matrix
                    .values
                    .iter()
                    .map(|row| row.iter().map(|v| *v as f64).collect())
                    .collect(),
                color_scale: "RdYlGn_r".to_string(),
            },
        )
        .labels("Hour of Day", "Day of Week"),
    );

    let mut peak: Option<(usize, usize, i64)> = None;
    for (d, row) in matrix.values.iter().enumerate() {
        for (h, value) in row.iter().enumerate() {
            if peak.is_none_or(|(_, _, best)| *value > best) {
                peak = Some((d, h, *value));
            }
        }
    }
    if let Some((d, h, value)) = peak {
        view.tiles.push(TileData::new(
            "peak_cell",
            &format!("Peak: {} {:02}:00", matrix.days[d], matrix.hours[h]),
            "",
            value as f64,
            0,
        ));
    }

    let flatten = |rows: &[Vec<i64>]| -> Vec<f64> {
        rows.iter().flatten().map(|v| *v as f64).collect()
    };
    let split = matrix.values.len().min(5);
    if let Some(avg) = mean(&flatten(&matrix.values[..split])) {
        view.tiles
            .push(TileData::new("weekday_mean", "Weekday Mean AQI", "", avg, 1));
    }
    if let Some(avg) = mean(&flatten(&matrix.values[split..])) {
        view.tiles
            .push(TileData::new("weekend_mean", "Weekend Mean AQI", "", avg, 1));
    }

    view
}
