// Statistical views: AQI distribution and vehicle/AQI correlation
use crate::application::random_source::RandomSource;
use crate::application::statistics::{Summary, linear_fit, pearson};
use crate::domain::chart::{
    BoxGroup, ChartBody, ChartData, ScatterPoint, Threshold, TileData, TrendLine,
};
use crate::domain::location::FOCUS_CITY;
use crate::domain::observation::SnapshotRow;
use crate::domain::page::{Page, PageView, TableData};
use chrono::NaiveDateTime;
use serde_json::json;

const SAMPLES_PER_LOCATION: usize = 40;
const SAMPLE_STD_DEV: f64 = 18.0;
const TOP_LOCATIONS: usize = 12;

/// Locations shown in the box plot: the highest-AQI rows, with the focus city
/// appended when it did not make the cut.
fn box_plot_locations(rows: &[SnapshotRow]) -> Vec<&SnapshotRow> {
    let mut ranked: Vec<&SnapshotRow> = rows.iter().collect();
    // stable sort keeps registry order among ties
    ranked.sort_by(|a, b| b.aqi.cmp(&a.aqi));
    ranked.truncate(TOP_LOCATIONS);

    if !ranked.iter().any(|r| r.location == FOCUS_CITY) {
        if let Some(focus) = rows.iter().find(|r| r.location == FOCUS_CITY) {
            ranked.push(focus);
        }
    }
    ranked
}

pub fn render_distribution(
    rows: &[SnapshotRow],
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> PageView {
    let mut view = PageView::new(
        Page::DistributionAnalysis,
        "Statistical Distribution Analysis".to_string(),
        format!(
            "Sample size: {} measurements per location | Date: {}",
            SAMPLES_PER_LOCATION,
            now.format("%Y-%m-%d")
        ),
        now,
    );

    let groups: Vec<BoxGroup> = box_plot_locations(rows)
        .into_iter()
        .map(|row| BoxGroup {
            label: row.location.clone(),
            samples: (0..SAMPLES_PER_LOCATION)
                .map(|_| rng.normal(row.aqi as f64, SAMPLE_STD_DEV).clamp(10.0, 300.0))
                .collect(),
        })
        .collect();

    let mut summaries: Vec<(String, Summary)> = groups
        .iter()
        .filter_map(|g| Summary::of(&g.samples).map(|s| (g.label.clone(), s.rounded(1))))
        .collect();
    summaries.sort_by(|a, b| b.1.mean.total_cmp(&a.1.mean));

    let mut table = TableData::new(
        "aqi_summary",
        "Statistical Summary",
        &["Location", "Mean", "Median", "Std Dev", "Min", "Max"],
    );
    for (location, s) in &summaries {
        table.push_row(vec![
            json!(location),
            json!(s.mean),
            json!(s.median),
            json!(s.std_dev),
            json!(s.min),
            json!(s.max),
        ]);
    }

    view.charts.push(
        ChartData::new(
            "aqi_distribution",
            "AQI Distribution Comparison Across Locations",
            ChartBody::Box { groups },
        )
        .labels("Location", "Air Quality Index (AQI)")
        .threshold(Threshold::new(50.0, "Good (50)", "green"))
        .threshold(Threshold::new(100.0, "Moderate (100)", "yellow"))
        .threshold(Threshold::new(150.0, "Unhealthy (150)", "orange")),
    );
    view.tables.push(table);

    view
}

fn column(rows: &[SnapshotRow], field: impl Fn(&SnapshotRow) -> i64) -> Vec<f64> {
    rows.iter().map(|r| field(r) as f64).collect()
}

pub fn render_correlation(rows: &[SnapshotRow], now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::CorrelationStudy,
        "Correlation Analysis: Traffic vs Pollution".to_string(),
        format!("Generated: {}", now.format("%Y-%m-%d %H:%M:%S")),
        now,
    );

    let vehicles = column(rows, |r| r.vehicles_count);
    let aqi = column(rows, |r| r.aqi);
    let density = column(rows, |r| r.traffic_density);
    let speed = column(rows, |r| r.avg_speed);

    let trend = linear_fit(&vehicles, &aqi).map(|(slope, intercept)| TrendLine {
        slope,
        intercept,
        x_start: vehicles.iter().copied().fold(f64::INFINITY, f64::min),
        x_end: vehicles.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    });

    let points = rows
        .iter()
        .map(|r| ScatterPoint {
            label: r.location.clone(),
            x: r.vehicles_count as f64,
            y: r.aqi as f64,
            size: r.population as f64,
            color_value: r.traffic_density as f64,
        })
        .collect();

    view.charts.push(
        ChartData::new(
            "vehicles_vs_aqi",
            "Vehicle Count vs Air Quality Index - Correlation Study",
            ChartBody::Scatter {
                points,
                trend,
                color_scale: "Reds".to_string(),
            },
        )
        .labels("Daily Vehicle Count", "Air Quality Index (AQI)"),
    );

    let vehicle_corr = pearson(&vehicles, &aqi);
    for (id, title, r) in [
        ("vehicle_aqi_corr", "Vehicle-AQI Correlation", vehicle_corr),
        ("density_aqi_corr", "Density-AQI Correlation", pearson(&density, &aqi)),
        ("speed_aqi_corr", "Speed-AQI Correlation", pearson(&speed, &aqi)),
    ] {
        if let Some(r) = r {
            view.tiles.push(TileData::new(id, title, "", r, 3));
        }
    }
    if let Some(r) = vehicle_corr {
        view.tiles
            .push(TileData::new("r_squared", "R² Score", "", r * r, 3));
    }

    view
}
