// Live dashboard view over the rolling window
use crate::application::random_source::RandomSource;
use crate::domain::chart::{ChartBody, ChartData, SeriesData, Threshold, TileData, TimeSeriesPoint};
use crate::domain::observation::{AqiBand, Observation};
use crate::domain::page::{Page, PageView, TableData};
use chrono::NaiveDateTime;
use serde_json::json;

pub fn render_dashboard(
    location: &str,
    history: &[Observation],
    last_advance: Option<NaiveDateTime>,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> PageView {
    let last_updated = last_advance
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let mut view = PageView::new(
        Page::Dashboard,
        "Real-Time Traffic & Pollution Dashboard".to_string(),
        format!("Monitoring {} | Last updated: {}", location, last_updated),
        now,
    );

    let Some(current) = history.last() else {
        return view;
    };
    let previous = history.len().checked_sub(2).map_or(current, |i| &history[i]);

    view.tiles = vec![
        TileData::new("current_aqi", "Current AQI", "", current.aqi as f64, 0)
            .with_delta((current.aqi - previous.aqi) as f64),
        TileData::new(
            "traffic_density",
            "Traffic Density",
            "%",
            current.traffic_density as f64,
            0,
        )
        .with_delta((current.traffic_density - previous.traffic_density) as f64),
        TileData::new("avg_speed", "Avg Speed", " km/h", current.avg_speed as f64, 0)
            .with_delta(rng.int_in(-5, 5) as f64),
        TileData::new(
            "active_incidents",
            "Active Incidents",
            "",
            history.iter().map(|o| o.incidents).sum::<i64>() as f64,
            0,
        )
        .with_delta(rng.int_in(-2, 2) as f64),
    ];

    let traffic_points = history
        .iter()
        .map(|o| TimeSeriesPoint::new(o.timestamp, o.traffic_density as f64))
        .collect();
    view.charts.push(
        ChartData::new(
            "traffic_stream",
            &format!("Traffic Density Stream - {} (Last 3 Minutes)", location),
            ChartBody::Line {
                series: vec![SeriesData::new(
                    "traffic_density",
                    "Traffic Density",
                    "#667eea",
                    traffic_points,
                )],
            },
        )
        .labels("Time (HH:MM:SS)", "Traffic Density (%)")
        .y_range(0.0, 100.0),
    );

    let aqi_points = history
        .iter()
        .map(|o| {
            TimeSeriesPoint::new(o.timestamp, o.aqi as f64)
                .with_color(AqiBand::classify(o.aqi as f64).color())
        })
        .collect();
    view.charts.push(
        ChartData::new(
            "aqi_stream",
            &format!("Air Quality Index Stream - {} (Last 3 Minutes)", location),
            ChartBody::Line {
                series: vec![SeriesData::new("aqi", "AQI", "#ff6b6b", aqi_points)],
            },
        )
        .labels("Time (HH:MM:SS)", "Air Quality Index (AQI)")
        .y_range(0.0, 300.0)
        .threshold(Threshold::new(100.0, "Moderate (100)", "orange"))
        .threshold(Threshold::new(150.0, "Unhealthy (150)", "red")),
    );

    let mut table = TableData::new(
        "recent_observations",
        "Live Data Feed",
        &["Time", "Location", "Traffic %", "AQI", "Speed (km/h)", "Incidents"],
    );
    for o in history.iter().rev() {
        table.push_row(vec![
            json!(o.timestamp.format("%H:%M:%S").to_string()),
            json!(o.location),
            json!(o.traffic_density),
            json!(o.aqi),
            json!(o.avg_speed),
            json!(o.incidents),
        ]);
    }
    view.tables.push(table);

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::testing::at;
    use crate::application::random_source::testing::MidpointRandom;

    fn observation(sec: u32, traffic: i64, aqi: i64, incidents: i64) -> Observation {
        Observation {
            timestamp: at(8, 10, 0, sec),
            location: "Vellore".to_string(),
            lat: 12.9165,
            lon: 79.1325,
            traffic_density: traffic,
            aqi,
            vehicles_count: 4000,
            avg_speed: 35,
            incidents,
        }
    }

    #[test]
    fn test_tiles_use_latest_two_observations() {
        let history = vec![
            observation(0, 70, 120, 1),
            observation(2, 64, 151, 2),
        ];
        let t = at(8, 10, 0, 2);
        let view = render_dashboard("Vellore", &history, Some(t), t, &mut MidpointRandom);

        let aqi = view.tile("current_aqi").unwrap();
        assert_eq!(aqi.value, 151.0);
        assert_eq!(aqi.delta, Some(31.0));

        let traffic = view.tile("traffic_density").unwrap();
        assert_eq!(traffic.display(), "64%");
        assert_eq!(traffic.delta, Some(-6.0));

        assert_eq!(view.tile("active_incidents").unwrap().value, 3.0);
        assert_eq!(view.tile("avg_speed").unwrap().delta, Some(0.0));
    }

    #[test]
    fn test_single_observation_has_zero_delta() {
        let history = vec![observation(0, 70, 120, 0)];
        let t = at(8, 10, 0, 0);
        let view = render_dashboard("Vellore", &history, Some(t), t, &mut MidpointRandom);
        assert_eq!(view.tile("current_aqi").unwrap().delta, Some(0.0));
    }

    #[test]
    fn test_aqi_points_are_band_colored_and_table_is_newest_first() {
        let history = vec![
            observation(0, 70, 45, 0),
            observation(2, 70, 180, 0),
        ];
        let t = at(8, 10, 0, 2);
        let view = render_dashboard("Vellore", &history, Some(t), t, &mut MidpointRandom);

        let chart = view.chart("aqi_stream").unwrap();
        assert_eq!(chart.thresholds.len(), 2);
        match &chart.body {
            ChartBody::Line { series } => {
                let colors: Vec<_> = series[0].points.iter().map(|p| p.color.clone()).collect();
                assert_eq!(
                    colors,
                    vec![Some("#00e400".to_string()), Some("#ff0000".to_string())]
                );
            }
            other => panic!("unexpected body {:?}", other),
        }

        let table = view.table("recent_observations").unwrap();
        assert_eq!(table.rows[0][0], json!("10:00:02"));
        assert_eq!(table.rows[1][0], json!("10:00:00"));
    }

    #[test]
    fn test_empty_history_renders_header_only() {
        let view = render_dashboard("Vellore", &[], None, at(8, 10, 0, 0), &mut MidpointRandom);
        assert!(view.tiles.is_empty());
        assert_eq!(view.subtitle, "Monitoring Vellore | Last updated: never");
    }

    #[test]
    fn test_subtitle_shows_last_advance() {
        let history = vec![observation(0, 70, 120, 0)];
        let view = render_dashboard(
            "Vellore",
            &history,
            Some(at(8, 10, 0, 0)),
            at(8, 10, 0, 5),
            &mut MidpointRandom,
        );
        assert_eq!(
            view.subtitle,
            "Monitoring Vellore | Last updated: 2025-01-08 10:00:00"
        );
        assert_eq!(view.generated_at, at(8, 10, 0, 5));
    }
}
