// Geospatial views: heatmap, choropleth, sensor clusters, dot map, network graph
use crate::application::random_source::RandomSource;
use crate::application::statistics::mean;
use crate::domain::chart::{
    Bubble, ChartBody, ChartData, Edge, HeatPoint, MapLayer, Marker, RegionValue, TileData,
};
use crate::domain::location::{DISTRICT_AQI, GeoPoint};
use crate::domain::observation::{SensorReading, SensorStatus, SnapshotRow};
use crate::domain::page::{Page, PageView};
use chrono::NaiveDateTime;

const STATE_CENTER: GeoPoint = GeoPoint::new(11.5, 78.5);
const CHOROPLETH_CENTER: GeoPoint = GeoPoint::new(11.1271, 78.6569);
const MAPBOX_CENTER: GeoPoint = GeoPoint::new(11.0, 78.5);
const NETWORK_NODES: usize = 8;

fn stamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn map_chart(id: &str, title: &str, center: GeoPoint, zoom: u8, layers: Vec<MapLayer>) -> ChartData {
    ChartData::new(id, title, ChartBody::Map { center, zoom, layers })
}

pub fn render_traffic_heatmap(rows: &[SnapshotRow], now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::TrafficHeatmap,
        "Traffic Density Heatmap".to_string(),
        format!("Generated at: {}", stamp(now)),
        now,
    );

    let heat = MapLayer::Heat {
        points: rows
            .iter()
            .map(|r| HeatPoint {
                lat: r.lat,
                lon: r.lon,
                weight: r.traffic_density as f64 / 100.0,
            })
            .collect(),
        radius: 30,
        blur: 25,
        gradient: [(0.0, "blue"), (0.3, "lime"), (0.5, "yellow"), (0.7, "orange"), (1.0, "red")]
            .into_iter()
            .map(|(stop, color)| (stop, color.to_string()))
            .collect(),
    };

    let markers = MapLayer::CircleMarkers {
        markers: rows
            .iter()
            .map(|r| Marker {
                position: GeoPoint::new(r.lat, r.lon),
                label: r.location.clone(),
                popup: format!(
                    "{} | Traffic: {}% | Time: {}",
                    r.location,
                    r.traffic_density,
                    now.format("%H:%M")
                ),
                color: "darkblue".to_string(),
                icon: None,
            })
            .collect(),
        radius: 6,
    };

    view.charts.push(map_chart(
        "traffic_heatmap",
        "Traffic congestion intensity",
        STATE_CENTER,
        7,
        vec![heat, markers],
    ));

    if let Some(busiest) = rows.iter().max_by_key(|r| r.traffic_density) {
        view.tiles.push(TileData::new(
            "busiest",
            &format!("Busiest: {}", busiest.location),
            "%",
            busiest.traffic_density as f64,
            0,
        ));
    }
    let densities: Vec<f64> = rows.iter().map(|r| r.traffic_density as f64).collect();
    if let Some(avg) = mean(&densities) {
        view.tiles
            .push(TileData::new("mean_density", "Mean Density", "%", avg, 1));
    }

    view
}

pub fn render_choropleth(now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::AqiChoropleth,
        "Air Quality Index Choropleth Map".to_string(),
        format!("Data snapshot: {}", stamp(now)),
        now,
    );

    let regions = DISTRICT_AQI
        .iter()
        .map(|d| RegionValue {
            name: d.district.to_string(),
            centroid: d.centroid,
            value: d.aqi as f64,
        })
        .collect();

    view.charts.push(map_chart(
        "aqi_choropleth",
        "Air Quality Index (AQI)",
        CHOROPLETH_CENTER,
        7,
        vec![MapLayer::Choropleth {
            key: "district".to_string(),
            fill_color: "YlOrRd".to_string(),
            regions,
        }],
    ));

    if let Some(worst) = DISTRICT_AQI.iter().max_by_key(|d| d.aqi) {
        view.tiles.push(TileData::new(
            "highest",
            &format!("Highest: {}", worst.district),
            "",
            worst.aqi as f64,
            0,
        ));
    }
    if let Some(best) = DISTRICT_AQI.iter().min_by_key(|d| d.aqi) {
        view.tiles.push(TileData::new(
            "lowest",
            &format!("Lowest: {}", best.district),
            "",
            best.aqi as f64,
            0,
        ));
    }
    let values: Vec<f64> = DISTRICT_AQI.iter().map(|d| d.aqi as f64).collect();
    if let Some(avg) = mean(&values) {
        view.tiles
            .push(TileData::new("mean_aqi", "State Mean AQI", "", avg, 1));
    }

    view
}

pub fn render_sensor_clusters(sensors: &[SensorReading], now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::SensorClusters,
        "Sensor Network Cluster Map".to_string(),
        format!("Static sensor network snapshot | Generated: {}", stamp(now)),
        now,
    );

    let markers = sensors
        .iter()
        .map(|s| {
            let status = SensorStatus::classify(s.aqi);
            Marker {
                position: GeoPoint::new(s.lat, s.lon),
                label: s.sensor_id.clone(),
                popup: format!(
                    "Sensor ID: {} | Location: {} | AQI: {} | Traffic: {}%",
                    s.sensor_id, s.location, s.aqi, s.traffic
                ),
                color: status.color().to_string(),
                icon: Some(status.icon().to_string()),
            }
        })
        .collect();

    view.charts.push(map_chart(
        "sensor_clusters",
        "Sensor distribution and coverage",
        STATE_CENTER,
        7,
        vec![MapLayer::ClusteredMarkers { markers }],
    ));

    let count = |status: SensorStatus| {
        sensors
            .iter()
            .filter(|s| SensorStatus::classify(s.aqi) == status)
            .count() as f64
    };
    view.tiles = vec![
        TileData::new("total_sensors", "Total Sensors", "", sensors.len() as f64, 0),
        TileData::new("good_sensors", "Good AQI Sensors", "", count(SensorStatus::Good), 0),
        TileData::new(
            "moderate_sensors",
            "Moderate AQI Sensors",
            "",
            count(SensorStatus::Moderate),
            0,
        ),
        TileData::new("poor_sensors", "Poor AQI Sensors", "", count(SensorStatus::Poor), 0),
    ];

    view
}

pub fn render_dot_map(rows: &[SnapshotRow], now: NaiveDateTime) -> PageView {
    let mut view = PageView::new(
        Page::DotMap,
        "Dot Map: Traffic and Pollution Distribution".to_string(),
        format!("Generated: {}", stamp(now)),
        now,
    );

    let bubbles = rows
        .iter()
        .map(|r| Bubble {
            position: GeoPoint::new(r.lat, r.lon),
            label: r.location.clone(),
            size: r.aqi as f64,
            color_value: r.traffic_density as f64,
        })
        .collect();

    view.charts.push(map_chart(
        "dot_map",
        "Dot Map: Traffic and Pollution Distribution",
        MAPBOX_CENTER,
        6,
        vec![MapLayer::Bubbles {
            bubbles,
            color_scale: "Reds".to_string(),
            max_size: 30.0,
        }],
    ));

    view
}

/// Inter-city graph over the first eight region locations. Edge weights are
/// redrawn on every render.
pub fn render_network_graph(
    rows: &[SnapshotRow],
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> PageView {
    let mut view = PageView::new(
        Page::NetworkGraph,
        "Network Graph: Inter-city Traffic Flow Connections".to_string(),
        format!("Analysis Time: {}", stamp(now)),
        now,
    );

    let nodes = &rows[..rows.len().min(NETWORK_NODES)];
    let mut edges = Vec::new();
    for (i, source) in nodes.iter().enumerate() {
        for target in &nodes[i + 1..] {
            let weight = rng.int_in(50, 500) as f64;
            edges.push(Edge {
                source: source.location.clone(),
                target: target.location.clone(),
                weight,
                width: weight / 100.0,
                path: [
                    GeoPoint::new(source.lat, source.lon),
                    GeoPoint::new(target.lat, target.lon),
                ],
            });
        }
    }

    let bubbles = nodes
        .iter()
        .map(|r| Bubble {
            position: GeoPoint::new(r.lat, r.lon),
            label: r.location.clone(),
            size: r.vehicles_count as f64 / 1000.0,
            color_value: r.aqi as f64,
        })
        .collect();

    view.tiles.push(TileData::new("nodes", "Cities", "", nodes.len() as f64, 0));
    view.tiles
        .push(TileData::new("edges", "Connections", "", edges.len() as f64, 0));
    if let Some(heaviest) = edges.iter().max_by(|a, b| a.weight.total_cmp(&b.weight)) {
        view.tiles.push(TileData::new(
            "heaviest_route",
            &format!("Heaviest: {} - {}", heaviest.source, heaviest.target),
            "",
            heaviest.weight,
            0,
        ));
    }

    view.charts.push(map_chart(
        "network_graph",
        "Network Graph: Inter-city Traffic Flow Connections",
        MAPBOX_CENTER,
        6,
        vec![
            MapLayer::Edges { edges },
            MapLayer::Bubbles {
                bubbles,
                color_scale: "Reds".to_string(),
                max_size: 50.0,
            },
        ],
    ));

    view
}
