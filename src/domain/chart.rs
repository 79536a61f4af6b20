// Chart and map models handed to the rendering client
use super::location::GeoPoint;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesPoint {
    pub time: NaiveDateTime,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TimeSeriesPoint {
    pub fn new(time: NaiveDateTime, value: f64) -> Self {
        Self {
            time,
            value,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    pub delta: Option<f64>,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: &str, value: f64, precision: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            value,
            precision,
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Value rendered with the tile's precision and unit, e.g. `42%`.
    pub fn display(&self) -> String {
        let digits = self.precision.max(0) as usize;
        format!("{:.*}{}", digits, self.value, self.unit)
    }
}

impl Serialize for TileData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TileData", 7)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("unit", &self.unit)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("precision", &self.precision)?;
        state.serialize_field("delta", &self.delta)?;
        state.serialize_field("display", &self.display())?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub axis: Axis,
    pub fill: bool,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: &str, name: &str, color: &str, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: Some(color.to_string()),
            axis: Axis::Primary,
            fill: true,
            points,
        }
    }

    pub fn on_secondary_axis(mut self) -> Self {
        self.axis = Axis::Secondary;
        self
    }
}

/// Dashed horizontal reference line.
#[derive(Debug, Clone, Serialize)]
pub struct Threshold {
    pub value: f64,
    pub label: String,
    pub color: String,
}

impl Threshold {
    pub fn new(value: f64, label: &str, color: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxGroup {
    pub label: String,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_value: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub x_start: f64,
    pub x_end: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub label: String,
    pub popup: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionValue {
    pub name: String,
    pub centroid: GeoPoint,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub width: f64,
    pub path: [GeoPoint; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct Bubble {
    pub position: GeoPoint,
    pub label: String,
    pub size: f64,
    pub color_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum MapLayer {
    Heat {
        points: Vec<HeatPoint>,
        radius: u32,
        blur: u32,
        gradient: Vec<(f64, String)>,
    },
    CircleMarkers {
        markers: Vec<Marker>,
        radius: u32,
    },
    ClusteredMarkers {
        markers: Vec<Marker>,
    },
    Choropleth {
        key: String,
        fill_color: String,
        regions: Vec<RegionValue>,
    },
    Edges {
        edges: Vec<Edge>,
    },
    Bubbles {
        bubbles: Vec<Bubble>,
        color_scale: String,
        max_size: f64,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    Line {
        series: Vec<SeriesData>,
    },
    Heatmap {
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
        color_scale: String,
    },
    Box {
        groups: Vec<BoxGroup>,
    },
    Scatter {
        points: Vec<ScatterPoint>,
        trend: Option<TrendLine>,
        color_scale: String,
    },
    Bar {
        horizontal: bool,
        bars: Vec<Bar>,
        color_scale: String,
    },
    Map {
        center: GeoPoint,
        zoom: u8,
        layers: Vec<MapLayer>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub y2_label: Option<String>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub thresholds: Vec<Threshold>,
    pub body: ChartBody,
}

impl ChartData {
    pub fn new(id: &str, title: &str, body: ChartBody) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: None,
            y_label: None,
            y2_label: None,
            y_min: None,
            y_max: None,
            thresholds: Vec::new(),
            body,
        }
    }

    pub fn labels(mut self, x: &str, y: &str) -> Self {
        self.x_label = Some(x.to_string());
        self.y_label = Some(y.to_string());
        self
    }

    pub fn secondary_label(mut self, y2: &str) -> Self {
        self.y2_label = Some(y2.to_string());
        self
    }

    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_min = Some(min);
        self.y_max = Some(max);
        self
    }

    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.thresholds.push(threshold);
        self
    }
}
