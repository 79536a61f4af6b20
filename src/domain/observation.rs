// Synthetic measurement models
use chrono::NaiveDateTime;
use serde::Serialize;

/// One live reading for a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    /// Percent, nominally 0-100. Not clamped.
    pub traffic_density: i64,
    /// Nominally 0-300. Not clamped.
    pub aqi: i64,
    pub vehicles_count: i64,
    pub avg_speed: i64,
    pub incidents: i64,
}

/// Static per-location row backing the map and statistical views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub aqi: i64,
    pub traffic_density: i64,
    pub vehicles_count: i64,
    pub cars: i64,
    pub bikes: i64,
    pub trucks: i64,
    pub avg_speed: i64,
    pub incidents: i64,
    pub population: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBucket {
    pub timestamp: NaiveDateTime,
    pub traffic_volume: f64,
    pub aqi: f64,
    pub hour: u32,
    pub day_of_week: String,
    pub date: String,
}

/// Day-of-week by hour-of-day AQI grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub days: Vec<String>,
    pub hours: Vec<u32>,
    pub values: Vec<Vec<i64>>,
}

impl HeatmapMatrix {
    #[cfg(test)]
    pub fn cell(&self, day: usize, hour: usize) -> Option<i64> {
        self.values.get(day).and_then(|row| row.get(hour)).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub sensor_id: String,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub aqi: i64,
    pub traffic: i64,
}

/// Standard AQI severity bands used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiBand {
    pub fn classify(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiBand::Good
        } else if aqi <= 100.0 {
            AqiBand::Moderate
        } else if aqi <= 150.0 {
            AqiBand::Unhealthy
        } else if aqi <= 200.0 {
            AqiBand::VeryUnhealthy
        } else {
            AqiBand::Hazardous
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AqiBand::Good => "#00e400",
            AqiBand::Moderate => "#ffff00",
            AqiBand::Unhealthy => "#ff7e00",
            AqiBand::VeryUnhealthy => "#ff0000",
            AqiBand::Hazardous => "#8f3f97",
        }
    }
}

/// Sensor marker status: good below 100, moderate below 150, poor otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Good,
    Moderate,
    Poor,
}

impl SensorStatus {
    pub fn classify(aqi: i64) -> Self {
        if aqi < 100 {
            SensorStatus::Good
        } else if aqi < 150 {
            SensorStatus::Moderate
        } else {
            SensorStatus::Poor
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SensorStatus::Good => "green",
            SensorStatus::Moderate => "orange",
            SensorStatus::Poor => "red",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SensorStatus::Good => "cloud",
            _ => "warning-sign",
        }
    }
}
