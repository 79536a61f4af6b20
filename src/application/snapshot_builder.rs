// Snapshot dataset builder - memoized static datasets for the non-live views
use crate::application::clock::Clock;
use crate::application::memo::Memo;
use crate::application::random_source::RandomSource;
use crate::domain::error::DashboardError;
use crate::domain::location::{active_locations, is_major};
use crate::domain::observation::{HeatmapMatrix, HourlyBucket, SensorReading, SnapshotRow};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::f64::consts::PI;
use std::sync::Arc;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weekday hours that get the matrix rush-hour bump. Hour 20 is not included
/// here, unlike the live generator.
const MATRIX_RUSH_HOURS: [u32; 5] = [8, 9, 17, 18, 19];

const SENSOR_OFFSET_DEG: f64 = 0.08;

/// Process-wide dataset caches shared by every session.
pub struct DatasetCatalog {
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    max_history_days: u32,
    snapshots: Memo<bool, Vec<SnapshotRow>>,
    histories: Memo<u32, Vec<HourlyBucket>>,
    matrix: Memo<(), HeatmapMatrix>,
    sensors: Memo<bool, Vec<SensorReading>>,
}

impl DatasetCatalog {
    pub fn new(
        rng: Box<dyn RandomSource>,
        clock: Arc<dyn Clock>,
        max_history_days: u32,
        sensor_ttl: TimeDelta,
    ) -> Self {
        Self {
            rng,
            clock,
            max_history_days,
            snapshots: Memo::new(),
            histories: Memo::new(),
            matrix: Memo::new(),
            sensors: Memo::with_ttl(sensor_ttl),
        }
    }

    /// One row per active location; stable until invalidated.
    pub fn build_snapshot(&mut self, include_extended: bool) -> Arc<Vec<SnapshotRow>> {
        let now = self.clock.now();
        let rng = &mut self.rng;
        self.snapshots.get_or_insert_with(include_extended, now, || {
            tracing::debug!("Generating snapshot dataset (extended={})", include_extended);
            generate_snapshot(include_extended, rng.as_mut())
        })
    }

    /// Hourly buckets for the last `days` days, ending now.
    pub fn build_historical_series(
        &mut self,
        days: u32,
    ) -> Result<Arc<Vec<HourlyBucket>>, DashboardError> {
        if days == 0 || days > self.max_history_days {
            return Err(DashboardError::InvalidDays {
                requested: days,
                max: self.max_history_days,
            });
        }

        let now = self.clock.now();
        let rng = &mut self.rng;
        Ok(self.histories.get_or_insert_with(days, now, || {
            tracing::debug!("Generating {}-day historical series", days);
            generate_historical_series(days, now, rng.as_mut())
        }))
    }

    pub fn build_heatmap_matrix(&mut self) -> Arc<HeatmapMatrix> {
        let now = self.clock.now();
        let rng = &mut self.rng;
        self.matrix
            .get_or_insert_with((), now, || generate_heatmap_matrix(rng.as_mut()))
    }

    /// Sensor network around each snapshot location; expires after the TTL.
    pub fn build_sensor_clusters(&mut self, include_extended: bool) -> Arc<Vec<SensorReading>> {
        let rows = self.build_snapshot(include_extended);
        let now = self.clock.now();
        let rng = &mut self.rng;
        self.sensors.get_or_insert_with(include_extended, now, || {
            generate_sensor_clusters(&rows, rng.as_mut())
        })
    }

    pub fn invalidate_snapshot(&mut self, include_extended: bool) -> bool {
        self.sensors.invalidate(&include_extended);
        self.snapshots.invalidate(&include_extended)
    }

    pub fn invalidate_history(&mut self, days: u32) -> bool {
        self.histories.invalidate(&days)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.histories.clear();
        self.matrix.clear();
        self.sensors.clear();
        tracing::info!("Cleared all cached datasets");
    }
}

pub fn generate_snapshot(include_extended: bool, rng: &mut dyn RandomSource) -> Vec<SnapshotRow> {
    active_locations(include_extended)
        .into_iter()
        .map(|location| {
            let major = is_major(location.name);
            let aqi = if major { rng.int_in(100, 200) } else { rng.int_in(50, 120) };
            let traffic_density = if major { rng.int_in(60, 90) } else { rng.int_in(30, 60) };
            let vehicles_count = if major {
                rng.int_in(5000, 50000)
            } else {
                rng.int_in(1000, 10000)
            };

            SnapshotRow {
                location: location.name.to_string(),
                lat: location.lat,
                lon: location.lon,
                aqi,
                traffic_density,
                vehicles_count,
                cars: rng.int_in(2000, 25000),
                bikes: rng.int_in(2000, 20000),
                trucks: rng.int_in(500, 5000),
                avg_speed: rng.int_in(20, 55),
                incidents: rng.int_in(0, 12),
                population: if major {
                    rng.int_in(100_000, 5_000_000)
                } else {
                    rng.int_in(50_000, 500_000)
                },
            }
        })
        .collect()
}

/// Daily-cycle traffic value for an hour, before jitter.
pub fn traffic_cycle(hour: u32) -> f64 {
    40.0 + 35.0 * ((hour as f64 - 9.0) * PI / 12.0).sin()
}

/// Daily-cycle AQI value for an hour, before jitter.
pub fn aqi_cycle(hour: u32) -> f64 {
    90.0 + 50.0 * ((hour as f64 - 14.0) * PI / 12.0).sin()
}

pub fn generate_historical_series(
    days: u32,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> Vec<HourlyBucket> {
    let periods = i64::from(days) * 24;
    (0..periods)
        .map(|i| {
            let timestamp = now - TimeDelta::hours(periods - 1 - i);
            let hour = timestamp.hour();
            let traffic = traffic_cycle(hour) + rng.int_in(-10, 10) as f64;
            let aqi = aqi_cycle(hour) + rng.int_in(-20, 20) as f64;

            HourlyBucket {
                timestamp,
                traffic_volume: traffic.max(15.0),
                aqi: aqi.clamp(30.0, 280.0),
                hour,
                day_of_week: timestamp.format("%A").to_string(),
                date: timestamp.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

pub fn generate_heatmap_matrix(rng: &mut dyn RandomSource) -> HeatmapMatrix {
    let values = WEEKDAYS
        .iter()
        .enumerate()
        .map(|(day_idx, _)| {
            let weekend = day_idx >= 5;
            (0..24u32)
                .map(|hour| {
                    let mut base = if weekend { 65 } else { 90 };
                    if !weekend && MATRIX_RUSH_HOURS.contains(&hour) {
                        base += 45;
                    }
                    base + rng.int_in(-15, 15)
                })
                .collect()
        })
        .collect();

    HeatmapMatrix {
        days: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        hours: (0..24).collect(),
        values,
    }
}

pub fn generate_sensor_clusters(
    rows: &[SnapshotRow],
    rng: &mut dyn RandomSource,
) -> Vec<SensorReading> {
    let mut sensors = Vec::new();
    for row in rows {
        let count = rng.int_in(3, 7);
        for _ in 0..count {
            let lat = row.lat + rng.float_in(-SENSOR_OFFSET_DEG, SENSOR_OFFSET_DEG);
            let lon = row.lon + rng.float_in(-SENSOR_OFFSET_DEG, SENSOR_OFFSET_DEG);
            let aqi = row.aqi + rng.int_in(-20, 20);
            let traffic = row.traffic_density + rng.int_in(-15, 15);
            sensors.push(SensorReading {
                sensor_id: format!("TN-{}", rng.int_in(1000, 9999)),
                location: row.location.clone(),
                lat,
                lon,
                aqi,
                traffic,
            });
        }
    }
    sensors
}
