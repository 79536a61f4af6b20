// Sample generator - one synthetic live observation per call
use crate::application::random_source::RandomSource;
use crate::domain::error::DashboardError;
use crate::domain::location::{active_locations, find_location};
use crate::domain::observation::Observation;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

pub const RUSH_HOURS: [u32; 6] = [8, 9, 17, 18, 19, 20];

const TRAFFIC_RUSH_BASE: i64 = 75;
const TRAFFIC_WEEKEND_BASE: i64 = 30;
const TRAFFIC_BASE: i64 = 40;
const TRAFFIC_JITTER: i64 = 15;

const AQI_RUSH_BASE: i64 = 140;
const AQI_BASE: i64 = 80;
const AQI_JITTER: i64 = 20;

const VEHICLES: (i64, i64) = (1000, 8000);
const SPEED_KMH: (i64, i64) = (20, 60);
const INCIDENTS: (i64, i64) = (0, 3);

pub fn is_rush_hour(now: NaiveDateTime) -> bool {
    RUSH_HOURS.contains(&now.hour())
}

pub fn is_weekend(now: NaiveDateTime) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Traffic density baseline before jitter.
pub fn traffic_baseline(now: NaiveDateTime) -> i64 {
    let weekend = is_weekend(now);
    if is_rush_hour(now) && !weekend {
        TRAFFIC_RUSH_BASE
    } else if weekend {
        TRAFFIC_WEEKEND_BASE
    } else {
        TRAFFIC_BASE
    }
}

/// AQI baseline before jitter. Weekends never get the rush-hour bump.
pub fn aqi_baseline(now: NaiveDateTime) -> i64 {
    if is_rush_hour(now) && !is_weekend(now) {
        AQI_RUSH_BASE
    } else {
        AQI_BASE
    }
}

/// Produce one observation for `location`, or for a uniformly random entry of
/// the active registry when no location is given.
///
/// Traffic density and AQI are left unclamped.
pub fn generate_observation(
    location: Option<&str>,
    include_extended: bool,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> Result<Observation, DashboardError> {
    let resolved = match location {
        Some(name) => {
            find_location(name).ok_or_else(|| DashboardError::UnknownLocation(name.to_string()))?
        }
        None => {
            let candidates = active_locations(include_extended);
            candidates[rng.pick_index(candidates.len())]
        }
    };

    let traffic_density = traffic_baseline(now) + rng.int_in(-TRAFFIC_JITTER, TRAFFIC_JITTER);
    let aqi = aqi_baseline(now) + rng.int_in(-AQI_JITTER, AQI_JITTER);

    Ok(Observation {
        timestamp: now,
        location: resolved.name.to_string(),
        lat: resolved.lat,
        lon: resolved.lon,
        traffic_density,
        aqi,
        vehicles_count: rng.int_in(VEHICLES.0, VEHICLES.1),
        avg_speed: rng.int_in(SPEED_KMH.0, SPEED_KMH.1),
        incidents: rng.int_in(INCIDENTS.0, INCIDENTS.1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::testing::at;
    use crate::application::random_source::ThreadRandom;
    use crate::application::random_source::testing::{MidpointRandom, ScriptedRandom};
    use crate::domain::location::REGION_DISTRICTS;

    #[test]
    fn test_weekday_rush_hour_baselines() {
        let wednesday_nine = at(8, 9, 0, 0);
        let obs = generate_observation(Some("Chennai"), false, wednesday_nine, &mut MidpointRandom)
            .unwrap();

        assert_eq!(obs.traffic_density, 75);
        assert_eq!(obs.aqi, 140);
        assert_eq!(obs.vehicles_count, 4500);
        assert_eq!(obs.avg_speed, 40);
        assert_eq!(obs.incidents, 1);
        assert_eq!(obs.timestamp, wednesday_nine);
        assert_eq!(obs.lat, 13.0827);
    }

    #[test]
    fn test_weekend_overrides_rush_hour() {
        let saturday_nine = at(11, 9, 0, 0);
        let obs = generate_observation(Some("Chennai"), false, saturday_nine, &mut MidpointRandom)
            .unwrap();

        assert_eq!(obs.traffic_density, 30);
        assert_eq!(obs.aqi, 80);
    }

    #[test]
    fn test_off_peak_weekday_baselines() {
        let wednesday_noon = at(8, 12, 0, 0);
        assert_eq!(traffic_baseline(wednesday_noon), 40);
        assert_eq!(aqi_baseline(wednesday_noon), 80);
        assert_eq!(traffic_baseline(at(8, 20, 59, 0)), 75);
        assert_eq!(traffic_baseline(at(8, 21, 0, 0)), 40);
    }

    #[test]
    fn test_jitter_bounds_hold_over_many_draws() {
        let mut rng = ThreadRandom::seeded(42);
        let now = at(8, 17, 30, 0);
        for _ in 0..2000 {
            let obs = generate_observation(Some("Vellore"), false, now, &mut rng).unwrap();
            assert!((60..=90).contains(&obs.traffic_density));
            assert!((120..=160).contains(&obs.aqi));
            assert!((1000..=8000).contains(&obs.vehicles_count));
            assert!((20..=60).contains(&obs.avg_speed));
            assert!((0..=3).contains(&obs.incidents));
        }
    }

    #[test]
    fn test_lowest_jitter_applies_to_baseline() {
        // weekend baseline 30 with the lowest jitter
        let mut rng = ScriptedRandom::new([-15, -20]);
        let obs = generate_observation(Some("Karur"), false, at(12, 3, 0, 0), &mut rng).unwrap();
        assert_eq!(obs.traffic_density, 15);
        assert_eq!(obs.aqi, 60);
    }

    #[test]
    fn test_random_location_comes_from_active_registry() {
        let mut rng = ScriptedRandom::new([3]);
        let obs = generate_observation(None, false, at(8, 12, 0, 0), &mut rng).unwrap();
        assert_eq!(obs.location, REGION_DISTRICTS[3].name);

        let mut rng = ScriptedRandom::new([29]);
        let obs = generate_observation(None, true, at(8, 12, 0, 0), &mut rng).unwrap();
        assert_eq!(obs.location, "Gudiyatham");
    }

    #[test]
    fn test_named_sub_area_resolves_without_extended_flag() {
        let obs = generate_observation(Some("Katpadi"), false, at(8, 12, 0, 0), &mut MidpointRandom)
            .unwrap();
        assert_eq!(obs.location, "Katpadi");
        assert_eq!(obs.lat, 12.9698);
    }

    #[test]
    fn test_unknown_location_is_an_error() {
        let err = generate_observation(Some("Gotham"), false, at(8, 12, 0, 0), &mut MidpointRandom)
            .unwrap_err();
        assert_eq!(err, DashboardError::UnknownLocation("Gotham".to_string()));
    }
}
