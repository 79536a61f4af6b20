// Rolling window store - time-bounded live observation history
use crate::application::random_source::RandomSource;
use crate::application::sample_generator::generate_observation;
use crate::domain::error::DashboardError;
use crate::domain::observation::Observation;
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::VecDeque;

pub const DEFAULT_RETENTION_SECS: i64 = 180;
pub const DEFAULT_FALLBACK_COUNT: usize = 10;

/// Observations from the last `retention`, oldest first.
///
/// `advance` must be called with non-decreasing times; eviction scans from
/// the front and stops at the first retained entry.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<Observation>,
    retention: TimeDelta,
    fallback_count: usize,
    last_advance: Option<NaiveDateTime>,
}

impl RollingWindow {
    pub fn new(retention: TimeDelta, fallback_count: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            retention,
            fallback_count,
            last_advance: None,
        }
    }

    /// Evict everything at or before `now - retention`, then append one
    /// fresh observation for `location`.
    pub fn advance(
        &mut self,
        location: Option<&str>,
        include_extended: bool,
        now: NaiveDateTime,
        rng: &mut dyn RandomSource,
    ) -> Result<Observation, DashboardError> {
        let observation = generate_observation(location, include_extended, now, rng)?;

        let evicted = self.evict(now);
        if evicted > 0 {
            tracing::debug!("Evicted {} expired observations", evicted);
        }

        self.samples.push_back(observation.clone());
        self.last_advance = Some(now);
        Ok(observation)
    }

    fn evict(&mut self, now: NaiveDateTime) -> usize {
        let cutoff = now - self.retention;
        let before = self.samples.len();
        while self
            .samples
            .front()
            .is_some_and(|front| front.timestamp <= cutoff)
        {
            self.samples.pop_front();
        }
        before - self.samples.len()
    }

    /// Observations for `location` in chronological order. Falls back to the
    /// most recent `fallback_count` entries of any location when none match.
    pub fn query(&self, location: &str) -> Vec<Observation> {
        let matching: Vec<Observation> = self
            .samples
            .iter()
            .filter(|o| o.location == location)
            .cloned()
            .collect();

        if !matching.is_empty() {
            return matching;
        }

        let skip = self.samples.len().saturating_sub(self.fallback_count);
        self.samples.iter().skip(skip).cloned().collect()
    }

    pub fn last_advance(&self) -> Option<NaiveDateTime> {
        self.last_advance
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.samples.iter()
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(
            TimeDelta::seconds(DEFAULT_RETENTION_SECS),
            DEFAULT_FALLBACK_COUNT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::testing::at;
    use crate::application::random_source::ThreadRandom;
    use crate::application::random_source::testing::MidpointRandom;

    fn secs(n: i64) -> TimeDelta {
        TimeDelta::seconds(n)
    }

    #[test]
    fn test_first_advance_stores_one_entry() {
        let mut window = RollingWindow::default();
        let t0 = at(8, 10, 0, 0);

        window
            .advance(Some("Vellore"), false, t0, &mut MidpointRandom)
            .unwrap();

        assert_eq!(window.len(), 1);
        assert_eq!(window.query("Vellore").len(), 1);
        assert_eq!(window.last_advance(), Some(t0));
    }

    #[test]
    fn test_entry_evicted_once_older_than_retention() {
        let mut window = RollingWindow::default();
        let mut rng = MidpointRandom;
        let t0 = at(8, 10, 0, 0);

        window.advance(Some("Vellore"), false, t0, &mut rng).unwrap();
        let mut t = 30;
        while t < 180 {
            window.advance(Some("Vellore"), false, t0 + secs(t), &mut rng).unwrap();
            t += 2;
        }
        assert_eq!(window.query("Vellore")[0].timestamp, t0);

        window.advance(Some("Vellore"), false, t0 + secs(181), &mut rng).unwrap();
        let history = window.query("Vellore");
        assert_eq!(history[0].timestamp, t0 + secs(30));
        assert_eq!(history.last().map(|o| o.timestamp), Some(t0 + secs(181)));

        let mut t = 182;
        while t <= 200 {
            window.advance(Some("Vellore"), false, t0 + secs(t), &mut rng).unwrap();
            t += 2;
        }
        assert_eq!(window.query("Vellore")[0].timestamp, t0 + secs(30));
    }

    #[test]
    fn test_boundary_age_is_evicted() {
        let mut window = RollingWindow::default();
        let t0 = at(8, 10, 0, 0);
        window.advance(Some("Salem"), false, t0, &mut MidpointRandom).unwrap();
        window
            .advance(Some("Salem"), false, t0 + secs(180), &mut MidpointRandom)
            .unwrap();

        assert_eq!(window.len(), 1);
        assert_eq!(window.query("Salem")[0].timestamp, t0 + secs(180));
    }

    #[test]
    fn test_retention_invariant_over_random_walk() {
        let mut window = RollingWindow::default();
        let mut rng = ThreadRandom::seeded(9);
        let mut now = at(8, 7, 0, 0);

        for _ in 0..500 {
            now += secs(rng.int_in(0, 20));
            let before = window.len();
            window.advance(None, true, now, &mut rng).unwrap();

            assert!(window.len() <= before + 1);
            assert!(window.iter().all(|o| now - o.timestamp < secs(180)));
            let times: Vec<_> = window.iter().map(|o| o.timestamp).collect();
            assert!(times.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_query_falls_back_to_latest_entries() {
        let mut window = RollingWindow::default();
        let t0 = at(8, 10, 0, 0);
        for i in 0..14 {
            window
                .advance(Some("Chennai"), false, t0 + secs(i * 2), &mut MidpointRandom)
                .unwrap();
        }

        let fallback = window.query("Madurai");
        assert_eq!(fallback.len(), 10);
        assert_eq!(fallback[0].timestamp, t0 + secs(8));
        assert_eq!(fallback[9].timestamp, t0 + secs(26));
    }

    #[test]
    fn test_query_fallback_with_short_history() {
        let mut window = RollingWindow::default();
        assert!(window.query("Madurai").is_empty());

        window
            .advance(Some("Chennai"), false, at(8, 10, 0, 0), &mut MidpointRandom)
            .unwrap();
        assert_eq!(window.query("Madurai").len(), 1);
    }

    #[test]
    fn test_query_filters_interleaved_locations() {
        let mut window = RollingWindow::default();
        let t0 = at(8, 10, 0, 0);
        for (i, name) in ["Erode", "Karur", "Erode", "Karur", "Erode"].iter().enumerate() {
            window
                .advance(Some(*name), false, t0 + secs(i as i64), &mut MidpointRandom)
                .unwrap();
        }

        let erode = window.query("Erode");
        assert_eq!(erode.len(), 3);
        assert!(erode.iter().all(|o| o.location == "Erode"));
        assert!(erode.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_unknown_location_leaves_window_untouched() {
        let mut window = RollingWindow::default();
        let t0 = at(8, 10, 0, 0);
        window.advance(Some("Erode"), false, t0, &mut MidpointRandom).unwrap();

        let result = window.advance(Some("Nowhere"), false, t0 + secs(500), &mut MidpointRandom);
        assert!(result.is_err());
        assert_eq!(window.len(), 1);
        assert_eq!(window.last_advance(), Some(t0));
    }
}
