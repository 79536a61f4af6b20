// Per-client dashboard session - page selection, live location and rolling window
use crate::application::clock::Clock;
use crate::application::random_source::{RandomSource, ThreadRandom};
use crate::application::rolling_window::RollingWindow;
use crate::application::views::live::render_dashboard;
use crate::domain::error::DashboardError;
use crate::domain::location::active_locations;
use crate::domain::page::{Page, PageView};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSettings {
    pub page: Page,
    pub selected_location: String,
    pub show_extended_areas: bool,
    pub auto_refresh: bool,
}

/// Partial settings change; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub page: Option<Page>,
    pub selected_location: Option<String>,
    pub show_extended_areas: Option<bool>,
    pub auto_refresh: Option<bool>,
}

fn is_active(name: &str, include_extended: bool) -> bool {
    active_locations(include_extended)
        .iter()
        .any(|l| l.name == name)
}

pub struct DashboardSession {
    id: String,
    settings: SessionSettings,
    default_location: String,
    window: RollingWindow,
    rng: Box<dyn RandomSource>,
}

impl DashboardSession {
    pub fn new(
        id: String,
        default_location: String,
        window: RollingWindow,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            id,
            settings: SessionSettings {
                page: Page::default(),
                selected_location: default_location.clone(),
                show_extended_areas: false,
                auto_refresh: true,
            },
            default_location,
            window,
            rng,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    /// Per-render randomness for views that redraw on every visit.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Apply a settings change atomically: on error nothing is modified.
    ///
    /// A selected location must be in the active registry for the resulting
    /// extended-areas flag. If the flag change alone hides the current
    /// selection, it falls back to the default location.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<&SessionSettings, DashboardError> {
        let show_extended = update
            .show_extended_areas
            .unwrap_or(self.settings.show_extended_areas);

        let selected = match update.selected_location {
            Some(name) if is_active(&name, show_extended) => name,
            Some(name) => {
                tracing::warn!("Session {} rejected location {}", self.id, name);
                return Err(DashboardError::UnknownLocation(name));
            }
            None if is_active(&self.settings.selected_location, show_extended) => {
                self.settings.selected_location.clone()
            }
            None => {
                tracing::debug!(
                    "Session {}: {} hidden by area filter, reverting to {}",
                    self.id,
                    self.settings.selected_location,
                    self.default_location
                );
                self.default_location.clone()
            }
        };

        self.settings = SessionSettings {
            page: update.page.unwrap_or(self.settings.page),
            selected_location: selected,
            show_extended_areas: show_extended,
            auto_refresh: update.auto_refresh.unwrap_or(self.settings.auto_refresh),
        };
        Ok(&self.settings)
    }

    /// One refresh cycle of the live page: advance the window with the
    /// selected location, then render what is stored for it.
    pub fn render_live(&mut self, now: NaiveDateTime) -> Result<PageView, DashboardError> {
        let location = self.settings.selected_location.clone();
        self.window.advance(
            Some(&location),
            self.settings.show_extended_areas,
            now,
            self.rng.as_mut(),
        )?;
        let history = self.window.query(&location);
        Ok(render_dashboard(
            &location,
            &history,
            self.window.last_advance(),
            now,
            self.rng.as_mut(),
        ))
    }

    /// Whether the live loop should keep pushing frames.
    pub fn wants_live_updates(&self) -> bool {
        self.settings.auto_refresh && self.settings.page.is_live()
    }
}

#[derive(Debug, Clone)]
pub struct SessionDefaults {
    pub default_location: String,
    pub retention: TimeDelta,
    pub fallback_count: usize,
    /// Sessions untouched for this long are dropped on the next lookup.
    pub idle_ttl: TimeDelta,
}

struct SessionEntry {
    session: Arc<Mutex<DashboardSession>>,
    last_seen: NaiveDateTime,
}

impl SessionEntry {
    // a running live loop holds its own handle
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.session) > 1
    }
}

/// Sessions keyed by client-supplied id, created on first use and expired
/// after `idle_ttl` without a lookup.
pub struct SessionStore {
    defaults: SessionDefaults,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(defaults: SessionDefaults, clock: Arc<dyn Clock>) -> Self {
        Self {
            defaults,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_create(&self, id: &str) -> Arc<Mutex<DashboardSession>> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        let idle_ttl = self.defaults.idle_ttl;
        sessions.retain(|_, entry| entry.in_use() || now - entry.last_seen < idle_ttl);
        if sessions.len() < before {
            tracing::info!("Expired {} idle sessions", before - sessions.len());
        }

        let entry = sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::info!("Creating session {}", id);
            SessionEntry {
                session: Arc::new(Mutex::new(DashboardSession::new(
                    id.to_string(),
                    self.defaults.default_location.clone(),
                    RollingWindow::new(self.defaults.retention, self.defaults.fallback_count),
                    Box::new(ThreadRandom::new()),
                ))),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        entry.session.clone()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
