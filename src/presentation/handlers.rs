// HTTP request handlers
use crate::application::session::{DEFAULT_SESSION_ID, DashboardSession, SessionSettings, SettingsUpdate};
use crate::domain::location::{Location, active_locations, is_major};
use crate::domain::page::Page;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::json_response;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Deserialize)]
pub struct LocationQuery {
    pub extended: Option<bool>,
}

#[derive(Serialize)]
pub struct PageEntry {
    pub slug: &'static str,
    pub title: &'static str,
    pub live: bool,
}

#[derive(Serialize)]
pub struct LocationEntry {
    #[serde(flatten)]
    pub location: Location,
    pub major: bool,
}

fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
}

async fn session_for(state: &AppState, headers: &HeaderMap) -> Arc<Mutex<DashboardSession>> {
    state.sessions.get_or_create(session_id(headers)).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Sidebar navigation entries
pub async fn list_pages() -> Json<Vec<PageEntry>> {
    Json(
        Page::ALL
            .into_iter()
            .map(|page| PageEntry {
                slug: page.slug(),
                title: page.title(),
                live: page.is_live(),
            })
            .collect(),
    )
}

/// Active location registry
pub async fn list_locations(Query(query): Query<LocationQuery>) -> Json<Vec<LocationEntry>> {
    Json(
        active_locations(query.extended.unwrap_or(false))
            .into_iter()
            .map(|location| LocationEntry {
                location: *location,
                major: is_major(location.name),
            })
            .collect(),
    )
}

pub async fn get_session(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Json<SessionSettings> {
    let session = session_for(&state, &headers).await;
    let settings = session.lock().await.settings().clone();
    Json(settings)
}

pub async fn update_session(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SessionSettings>, ApiError> {
    let session = session_for(&state, &headers).await;
    let mut session = session.lock().await;
    let settings = session.apply(update)?.clone();
    tracing::debug!("Session {} settings: {:?}", session.id(), settings);
    Ok(Json(settings))
}

/// Render one page for the caller's session
pub async fn render_page(
    Path(slug): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let page: Page = slug.parse()?;
    let compress = accepts_brotli(&headers);

    let session = session_for(&state, &headers).await;
    let view = {
        let mut session = session.lock().await;
        state.page_service.render(page, &mut session).await?
    };

    json_response(&view, compress)
        .await
        .map_err(ApiError::Internal)
}

/// Stream live dashboard frames until auto-refresh stops or the client leaves
pub async fn stream_live(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);
    let session = session_for(&state, &headers).await;
    let rx = state.live_service.stream_session(session);
    stream_from_receiver(rx, compress).into_response()
}

pub async fn clear_datasets(State(state): State<Arc<AppState>>) -> StatusCode {
    state.catalog.lock().await.clear();
    StatusCode::NO_CONTENT
}

pub async fn invalidate_snapshot(
    Path(flag): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let include_extended: bool = flag
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("expected true or false, got {}", flag)))?;
    let invalidated = state.catalog.lock().await.invalidate_snapshot(include_extended);
    Ok(Json(serde_json::json!({ "invalidated": invalidated })))
}

pub async fn invalidate_history(
    Path(days): Path<u32>,
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let invalidated = state.catalog.lock().await.invalidate_history(days);
    Json(serde_json::json!({ "invalidated": invalidated }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::Clock;
    use crate::application::clock::testing::{ManualClock, at};
    use crate::application::live_service::LiveFeedService;
    use crate::application::page_service::PageService;
    use crate::application::random_source::ThreadRandom;
    use crate::application::session::{SessionDefaults, SessionStore};
    use crate::application::snapshot_builder::DatasetCatalog;
    use axum::http::HeaderValue;
    use chrono::TimeDelta;
    use std::time::Duration;

    fn state() -> Arc<AppState> {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(at(8, 9, 0, 0)));
        let catalog = Arc::new(Mutex::new(DatasetCatalog::new(
            Box::new(ThreadRandom::seeded(9)),
            clock.clone(),
            30,
            TimeDelta::hours(1),
        )));
        Arc::new(AppState {
            sessions: SessionStore::new(
                SessionDefaults {
                    default_location: "Vellore".to_string(),
                    retention: TimeDelta::seconds(180),
                    fallback_count: 10,
                    idle_ttl: TimeDelta::minutes(30),
                },
                clock.clone(),
            ),
            page_service: PageService::new(catalog.clone(), clock.clone()),
            live_service: LiveFeedService::new(clock, Duration::from_millis(10)),
            catalog,
        })
    }

    fn headers(session: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_str(session).unwrap());
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_session_id_defaults() {
        assert_eq!(session_id(&HeaderMap::new()), "default");
        assert_eq!(session_id(&headers("")), "default");
        assert_eq!(session_id(&headers("abc")), "abc");
    }

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));
        headers.insert("accept-encoding", HeaderValue::from_static("gzip, br"));
        assert!(accepts_brotli(&headers));
    }

    #[tokio::test]
    async fn test_list_pages_and_locations() {
        let Json(pages) = list_pages().await;
        assert_eq!(pages.len(), 11);
        assert!(pages[0].live);

        let Json(region) = list_locations(Query(LocationQuery { extended: None })).await;
        let Json(all) = list_locations(Query(LocationQuery { extended: Some(true) })).await;
        assert_eq!(region.len(), 15);
        assert_eq!(all.len(), 30);
        assert_eq!(region.iter().filter(|l| l.major).count(), 4);
    }

    #[tokio::test]
    async fn test_session_update_is_per_client() {
        let state = state();
        let update = SettingsUpdate {
            page: Some(Page::DotMap),
            ..Default::default()
        };
        update_session(headers("a"), State(state.clone()), Json(update))
            .await
            .unwrap();

        let Json(a) = get_session(headers("a"), State(state.clone())).await;
        let Json(b) = get_session(headers("b"), State(state.clone())).await;
        assert_eq!(a.page, Page::DotMap);
        assert_eq!(b.page, Page::Dashboard);
    }

    #[tokio::test]
    async fn test_invalid_location_update_is_rejected() {
        let update = SettingsUpdate {
            selected_location: Some("Atlantis".to_string()),
            ..Default::default()
        };
        let err = update_session(HeaderMap::new(), State(state()), Json(update))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_render_page_returns_view_json() {
        let response = render_page(
            Path("aqi-choropleth".to_string()),
            HeaderMap::new(),
            State(state()),
        )
        .await;
        let Ok(response) = response else {
            panic!("render failed");
        };
        let json = body_json(response).await;
        assert_eq!(json["page"], "aqi-choropleth");
        assert_eq!(json["tiles"][0]["id"], "highest");
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let result = render_page(Path("nope".to_string()), HeaderMap::new(), State(state())).await;
        let Err(err) = result else {
            panic!("unknown page rendered");
        };
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_snapshot() {
        let state = state();
        let Json(first) = invalidate_snapshot(Path("false".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(first["invalidated"], false);

        let rendered =
            render_page(Path("dot-map".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert!(rendered.is_ok());
        let Json(second) = invalidate_snapshot(Path("false".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(second["invalidated"], true);

        let err = invalidate_snapshot(Path("maybe".to_string()), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalidate_history_after_time_trends() {
        let state = state();
        let rendered =
            render_page(Path("time-trends".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert!(rendered.is_ok());

        let Json(week) = invalidate_history(Path(7), State(state.clone())).await;
        let Json(month) = invalidate_history(Path(30), State(state)).await;
        assert_eq!(week["invalidated"], true);
        assert_eq!(month["invalidated"], false);
    }

    #[tokio::test]
    async fn test_clear_datasets() {
        assert_eq!(clear_datasets(State(state())).await, StatusCode::NO_CONTENT);
    }
}
