// Application state for HTTP handlers
use crate::application::live_service::LiveFeedService;
use crate::application::page_service::PageService;
use crate::application::session::SessionStore;
use crate::application::snapshot_builder::DatasetCatalog;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub sessions: SessionStore,
    pub page_service: PageService,
    pub live_service: LiveFeedService,
    pub catalog: Arc<Mutex<DatasetCatalog>>,
}
