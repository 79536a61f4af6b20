// Page service - Use case for rendering one page of the dashboard
use crate::application::clock::Clock;
use crate::application::session::DashboardSession;
use crate::application::snapshot_builder::DatasetCatalog;
use crate::application::views::analysis::{render_correlation, render_distribution};
use crate::application::views::maps::{
    render_choropleth, render_dot_map, render_network_graph, render_sensor_clusters,
    render_traffic_heatmap,
};
use crate::application::views::text::render_text_analysis;
use crate::application::views::trends::{render_pollution_matrix, render_time_trends};
use crate::domain::error::DashboardError;
use crate::domain::observation::SnapshotRow;
use crate::domain::page::{Page, PageView};
use std::sync::Arc;
use tokio::sync::Mutex;

const WEEK_DAYS: u32 = 7;
const TODAY_DAYS: u32 = 1;

#[derive(Clone)]
pub struct PageService {
    catalog: Arc<Mutex<DatasetCatalog>>,
    clock: Arc<dyn Clock>,
}

impl PageService {
    pub fn new(catalog: Arc<Mutex<DatasetCatalog>>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }

    /// Render `page` for `session`. Only the live page touches the session's
    /// rolling window; every other page reads the shared catalog.
    pub async fn render(
        &self,
        page: Page,
        session: &mut DashboardSession,
    ) -> Result<PageView, DashboardError> {
        let now = self.clock.now();
        let extended = session.settings().show_extended_areas;
        tracing::debug!("Rendering {} for session {}", page, session.id());

        let view = match page {
            Page::Dashboard => session.render_live(now)?,
            Page::TrafficHeatmap => render_traffic_heatmap(&self.snapshot(extended).await, now),
            Page::AqiChoropleth => render_choropleth(now),
            Page::SensorClusters => {
                let sensors = self.catalog.lock().await.build_sensor_clusters(extended);
                render_sensor_clusters(&sensors, now)
            }
            Page::TimeTrends => {
                let (week, day) = {
                    let mut catalog = self.catalog.lock().await;
                    (
                        catalog.build_historical_series(WEEK_DAYS)?,
                        catalog.build_historical_series(TODAY_DAYS)?,
                    )
                };
                render_time_trends(&week, &day, now)
            }
            Page::PollutionMatrix => {
                let matrix = self.catalog.lock().await.build_heatmap_matrix();
                render_pollution_matrix(&matrix, now)
            }
            Page::DistributionAnalysis => {
                let rows = self.snapshot(extended).await;
                render_distribution(&rows, now, session.rng())
            }
            Page::CorrelationStudy => render_correlation(&self.snapshot(extended).await, now),
            Page::DotMap => render_dot_map(&self.snapshot(extended).await, now),
            // the inter-city graph always covers the region registry only
            Page::NetworkGraph => {
                let rows = self.snapshot(false).await;
                render_network_graph(&rows, now, session.rng())
            }
            Page::TextAnalysis => render_text_analysis(now, session.rng()),
        };

        Ok(view)
    }

    async fn snapshot(&self, include_extended: bool) -> Arc<Vec<SnapshotRow>> {
        self.catalog.lock().await.build_snapshot(include_extended)
    }
}
