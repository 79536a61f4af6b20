// Page navigation and rendered page view
use super::chart::{ChartData, TileData};
use super::error::DashboardError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    TrafficHeatmap,
    AqiChoropleth,
    SensorClusters,
    TimeTrends,
    PollutionMatrix,
    DistributionAnalysis,
    CorrelationStudy,
    DotMap,
    NetworkGraph,
    TextAnalysis,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Page; 11] = [
        Page::Dashboard,
        Page::TrafficHeatmap,
        Page::AqiChoropleth,
        Page::SensorClusters,
        Page::TimeTrends,
        Page::PollutionMatrix,
        Page::DistributionAnalysis,
        Page::CorrelationStudy,
        Page::DotMap,
        Page::NetworkGraph,
        Page::TextAnalysis,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::TrafficHeatmap => "traffic-heatmap",
            Page::AqiChoropleth => "aqi-choropleth",
            Page::SensorClusters => "sensor-clusters",
            Page::TimeTrends => "time-trends",
            Page::PollutionMatrix => "pollution-matrix",
            Page::DistributionAnalysis => "distribution-analysis",
            Page::CorrelationStudy => "correlation-study",
            Page::DotMap => "dot-map",
            Page::NetworkGraph => "network-graph",
            Page::TextAnalysis => "text-analysis",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::TrafficHeatmap => "Traffic Heatmap",
            Page::AqiChoropleth => "AQI Choropleth",
            Page::SensorClusters => "Sensor Clusters",
            Page::TimeTrends => "Time Trends",
            Page::PollutionMatrix => "Pollution Matrix",
            Page::DistributionAnalysis => "Distribution Analysis",
            Page::CorrelationStudy => "Correlation Study",
            Page::DotMap => "Dot Map",
            Page::NetworkGraph => "Network Graph",
            Page::TextAnalysis => "Text Analysis",
        }
    }

    /// Only the dashboard is backed by the rolling window.
    pub fn is_live(self) -> bool {
        self == Page::Dashboard
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Dashboard
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.slug() == s)
            .ok_or_else(|| DashboardError::UnknownPage(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableData {
    pub id: String,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TableData {
    pub fn new(id: &str, title: &str, columns: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<serde_json::Value>) {
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    pub subtitle: String,
    pub generated_at: NaiveDateTime,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
    pub tables: Vec<TableData>,
}

impl PageView {
    pub fn new(page: Page, title: String, subtitle: String, generated_at: NaiveDateTime) -> Self {
        Self {
            page,
            title,
            subtitle,
            generated_at,
            tiles: Vec::new(),
            charts: Vec::new(),
            tables: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn tile(&self, id: &str) -> Option<&TileData> {
        self.tiles.iter().find(|t| t.id == id)
    }

    #[cfg(test)]
    pub fn chart(&self, id: &str) -> Option<&ChartData> {
        self.charts.iter().find(|c| c.id == id)
    }

    #[cfg(test)]
    pub fn table(&self, id: &str) -> Option<&TableData> {
        self.tables.iter().find(|t| t.id == id)
    }
}
