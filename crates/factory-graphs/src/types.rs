//! Chart data structures

use crate::theme::Palette;
use factory_common::Theme;
use factory_config::GraphConfig;
use serde::Serialize;
use std::fmt;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    Line,
    Bar,
}

/// The charts of the dashboard, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    Production,
    Occupancy,
    Downtime,
    Rejects,
    Efficiency,
    ProductionTime,
    CompletedVsRejected,
}

impl ChartId {
    /// Every chart, in display order
    pub const ALL: [Self; 7] = [
        Self::Production,
        Self::Occupancy,
        Self::Downtime,
        Self::Rejects,
        Self::Efficiency,
        Self::ProductionTime,
        Self::CompletedVsRejected,
    ];

    /// Stable identifier, also the file stem
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Occupancy => "occupancy",
            Self::Downtime => "downtime",
            Self::Rejects => "rejects",
            Self::Efficiency => "efficiency",
            Self::ProductionTime => "production_time",
            Self::CompletedVsRejected => "completed_vs_rejected",
        }
    }

    /// File name of the rendered chart
    pub fn file_name(self) -> String {
        format!("{}.svg", self.as_str())
    }

    /// Kind of chart drawn for this id
    pub const fn kind(self) -> ChartKind {
        match self {
            Self::Production | Self::CompletedVsRejected => ChartKind::Line,
            _ => ChartKind::Bar,
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data point for charts; `y` is `None` where the series has a gap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: Option<f64>,
    pub label: Option<String>,
}

impl DataPoint {
    pub fn new(x: f64, y: Option<f64>) -> Self {
        Self { x, y, label: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Chart data set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    pub name: String,
    pub data: Vec<DataPoint>,
    /// Hex colour of the series
    pub color: String,
}

impl DataSet {
    /// Runs of consecutive defined points, split at gaps
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in &self.data {
            match point.y {
                Some(y) => current.push((point.x, y)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Defined values of the series
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().filter_map(|p| p.y)
    }
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub datasets: Vec<DataSet>,
    /// Bar labels; empty for line charts
    pub categories: Vec<String>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        self.id.kind()
    }

    /// Whether no series has a defined value
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.values().next().is_none())
    }
}

/// Canvas size and palette for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleConfig {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
}

impl StyleConfig {
    pub fn new(graph: &GraphConfig, theme: Theme) -> Self {
        Self {
            width: graph.width,
            height: graph.height,
            palette: Palette::new(graph, theme),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new(&GraphConfig::default(), Theme::default())
    }
}
