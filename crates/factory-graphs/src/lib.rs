//! Aggregation, KPIs, chart rendering and dashboard assembly for Factory Dash

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod aggregator;
pub mod cache;
pub mod charts;
pub mod dashboard;
pub mod intervals;
pub mod kpi;
pub mod renderer;
pub mod scale;
pub mod theme;
pub mod types;
pub mod workstation;

pub use aggregator::{
    aggregate, AggregationPolicy, Bucket, BucketAggregator, DataAggregator, Field, Metrics,
    Reduction,
};
pub use cache::CachedAggregator;
pub use dashboard::{DashboardModel, DashboardOutput, DashboardRenderer};
pub use intervals::{rejection_intervals, RejectionInterval};
pub use kpi::{KpiCalculator, KpiSummary, TopDowntime};
pub use renderer::{render_chart, BarChartRenderer, GraphRenderer, LineChartRenderer};
pub use scale::{extent, LinearScale};
pub use theme::Palette;
pub use types::*;
pub use workstation::{WorkstationAnalyzer, WorkstationStats};
