//! Dashboard assembly
//!
//! A [`DashboardModel`] is a pure function of the daily records and a
//! [`ViewState`]. [`DashboardRenderer`] turns a model into SVG charts and a
//! static `index.html` page.

use crate::aggregator::{Bucket, BucketAggregator, DataAggregator};
use crate::cache::CachedAggregator;
use crate::charts;
use crate::intervals::{rejection_intervals, RejectionInterval};
use crate::kpi::{KpiCalculator, KpiSummary};
use crate::renderer::render_chart;
use crate::theme::Palette;
use crate::types::{ChartId, ChartKind, ChartSpec, StyleConfig};
use crate::workstation::{WorkstationAnalyzer, WorkstationStats};
use factory_common::{
    format_optional, format_percent, format_timestamp, now, DashError, Record, Result, ViewState,
};
use factory_config::{AggregationSettings, GraphConfig};
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Everything the dashboard shows for one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardModel {
    /// Granularity and theme this model was built for
    pub view: ViewState,
    /// Time buckets at the view's granularity, shared with the cache
    pub buckets: Arc<Vec<Bucket>>,
    /// Headline figures over the whole dataset
    pub kpis: KpiSummary,
    /// Per-workstation occupancy, downtime and derived ratios
    pub workstations: Vec<WorkstationStats>,
    /// Rejected units summed over fixed-width run intervals
    pub intervals: Vec<RejectionInterval>,
    /// Runs per rejection interval
    pub interval_width: u32,
    /// Runs of the days stopped by an accident
    pub accident_runs: Vec<u32>,
}

impl DashboardModel {
    /// Aggregate `records` for `view`
    #[instrument(skip_all, fields(days = records.len(), view = %view))]
    pub fn build(
        records: &[Record],
        view: ViewState,
        settings: &AggregationSettings,
    ) -> Result<Self> {
        let buckets = BucketAggregator::new(view.granularity).aggregate(records)?;
        Self::assemble(records, Arc::new(buckets), view, settings)
    }

    /// Like [`build`](Self::build) but takes the buckets from `cache`
    pub fn from_cache(
        cache: &CachedAggregator,
        view: ViewState,
        settings: &AggregationSettings,
    ) -> Result<Self> {
        let buckets = cache.buckets(view.granularity)?;
        Self::assemble(cache.records(), buckets, view, settings)
    }

    fn assemble(
        records: &[Record],
        buckets: Arc<Vec<Bucket>>,
        view: ViewState,
        settings: &AggregationSettings,
    ) -> Result<Self> {
        let kpis = KpiCalculator::new(settings.theoretical_daily_capacity).aggregate(records)?;
        let workstations = WorkstationAnalyzer::new(settings.shift_capacity).aggregate(records)?;
        let intervals = rejection_intervals(&buckets, settings.rejection_interval)?;

        debug!(
            buckets = buckets.len(),
            intervals = intervals.len(),
            "Assembled dashboard model"
        );
        Ok(Self {
            view,
            buckets,
            kpis,
            workstations,
            intervals,
            interval_width: settings.rejection_interval,
            accident_runs: records
                .iter()
                .filter(|r| r.is_accident())
                .map(|r| r.run)
                .collect(),
        })
    }

    /// Specifications of every chart, in display order
    pub fn charts(&self, palette: &Palette) -> Vec<ChartSpec> {
        let granularity = self.view.granularity;
        vec![
            charts::production_chart(&self.buckets, granularity, palette),
            charts::occupancy_chart(&self.workstations, palette),
            charts::downtime_chart(&self.workstations, palette),
            charts::rejects_chart(&self.intervals, self.interval_width, palette),
            charts::efficiency_chart(&self.workstations, palette),
            charts::production_time_chart(&self.workstations, palette),
            charts::completed_vs_rejected_chart(&self.buckets, granularity, palette),
        ]
    }
}

/// Files written by one dashboard render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardOutput {
    /// HTML page embedding the charts
    pub index: PathBuf,
    /// SVG file of every rendered chart
    pub charts: Vec<PathBuf>,
    /// Charts left out because they had nothing to draw
    pub skipped: Vec<ChartId>,
}

/// Renders dashboard models into a directory
#[derive(Debug, Clone)]
pub struct DashboardRenderer {
    title: String,
    graph: GraphConfig,
}

impl DashboardRenderer {
    pub fn new(title: impl Into<String>, graph: GraphConfig) -> Self {
        Self {
            title: title.into(),
            graph,
        }
    }

    /// Render the charts of `model` in parallel and write them with an
    /// `index.html` into `output_dir`
    #[instrument(skip_all, fields(view = %model.view, dir = %output_dir.display()))]
    pub async fn render(
        &self,
        model: &DashboardModel,
        output_dir: &Path,
    ) -> Result<DashboardOutput> {
        tokio::fs::create_dir_all(output_dir).await?;
        let style = Arc::new(StyleConfig::new(&self.graph, model.view.theme));

        let (specs, skipped): (Vec<ChartSpec>, Vec<ChartSpec>) = model
            .charts(&style.palette)
            .into_iter()
            .partition(|spec| spec.kind() == ChartKind::Line || !spec.categories.is_empty());
        for spec in &skipped {
            warn!(chart = %spec.id, "Nothing to draw, skipping chart");
        }

        let tasks = specs.into_iter().map(|spec| {
            let style = Arc::clone(&style);
            tokio::task::spawn_blocking(move || render_chart(&spec, &style).map(|svg| (spec.id, svg)))
        });

        let mut output = DashboardOutput {
            skipped: skipped.iter().map(|s| s.id).collect(),
            ..DashboardOutput::default()
        };
        for joined in join_all(tasks).await {
            let (id, svg) = joined
                .map_err(|e| DashError::graph_with_source("Chart rendering task failed", e))??;
            let path = output_dir.join(id.file_name());
            tokio::fs::write(&path, svg).await?;
            output.charts.push(path);
        }

        let rendered: Vec<ChartId> = ChartId::ALL
            .into_iter()
            .filter(|id| !output.skipped.contains(id))
            .collect();
        let html = self.index_html(model, &style.palette, &rendered);
        output.index = output_dir.join("index.html");
        tokio::fs::write(&output.index, html).await?;

        info!(charts = output.charts.len(), "Rendered dashboard");
        Ok(output)
    }

    /// The static page embedding the chart files
    pub fn index_html(
        &self,
        model: &DashboardModel,
        palette: &Palette,
        charts: &[ChartId],
    ) -> String {
        let kpis = &model.kpis;
        let top_downtime = kpis.top_downtime.map_or_else(
            || "n/a".to_string(),
            |top| format!("{} ({:.2})", top.workstation, top.mean_downtime),
        );

        let mut cards = String::new();
        for (label, value) in [
            ("Average daily output", format!("{:.2}", kpis.average_daily_output)),
            ("Rejection rate", format_percent(kpis.rejection_rate)),
            ("Top downtime", top_downtime),
            ("Overall efficiency", format_percent(kpis.overall_efficiency)),
            ("Operational days", format!("{} / {}", kpis.operational_days, kpis.days)),
            ("Accident days", kpis.accident_days.to_string()),
        ] {
            cards.push_str(&format!(
                r#"      <div class="card"><div class="label">{}</div><div class="value">{}</div></div>
"#,
                escape_html(label),
                escape_html(&value)
            ));
        }

        let mut rows = String::new();
        for stats in &model.workstations {
            rows.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
                stats.id,
                format_optional(stats.mean_occupancy, 2),
                format_optional(stats.mean_downtime, 2),
                format_percent(stats.efficiency * 100.0),
                stats.production_time_per_unit
            ));
        }

        let mut figures = String::new();
        for id in charts {
            figures.push_str(&format!(
                r#"      <figure><img src="{}" alt="{}"></figure>
"#,
                id.file_name(),
                id.as_str()
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en" class="theme-{theme}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    body {{ background: {background}; color: {text}; font-family: {font}; margin: 2rem; }}
    h1 {{ color: {accent}; }}
    .cards {{ display: flex; flex-wrap: wrap; gap: 1rem; margin-bottom: 2rem; }}
    .card {{ border: 1px solid {grid}; border-radius: 6px; padding: 1rem; min-width: 12rem; }}
    .card .label {{ font-size: 0.85rem; opacity: 0.8; }}
    .card .value {{ font-size: 1.5rem; color: {accent}; }}
    .charts {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); gap: 1rem; }}
    figure {{ margin: 0; }}
    img {{ width: 100%; }}
    table {{ border-collapse: collapse; margin-bottom: 2rem; }}
    td, th {{ border: 1px solid {grid}; padding: 0.3rem 0.8rem; text-align: right; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>{granularity} view, {days} days, generated {generated}</p>
  <section class="cards">
{cards}  </section>
  <table>
    <thead>
      <tr><th>Workstation</th><th>Occupancy</th><th>Downtime</th><th>Efficiency</th><th>Time per unit</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
  <section class="charts">
{figures}  </section>
</body>
</html>
"#,
            theme = palette.theme,
            title = escape_html(&self.title),
            background = palette.background,
            text = palette.text,
            grid = palette.grid,
            accent = palette.title,
            font = escape_html(&palette.font_family),
            granularity = model.view.granularity.label(),
            days = kpis.days,
            generated = format_timestamp(&now()),
        )
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::record_fixtures::*;
    use factory_common::{Granularity, Theme};

    fn settings() -> AggregationSettings {
        AggregationSettings::default()
    }

    #[test]
    fn test_model_follows_view() {
        let records = sample_days(60);
        let daily = DashboardModel::build(&records, ViewState::default(), &settings()).unwrap();
        let weekly = DashboardModel::build(
            &records,
            ViewState::new(Granularity::Weekly, Theme::Light),
            &settings(),
        )
        .unwrap();

        assert_eq!(daily.buckets.len(), 60);
        assert_eq!(weekly.buckets.len(), 9);
        assert_eq!(daily.kpis, weekly.kpis);
        assert_eq!(daily.intervals.len(), 3);
        assert_eq!(weekly.intervals.len(), 1);
    }

    #[test]
    fn test_model_from_cache_matches_build() {
        let records = days_with_accident(30, 12);
        let cache = CachedAggregator::new(records.clone().into());
        let view = ViewState::new(Granularity::Weekly, Theme::Dark);

        let cached = DashboardModel::from_cache(&cache, view, &settings()).unwrap();
        let built = DashboardModel::build(&records, view, &settings()).unwrap();

        assert_eq!(cached, built);
        assert_eq!(cached.accident_runs, vec![12]);
    }

    #[test]
    fn test_every_chart_specified() {
        let model = DashboardModel::build(&sample_days(10), ViewState::default(), &settings()).unwrap();
        let ids: Vec<ChartId> = model.charts(&Palette::default()).iter().map(|c| c.id).collect();
        assert_eq!(ids, ChartId::ALL.to_vec());
    }

    #[test]
    fn test_index_html() {
        let model = DashboardModel::build(&sample_week(), ViewState::default(), &settings()).unwrap();
        let renderer = DashboardRenderer::new("Line <A>", GraphConfig::default());
        let html = renderer.index_html(&model, &Palette::default(), &ChartId::ALL);

        assert!(html.contains("<title>Line &lt;A&gt;</title>"));
        assert!(html.contains(r#"<img src="rejects.svg""#));
        assert!(html.contains("Rejection rate"));
        assert!(html.contains("<td>WS5</td>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a&b "c" <d>"#), "a&amp;b &quot;c&quot; &lt;d&gt;");
    }
}
