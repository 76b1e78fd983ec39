//! Orchestration of the subcommands.

use crate::cli::{Command, OutputFormat, RenderArgs, SimulateArgs, SummaryArgs};
use crate::error::AppResult;
use crate::summary::SummaryReport;
use factory_common::{Granularity, Theme, ViewState};
use factory_config::Config;
use factory_data::{DatasetLoader, DatasetWriter};
use factory_graphs::{CachedAggregator, DashboardModel, DashboardOutput, DashboardRenderer};
use factory_sim::Simulator;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Main application structure.
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Creates the application from a validated configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one subcommand, printing its result to stdout.
    pub async fn run(&self, command: Command) -> AppResult<()> {
        match command {
            Command::Simulate(args) => {
                let path = self.simulate(&args).await?;
                println!("Wrote {}", path.display());
            }
            Command::Summary(args) => {
                let output = self.summary(&args)?;
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(output.as_bytes())?;
                if !output.ends_with('\n') {
                    writeln!(stdout)?;
                }
            }
            Command::Render(args) => {
                for output in self.render(&args).await? {
                    println!("Wrote {}", output.index.display());
                }
            }
        }
        Ok(())
    }

    /// Simulates the configured days on a blocking task and writes the CSV.
    #[instrument(skip_all)]
    pub async fn simulate(&self, args: &SimulateArgs) -> AppResult<PathBuf> {
        let mut settings = self.config.simulation.clone();
        if let Some(runs) = args.runs {
            settings.runs = runs;
        }
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        let path = self.data_path(args.output.as_deref());

        let simulator = Simulator::new(settings)?;
        let records = tokio::task::spawn_blocking(move || simulator.run()).await??;

        DatasetWriter::write_path(&path, &records)?;
        info!(path = %path.display(), days = records.len(), "Simulation written");
        Ok(path)
    }

    /// Builds the summary of a dataset in the requested format.
    pub fn summary(&self, args: &SummaryArgs) -> AppResult<String> {
        let path = self.data_path(args.input.as_deref());
        let (dataset, report) = DatasetLoader::load_path(&path)?;
        let summary = SummaryReport::build(
            path.display().to_string(),
            &dataset,
            &report,
            &self.config.aggregation,
        )?;

        Ok(match args.format {
            OutputFormat::Text => summary.to_text(),
            OutputFormat::Json => summary.to_json()?,
        })
    }

    /// Renders the dashboard, or every view of it with `--all-views`.
    #[instrument(skip_all)]
    pub async fn render(&self, args: &RenderArgs) -> AppResult<Vec<DashboardOutput>> {
        let path = self.data_path(args.input.as_deref());
        let (dataset, _) = DatasetLoader::load_path(&path)?;
        let output_dir = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.dashboard.output_dir));

        let renderer = DashboardRenderer::new(
            self.config.dashboard.title.clone(),
            self.config.graph.clone(),
        );
        let settings = &self.config.aggregation;

        if !args.all_views {
            let view = ViewState::new(
                args.granularity.unwrap_or(self.config.dashboard.granularity),
                args.theme.unwrap_or(self.config.dashboard.theme),
            );
            let model = DashboardModel::build(dataset.records(), view, settings)?;
            return Ok(vec![renderer.render(&model, &output_dir).await?]);
        }

        // Every view shares the buckets of its granularity
        let cache = CachedAggregator::new(dataset.shared());
        let mut outputs = Vec::new();
        for granularity in Granularity::ALL {
            for theme in [Theme::Light, Theme::Dark] {
                let view = ViewState::new(granularity, theme);
                let model = DashboardModel::from_cache(&cache, view, settings)?;
                let dir = output_dir.join(view.to_string());
                outputs.push(renderer.render(&model, &dir).await?);
            }
        }
        info!(
            views = outputs.len(),
            aggregations = cache.computations(),
            "Rendered every view"
        );
        Ok(outputs)
    }

    fn data_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(|| PathBuf::from(&self.config.data.csv_path), Path::to_path_buf)
    }
}
