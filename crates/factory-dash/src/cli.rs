//! Command line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use factory_common::{Granularity, Theme};
use std::path::PathBuf;

/// Production dashboard and simulator for the six-workstation line
#[derive(Debug, Parser)]
#[command(name = "factory-dash", version, about)]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "FACTORY_DASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive, overriding the configuration
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate production days and write them as CSV
    Simulate(SimulateArgs),
    /// Print the headline figures of a dataset
    Summary(SummaryArgs),
    /// Render the SVG dashboard of a dataset
    Render(RenderArgs),
}

/// Arguments of `simulate`.
#[derive(Debug, Clone, Default, Args)]
pub struct SimulateArgs {
    /// Number of days to simulate
    #[arg(short, long)]
    pub runs: Option<u32>,

    /// Base seed; day `n` is simulated with `seed + n`
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// CSV file to write, defaults to the configured dataset path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `summary`.
#[derive(Debug, Clone, Default, Args)]
pub struct SummaryArgs {
    /// CSV file to read, defaults to the configured dataset path
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments of `render`.
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// CSV file to read, defaults to the configured dataset path
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Aggregation level (daily, weekly, monthly)
    #[arg(short, long, value_parser = parse_granularity)]
    pub granularity: Option<Granularity>,

    /// Colour theme (light, dark)
    #[arg(short, long, value_parser = parse_theme)]
    pub theme: Option<Theme>,

    /// Output directory, defaults to the configured one
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render every granularity and theme into `<granularity>-<theme>` subdirectories
    #[arg(long, conflicts_with_all = ["granularity", "theme"])]
    pub all_views: bool,
}

/// Format of the `summary` output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

fn parse_granularity(raw: &str) -> Result<Granularity, String> {
    raw.parse().map_err(|e: factory_common::DashError| e.to_string())
}

fn parse_theme(raw: &str) -> Result<Theme, String> {
    raw.parse().map_err(|e: factory_common::DashError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from([
            "factory-dash",
            "render",
            "--granularity",
            "weekly",
            "--theme",
            "dark",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.granularity, Some(Granularity::Weekly));
        assert_eq!(args.theme, Some(Theme::Dark));
        assert!(!args.all_views);
    }

    #[test]
    fn test_unknown_granularity_rejected() {
        let result = Cli::try_parse_from(["factory-dash", "render", "-g", "hourly"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_all_views_conflicts_with_theme() {
        let result = Cli::try_parse_from(["factory-dash", "render", "--all-views", "-t", "dark"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_defaults_to_text() {
        let cli = Cli::try_parse_from(["factory-dash", "summary", "-f", "json"]).unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.format, OutputFormat::Json);

        let cli = Cli::try_parse_from(["factory-dash", "summary"]).unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.format, OutputFormat::Text);
    }
}
