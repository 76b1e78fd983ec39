//! Configuration schema definitions using serde with validation attributes.

use factory_common::{Granularity, LogFormat, LoggingConfig, Theme, WORKSTATION_COUNT};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Main configuration structure for Factory Dash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Input dataset location.
    #[validate]
    pub data: DataConfig,

    /// Dashboard output and initial view.
    #[validate]
    pub dashboard: DashboardConfig,

    /// Chart rendering settings.
    #[validate]
    pub graph: GraphConfig,

    /// Constants used by the KPI and workstation computations.
    #[validate]
    pub aggregation: AggregationSettings,

    /// Production line simulator parameters.
    #[validate]
    pub simulation: SimulationConfig,

    /// Logging configuration.
    #[validate]
    pub logging: LoggingSettings,
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the production CSV, read by the dashboard and written by the simulator.
    #[validate(length(min = 1, message = "CSV path cannot be empty"))]
    #[validate(custom(
        function = "crate::validation::validate_file_path",
        message = "CSV path contains invalid characters"
    ))]
    pub csv_path: String,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Page title of the generated dashboard.
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    /// Granularity rendered when none is given on the command line.
    pub granularity: Granularity,

    /// Theme rendered when none is given on the command line.
    pub theme: Theme,

    /// Directory receiving the SVG charts and `index.html`.
    #[validate(length(min = 1, message = "Output directory cannot be empty"))]
    #[validate(custom(
        function = "crate::validation::validate_file_path",
        message = "Output directory contains invalid characters"
    ))]
    pub output_dir: String,
}

/// Graph rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Chart width in pixels
    #[validate(range(min = 200, max = 4000, message = "Width must be between 200 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 150, max = 4000, message = "Height must be between 150 and 4000 pixels"))]
    pub height: u32,

    /// Font family for titles and labels
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size of chart titles
    #[validate(range(min = 8, max = 72, message = "Title font size must be between 8 and 72"))]
    pub title_font_size: u32,

    /// Font size of axis and bar labels
    #[validate(range(min = 6, max = 48, message = "Label font size must be between 6 and 48"))]
    pub label_font_size: u32,

    /// Whether to draw grid lines
    pub show_grid: bool,

    /// Colour of chart titles (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Title color must be valid hex color"
    ))]
    pub title_color: String,

    /// Colour of production lines (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Line color must be valid hex color"
    ))]
    pub line_color: String,

    /// Colour of occupancy, downtime and efficiency bars (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Bar color must be valid hex color"
    ))]
    pub bar_color: String,

    /// Colour of production time bars (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Production time color must be valid hex color"
    ))]
    pub production_time_color: String,

    /// Colour of reject bars and lines (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Reject color must be valid hex color"
    ))]
    pub reject_color: String,
}

/// Constants of the KPI and workstation computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AggregationSettings {
    /// Time units of one production day, used to turn occupancy into busy time.
    #[validate(range(min = 1.0, message = "Shift capacity must be positive"))]
    pub shift_capacity: f64,

    /// Units the line could produce in a perfect day.
    #[validate(range(min = 1.0, message = "Theoretical daily capacity must be positive"))]
    pub theoretical_daily_capacity: f64,

    /// Width in runs of the rejection summary intervals.
    #[validate(range(min = 1, max = 1000, message = "Rejection interval must be between 1 and 1000"))]
    pub rejection_interval: u32,
}

/// Failure behaviour of one workstation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationConfig {
    /// Probability of a failure at each failure check.
    #[validate(range(min = 0.0, max = 1.0, message = "Failure probability must be between 0 and 1"))]
    pub failure_probability: f64,

    /// Mean of the exponentially distributed repair time.
    #[validate(range(min = 0.0, message = "Repair mean cannot be negative"))]
    pub repair_mean: f64,
}

/// Production line simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of simulated days.
    #[validate(range(min = 1, max = 100000, message = "Runs must be between 1 and 100000"))]
    pub runs: u32,

    /// Length of one simulated day in time units.
    #[validate(range(min = 1.0, message = "Simulation time must be positive"))]
    pub sim_time: f64,

    /// Time between two product arrivals.
    #[validate(range(min = 0.001, message = "Arrival interval must be positive"))]
    pub arrival_interval: f64,

    /// Mean processing time at a workstation.
    #[validate(range(min = 0.0))]
    pub processing_mean: f64,

    /// Standard deviation of the processing time.
    #[validate(range(min = 0.0))]
    pub processing_std_dev: f64,

    /// Mean duration of a bin resupply.
    #[validate(range(min = 0.0))]
    pub resupply_mean: f64,

    /// Standard deviation of the resupply duration.
    #[validate(range(min = 0.0))]
    pub resupply_std_dev: f64,

    /// Parts held by a full workstation bin.
    #[validate(range(min = 1, max = 10000, message = "Bin capacity must be between 1 and 10000"))]
    pub bin_capacity: u32,

    /// Number of suppliers shared by all bins.
    #[validate(range(min = 1, max = 100, message = "Supplier count must be between 1 and 100"))]
    pub supplier_count: u32,

    /// Products processed between two failure checks of a workstation.
    #[validate(range(min = 1, max = 10000))]
    pub failure_check_interval: u32,

    /// Probability that a finished product is rejected.
    #[validate(range(min = 0.0, max = 1.0, message = "Reject probability must be between 0 and 1"))]
    pub reject_probability: f64,

    /// Time between two accident checks.
    #[validate(range(min = 0.001, message = "Accident check interval must be positive"))]
    pub accident_check_interval: f64,

    /// Probability of an accident at each check.
    #[validate(range(min = 0.0, max = 1.0, message = "Accident probability must be between 0 and 1"))]
    pub accident_probability: f64,

    /// Failure behaviour per workstation, one entry per workstation.
    pub stations: Vec<StationConfig>,

    /// Stages of the route; a product visits one station of every stage,
    /// picking uniformly when a stage lists several.
    pub route: Vec<Vec<usize>>,

    /// Base seed for reproducible runs; day `n` uses `seed + n`.
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to log span open and close events
    pub include_spans: bool,
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.simulation.validate_line()?;
        Ok(())
    }
}

impl SimulationConfig {
    /// Checks that the station table and route describe the six-station line.
    pub fn validate_line(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.stations.len() != WORKSTATION_COUNT {
            errors.add(
                "stations",
                crate::validation::error_with_message(
                    "station_count",
                    format!("Exactly {WORKSTATION_COUNT} stations are required"),
                ),
            );
        }

        for station in &self.stations {
            if let Err(station_errors) = station.validate() {
                for (_, field_errors) in station_errors.field_errors() {
                    for err in field_errors {
                        errors.add("stations", err.clone());
                    }
                }
            }
        }

        if let Err(err) = crate::validation::validate_route(&self.route) {
            errors.add("route", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format,
            file_path: settings.file.clone(),
            include_spans: settings.include_spans,
            include_targets: true,
        }
    }
}
