//! Default values for every configuration section.

use crate::schema::{
    AggregationSettings, DashboardConfig, DataConfig, GraphConfig, LoggingSettings,
    SimulationConfig, StationConfig,
};
use factory_common::{Granularity, LogFormat, Theme};

/// Default location of the production dataset.
pub const DEFAULT_CSV_PATH: &str = "data/simulation_data.csv";

/// Default directory of the generated dashboard.
pub const DEFAULT_OUTPUT_DIR: &str = "dashboard";

/// Failure probability of each workstation, by index.
pub const DEFAULT_FAILURE_PROBABILITIES: [f64; 6] = [0.02, 0.01, 0.05, 0.15, 0.07, 0.06];

/// Mean repair time shared by all workstations.
pub const DEFAULT_REPAIR_MEAN: f64 = 3.0;

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Factory Production Dashboard".to_string(),
            granularity: Granularity::Daily,
            theme: Theme::Light,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 500,
            font_family: "sans-serif".to_string(),
            title_font_size: 20,
            label_font_size: 12,
            show_grid: true,
            title_color: "#007bff".to_string(),
            line_color: "#4682b4".to_string(),
            bar_color: "#007bff".to_string(),
            production_time_color: "#28a745".to_string(),
            reject_color: "#e15759".to_string(),
        }
    }
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            shift_capacity: 5000.0,
            theoretical_daily_capacity: 1250.0,
            rejection_interval: 25,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: 365,
            sim_time: 5000.0,
            arrival_interval: 0.5,
            processing_mean: 4.0,
            processing_std_dev: 1.0,
            resupply_mean: 2.0,
            resupply_std_dev: 0.5,
            bin_capacity: 25,
            supplier_count: 3,
            failure_check_interval: 5,
            reject_probability: 0.05,
            accident_check_interval: 100.0,
            accident_probability: 0.0001,
            stations: DEFAULT_FAILURE_PROBABILITIES
                .iter()
                .map(|&failure_probability| StationConfig {
                    failure_probability,
                    repair_mean: DEFAULT_REPAIR_MEAN,
                })
                .collect(),
            route: vec![vec![0], vec![1], vec![2], vec![3, 4], vec![5]],
            seed: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
            include_spans: false,
        }
    }
}
