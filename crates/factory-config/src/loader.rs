//! Configuration loading utilities

use crate::Config;
use factory_common::Result as DashResult;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "factory-dash.yaml";

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "FACTORY_DASH_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Name of the offending variable
        var: String,
        /// Underlying parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for factory_common::DashError {
    fn from(err: ConfigError) -> Self {
        factory_common::DashError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    ///
    /// The format follows the file extension: `.toml` is read as TOML,
    /// anything else as YAML.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(path, &content)?;
        debug!(path = %path.display(), "Parsed configuration file");

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the discovered file, or defaults when there is none
    ///
    /// Discovery order: `FACTORY_DASH_CONFIG`, then `factory-dash.yaml` in the
    /// working directory.
    pub fn load() -> DashResult<Config> {
        match Self::discover() {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Ok(Self::load_config(path)?)
            }
            None => {
                info!("No configuration file found, using defaults");
                Ok(Self::load_defaults()?)
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DashResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Defaults with environment variable overrides, validated
    pub fn load_defaults() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Path of the configuration file to use, if any
    pub fn discover() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    }

    fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Data and dashboard overrides
        if let Some(path) = lookup("FACTORY_DATA_PATH") {
            config.data.csv_path = path;
        }

        if let Some(dir) = lookup("FACTORY_OUTPUT_DIR") {
            config.dashboard.output_dir = dir;
        }

        if let Some(value) = lookup("FACTORY_GRANULARITY") {
            config.dashboard.granularity = parse_var("FACTORY_GRANULARITY", &value)?;
        }

        if let Some(value) = lookup("FACTORY_THEME") {
            config.dashboard.theme = parse_var("FACTORY_THEME", &value)?;
        }

        // Graph overrides
        if let Some(value) = lookup("GRAPH_WIDTH") {
            config.graph.width = parse_var("GRAPH_WIDTH", &value)?;
        }

        if let Some(value) = lookup("GRAPH_HEIGHT") {
            config.graph.height = parse_var("GRAPH_HEIGHT", &value)?;
        }

        // Simulation overrides
        if let Some(value) = lookup("SIM_RUNS") {
            config.simulation.runs = parse_var("SIM_RUNS", &value)?;
        }

        if let Some(value) = lookup("SIM_SEED") {
            config.simulation.seed = Some(parse_var("SIM_SEED", &value)?);
        }

        // Logging overrides
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::{Granularity, Theme};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_yaml_by_extension() {
        let file = config_file(
            "dashboard:\n  granularity: weekly\n  theme: dark\ngraph:\n  width: 1200\n",
            ".yaml",
        );
        let content = std::fs::read_to_string(file.path()).unwrap();
        let config = ConfigLoader::parse(file.path(), &content).unwrap();

        assert_eq!(config.dashboard.granularity, Granularity::Weekly);
        assert_eq!(config.dashboard.theme, Theme::Dark);
        assert_eq!(config.graph.width, 1200);
        assert_eq!(config.simulation.runs, 365);
    }

    #[test]
    fn test_parse_toml_by_extension() {
        let file = config_file(
            "[aggregation]\nshift_capacity = 4800.0\n\n[simulation]\nruns = 30\nseed = 7\n",
            ".toml",
        );
        let content = std::fs::read_to_string(file.path()).unwrap();
        let config = ConfigLoader::parse(file.path(), &content).unwrap();

        assert_eq!(config.aggregation.shift_capacity, 4800.0);
        assert_eq!(config.simulation.runs, 30);
        assert_eq!(config.simulation.seed, Some(7));
    }

    #[test]
    fn test_invalid_yaml() {
        let path = Path::new("broken.yaml");
        let result = ConfigLoader::parse(path, "graph:\n  width: [unclosed");
        assert!(matches!(result.unwrap_err(), ConfigError::YamlError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let path = Path::new("broken.toml");
        let result = ConfigLoader::parse(path, "[graph\nwidth = 1");
        assert!(matches!(result.unwrap_err(), ConfigError::TomlError(_)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("FACTORY_DATA_PATH", "runs/today.csv"),
            ("FACTORY_GRANULARITY", "monthly"),
            ("FACTORY_THEME", "dark"),
            ("GRAPH_WIDTH", "1500"),
            ("SIM_SEED", "42"),
            ("LOG_LEVEL", "debug"),
        ]);

        ConfigLoader::apply_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.data.csv_path, "runs/today.csv");
        assert_eq!(config.dashboard.granularity, Granularity::Monthly);
        assert_eq!(config.dashboard.theme, Theme::Dark);
        assert_eq!(config.graph.width, 1500);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_override_parse_error_names_variable() {
        let mut config = Config::default();
        let lookup = lookup_from(&[("GRAPH_HEIGHT", "tall")]);

        let err = ConfigLoader::apply_overrides(&mut config, lookup).unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { ref var, .. } if var == "GRAPH_HEIGHT"));
    }

    #[test]
    fn test_unknown_granularity_is_rejected() {
        let mut config = Config::default();
        let lookup = lookup_from(&[("FACTORY_GRANULARITY", "hourly")]);
        assert!(ConfigLoader::apply_overrides(&mut config, lookup).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/factory-dash.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_config_error_converts_to_dash_error() {
        let err: factory_common::DashError =
            ConfigError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).into();
        assert!(matches!(err, factory_common::DashError::Config { .. }));
    }
}
