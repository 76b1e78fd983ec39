//! # Factory Config
//!
//! Type-safe configuration management for Factory Dash.
//!
//! Configuration is read from a YAML or TOML file, completed with defaults,
//! overridden from the environment and validated before use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use schema::*;
