//! # Factory Dash
//!
//! Command line front end: simulates production years into CSV, summarizes
//! a dataset and renders the SVG dashboard.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;
pub mod summary;

pub use app::App;
pub use cli::{Cli, Command};
pub use error::{AppError, AppResult};
pub use summary::SummaryReport;
