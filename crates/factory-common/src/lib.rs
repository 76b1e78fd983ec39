//! # Factory Common
//!
//! Shared types, utilities, and common functionality for Factory Dash.
//!
//! This crate provides the production record model, the view state, the
//! workspace error type and the logging bootstrap used by every other crate
//! in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod logging;
pub mod macros;
pub mod record;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{DashError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use record::{check_sequence, Record, RejectCount, ACCIDENT_MARKER};
pub use types::*;
pub use utils::*;
