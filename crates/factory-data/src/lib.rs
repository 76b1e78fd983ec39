//! # Factory Data
//!
//! Reading and writing of the flat production CSV.
//!
//! Loading follows a skip-silently policy for bad numeric fields: the row is
//! kept and the field becomes absent. Only rows whose `Run` cannot be read are
//! dropped, and those are reported back to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod columns;
pub mod dataset;
pub mod loader;
pub mod writer;

pub use dataset::Dataset;
pub use loader::{DatasetLoader, LoadReport, RowIssue};
pub use writer::DatasetWriter;
