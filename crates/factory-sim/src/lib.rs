//! # Factory Sim
//!
//! Discrete-event simulation of the six-workstation production line. Each
//! simulated day becomes one [`Record`](factory_common::Record) of the
//! dataset the dashboard reads.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod engine;
pub mod event;
pub mod runner;
pub mod station;

pub use engine::{DayOutcome, DaySimulation};
pub use event::{Event, EventQueue};
pub use runner::Simulator;
pub use station::{Station, SupplierPool};
