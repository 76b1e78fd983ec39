//! Test utilities and shared test helpers for Factory Dash.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the unit and integration tests of the other workspace crates.

#![allow(clippy::missing_panics_doc)]

use crate::record::{Record, RejectCount};
use crate::types::WORKSTATION_COUNT;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Hand-built records for unit and integration tests.
pub mod record_fixtures {
    use super::*;

    /// Completed units of the reference week used throughout the tests.
    pub const SAMPLE_WEEK_COMPLETED: [f64; 7] =
        [1150.0, 1160.0, 1140.0, 1155.0, 1148.0, 1162.0, 1151.0];

    /// A fully populated record with values derived from `run`.
    pub fn sample_record(run: u32, completed: f64) -> Record {
        let offset = f64::from(run % 5);
        let mut occupancy = [None; WORKSTATION_COUNT];
        let mut downtime = [None; WORKSTATION_COUNT];
        for i in 0..WORKSTATION_COUNT {
            occupancy[i] = Some(60.0 + (i as f64) * 5.0 + offset);
            downtime[i] = Some((i as f64) * 1.5 + offset);
        }

        Record {
            run,
            total_completed: Some(completed),
            total_rejected: RejectCount::Count(50.0 + offset),
            total_products: Some(completed + 60.0),
            avg_waiting_time: Some(120.0 + offset),
            faulty_rate: Some(4.0 + offset / 10.0),
            supplier_occupancy: Some(30.0 + offset),
            occupancy,
            downtime,
        }
    }

    /// The reference week: days 1 to 7 with [`SAMPLE_WEEK_COMPLETED`].
    pub fn sample_week() -> Vec<Record> {
        SAMPLE_WEEK_COMPLETED
            .iter()
            .zip(1..)
            .map(|(&completed, run)| sample_record(run, completed))
            .collect()
    }

    /// `days` contiguous records starting at run 1.
    pub fn sample_days(days: u32) -> Vec<Record> {
        (1..=days)
            .map(|run| sample_record(run, 1100.0 + f64::from(run % 13) * 7.0))
            .collect()
    }

    /// Like [`sample_days`] but `accident_run` carries the accident sentinel
    /// in its rejection count while keeping its occupancy and downtime.
    pub fn days_with_accident(days: u32, accident_run: u32) -> Vec<Record> {
        sample_days(days)
            .into_iter()
            .map(|mut record| {
                if record.run == accident_run {
                    record.total_rejected = RejectCount::Accident;
                }
                record
            })
            .collect()
    }

    /// A small CSV document with the required columns and `days` rows.
    pub fn sample_csv(days: u32) -> String {
        let mut csv = String::from("Run,TotalCompleted,TotalRejected,FaultyRate");
        for i in 0..WORKSTATION_COUNT {
            csv.push_str(&format!(",WS{i}_Occupancy"));
        }
        for i in 0..WORKSTATION_COUNT {
            csv.push_str(&format!(",WS{i}_Downtime"));
        }
        csv.push('\n');

        for record in sample_days(days) {
            csv.push_str(&format!(
                "{},{},{},{}",
                record.run,
                record.total_completed.unwrap_or_default(),
                record.total_rejected,
                record.faulty_rate.unwrap_or_default()
            ));
            for value in record.occupancy.iter().chain(record.downtime.iter()) {
                csv.push_str(&format!(",{}", value.unwrap_or_default()));
            }
            csv.push('\n');
        }
        csv
    }
}

/// Property-based testing utilities using proptest.
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for an optional percentage, absent one time in ten.
    pub fn percent_strategy() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![1 => Just(None), 9 => (0.0f64..100.0).prop_map(Some)]
    }

    /// Strategy for a rejection count, including both sentinels.
    pub fn reject_count_strategy() -> impl Strategy<Value = RejectCount> {
        prop_oneof![
            8 => (0u32..200).prop_map(|n| RejectCount::Count(f64::from(n))),
            1 => Just(RejectCount::Accident),
            1 => Just(RejectCount::Missing),
        ]
    }

    /// Strategy for the metrics of one day; `run` is assigned by [`records_strategy`].
    pub fn record_strategy() -> impl Strategy<Value = Record> {
        (
            prop_oneof![1 => Just(None), 9 => (900.0f64..1300.0).prop_map(Some)],
            reject_count_strategy(),
            percent_strategy(),
            prop::array::uniform6(percent_strategy()),
            prop::array::uniform6(prop_oneof![
                1 => Just(None),
                9 => (0.0f64..50.0).prop_map(Some)
            ]),
        )
            .prop_map(
                |(total_completed, total_rejected, faulty_rate, occupancy, downtime)| Record {
                    run: 0,
                    total_completed,
                    total_rejected,
                    faulty_rate,
                    occupancy,
                    downtime,
                    ..Record::default()
                },
            )
    }

    /// Strategy for a valid dataset: contiguous runs starting at 1.
    pub fn records_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(record_strategy(), 1..=max_len).prop_map(|records| {
            records
                .into_iter()
                .zip(1..)
                .map(|(record, run)| Record { run, ..record })
                .collect()
        })
    }
}
