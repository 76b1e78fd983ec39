//! The daily production record and its rejection-count sentinel.

use crate::types::WORKSTATION_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker written in place of numeric values on days stopped by an accident.
pub const ACCIDENT_MARKER: &str = "accident";

/// Rejected-unit count of a day, which is not always a number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RejectCount {
    /// A numeric count of rejected units.
    Count(f64),
    /// The day was stopped by an accident; the value must not be aggregated.
    Accident,
    /// Blank or unparseable field.
    #[default]
    Missing,
}

impl RejectCount {
    /// Interpret a raw CSV field.
    ///
    /// The accident marker is matched case-insensitively. Anything else that
    /// is not a finite number becomes [`RejectCount::Missing`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ACCIDENT_MARKER) {
            return Self::Accident;
        }
        match crate::utils::parse_metric(raw) {
            Some(value) => Self::Count(value),
            None => Self::Missing,
        }
    }

    /// The numeric count, if there is one.
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Count(value) => Some(value),
            Self::Accident | Self::Missing => None,
        }
    }

    /// Whether this is the accident sentinel.
    pub const fn is_accident(self) -> bool {
        matches!(self, Self::Accident)
    }
}

impl From<Option<f64>> for RejectCount {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Count)
    }
}

impl fmt::Display for RejectCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{value}"),
            Self::Accident => f.write_str(ACCIDENT_MARKER),
            Self::Missing => Ok(()),
        }
    }
}

/// One simulated production day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    /// 1-based day index.
    pub run: u32,
    /// Units that left the last workstation.
    pub total_completed: Option<f64>,
    /// Units rejected at the end of the line.
    pub total_rejected: RejectCount,
    /// Products that entered the line (optional column).
    pub total_products: Option<f64>,
    /// Mean time a product spent in the system (optional column).
    pub avg_waiting_time: Option<f64>,
    /// Rejected share of finished units, in percent.
    pub faulty_rate: Option<f64>,
    /// Share of supplier capacity in use, in percent (optional column).
    pub supplier_occupancy: Option<f64>,
    /// Busy share of the day per workstation, in percent.
    pub occupancy: [Option<f64>; WORKSTATION_COUNT],
    /// Accumulated repair time per workstation.
    pub downtime: [Option<f64>; WORKSTATION_COUNT],
}

impl Record {
    /// An empty record for `run` with every metric absent.
    pub fn new(run: u32) -> Self {
        Self {
            run,
            ..Self::default()
        }
    }

    /// A record for a day stopped by an accident.
    ///
    /// Every metric is absent and the rejection count carries the sentinel.
    pub fn accident(run: u32) -> Self {
        Self {
            run,
            total_rejected: RejectCount::Accident,
            ..Self::default()
        }
    }

    /// Whether the day was stopped by an accident.
    pub const fn is_accident(&self) -> bool {
        self.total_rejected.is_accident()
    }

    /// Numeric rejection count, excluding the sentinels.
    pub const fn rejected(&self) -> Option<f64> {
        self.total_rejected.value()
    }
}

/// Check that `records` form a usable day sequence.
///
/// The sequence must be non-empty, start at run 1 or later and increase by
/// exactly one from record to record.
pub fn check_sequence(records: &[Record]) -> crate::Result<()> {
    let Some(first) = records.first() else {
        return Err(crate::DashError::invalid_input("record sequence is empty"));
    };
    crate::ensure_input!(
        first.run >= 1,
        "runs are 1-based, found run {}",
        first.run
    );

    for pair in records.windows(2) {
        let (prev, next) = (pair[0].run, pair[1].run);
        crate::ensure_input!(
            next > prev,
            "runs must be sorted ascending, run {} follows run {}",
            next,
            prev
        );
        crate::ensure_input!(
            next == prev + 1,
            "runs must be contiguous, gap between run {} and run {}",
            prev,
            next
        );
    }
    Ok(())
}
