//! Rejection counts over fixed run intervals

use crate::aggregator::Bucket;
use factory_common::{DashError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default interval width in runs
pub const DEFAULT_INTERVAL_WIDTH: u32 = 25;

/// Rejections of the buckets whose run falls in `[start, end]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionInterval {
    /// First run of the interval
    pub start: u32,
    /// Last run of the interval, also its label
    pub end: u32,
    /// Sum of rejected units
    pub total_rejected: f64,
    /// Mean faulty rate of the contributing buckets
    pub mean_faulty_rate: Option<f64>,
    /// Contributing buckets
    pub count: usize,
}

impl RejectionInterval {
    /// Axis label of the interval
    pub fn label(&self) -> String {
        self.end.to_string()
    }
}

#[derive(Default)]
struct Accumulator {
    rejected: f64,
    faulty_sum: f64,
    faulty_count: usize,
    count: usize,
}

/// Group `buckets` into non-overlapping intervals of `width` runs.
///
/// Buckets with a sentinel rejection count do not contribute, and
/// intervals without contributing buckets are dropped.
pub fn rejection_intervals(buckets: &[Bucket], width: u32) -> Result<Vec<RejectionInterval>> {
    if width == 0 {
        return Err(DashError::invalid_input("rejection interval width must be positive"));
    }

    let mut groups: BTreeMap<u32, Accumulator> = BTreeMap::new();
    for bucket in buckets {
        let Some(rejected) = bucket.rejected() else {
            continue;
        };
        let acc = groups.entry(bucket.run.saturating_sub(1) / width).or_default();
        acc.rejected += rejected;
        acc.count += 1;
        if let Some(rate) = bucket.faulty_rate {
            acc.faulty_sum += rate;
            acc.faulty_count += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(index, acc)| {
            // `index * width` never exceeds `run - 1`; only the end may pass u32::MAX
            let first = index * width;
            RejectionInterval {
                start: first + 1,
                end: first.saturating_add(width),
                total_rejected: acc.rejected,
                mean_faulty_rate: (acc.faulty_count > 0)
                    .then(|| acc.faulty_sum / acc.faulty_count as f64),
                count: acc.count,
            }
        })
        .collect())
}
