//! Scalar KPIs over the full daily record set

use crate::aggregator::DataAggregator;
use factory_common::{
    check_sequence, count_defined, mean_defined, sum_defined, Record, Result, WorkstationId,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// Default theoretical output of one operational day, in units
pub const DEFAULT_THEORETICAL_DAILY_CAPACITY: f64 = 1250.0;

/// Workstation with the highest mean downtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopDowntime {
    /// The workstation
    pub workstation: WorkstationId,
    /// Its mean downtime per day
    pub mean_downtime: f64,
}

/// Headline figures of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Records in the dataset
    pub days: usize,
    /// Records with a defined completed count
    pub operational_days: usize,
    /// Records stopped by an accident
    pub accident_days: usize,
    /// Sum of completed units
    pub total_completed: f64,
    /// Sum of rejected units, sentinels excluded
    pub total_rejected: f64,
    /// Completed units per operational day
    pub average_daily_output: f64,
    /// Rejected share of all finished units, in percent
    pub rejection_rate: f64,
    /// `None` when no workstation has downtime data
    pub top_downtime: Option<TopDowntime>,
    /// Output against theoretical capacity, in percent
    pub overall_efficiency: f64,
}

/// Computes [`KpiSummary`] values
#[derive(Debug, Clone, Copy)]
pub struct KpiCalculator {
    theoretical_daily_capacity: f64,
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_THEORETICAL_DAILY_CAPACITY)
    }
}

impl KpiCalculator {
    /// Calculator with the given theoretical daily capacity
    pub fn new(theoretical_daily_capacity: f64) -> Self {
        Self {
            theoretical_daily_capacity,
        }
    }
}

impl DataAggregator<KpiSummary> for KpiCalculator {
    fn name(&self) -> &'static str {
        "kpis"
    }

    #[instrument(skip_all, fields(days = records.len()))]
    fn aggregate(&self, records: &[Record]) -> Result<KpiSummary> {
        check_sequence(records)?;

        let completed = || records.iter().map(|r| r.total_completed);
        let total_completed = sum_defined(completed());
        let operational_days = count_defined(completed());
        let total_rejected = sum_defined(records.iter().map(Record::rejected));

        let average_daily_output = ratio(total_completed, operational_days as f64);
        let rejection_rate = ratio(total_rejected, total_completed + total_rejected) * 100.0;
        let overall_efficiency = ratio(
            total_completed,
            operational_days as f64 * self.theoretical_daily_capacity,
        ) * 100.0;

        let summary = KpiSummary {
            days: records.len(),
            operational_days,
            accident_days: records.iter().filter(|r| r.is_accident()).count(),
            total_completed,
            total_rejected,
            average_daily_output,
            rejection_rate,
            top_downtime: top_downtime(records),
            overall_efficiency,
        };

        debug!(
            operational_days,
            rejection_rate = summary.rejection_rate,
            "Computed KPIs"
        );
        Ok(summary)
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn top_downtime(records: &[Record]) -> Option<TopDowntime> {
    WorkstationId::all()
        .filter_map(|workstation| {
            let mean = mean_defined(records.iter().map(|r| r.downtime[workstation.index()]))?;
            Some(TopDowntime {
                workstation,
                mean_downtime: mean,
            })
        })
        // Strictly greater keeps the lowest index on ties
        .fold(None, |best: Option<TopDowntime>, candidate| match best {
            Some(b) if b.mean_downtime >= candidate.mean_downtime => Some(b),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::assert_approx_eq;
    use factory_common::test_utils::record_fixtures::*;
    use factory_common::RejectCount;

    #[test]
    fn test_reference_week_kpis() {
        let records = sample_week();
        let kpis = KpiCalculator::default().aggregate(&records).unwrap();

        let completed: f64 = SAMPLE_WEEK_COMPLETED.iter().sum();
        let rejected: f64 = records.iter().filter_map(Record::rejected).sum();

        assert_eq!(kpis.days, 7);
        assert_eq!(kpis.operational_days, 7);
        assert_approx_eq(kpis.average_daily_output, completed / 7.0, 1e-9);
        assert_approx_eq(
            kpis.rejection_rate,
            rejected / (completed + rejected) * 100.0,
            1e-9,
        );
        assert_approx_eq(kpis.overall_efficiency, completed / (7.0 * 1250.0) * 100.0, 1e-9);
    }

    #[test]
    fn test_accident_days_counted_but_not_rejected() {
        let records = days_with_accident(10, 2);
        let kpis = KpiCalculator::default().aggregate(&records).unwrap();

        let expected: f64 = records
            .iter()
            .filter(|r| r.run != 2)
            .filter_map(Record::rejected)
            .sum();
        assert_eq!(kpis.accident_days, 1);
        assert_approx_eq(kpis.total_rejected, expected, 1e-9);
    }

    #[test]
    fn test_top_downtime_is_last_station_in_fixtures() {
        let kpis = KpiCalculator::default().aggregate(&sample_days(5)).unwrap();
        let top = kpis.top_downtime.unwrap();
        assert_eq!(top.workstation, WorkstationId(5));
    }

    #[test]
    fn test_top_downtime_tie_prefers_lowest_index() {
        let mut record = Record::new(1);
        record.downtime = [Some(2.0), Some(4.0), Some(1.0), Some(4.0), None, Some(4.0)];
        let kpis = KpiCalculator::default().aggregate(&[record]).unwrap();

        let top = kpis.top_downtime.unwrap();
        assert_eq!(top.workstation, WorkstationId(1));
        assert_eq!(top.mean_downtime, 4.0);
    }

    #[test]
    fn test_zero_denominators() {
        let records = vec![Record::accident(1), Record::new(2)];
        let kpis = KpiCalculator::default().aggregate(&records).unwrap();

        assert_eq!(kpis.operational_days, 0);
        assert_eq!(kpis.average_daily_output, 0.0);
        assert_eq!(kpis.rejection_rate, 0.0);
        assert_eq!(kpis.overall_efficiency, 0.0);
        assert_eq!(kpis.top_downtime, None);
    }

    #[test]
    fn test_rejections_only() {
        let mut record = Record::new(1);
        record.total_rejected = RejectCount::Count(10.0);
        let kpis = KpiCalculator::default().aggregate(&[record]).unwrap();
        assert_eq!(kpis.rejection_rate, 100.0);
    }

    #[test]
    fn test_custom_capacity() {
        let kpis = KpiCalculator::new(1000.0).aggregate(&sample_week()).unwrap();
        let completed: f64 = SAMPLE_WEEK_COMPLETED.iter().sum();
        assert_approx_eq(kpis.overall_efficiency, completed / 7000.0 * 100.0, 1e-9);
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = KpiCalculator::default().aggregate(&[]).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
