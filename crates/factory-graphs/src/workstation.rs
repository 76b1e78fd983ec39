//! Per-workstation statistics

use crate::aggregator::DataAggregator;
use factory_common::{check_sequence, mean_defined, Record, Result, WorkstationId};
use serde::Serialize;
use tracing::{debug, instrument};

/// Default units of work one workstation can perform per day
pub const DEFAULT_SHIFT_CAPACITY: f64 = 5000.0;

/// Summary of one workstation over the daily records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkstationStats {
    /// The workstation
    pub id: WorkstationId,
    /// Mean occupancy in percent, `None` without data
    pub mean_occupancy: Option<f64>,
    /// Mean downtime per day, `None` without data
    pub mean_downtime: Option<f64>,
    /// Busy share of busy plus down time, in `[0, 1]`
    pub efficiency: f64,
    /// Mean busy time per completed unit
    pub production_time_per_unit: f64,
}

/// Computes [`WorkstationStats`] for every workstation
#[derive(Debug, Clone, Copy)]
pub struct WorkstationAnalyzer {
    shift_capacity: f64,
}

impl Default for WorkstationAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_SHIFT_CAPACITY)
    }
}

impl WorkstationAnalyzer {
    /// Analyzer using `shift_capacity` as the daily time budget
    pub fn new(shift_capacity: f64) -> Self {
        Self { shift_capacity }
    }

    fn busy_time(&self, occupancy: f64) -> f64 {
        occupancy / 100.0 * self.shift_capacity
    }

    /// `busy / (busy + down)`, 0 when both are 0
    pub fn efficiency(&self, records: &[Record], id: WorkstationId) -> f64 {
        let i = id.index();
        let busy: f64 = records
            .iter()
            .filter_map(|r| r.occupancy[i])
            .map(|o| self.busy_time(o))
            .sum();
        let down: f64 = records.iter().filter_map(|r| r.downtime[i]).sum();

        let total = busy + down;
        if total > 0.0 {
            busy / total
        } else {
            0.0
        }
    }

    /// Mean busy time per completed unit over days that produced something
    pub fn production_time_per_unit(&self, records: &[Record], id: WorkstationId) -> f64 {
        let i = id.index();
        let per_day = records.iter().map(|r| {
            let completed = r.total_completed.filter(|&c| c > 0.0)?;
            let occupancy = r.occupancy[i]?;
            Some(self.busy_time(occupancy) / completed)
        });
        mean_defined(per_day).unwrap_or(0.0)
    }

    fn stats(&self, records: &[Record], id: WorkstationId) -> WorkstationStats {
        let i = id.index();
        WorkstationStats {
            id,
            mean_occupancy: mean_defined(records.iter().map(|r| r.occupancy[i])),
            mean_downtime: mean_defined(records.iter().map(|r| r.downtime[i])),
            efficiency: self.efficiency(records, id),
            production_time_per_unit: self.production_time_per_unit(records, id),
        }
    }
}

impl DataAggregator<Vec<WorkstationStats>> for WorkstationAnalyzer {
    fn name(&self) -> &'static str {
        "workstations"
    }

    #[instrument(skip_all, fields(days = records.len()))]
    fn aggregate(&self, records: &[Record]) -> Result<Vec<WorkstationStats>> {
        check_sequence(records)?;
        let stats: Vec<_> = WorkstationId::all()
            .map(|id| self.stats(records, id))
            .collect();
        debug!(workstations = stats.len(), "Computed workstation statistics");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::assert_approx_eq;
    use factory_common::test_utils::record_fixtures::*;

    #[test]
    fn test_efficiency_without_activity_is_zero() {
        let mut record = Record::new(1);
        record.occupancy[2] = Some(0.0);
        record.downtime[2] = Some(0.0);

        let analyzer = WorkstationAnalyzer::default();
        assert_eq!(analyzer.efficiency(&[record.clone()], WorkstationId(2)), 0.0);
        assert_eq!(analyzer.efficiency(&[record], WorkstationId(3)), 0.0);
    }

    #[test]
    fn test_efficiency_formula() {
        let mut record = Record::new(1);
        record.occupancy[0] = Some(50.0);
        record.downtime[0] = Some(500.0);

        // busy = 0.5 * 5000 = 2500
        let efficiency = WorkstationAnalyzer::default().efficiency(&[record], WorkstationId(0));
        assert_approx_eq(efficiency, 2500.0 / 3000.0, 1e-12);
    }

    #[test]
    fn test_production_time_per_unit() {
        let mut first = Record::new(1);
        first.total_completed = Some(1000.0);
        first.occupancy[1] = Some(80.0);
        let mut idle = Record::new(2);
        idle.total_completed = Some(0.0);
        idle.occupancy[1] = Some(99.0);
        let mut unknown = Record::new(3);
        unknown.total_completed = Some(1000.0);

        let analyzer = WorkstationAnalyzer::default();
        let value = analyzer.production_time_per_unit(&[first, idle, unknown], WorkstationId(1));
        assert_approx_eq(value, 4.0, 1e-12);
    }

    #[test]
    fn test_production_time_without_qualifying_days() {
        let analyzer = WorkstationAnalyzer::default();
        let value = analyzer.production_time_per_unit(&[Record::accident(1)], WorkstationId(0));
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_accident_day_still_counts_for_stations() {
        let records = days_with_accident(7, 4);
        let stats = WorkstationAnalyzer::default().aggregate(&records).unwrap();

        let expected = records.iter().filter_map(|r| r.occupancy[3]).sum::<f64>() / 7.0;
        assert_eq!(stats.len(), 6);
        assert_approx_eq(stats[3].mean_occupancy.unwrap(), expected, 1e-9);
        assert!(stats.iter().all(|s| (0.0..=1.0).contains(&s.efficiency)));
    }

    #[test]
    fn test_custom_shift_capacity() {
        let mut record = Record::new(1);
        record.total_completed = Some(100.0);
        record.occupancy[0] = Some(50.0);

        let value =
            WorkstationAnalyzer::new(1000.0).production_time_per_unit(&[record], WorkstationId(0));
        assert_approx_eq(value, 5.0, 1e-12);
    }
}
