//! Time bucketing of daily production records
//!
//! One parameterized aggregator folds contiguous chunks of days into
//! [`Bucket`]s. Which reduction applies to which field is declared in an
//! [`AggregationPolicy`] rather than hard-coded per chart.

use factory_common::{
    check_sequence, Granularity, Record, RejectCount, Result, WORKSTATION_COUNT,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Trait for turning the daily records into one kind of chart input
pub trait DataAggregator<T> {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Process the daily records and return the aggregated data
    fn aggregate(&self, records: &[Record]) -> Result<T>;
}

/// A numeric field shared by records and buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    /// Completed units
    TotalCompleted,
    /// Rejected units, sentinels excluded
    TotalRejected,
    /// Products that entered the line
    TotalProducts,
    /// Mean waiting time
    AvgWaitingTime,
    /// Rejected share in percent
    FaultyRate,
    /// Supplier occupancy in percent
    SupplierOccupancy,
    /// Occupancy of one workstation
    Occupancy(usize),
    /// Downtime of one workstation
    Downtime(usize),
}

impl Field {
    /// Every field, workstation fields in index order
    pub fn all() -> Vec<Self> {
        let mut fields = vec![
            Self::TotalCompleted,
            Self::TotalRejected,
            Self::TotalProducts,
            Self::AvgWaitingTime,
            Self::FaultyRate,
            Self::SupplierOccupancy,
        ];
        fields.extend((0..WORKSTATION_COUNT).map(Self::Occupancy));
        fields.extend((0..WORKSTATION_COUNT).map(Self::Downtime));
        fields
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalCompleted => f.write_str("total_completed"),
            Self::TotalRejected => f.write_str("total_rejected"),
            Self::TotalProducts => f.write_str("total_products"),
            Self::AvgWaitingTime => f.write_str("avg_waiting_time"),
            Self::FaultyRate => f.write_str("faulty_rate"),
            Self::SupplierOccupancy => f.write_str("supplier_occupancy"),
            Self::Occupancy(i) => write!(f, "ws{i}_occupancy"),
            Self::Downtime(i) => write!(f, "ws{i}_downtime"),
        }
    }
}

/// Read access to the numeric fields of a record or bucket
pub trait Metrics {
    /// Value of `field`, `None` when absent or a sentinel
    fn metric(&self, field: Field) -> Option<f64>;
}

impl Metrics for Record {
    fn metric(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalCompleted => self.total_completed,
            Field::TotalRejected => self.rejected(),
            Field::TotalProducts => self.total_products,
            Field::AvgWaitingTime => self.avg_waiting_time,
            Field::FaultyRate => self.faulty_rate,
            Field::SupplierOccupancy => self.supplier_occupancy,
            Field::Occupancy(i) => self.occupancy.get(i).copied().flatten(),
            Field::Downtime(i) => self.downtime.get(i).copied().flatten(),
        }
    }
}

/// Custom reduction over the defined values of a chunk
pub type ReduceFn = Arc<dyn Fn(&[f64]) -> Option<f64> + Send + Sync>;

/// How the defined values of one field are folded into a bucket value
#[derive(Clone)]
pub enum Reduction {
    /// Arithmetic mean, `None` without values
    Mean,
    /// Sum, `0` without values
    Sum,
    /// Smallest value, `None` without values
    Min,
    /// Largest value, `None` without values
    Max,
    /// Caller supplied fold
    Custom(ReduceFn),
}

impl Reduction {
    /// Wrap a closure as a custom reduction
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> Option<f64> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Fold `values`, which hold only defined, non-sentinel values
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Mean => {
                (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
            }
            Self::Sum => Some(values.iter().sum()),
            Self::Min => values.iter().copied().reduce(f64::min),
            Self::Max => values.iter().copied().reduce(f64::max),
            Self::Custom(f) => f(values),
        }
    }
}

impl fmt::Debug for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => f.write_str("Mean"),
            Self::Sum => f.write_str("Sum"),
            Self::Min => f.write_str("Min"),
            Self::Max => f.write_str("Max"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-field reductions applied when folding days into a bucket
#[derive(Debug, Clone)]
pub struct AggregationPolicy {
    reductions: HashMap<Field, Reduction>,
}

impl Default for AggregationPolicy {
    /// Means for levels and rates, sums for counts and accumulated times
    fn default() -> Self {
        let reductions = Field::all()
            .into_iter()
            .map(|field| {
                let reduction = match field {
                    Field::TotalRejected | Field::Downtime(_) => Reduction::Sum,
                    _ => Reduction::Mean,
                };
                (field, reduction)
            })
            .collect();
        Self { reductions }
    }
}

impl AggregationPolicy {
    /// Replace the reduction of one field
    #[must_use]
    pub fn with(mut self, field: Field, reduction: Reduction) -> Self {
        self.reductions.insert(field, reduction);
        self
    }

    /// Reduction applied to `field`
    pub fn reduction(&self, field: Field) -> &Reduction {
        self.reductions.get(&field).unwrap_or(&Reduction::Mean)
    }

    fn apply(&self, field: Field, chunk: &[Record]) -> Option<f64> {
        let values: Vec<f64> = chunk.iter().filter_map(|r| r.metric(field)).collect();
        self.reduction(field).reduce(&values)
    }
}

/// A day, or the aggregate of a contiguous chunk of days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// 1-based bucket index; the day number for daily buckets
    pub run: u32,
    /// Run of the first day in the bucket
    pub first_run: u32,
    /// Number of days in the bucket
    pub days: usize,
    /// Completed units
    pub total_completed: Option<f64>,
    /// Rejected units; daily buckets keep the sentinels
    pub total_rejected: RejectCount,
    /// Products that entered the line
    pub total_products: Option<f64>,
    /// Mean waiting time
    pub avg_waiting_time: Option<f64>,
    /// Rejected share in percent
    pub faulty_rate: Option<f64>,
    /// Supplier occupancy in percent
    pub supplier_occupancy: Option<f64>,
    /// Occupancy per workstation
    pub occupancy: [Option<f64>; WORKSTATION_COUNT],
    /// Downtime per workstation
    pub downtime: [Option<f64>; WORKSTATION_COUNT],
}

impl Bucket {
    /// The bucket as a record with the same values
    pub fn to_record(&self) -> Record {
        Record {
            run: self.run,
            total_completed: self.total_completed,
            total_rejected: self.total_rejected,
            total_products: self.total_products,
            avg_waiting_time: self.avg_waiting_time,
            faulty_rate: self.faulty_rate,
            supplier_occupancy: self.supplier_occupancy,
            occupancy: self.occupancy,
            downtime: self.downtime,
        }
    }

    /// Run of the last day in the bucket
    pub fn last_run(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let span = self.days.saturating_sub(1) as u32;
        self.first_run + span
    }

    /// Numeric rejection count, excluding the sentinels
    pub fn rejected(&self) -> Option<f64> {
        self.total_rejected.value()
    }

    fn from_chunk(index: usize, chunk: &[Record], policy: &AggregationPolicy) -> Self {
        let value = |field| policy.apply(field, chunk);
        #[allow(clippy::cast_possible_truncation)]
        let run = index as u32 + 1;

        Self {
            run,
            first_run: chunk.first().map_or(run, |r| r.run),
            days: chunk.len(),
            total_completed: value(Field::TotalCompleted),
            total_rejected: RejectCount::from(value(Field::TotalRejected)),
            total_products: value(Field::TotalProducts),
            avg_waiting_time: value(Field::AvgWaitingTime),
            faulty_rate: value(Field::FaultyRate),
            supplier_occupancy: value(Field::SupplierOccupancy),
            occupancy: std::array::from_fn(|i| value(Field::Occupancy(i))),
            downtime: std::array::from_fn(|i| value(Field::Downtime(i))),
        }
    }
}

impl From<&Record> for Bucket {
    fn from(record: &Record) -> Self {
        Self {
            run: record.run,
            first_run: record.run,
            days: 1,
            total_completed: record.total_completed,
            total_rejected: record.total_rejected,
            total_products: record.total_products,
            avg_waiting_time: record.avg_waiting_time,
            faulty_rate: record.faulty_rate,
            supplier_occupancy: record.supplier_occupancy,
            occupancy: record.occupancy,
            downtime: record.downtime,
        }
    }
}

impl Metrics for Bucket {
    fn metric(&self, field: Field) -> Option<f64> {
        match field {
            Field::TotalCompleted => self.total_completed,
            Field::TotalRejected => self.rejected(),
            Field::TotalProducts => self.total_products,
            Field::AvgWaitingTime => self.avg_waiting_time,
            Field::FaultyRate => self.faulty_rate,
            Field::SupplierOccupancy => self.supplier_occupancy,
            Field::Occupancy(i) => self.occupancy.get(i).copied().flatten(),
            Field::Downtime(i) => self.downtime.get(i).copied().flatten(),
        }
    }
}

/// Folds daily records into buckets of one granularity
#[derive(Debug, Clone, Default)]
pub struct BucketAggregator {
    granularity: Granularity,
    policy: AggregationPolicy,
}

impl BucketAggregator {
    /// Aggregator with the default policy
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            policy: AggregationPolicy::default(),
        }
    }

    /// Aggregator with a custom policy
    pub fn with_policy(granularity: Granularity, policy: AggregationPolicy) -> Self {
        Self {
            granularity,
            policy,
        }
    }

    /// Granularity this aggregator produces
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Policy this aggregator applies
    pub fn policy(&self) -> &AggregationPolicy {
        &self.policy
    }
}

impl DataAggregator<Vec<Bucket>> for BucketAggregator {
    fn name(&self) -> &'static str {
        "buckets"
    }

    #[instrument(skip(self, records), fields(granularity = %self.granularity, days = records.len()))]
    fn aggregate(&self, records: &[Record]) -> Result<Vec<Bucket>> {
        check_sequence(records)?;

        let buckets: Vec<Bucket> = match self.granularity {
            Granularity::Daily => records.iter().map(Bucket::from).collect(),
            granularity => records
                .chunks(granularity.group_size())
                .enumerate()
                .map(|(index, chunk)| Bucket::from_chunk(index, chunk, &self.policy))
                .collect(),
        };

        debug!(buckets = buckets.len(), "Aggregated production buckets");
        Ok(buckets)
    }
}

/// Aggregate `records` at `granularity` with the default policy
pub fn aggregate(records: &[Record], granularity: Granularity) -> Result<Vec<Bucket>> {
    BucketAggregator::new(granularity).aggregate(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::assert_approx_eq;
    use factory_common::test_utils::record_fixtures::*;

    #[test]
    fn test_daily_is_identity() {
        let records = sample_days(10);
        let buckets = aggregate(&records, Granularity::Daily).unwrap();

        assert_eq!(buckets.len(), records.len());
        for (bucket, record) in buckets.iter().zip(&records) {
            assert_eq!(bucket.days, 1);
            assert_eq!(&bucket.to_record(), record);
        }
    }

    #[test]
    fn test_reference_week() {
        let buckets = aggregate(&sample_week(), Granularity::Weekly).unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].run, 1);
        assert_eq!(buckets[0].days, 7);
        assert_approx_eq(buckets[0].total_completed.unwrap(), 1152.29, 0.01);
    }

    #[test]
    fn test_trailing_partial_bucket() {
        let buckets = aggregate(&sample_days(65), Granularity::Monthly).unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].run, 3);
        assert_eq!(buckets[2].first_run, 61);
        assert_eq!(buckets[2].days, 5);
        assert_eq!(buckets[2].last_run(), 65);
    }

    #[test]
    fn test_accident_excluded_from_rejections_only() {
        let records = days_with_accident(7, 3);
        let bucket = &aggregate(&records, Granularity::Weekly).unwrap()[0];

        let expected_rejected: f64 = records.iter().filter_map(Record::rejected).sum();
        assert_eq!(bucket.rejected(), Some(expected_rejected));

        let expected_occupancy =
            records.iter().filter_map(|r| r.occupancy[0]).sum::<f64>() / 7.0;
        assert_approx_eq(bucket.occupancy[0].unwrap(), expected_occupancy, 1e-9);

        let expected_downtime: f64 = records.iter().filter_map(|r| r.downtime[4]).sum();
        assert_approx_eq(bucket.downtime[4].unwrap(), expected_downtime, 1e-9);
    }

    #[test]
    fn test_all_sentinel_chunk_sums_to_zero() {
        let records: Vec<Record> = (1..=7).map(Record::accident).collect();
        let bucket = &aggregate(&records, Granularity::Weekly).unwrap()[0];

        assert_eq!(bucket.total_rejected, RejectCount::Count(0.0));
        assert_eq!(bucket.total_completed, None);
        assert_eq!(bucket.faulty_rate, None);
    }

    #[test]
    fn test_absent_values_ignored_by_mean() {
        let mut records = sample_week();
        records[0].total_completed = None;
        let bucket = &aggregate(&records, Granularity::Weekly).unwrap()[0];

        let expected = SAMPLE_WEEK_COMPLETED[1..].iter().sum::<f64>() / 6.0;
        assert_approx_eq(bucket.total_completed.unwrap(), expected, 1e-9);
    }

    #[test]
    fn test_custom_policy() {
        let policy = AggregationPolicy::default()
            .with(Field::TotalCompleted, Reduction::Max)
            .with(
                Field::FaultyRate,
                Reduction::custom(|values| values.last().copied()),
            );
        let aggregator = BucketAggregator::with_policy(Granularity::Weekly, policy);
        let records = sample_week();
        let bucket = &aggregator.aggregate(&records).unwrap()[0];

        assert_eq!(bucket.total_completed, Some(1162.0));
        assert_eq!(bucket.faulty_rate, records[6].faulty_rate);
    }

    #[test]
    fn test_invalid_input() {
        assert!(aggregate(&[], Granularity::Weekly).unwrap_err().is_invalid_input());

        let mut records = sample_days(4);
        records.swap(1, 2);
        assert!(aggregate(&records, Granularity::Daily).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_reductions() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(Reduction::Mean.reduce(&values), Some(2.0));
        assert_eq!(Reduction::Sum.reduce(&values), Some(6.0));
        assert_eq!(Reduction::Min.reduce(&values), Some(1.0));
        assert_eq!(Reduction::Max.reduce(&values), Some(3.0));

        assert_eq!(Reduction::Mean.reduce(&[]), None);
        assert_eq!(Reduction::Sum.reduce(&[]), Some(0.0));
        assert_eq!(Reduction::Max.reduce(&[]), None);
    }

    #[test]
    fn test_default_policy() {
        let policy = AggregationPolicy::default();
        assert!(matches!(policy.reduction(Field::TotalRejected), Reduction::Sum));
        assert!(matches!(policy.reduction(Field::Downtime(3)), Reduction::Sum));
        assert!(matches!(policy.reduction(Field::Occupancy(3)), Reduction::Mean));
        assert!(matches!(policy.reduction(Field::FaultyRate), Reduction::Mean));
    }
}
