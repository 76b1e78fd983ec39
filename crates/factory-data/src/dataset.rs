//! The validated, immutable production dataset.

use factory_common::{check_sequence, Record, Result};
use std::sync::Arc;

/// Daily records held immutably for the lifetime of a dashboard run.
///
/// Construction checks that the records form a contiguous 1-based day
/// sequence; every consumer can rely on that afterwards. Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Dataset {
    /// Validate `records` and freeze them.
    ///
    /// Fails with [`DashError::InvalidInput`](factory_common::DashError::InvalidInput)
    /// when the sequence is empty, unsorted or has gaps.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        check_sequence(&records)?;
        Ok(Self {
            records: records.into(),
        })
    }

    /// The daily records in run order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Shared handle to the records.
    pub fn shared(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last run of the dataset.
    pub fn run_range(&self) -> (u32, u32) {
        let first = self.records.first().map_or(0, |r| r.run);
        let last = self.records.last().map_or(0, |r| r.run);
        (first, last)
    }

}

impl AsRef<[Record]> for Dataset {
    fn as_ref(&self) -> &[Record] {
        self.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_common::test_utils::record_fixtures::sample_days;

    #[test]
    fn test_valid_dataset() {
        let dataset = Dataset::new(sample_days(10)).unwrap();
        assert_eq!(dataset.len(), 10);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.run_range(), (1, 10));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Dataset::new(Vec::new()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_gap_rejected() {
        let mut records = sample_days(5);
        records.remove(2);
        assert!(Dataset::new(records).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_clones_share_records() {
        let dataset = Dataset::new(sample_days(3)).unwrap();
        let copy = dataset.clone();
        assert!(Arc::ptr_eq(&dataset.shared(), &copy.shared()));
    }
}
