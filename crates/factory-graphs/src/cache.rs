//! Memoized bucket aggregation for one dataset
//!
//! Switching the theme re-renders charts but leaves the buckets untouched, so
//! buckets are cached per granularity for the lifetime of the dataset.

use crate::aggregator::{AggregationPolicy, Bucket, BucketAggregator, DataAggregator};
use factory_common::{Granularity, Record, Result};
use moka::sync::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Bucket aggregation with a cache keyed by granularity
pub struct CachedAggregator {
    records: Arc<[Record]>,
    policy: AggregationPolicy,
    cache: Cache<Granularity, Arc<Vec<Bucket>>>,
    computations: AtomicU64,
}

impl CachedAggregator {
    /// Cache over `records` with the default policy
    pub fn new(records: Arc<[Record]>) -> Self {
        Self::with_policy(records, AggregationPolicy::default())
    }

    /// Cache over `records` with a custom policy
    pub fn with_policy(records: Arc<[Record]>, policy: AggregationPolicy) -> Self {
        Self {
            records,
            policy,
            cache: Cache::new(Granularity::ALL.len() as u64),
            computations: AtomicU64::new(0),
        }
    }

    /// Buckets for `granularity`, computed on first use
    ///
    /// Failed aggregations are returned as-is and are not cached.
    #[instrument(skip(self))]
    pub fn buckets(&self, granularity: Granularity) -> Result<Arc<Vec<Bucket>>> {
        if let Some(buckets) = self.cache.get(&granularity) {
            return Ok(buckets);
        }

        self.computations.fetch_add(1, Ordering::Relaxed);
        debug!("Bucket cache miss");
        let buckets = Arc::new(
            BucketAggregator::with_policy(granularity, self.policy.clone()).aggregate(&self.records)?,
        );
        self.cache.insert(granularity, Arc::clone(&buckets));
        Ok(buckets)
    }

    /// Number of aggregations actually performed
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Records the cache aggregates
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
