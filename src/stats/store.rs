//! Concurrent per-millisecond bucket store
//!
//! Keys are epoch milliseconds, values are [`Bucket`] aggregates. The map is
//! sharded; an upsert holds the shard lock for the key while it applies the
//! compound count/sum/max/min update, so two writers on the same millisecond
//! never interleave and writers on unrelated shards never wait on each other.

use super::types::Bucket;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct BucketStore {
    buckets: DashMap<i64, Bucket>,
}

impl BucketStore {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Record `amount` at `timestamp`, creating the bucket on first use
    pub fn upsert(&self, timestamp: i64, amount: f64) {
        self.buckets
            .entry(timestamp)
            .and_modify(|bucket| bucket.record(amount))
            .or_insert_with(|| Bucket::new(amount));
    }

    /// Delete the bucket at `timestamp`; no-op if absent
    pub fn remove(&self, timestamp: i64) -> Option<Bucket> {
        self.buckets.remove(&timestamp).map(|(_, bucket)| bucket)
    }

    pub fn get(&self, timestamp: i64) -> Option<Bucket> {
        self.buckets.get(&timestamp).map(|bucket| *bucket)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Snapshot of populated buckets with `from <= timestamp <= to`
    ///
    /// Unordered. A bucket removed concurrently may or may not appear.
    pub fn range(&self, from: i64, to: i64) -> Vec<(i64, Bucket)> {
        self.buckets
            .iter()
            .filter(|entry| (from..=to).contains(entry.key()))
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Keys strictly older than `cutoff`
    pub fn keys_before(&self, cutoff: i64) -> Vec<i64> {
        self.buckets
            .iter()
            .map(|entry| *entry.key())
            .filter(|timestamp| *timestamp < cutoff)
            .collect()
    }
}
