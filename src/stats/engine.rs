//! Statistics engine - the single owned aggregator instance
//!
//! `StatsEngine` owns the bucket store, the retention sweeper and the clock.
//! Adapters hold it behind an `Arc` and call in with already-validated
//! `(amount, timestamp)` pairs.
//!
//! ```text
//! ingest(amount, ts) ──► freshness check ──► BucketStore::upsert ──► arm sweeper
//! statistics()       ──► fold buckets in (now - window, now]
//! sweeper (periodic) ──► evict buckets older than now - retention ──► disarm when empty
//! ```

use super::ingestion;
use super::query;
use super::store::BucketStore;
use super::sweeper::RetentionSweeper;
use super::types::{system_clock, Bucket, Clock, IngestOutcome, WindowStatistics};
use crate::config::StatsConfig;
use std::sync::Arc;
use std::time::Instant;

pub struct StatsEngine {
    config: StatsConfig,
    store: Arc<BucketStore>,
    sweeper: RetentionSweeper,
    clock: Clock,
}

impl StatsEngine {
    /// Create an engine reading the system clock
    pub fn new(config: StatsConfig) -> Self {
        Self::new_with_clock(config, system_clock())
    }

    /// Create an engine with a custom clock (epoch milliseconds)
    ///
    /// Used for testing with deterministic timestamps.
    pub fn new_with_clock(config: StatsConfig, clock: Clock) -> Self {
        let store = Arc::new(BucketStore::new());
        let sweeper = RetentionSweeper::new(
            store.clone(),
            clock.clone(),
            config.sweep_interval(),
            config.retention_ms,
        );

        Self {
            config,
            store,
            sweeper,
            clock,
        }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Record a transaction, reading the clock at call entry
    pub fn ingest(&self, amount: f64, timestamp: i64) -> IngestOutcome {
        let now = self.now();
        self.ingest_at(amount, timestamp, now)
    }

    pub fn ingest_at(&self, amount: f64, timestamp: i64, now: i64) -> IngestOutcome {
        ingestion::ingest(
            &self.store,
            &self.sweeper,
            self.config.max_age_secs,
            amount,
            timestamp,
            now,
        )
    }

    /// Statistics over the trailing window ending now
    ///
    /// `None` means no transaction landed in the window.
    pub fn statistics(&self) -> Option<WindowStatistics> {
        self.statistics_at(self.now())
    }

    pub fn statistics_at(&self, now: i64) -> Option<WindowStatistics> {
        query::fold_window(&self.store, now, self.config.window_ms)
    }

    /// Every populated bucket in the window ending at `now`, newest first
    pub fn window_buckets(&self, now: i64) -> Vec<(i64, Bucket)> {
        query::window_buckets(&self.store, now, self.config.window_ms)
    }

    /// Log each bucket in the current window plus the totals (debug level)
    pub fn log_window(&self, now: i64) {
        let started = Instant::now();
        let buckets = self.window_buckets(now);

        for (timestamp, bucket) in &buckets {
            log::debug!(
                "T:{} count:{} avg:{} sum:{} max:{} min:{}",
                timestamp,
                bucket.count,
                bucket.avg(),
                bucket.sum,
                bucket.max,
                bucket.min
            );
        }

        match self.statistics_at(now) {
            Some(stats) => log::debug!(
                "Window total: count:{} avg:{} sum:{} max:{} min:{} ({} buckets, {}µs)",
                stats.count,
                stats.avg,
                stats.sum,
                stats.max,
                stats.min,
                buckets.len(),
                started.elapsed().as_micros()
            ),
            None => log::debug!(
                "Window empty ({}µs)",
                started.elapsed().as_micros()
            ),
        }
    }

    /// Run one retention pass immediately, independent of the schedule
    pub fn sweep_at(&self, now: i64) -> usize {
        self.sweeper.sweep_at(now)
    }

    pub fn is_sweep_armed(&self) -> bool {
        self.sweeper.is_armed()
    }

    pub fn sweeper(&self) -> &RetentionSweeper {
        &self.sweeper
    }

    pub fn bucket_count(&self) -> usize {
        self.store.len()
    }

    pub fn bucket(&self, timestamp: i64) -> Option<Bucket> {
        self.store.get(timestamp)
    }

    /// Stop background work; the store itself stays readable
    pub fn shutdown(&self) {
        self.sweeper.cancel();
    }
}
