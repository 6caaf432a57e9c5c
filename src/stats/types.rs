//! Core data types for the rolling statistics engine
//!
//! Timestamps are Unix epoch milliseconds throughout.

use std::sync::Arc;

/// Wall-clock source returning Unix epoch milliseconds
///
/// Injected into the engine so tests can drive time deterministically.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Default clock backed by the system time
pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

/// A single validated transaction handed to the engine by an adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transaction {
    pub amount: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Aggregate of every transaction recorded at one exact millisecond
///
/// A bucket always holds at least one observation; the store removes buckets
/// rather than zeroing them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub count: u64,
    pub sum: f64,
    pub max: f64,
    pub min: f64,
}

impl Bucket {
    /// Bucket holding a single observation
    pub fn new(amount: f64) -> Self {
        Self {
            count: 1,
            sum: amount,
            max: amount,
            min: amount,
        }
    }

    /// Fold one more observation into the bucket
    pub fn record(&mut self, amount: f64) {
        self.count += 1;
        self.sum += amount;
        self.max = self.max.max(amount);
        self.min = self.min.min(amount);
    }

    /// Fold another bucket into this one
    pub fn merge(&mut self, other: &Bucket) {
        self.count += other.count;
        self.sum += other.sum;
        self.max = self.max.max(other.max);
        self.min = self.min.min(other.min);
    }

    pub fn avg(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Aggregate statistics over the trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStatistics {
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

impl From<Bucket> for WindowStatistics {
    fn from(bucket: Bucket) -> Self {
        Self {
            count: bucket.count,
            sum: bucket.sum,
            avg: bucket.avg(),
            max: bucket.max,
            min: bucket.min,
        }
    }
}

/// Result of offering a transaction to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Merged into the store
    Accepted,
    /// Older than the freshness threshold; nothing was stored
    Expired,
}
