//! # Rolling Transaction Statistics
//!
//! In-memory engine answering count/sum/avg/max/min over the trailing
//! 60-second window of a stream of timestamped amounts.
//!
//! ## Architecture
//!
//! **Key Principle:** transactions are never stored individually.
//!
//! 1. Each transaction is merged into the bucket for its exact millisecond
//! 2. Queries fold every bucket inside the window into one aggregate
//! 3. A periodic sweep evicts buckets once they are past the window plus a
//!    safety margin, and pauses itself when nothing is left to evict
//!
//! Memory stays bounded to roughly `retention + window` worth of populated
//! milliseconds regardless of throughput.
//!
//! ## Concurrency
//!
//! - Writers on the same millisecond serialize on that key's shard lock
//! - Writers on different shards proceed in parallel
//! - Queries never block on the sweeper; a bucket removed mid-scan is simply
//!   not counted
//! - The sweep schedule is armed through a compare-and-set flag, so at most one
//!   periodic task exists at a time
//!
//! ## Module Organization
//!
//! - `types` - Transaction, Bucket, WindowStatistics, IngestOutcome
//! - `store` - Sharded per-millisecond bucket map
//! - `ingestion` - Freshness check and merge
//! - `query` - Window fold
//! - `sweeper` - Retention schedule
//! - `engine` - Owned aggregator tying the above together

pub mod types;
pub mod store;
pub mod ingestion;
pub mod query;
pub mod sweeper;
pub mod engine;

pub use types::{system_clock, Bucket, Clock, IngestOutcome, Transaction, WindowStatistics};
pub use store::BucketStore;
pub use sweeper::RetentionSweeper;
pub use engine::StatsEngine;
