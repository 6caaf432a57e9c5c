//! Ingestion path - freshness check, merge, and sweep arming

use super::store::BucketStore;
use super::sweeper::RetentionSweeper;
use super::types::IngestOutcome;

/// Whole seconds elapsed between `timestamp` and `now`, truncated toward zero
///
/// Future timestamps yield a negative or zero age. The difference saturates,
/// so timestamps at the far ends of the `i64` range still compare correctly.
pub fn age_seconds(timestamp: i64, now: i64) -> i64 {
    now.saturating_sub(timestamp) / 1000
}

/// Returns true if a transaction at `timestamp` is too old to record at `now`
pub fn is_expired(timestamp: i64, now: i64, max_age_secs: i64) -> bool {
    age_seconds(timestamp, now) > max_age_secs
}

/// Merge one transaction into the store
///
/// Stale transactions leave the store and the sweeper untouched. An accepted
/// transaction arms the sweeper if no sweep schedule is running.
pub fn ingest(
    store: &BucketStore,
    sweeper: &RetentionSweeper,
    max_age_secs: i64,
    amount: f64,
    timestamp: i64,
    now: i64,
) -> IngestOutcome {
    if is_expired(timestamp, now, max_age_secs) {
        log::debug!(
            "Discarding expired transaction: ts={} age={}s amount={}",
            timestamp,
            age_seconds(timestamp, now),
            amount
        );
        return IngestOutcome::Expired;
    }

    store.upsert(timestamp, amount);
    sweeper.arm_if_idle();

    IngestOutcome::Accepted
}
