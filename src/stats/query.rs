//! Query path - fold the trailing window into one aggregate

use super::store::BucketStore;
use super::types::{Bucket, WindowStatistics};

/// Inclusive key range `[now - window_ms + 1, now]` covered by a query at `now`
pub fn window_bounds(now: i64, window_ms: i64) -> (i64, i64) {
    (now - window_ms + 1, now)
}

/// Populated buckets inside the window, newest first
pub fn window_buckets(store: &BucketStore, now: i64, window_ms: i64) -> Vec<(i64, Bucket)> {
    let (from, to) = window_bounds(now, window_ms);
    let mut buckets = store.range(from, to);
    buckets.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    buckets
}

/// Aggregate every bucket in the window ending at `now`
///
/// Returns `None` when the window holds no transactions.
pub fn fold_window(store: &BucketStore, now: i64, window_ms: i64) -> Option<WindowStatistics> {
    let (from, to) = window_bounds(now, window_ms);

    store
        .range(from, to)
        .into_iter()
        .fold(None, |acc: Option<Bucket>, (_, bucket)| match acc {
            Some(mut total) => {
                total.merge(&bucket);
                Some(total)
            }
            None => Some(bucket),
        })
        .map(WindowStatistics::from)
}
