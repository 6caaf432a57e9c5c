//! Retention sweeper - periodic eviction of aged-out buckets
//!
//! The sweeper is armed lazily by ingestion and pauses itself once the store
//! drains, so an idle process carries no background task.
//!
//! Lifecycle:
//! 1. `arm_if_idle()` flips `armed` false -> true with a compare-and-set; only
//!    the winner spawns the periodic task (first cycle after one full period)
//! 2. Each cycle removes every bucket older than `now - retention_ms`
//! 3. If the store is empty afterwards the task clears `armed` and exits
//!
//! Step 3 re-checks the store after clearing the flag. An upsert that landed
//! between the emptiness check and the clear saw `armed == true` and did not
//! arm, so the exiting task must take the flag back and keep running.

use super::store::BucketStore;
use super::types::Clock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// State shared between the sweeper handle and its running task
struct SweepShared {
    store: Arc<BucketStore>,
    clock: Clock,
    period: Duration,
    retention_ms: i64,
    armed: AtomicBool,
    /// Number of times a new periodic task was spawned
    arm_count: AtomicU64,
    /// Number of completed sweep cycles across all tasks
    cycle_count: AtomicU64,
}

impl SweepShared {
    fn sweep(&self, now: i64) -> usize {
        let delete_from = now - self.retention_ms;
        let expired = self.store.keys_before(delete_from);
        let mut removed = 0;
        for timestamp in expired {
            if self.store.remove(timestamp).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Returns true if the task should keep running
    fn disarm_if_drained(&self) -> bool {
        if !self.store.is_empty() {
            return true;
        }

        self.armed.store(false, Ordering::SeqCst);

        if self.store.is_empty() {
            return false;
        }

        // A write slipped in while we were disarming; reclaim the schedule
        // unless a fresh task already did.
        self.armed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

pub struct RetentionSweeper {
    shared: Arc<SweepShared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RetentionSweeper {
    pub fn new(store: Arc<BucketStore>, clock: Clock, period: Duration, retention_ms: i64) -> Self {
        Self {
            shared: Arc::new(SweepShared {
                store,
                clock,
                period,
                retention_ms,
                armed: AtomicBool::new(false),
                arm_count: AtomicU64::new(0),
                cycle_count: AtomicU64::new(0),
            }),
            handle: Mutex::new(None),
        }
    }

    /// Schedule the periodic sweep unless one is already armed
    ///
    /// Returns true if this call armed a new schedule. Must run inside a
    /// Tokio runtime to spawn; outside one the flag is left untouched and the
    /// sweeper stays disarmed.
    pub fn arm_if_idle(&self) -> bool {
        if self.shared.armed.load(Ordering::SeqCst) {
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::warn!("⚠️  No Tokio runtime, retention sweep not scheduled: {}", e);
                return false;
            }
        };

        // Held across the flag flip and spawn so `cancel` never sees an
        // armed flag without the matching handle.
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self
            .shared
            .armed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        // Any previous task exited after disarming; its handle is just dropped.
        handle.replace(runtime.spawn(run_sweep_cycles(self.shared.clone())));
        drop(handle);

        self.shared.arm_count.fetch_add(1, Ordering::SeqCst);
        log::info!(
            "⏰ Retention sweep armed (every {}s, retention {}ms)",
            self.shared.period.as_secs(),
            self.shared.retention_ms
        );
        true
    }

    /// Run one sweep pass at `now` without touching the schedule
    ///
    /// Returns the number of buckets removed.
    pub fn sweep_at(&self, now: i64) -> usize {
        self.shared.sweep(now)
    }

    /// Abort the scheduled task, if any, without waiting for it
    pub fn cancel(&self) {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(task) = handle.take() {
            task.abort();
        }
        if self.shared.armed.swap(false, Ordering::SeqCst) {
            log::info!("🛑 Retention sweep cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.shared.armed.load(Ordering::SeqCst)
    }

    pub fn arm_count(&self) -> u64 {
        self.shared.arm_count.load(Ordering::SeqCst)
    }

    pub fn cycle_count(&self) -> u64 {
        self.shared.cycle_count.load(Ordering::SeqCst)
    }
}

impl Drop for RetentionSweeper {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_sweep_cycles(shared: Arc<SweepShared>) {
    let mut timer = interval_at(Instant::now() + shared.period, shared.period);

    loop {
        timer.tick().await;

        let now = (shared.clock)();
        let removed = shared.sweep(now);
        shared.cycle_count.fetch_add(1, Ordering::SeqCst);

        log::debug!(
            "🧹 Sweep removed {} buckets older than {} ({} remaining)",
            removed,
            now - shared.retention_ms,
            shared.store.len()
        );

        if !shared.disarm_if_drained() {
            log::info!("✅ Store drained, clean-up schedule cancelled");
            break;
        }
    }
}
