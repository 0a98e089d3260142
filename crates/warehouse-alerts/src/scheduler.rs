//! The non-reentrant scheduler component (spec §4.D/§9), grounded in
//! `scheduler_service.py`'s APScheduler singleton but redesigned per the
//! spec's explicit note to avoid implicit process-wide state: the caller
//! constructs one `Scheduler`, injects the store and clock, and owns its
//! lifecycle through `start`/`shutdown`/`trigger_now` rather than relying
//! on a module-level singleton.

use crate::checks::{run_all_checks, AlertConfig, CheckCounts};
use chrono::{Datelike, Timelike, Weekday};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;
use warehouse_core::{Clock, Error, Result};
use warehouse_store::Store;

const POLL_INTERVAL: StdDuration = StdDuration::from_secs(30);

/// Which of the four checks a scheduler tick is due to run, per spec
/// §4.D's schedule: expiring+expired daily at 06:00, low-stock every 4
/// hours, dead-stock weekly on Sunday at 02:00.
#[derive(Debug, Clone, Copy, Default)]
struct LastRun {
    daily: Option<chrono::NaiveDate>,
    low_stock_hour_bucket: Option<i64>,
    dead_stock_week: Option<(i32, u32)>,
}

/// An explicit scheduler component — one instance per process, injected
/// with the store and clock it operates against. `start`/`shutdown` are
/// idempotent; `trigger_now` and the background tick share one run-lock
/// so a periodic tick and a manual trigger can never execute concurrently
/// (spec §5: "a check that runs longer than its period must not overlap
/// its next invocation").
pub struct Scheduler<S: Store + 'static, C: Clock + 'static> {
    store: Arc<S>,
    clock: Arc<C>,
    config: AlertConfig,
    run_lock: Arc<Mutex<()>>,
    shutdown: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<S: Store + 'static, C: Clock + 'static> Scheduler<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>, config: AlertConfig) -> Self {
        Self {
            store,
            clock,
            config,
            run_lock: Arc::new(Mutex::new(())),
            shutdown: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Starts the background tick thread. Fails if already started —
    /// this is the one piece of process-wide state spec §9 calls out, so
    /// it refuses to become an implicit second singleton.
    pub fn start(&self) -> Result<()> {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return Err(Error::conflict("scheduler is already running"));
        }

        self.shutdown.store(false, Ordering::SeqCst);
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let config = self.config.clone();
        let run_lock = Arc::clone(&self.run_lock);
        let shutdown = Arc::clone(&self.shutdown);

        *handle = Some(std::thread::spawn(move || {
            let mut last_run = LastRun::default();
            while !shutdown.load(Ordering::SeqCst) {
                tick(&*store, &*clock, &config, &run_lock, &mut last_run);
                std::thread::sleep(POLL_INTERVAL);
            }
        }));
        Ok(())
    }

    /// Stops the background thread and waits for it to exit. Safe to call
    /// even if `start` was never called.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }

    /// Runs all four checks immediately, regardless of schedule. Blocks
    /// on the same run-lock the background tick uses, so it never
    /// overlaps a tick already in progress.
    pub fn trigger_now(&self) -> CheckCounts {
        let _guard = self.run_lock.lock();
        run_all_checks(&*self.store, &*self.clock, &self.config)
    }
}

fn tick<S: Store, C: Clock>(
    store: &S,
    clock: &C,
    config: &AlertConfig,
    run_lock: &Mutex<()>,
    last_run: &mut LastRun,
) {
    let now = clock.now();
    let today = now.date_naive();

    let daily_due = now.hour() >= 6 && last_run.daily != Some(today);
    let hour_bucket = now.hour() as i64 / 4;
    let low_stock_due = last_run.low_stock_hour_bucket != Some(hour_bucket);
    let week = (today.iso_week().year(), today.iso_week().week());
    let dead_stock_due =
        today.weekday() == Weekday::Sun && now.hour() >= 2 && last_run.dead_stock_week != Some(week);

    if !(daily_due || low_stock_due || dead_stock_due) {
        return;
    }

    let guard = run_lock.try_lock();
    let Some(_guard) = guard else {
        tracing::warn!("scheduler tick skipped: a check is already running");
        return;
    };

    if daily_due {
        if let Err(e) = crate::checks::check_expiring_batches(store, clock, &config.thresholds) {
            tracing::error!(error = %e, "scheduled expiring-batches check failed");
        }
        if let Err(e) = crate::checks::check_expired_batches(store, clock) {
            tracing::error!(error = %e, "scheduled expired-batches check failed");
        }
        last_run.daily = Some(today);
    }
    if low_stock_due {
        if let Err(e) = crate::checks::check_low_stock(store, clock) {
            tracing::error!(error = %e, "scheduled low-stock check failed");
        }
        last_run.low_stock_hour_bucket = Some(hour_bucket);
    }
    if dead_stock_due {
        if let Err(e) = crate::checks::check_dead_stock(store, clock, config.dead_stock_days) {
            tracing::error!(error = %e, "scheduled dead-stock check failed");
        }
        last_run.dead_stock_week = Some(week);
    }
}
