//! The periodic due-reminder check.
//!
//! Each tick scans the whole collection: due reminders are delivered and moved
//! to one interval after the tick time, the rest are left alone, and the new
//! collection replaces the old one in the store.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::notify::{Delivery, NotificationSink};
use crate::reminder::Reminder;
use crate::store::ReminderStore;

/// Default period between checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Epoch milliseconds the tick used as "now".
    pub checked_at: i64,
    /// Number of reminders scanned.
    pub scanned: usize,
    /// Ids of reminders that were due, in collection order.
    pub fired: Vec<String>,
    /// How many of the due reminders were actually shown.
    pub shown: usize,
}

/// Totals over a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks completed successfully.
    pub ticks: u64,
    /// Ticks that failed to read or persist the collection.
    pub failed_ticks: u64,
    /// Reminders fired across all ticks.
    pub fired: u64,
}

/// Split `reminders` into the rescheduled collection and the reminders that
/// were due at `now_ms`.
#[must_use]
pub fn scan(reminders: &[Reminder], now_ms: i64) -> (Vec<Reminder>, Vec<Reminder>) {
    let mut due = Vec::new();
    let updated = reminders
        .iter()
        .map(|reminder| {
            if reminder.is_due(now_ms) {
                due.push(reminder.clone());
                reminder.rescheduled(now_ms)
            } else {
                reminder.clone()
            }
        })
        .collect();
    (updated, due)
}

/// Fixed-period checker for due reminders.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL)
    }
}

impl Scheduler {
    /// Create a scheduler that checks every `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// The check period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one check at `now_ms`.
    ///
    /// The store is refreshed first so reminders changed by other processes
    /// are seen. The rescheduled collection is persisted before any
    /// notification is delivered, even when nothing fired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written. Notification
    /// failures are not errors.
    pub async fn tick(
        &self,
        store: &mut ReminderStore,
        sink: &NotificationSink,
        now_ms: i64,
    ) -> Result<TickReport> {
        // Read, reschedule and write back with no await in between
        store.refresh()?;
        let (updated, due) = scan(store.reminders(), now_ms);
        let scanned = updated.len();
        store.replace(updated)?;

        let mut shown = 0;
        for reminder in &due {
            info!("Reminder {} is due: {}", reminder.id, reminder.message);
            if sink.deliver(&reminder.message).await == Delivery::Shown {
                shown += 1;
            }
        }

        let report = TickReport {
            checked_at: now_ms,
            scanned,
            fired: due.into_iter().map(|r| r.id).collect(),
            shown,
        };
        debug!(
            "Tick at {}: {} scanned, {} fired",
            now_ms,
            report.scanned,
            report.fired.len()
        );
        Ok(report)
    }

    /// Tick every period until `shutdown` completes.
    ///
    /// The first check happens one period after the call. A failed tick is
    /// logged and the loop carries on.
    pub async fn run_until<F>(
        &self,
        store: &mut ReminderStore,
        sink: &NotificationSink,
        shutdown: F,
    ) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut summary = RunSummary::default();
        info!("Scheduler started, checking every {:?}", self.period);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    match self.tick(store, sink, Utc::now().timestamp_millis()).await {
                        Ok(report) => {
                            summary.ticks += 1;
                            summary.fired += u64::try_from(report.fired.len()).unwrap_or(u64::MAX);
                        }
                        Err(e) => {
                            summary.failed_ticks += 1;
                            error!("Reminder check failed: {e}");
                        }
                    }
                }
            }
        }

        info!(
            "Scheduler stopped after {} ticks ({} reminders fired)",
            summary.ticks, summary.fired
        );
        summary
    }
}
