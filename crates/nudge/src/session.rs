//! The application state for one run of nudge.
//!
//! A [`Session`] owns the reminder store, the notification sink and the
//! scheduler. Starting it requests notification permission once and then
//! checks for due reminders until the shutdown signal fires.

use std::future::Future;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::notify::NotificationSink;
use crate::scheduler::{RunSummary, Scheduler, TickReport};
use crate::storage::Storage;
use crate::store::ReminderStore;

/// Owner of all mutable application state.
#[derive(Debug)]
pub struct Session {
    store: ReminderStore,
    sink: NotificationSink,
    scheduler: Scheduler,
}

impl Session {
    /// Assemble a session from its parts.
    #[must_use]
    pub fn new(store: ReminderStore, sink: NotificationSink, scheduler: Scheduler) -> Self {
        Self {
            store,
            sink,
            scheduler,
        }
    }

    /// Open the configured database and build the configured sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        let store = ReminderStore::load(storage, config.storage.key.clone())?;
        Ok(Self::new(
            store,
            NotificationSink::from_config(config),
            Scheduler::new(config.check_interval()),
        ))
    }

    /// The reminder store.
    #[must_use]
    pub fn store(&self) -> &ReminderStore {
        &self.store
    }

    /// Mutable access to the reminder store.
    pub fn store_mut(&mut self) -> &mut ReminderStore {
        &mut self.store
    }

    /// The notification sink.
    #[must_use]
    pub fn sink(&self) -> &NotificationSink {
        &self.sink
    }

    /// The scheduler.
    #[must_use]
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler
    }

    /// Check for due reminders once, right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn check_now(&mut self) -> Result<TickReport> {
        self.sink.request_permission().await;
        self.scheduler
            .tick(&mut self.store, &self.sink, Utc::now().timestamp_millis())
            .await
    }

    /// Run the scheduler loop until `shutdown` completes.
    pub async fn run_until<F>(&mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let permission = self.sink.request_permission().await;
        info!(
            "Session started with {} reminders (notifications via '{}': {})",
            self.store.len(),
            self.sink.backend_name(),
            permission
        );
        self.scheduler
            .run_until(&mut self.store, &self.sink, shutdown)
            .await
    }
}
