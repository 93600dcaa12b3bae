//! `nudge` - Recurring desktop reminders
//!
//! This library provides the reminder model, its `SQLite`-backed persistence,
//! the periodic due-reminder check and permission-gated notification delivery.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod reminder;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use notify::{Delivery, NotificationBackend, NotificationSink, Permission};
pub use reminder::{CustomTime, IntervalUnit, Reminder, ReminderDraft};
pub use scheduler::{Scheduler, TickReport};
pub use session::Session;
pub use storage::{Storage, StorageStats};
pub use store::ReminderStore;
