//! The reminder collection and its persistence.
//!
//! [`ReminderStore`] keeps the ordered list of reminders in memory and mirrors
//! it to a single [`Storage`] entry as a JSON array. Every successful mutation
//! rewrites the whole entry.

use chrono::{DateTime, TimeZone};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::reminder::{first_notification, Reminder, ReminderDraft};
use crate::storage::Storage;

/// Ordered, persisted collection of reminders.
#[derive(Debug)]
pub struct ReminderStore {
    storage: Storage,
    key: String,
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    /// Hydrate the collection stored under `key`.
    ///
    /// A missing entry, or one that does not parse as a reminder array, yields
    /// an empty collection. Records with a non-positive interval are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage read itself fails.
    pub fn load(storage: Storage, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let reminders = read_collection(&storage, &key)?;
        debug!("Loaded {} reminders from '{}'", reminders.len(), key);
        Ok(Self {
            storage,
            key,
            reminders,
        })
    }

    /// The reminders in creation order.
    #[must_use]
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Number of reminders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    /// Whether there are no reminders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Find a reminder by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The storage key the collection is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Validate `draft`, schedule it relative to `now`, and append it.
    ///
    /// # Errors
    ///
    /// Returns a user-input error if the draft is incomplete or malformed
    /// (nothing is stored), or a storage error if persisting fails.
    pub fn add<Tz: TimeZone>(&mut self, draft: &ReminderDraft, now: &DateTime<Tz>) -> Result<Reminder> {
        let valid = draft.validate()?;
        let next_notification = first_notification(now, valid.interval, valid.custom_time)?;

        let reminder = Reminder {
            id: self.next_id(now.timestamp_millis()),
            message: valid.message,
            interval: valid.interval,
            next_notification,
        };

        let mut reminders = self.reminders.clone();
        reminders.push(reminder.clone());
        self.commit(reminders)?;
        info!("Added reminder {} ('{}')", reminder.id, reminder.message);
        Ok(reminder)
    }

    /// Remove the reminder with the given id.
    ///
    /// Returns `false`, without writing, if no reminder matched.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            debug!("No reminder with id {id}");
            return Ok(false);
        }

        let remaining = self.reminders.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(remaining)?;
        info!("Removed reminder {id}");
        Ok(true)
    }

    /// Replace the whole collection and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn replace(&mut self, reminders: Vec<Reminder>) -> Result<()> {
        self.commit(reminders)
    }

    /// Re-read the persisted collection, picking up changes made by other
    /// processes sharing the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn refresh(&mut self) -> Result<()> {
        self.reminders = read_collection(&self.storage, &self.key)?;
        Ok(())
    }

    /// Write `reminders`, then adopt them in memory. A failed write leaves
    /// memory untouched.
    fn commit(&mut self, reminders: Vec<Reminder>) -> Result<()> {
        let json = serde_json::to_string(&reminders)?;
        self.storage.set_item(&self.key, &json)?;
        self.reminders = reminders;
        Ok(())
    }

    /// Creation timestamp as the id, bumped past any id already in use.
    fn next_id(&self, now_ms: i64) -> String {
        let mut candidate = now_ms;
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

fn read_collection(storage: &Storage, key: &str) -> Result<Vec<Reminder>> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<Reminder>>(&raw) {
        Ok(reminders) => Ok(reminders
            .into_iter()
            .filter(|r| {
                let valid = r.interval > 0;
                if !valid {
                    warn!("Ignoring reminder {} with interval {}", r.id, r.interval);
                }
                valid
            })
            .collect()),
        Err(e) => {
            warn!("Ignoring unreadable reminders under '{key}': {e}");
            Ok(Vec::new())
        }
    }
}
