//! Core reminder types for nudge.
//!
//! A [`Reminder`] pairs a message with a recurring schedule. This module also
//! holds the pure scheduling arithmetic: converting a user-chosen interval to
//! milliseconds and computing the first firing time.

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60 * 1000;
/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Unit the interval magnitude is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl IntervalUnit {
    /// Milliseconds per one of this unit.
    #[must_use]
    pub fn millis(self) -> i64 {
        match self {
            Self::Minutes => MS_PER_MINUTE,
            Self::Hours => MS_PER_HOUR,
            Self::Days => MS_PER_DAY,
        }
    }
}

impl std::fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minutes => write!(f, "minutes"),
            Self::Hours => write!(f, "hours"),
            Self::Days => write!(f, "days"),
        }
    }
}

impl FromStr for IntervalUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            "" => Err(Error::incomplete("interval unit")),
            other => Err(Error::invalid_interval(format!("unknown unit '{other}'"))),
        }
    }
}

/// A wall-clock time of day (`HH:MM`, 24-hour) a reminder is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomTime(NaiveTime);

impl CustomTime {
    /// Create a custom time from hours and minutes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCustomTime`] if the values are out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| Error::InvalidCustomTime {
                value: format!("{hour:02}:{minute:02}"),
            })
    }

    /// The time of day, with seconds set to zero.
    #[must_use]
    pub fn time(self) -> NaiveTime {
        self.0
    }
}

impl std::fmt::Display for CustomTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for CustomTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| Error::InvalidCustomTime {
                value: s.to_string(),
            })
    }
}

/// A stored reminder.
///
/// Field names serialize in camelCase so the persisted array reads
/// `{"id", "message", "interval", "nextNotification"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Unique identifier (creation time in epoch milliseconds, as a string).
    pub id: String,

    /// The text shown when the reminder fires.
    pub message: String,

    /// Milliseconds between firings.
    pub interval: i64,

    /// Epoch milliseconds at which the reminder next fires.
    pub next_notification: i64,
}

impl Reminder {
    /// Whether the reminder should fire at `now_ms`.
    #[must_use]
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.next_notification <= now_ms
    }

    /// A copy of this reminder rescheduled one interval after `now_ms`.
    ///
    /// The new time is relative to the check time, not the missed due time,
    /// so a late check never causes a burst of catch-up firings.
    #[must_use]
    pub fn rescheduled(&self, now_ms: i64) -> Self {
        Self {
            next_notification: now_ms.saturating_add(self.interval),
            ..self.clone()
        }
    }
}

/// User input for a new reminder, before validation.
///
/// Every field may be missing, mirroring a half-filled form. [`ReminderDraft::validate`]
/// rejects incomplete drafts with [`Error::IncompleteReminder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderDraft {
    /// Reminder text.
    pub message: String,
    /// Interval magnitude.
    pub interval_value: Option<u64>,
    /// Interval unit.
    pub interval_unit: Option<IntervalUnit>,
    /// Optional `HH:MM` anchor for the first firing.
    pub custom_time: Option<String>,
}

/// A validated draft: everything needed to schedule the first firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    /// Reminder text.
    pub message: String,
    /// Interval in milliseconds.
    pub interval: i64,
    /// Parsed time-of-day anchor.
    pub custom_time: Option<CustomTime>,
}

impl ReminderDraft {
    /// Start a draft with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the interval.
    #[must_use]
    pub fn every(mut self, value: u64, unit: IntervalUnit) -> Self {
        self.interval_value = Some(value);
        self.interval_unit = Some(unit);
        self
    }

    /// Anchor the first firing to a time of day.
    #[must_use]
    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.custom_time = Some(time.into());
        self
    }

    /// Check that all required fields are present and well-formed.
    ///
    /// # Errors
    ///
    /// - [`Error::IncompleteReminder`] if the message, interval value or unit is missing
    /// - [`Error::InvalidInterval`] if the interval is zero or overflows
    /// - [`Error::InvalidCustomTime`] if the custom time is not `HH:MM`
    pub fn validate(&self) -> Result<ValidDraft> {
        if self.message.trim().is_empty() {
            return Err(Error::incomplete("message"));
        }
        let value = self
            .interval_value
            .ok_or_else(|| Error::incomplete("interval value"))?;
        let unit = self
            .interval_unit
            .ok_or_else(|| Error::incomplete("interval unit"))?;

        let interval = interval_ms(value, unit)?;

        // An empty time field means "no custom time"
        let custom_time = match self.custom_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse()?),
        };

        Ok(ValidDraft {
            message: self.message.clone(),
            interval,
            custom_time,
        })
    }
}

/// Convert an interval magnitude and unit to milliseconds.
///
/// # Errors
///
/// Returns [`Error::InvalidInterval`] if `value` is zero or the result overflows.
pub fn interval_ms(value: u64, unit: IntervalUnit) -> Result<i64> {
    if value == 0 {
        return Err(Error::invalid_interval("interval must be greater than 0"));
    }
    i64::try_from(value)
        .ok()
        .and_then(|v| v.checked_mul(unit.millis()))
        .ok_or_else(|| Error::invalid_interval(format!("{value} {unit} is too large")))
}

/// Compute the first firing time, in epoch milliseconds.
///
/// Without a custom time the reminder fires one interval from `now`. With one,
/// it fires today at that wall-clock time in `now`'s timezone; if that moment
/// is not in the future, one interval is added to it. That rollover is the
/// reminder's own interval, not a calendar day: a 2-hour reminder anchored at
/// 09:00 and created at 10:00 first fires at 11:00.
///
/// # Errors
///
/// Returns an error if the anchored time cannot be represented in the timezone.
pub fn first_notification<Tz: TimeZone>(
    now: &DateTime<Tz>,
    interval: i64,
    custom_time: Option<CustomTime>,
) -> Result<i64> {
    let now_ms = now.timestamp_millis();
    let Some(custom_time) = custom_time else {
        return Ok(now_ms.saturating_add(interval));
    };

    let naive = now.date_naive().and_time(custom_time.time());
    let tz = now.timezone();
    // A time skipped by a DST jump resolves to the same clock time one hour later
    let anchored = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(|| Error::InvalidCustomTime {
            value: custom_time.to_string(),
        })?;

    let mut next = anchored.timestamp_millis();
    if next <= now_ms {
        next = next.saturating_add(interval);
    }
    Ok(next)
}
