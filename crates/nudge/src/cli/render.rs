//! Text rendering for CLI output.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};

use crate::error::Result;
use crate::reminder::{Reminder, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};

use super::OutputFormat;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format epoch milliseconds as a wall-clock time in `tz`.
#[must_use]
pub fn format_timestamp_in<Tz>(ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_millis_opt(ms)
        .single()
        .map_or_else(|| ms.to_string(), |dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Format epoch milliseconds in the local timezone.
#[must_use]
pub fn format_timestamp(ms: i64) -> String {
    format_timestamp_in(ms, &Local)
}

/// Describe an interval in the largest unit that divides it evenly.
#[must_use]
pub fn format_interval(ms: i64) -> String {
    for (unit_ms, singular, plural) in [
        (MS_PER_DAY, "day", "days"),
        (MS_PER_HOUR, "hour", "hours"),
        (MS_PER_MINUTE, "minute", "minutes"),
    ] {
        if ms > 0 && ms % unit_ms == 0 {
            let n = ms / unit_ms;
            return if n == 1 {
                format!("every {singular}")
            } else {
                format!("every {n} {plural}")
            };
        }
    }
    format!("every {ms} ms")
}

/// Render the reminder list in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_reminders(reminders: &[Reminder], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reminders)?),
        _ if reminders.is_empty() => Ok("No reminders.".to_string()),
        OutputFormat::Plain => Ok(render_plain(reminders)),
        OutputFormat::Table => Ok(render_table(reminders)),
    }
}

fn render_plain(reminders: &[Reminder]) -> String {
    let mut out = String::new();
    for r in reminders {
        let _ = writeln!(out, "{}", r.message);
        let _ = writeln!(
            out,
            "  Next: {}  ({}, id {})",
            format_timestamp(r.next_notification),
            format_interval(r.interval),
            r.id
        );
    }
    out.trim_end().to_string()
}

fn render_table(reminders: &[Reminder]) -> String {
    let id_width = reminders
        .iter()
        .map(|r| r.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<19}  {:<18}  MESSAGE",
        "ID", "NEXT", "REPEATS"
    );
    for r in reminders {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<19}  {:<18}  {}",
            r.id,
            format_timestamp(r.next_notification),
            format_interval(r.interval),
            r.message
        );
    }
    out.trim_end().to_string()
}
