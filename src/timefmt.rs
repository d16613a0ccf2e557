//! Parsing and formatting for the engine's fixed textual layouts.
//!
//! The source system emits `DD-MM-YYYY HH:mm:ss` login times and
//! `HH:mm:ss` session durations. Every component that needs a date or
//! clock string goes through this module; nothing else in the crate
//! splits date strings by hand.
//!
//! All instants are UTC-anchored so day boundaries do not drift with the
//! host timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::UsageError;

/// `DD-MM-YYYY` calendar date layout.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// `DD-MM-YYYY HH:mm:ss` login-time layout.
pub const DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Parse a `DD-MM-YYYY HH:mm:ss` login time as a UTC instant.
///
/// Out-of-range day/month/time components are rejected, not coerced.
pub fn parse_login_time(raw: &str) -> Result<DateTime<Utc>, UsageError> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| UsageError::Parse {
            field: "loginTime",
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a `DD-MM-YYYY` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, UsageError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| UsageError::Parse {
        field: "date",
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an `HH:mm:ss` session duration into milliseconds.
///
/// Hours are unbounded (this is a duration, not a clock time; a session
/// may run for days). Minutes and seconds must stay below 60. A duration
/// whose millisecond count does not fit in `i64` is rejected, not
/// wrapped.
pub fn parse_session_duration(raw: &str) -> Result<i64, UsageError> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(duration_error(raw, "expected HH:mm:ss".to_string()));
    }
    let hours = parse_component(parts[0], "hours", raw, None)?;
    let minutes = parse_component(parts[1], "minutes", raw, Some(60))?;
    let seconds = parse_component(parts[2], "seconds", raw, Some(60))?;
    hours
        .checked_mul(3600)
        .and_then(|s| s.checked_add(minutes * 60 + seconds))
        .and_then(|s| s.checked_mul(1000))
        .ok_or_else(|| duration_error(raw, "duration overflows the millisecond range".to_string()))
}

fn parse_component(
    part: &str,
    name: &'static str,
    raw: &str,
    limit: Option<i64>,
) -> Result<i64, UsageError> {
    let value: i64 = part
        .trim()
        .parse()
        .map_err(|_| duration_error(raw, format!("non-numeric {name} component")))?;
    if value < 0 {
        return Err(duration_error(raw, format!("negative {name} component")));
    }
    if let Some(limit) = limit {
        if value >= limit {
            return Err(duration_error(
                raw,
                format!("{name} component out of range (max {})", limit - 1),
            ));
        }
    }
    Ok(value)
}

fn duration_error(raw: &str, reason: String) -> UsageError {
    UsageError::Parse {
        field: "sessionTime",
        raw: raw.to_string(),
        reason,
    }
}

/// Format a calendar date as `DD-MM-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a UTC instant as `DD-MM-YYYY HH:mm:ss`.
pub fn format_login_time(instant: DateTime<Utc>) -> String {
    instant.format(DATETIME_FORMAT).to_string()
}

/// Render the wall-clock part (`HH:MM:SS`, UTC) of an epoch-millisecond
/// instant.
pub fn format_clock_time(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "??:??:??".to_string(),
    }
}
