//! Day splitting and the daily aggregation pass.
//!
//! Sessions are validated once at the pipeline boundary, split across
//! the UTC calendar days they span, and accumulated into one
//! [`DailyRecord`] per touched day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ParsePolicy};
use crate::error::UsageError;
use crate::interval::{self, Interval, DAY_MS};
use crate::timefmt;

/// Raw input record as handed over by the retrieval/storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSessionRecord {
    /// `DD-MM-YYYY HH:mm:ss` login instant.
    pub login_time: String,
    /// `HH:mm:ss` session duration.
    pub session_time: String,
    /// Downloaded volume (MB).
    pub download: f64,
    /// Uploaded volume (MB).
    pub upload: f64,
}

/// One validated network login-to-logout cycle.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub start: DateTime<Utc>,
    pub duration_ms: i64,
    pub download: f64,
    pub upload: f64,
}

impl Session {
    /// Validate a raw record at the pipeline boundary.
    ///
    /// Malformed timestamps, durations, or negative/non-finite byte
    /// counts are rejected here, never deep inside aggregation.
    pub fn from_record(record: &RawSessionRecord) -> Result<Self, UsageError> {
        let start = timefmt::parse_login_time(&record.login_time)?;
        let duration_ms = timefmt::parse_session_duration(&record.session_time)?;
        check_volume("download", record.download)?;
        check_volume("upload", record.upload)?;
        Ok(Self {
            start,
            duration_ms,
            download: record.download,
            upload: record.upload,
        })
    }

    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// Exclusive end instant: `start + duration`.
    pub fn end_ms(&self) -> i64 {
        self.start_ms() + self.duration_ms
    }
}

fn check_volume(field: &'static str, value: f64) -> Result<(), UsageError> {
    if !value.is_finite() || value < 0.0 {
        return Err(UsageError::Parse {
            field,
            raw: value.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

/// The portion of one session that falls on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySlice {
    pub date: NaiveDate,
    pub interval: Interval,
    pub download: f64,
    pub upload: f64,
}

/// Aggregated usage for a single calendar day.
///
/// `active_intervals` are merged and sorted ascending; `idle_intervals`
/// tile the remainder of the day above the merge threshold. Records are
/// created by [`aggregate_daily`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub active_intervals: Vec<Interval>,
    pub idle_intervals: Vec<Interval>,
    pub download: f64,
    pub upload: f64,
    /// Number of source sessions touching this day.
    pub session_count: usize,
}

/// Split a session across the UTC calendar days it spans, allocating
/// bytes proportionally to the time spent on each day.
///
/// Day bounds are half-open `[00:00:00.000, +24h)`, so per-day overlaps
/// sum to `duration_ms` exactly and byte allocations sum back to the
/// session totals.
///
/// A zero-duration session is an instantaneous point: the full byte
/// counts land on the day containing `start`, with a zero-width
/// interval.
pub fn split_across_days(session: &Session) -> Vec<DaySlice> {
    let start_ms = session.start_ms();
    let end_ms = session.end_ms();

    if session.duration_ms == 0 {
        return vec![DaySlice {
            date: session.start.date_naive(),
            interval: Interval::new(start_ms, start_ms),
            download: session.download,
            upload: session.upload,
        }];
    }

    let mut slices = Vec::new();
    // UTC days align to the epoch, so day bounds are plain arithmetic.
    let mut day_start = start_ms.div_euclid(DAY_MS) * DAY_MS;
    while day_start < end_ms {
        let day_end = day_start + DAY_MS;
        let overlap_start = start_ms.max(day_start);
        let overlap_end = end_ms.min(day_end);
        let overlap_ms = overlap_end - overlap_start;
        if overlap_ms > 0 {
            let proportion = overlap_ms as f64 / session.duration_ms as f64;
            slices.push(DaySlice {
                date: date_of(day_start),
                interval: Interval::new(overlap_start, overlap_end),
                download: session.download * proportion,
                upload: session.upload * proportion,
            });
        }
        day_start = day_end;
    }
    slices
}

fn date_of(epoch_ms: i64) -> NaiveDate {
    // Inputs are derived from validated chrono instants plus a checked
    // duration, so the instant is always in range.
    let instant = DateTime::from_timestamp_millis(epoch_ms);
    debug_assert!(instant.is_some(), "epoch-ms instant out of chrono range");
    instant.map(|dt| dt.date_naive()).unwrap_or_default()
}

fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Round half away from zero at `places` decimal places.
///
/// Float summation across many sessions may drift below the rounding
/// unit; applying this at finalization absorbs that drift.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[derive(Default)]
struct DayAccum {
    ranges: Vec<Interval>,
    download: f64,
    upload: f64,
    session_count: usize,
}

/// Aggregate raw session records into one [`DailyRecord`] per touched
/// calendar day, ordered ascending by date.
///
/// Records that fail validation follow `config.parse_policy`:
/// [`ParsePolicy::Strict`] aborts the batch with the offending field and
/// raw value, [`ParsePolicy::SkipInvalid`] drops the record and
/// aggregates the rest. Days with no overlapping session are absent from
/// the output, not zero-valued. Byte totals are rounded to three decimal
/// places at finalization.
pub fn aggregate_daily(
    records: &[RawSessionRecord],
    config: &EngineConfig,
) -> Result<Vec<DailyRecord>, UsageError> {
    let mut days: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();

    for record in records {
        let session = match Session::from_record(record) {
            Ok(session) => session,
            Err(err) => match config.parse_policy {
                ParsePolicy::Strict => return Err(err),
                ParsePolicy::SkipInvalid => continue,
            },
        };

        for slice in split_across_days(&session) {
            let accum = days.entry(slice.date).or_default();
            accum.ranges.push(slice.interval);
            accum.download += slice.download;
            accum.upload += slice.upload;
            accum.session_count += 1;
        }
    }

    // BTreeMap iteration is already chronological: ordering comes from
    // the calendar date, never from comparing formatted strings.
    Ok(days
        .into_iter()
        .map(|(date, accum)| finalize_day(date, accum, config))
        .collect())
}

fn finalize_day(date: NaiveDate, accum: DayAccum, config: &EngineConfig) -> DailyRecord {
    let day_start = day_start_ms(date);
    let day_end = day_start + DAY_MS;
    let active = interval::merge_intervals(accum.ranges, config.merge_gap_ms);
    let idle = interval::idle_gaps(&active, day_start, day_end, config.merge_gap_ms);
    DailyRecord {
        date,
        active_intervals: active,
        idle_intervals: idle,
        download: round_to(accum.download, 3),
        upload: round_to(accum.upload, 3),
        session_count: accum.session_count,
    }
}
