//! Serializable rows handed to the display layer.
//!
//! Domain records keep typed dates and epoch intervals; these rows carry
//! the formatted strings the presentation side expects, with camelCase
//! keys on the wire.

use serde::Serialize;

use crate::daily::DailyRecord;
use crate::interval::{describe_active, describe_idle};
use crate::monthly::MonthlyRecord;
use crate::range::DateRange;
use crate::timefmt::format_date;

/// One daily row: formatted date, active spans, and idle summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportRow {
    /// `DD-MM-YYYY`.
    pub date: String,
    /// Wall-clock active spans, or `"No sessions"`.
    pub session_time: String,
    /// Idle gap summary, or `"No missed sessions"`.
    pub missed_session: String,
    pub download: f64,
    pub upload: f64,
}

impl From<&DailyRecord> for DailyReportRow {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: format_date(record.date),
            session_time: describe_active(&record.active_intervals),
            missed_session: describe_idle(&record.idle_intervals),
            download: record.download,
            upload: record.upload,
        }
    }
}

/// One monthly row keyed by `YYYY-MM`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportRow {
    pub date_key: String,
    pub download: f64,
    pub upload: f64,
    pub sessions: usize,
    pub unique_days: usize,
}

impl From<&MonthlyRecord> for MonthlyReportRow {
    fn from(record: &MonthlyRecord) -> Self {
        Self {
            date_key: record.date_key(),
            download: record.download,
            upload: record.upload,
            sessions: record.sessions,
            unique_days: record.active_days,
        }
    }
}

/// Resolved range endpoints as `DD-MM-YYYY` strings, `null` when the
/// preset did not resolve.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ResolvedRange {
    pub fn from_range(range: Option<&DateRange>) -> Self {
        Self {
            start_date: range.map(|r| format_date(r.start)),
            end_date: range.map(|r| format_date(r.end)),
        }
    }
}
