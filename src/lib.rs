//! Temporal aggregation engine for network-session usage records.
//!
//! Raw login/logout session records are validated, split across the UTC
//! calendar days they span with proportional byte allocation, and
//! aggregated into per-day activity records with merged active intervals
//! and the complementary idle gaps. Daily records roll up into monthly
//! totals, and a calendar range resolver turns named presets (`today`,
//! `last7`, `thisMonth`, ...) into concrete date ranges clamped to the
//! data's bounds.
//!
//! The whole pipeline is pure and snapshot-based: records in, report
//! out, no clocks or process-wide state.
//!
//! ```
//! use netusage::{aggregate, EngineConfig, RawSessionRecord};
//!
//! let records = vec![RawSessionRecord {
//!     login_time: "01-01-2024 23:30:00".to_string(),
//!     session_time: "01:00:00".to_string(),
//!     download: 100.0,
//!     upload: 10.0,
//! }];
//! let report = aggregate(&records, &EngineConfig::default())?;
//!
//! // The session straddles midnight, so two days share its bytes
//! assert_eq!(report.daily.len(), 2);
//! assert_eq!(report.daily[0].download, 50.0);
//! assert_eq!(report.monthly[0].date_key(), "2024-01");
//! # Ok::<(), netusage::UsageError>(())
//! ```

pub mod config;
pub mod daily;
pub mod error;
pub mod interval;
pub mod monthly;
pub mod range;
pub mod report;
pub mod timefmt;

use serde::Serialize;

pub use config::{EngineConfig, ParsePolicy, DEFAULT_MERGE_GAP_MS};
pub use daily::{aggregate_daily, DailyRecord, RawSessionRecord, Session};
pub use error::UsageError;
pub use interval::Interval;
pub use monthly::{rollup_monthly, MonthlyRecord};
pub use range::{clamp_custom, match_preset, resolve, DataBounds, DateRange, DateRangePreset};
pub use report::{DailyReportRow, MonthlyReportRow, ResolvedRange};

/// Output of one full aggregation pass.
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub daily: Vec<DailyRecord>,
    pub monthly: Vec<MonthlyRecord>,
}

impl UsageReport {
    /// First and last day with data, the clamp target for the range
    /// resolver. `None` for an empty report.
    pub fn bounds(&self) -> Option<DataBounds> {
        let first = self.daily.first()?.date;
        let last = self.daily.last()?.date;
        // Daily records are ascending, so first <= last always holds
        DataBounds::new(first, last).ok()
    }
}

/// Run the full pipeline: validate, split, aggregate daily, roll up
/// monthly.
pub fn aggregate(
    records: &[RawSessionRecord],
    config: &EngineConfig,
) -> Result<UsageReport, UsageError> {
    let daily = aggregate_daily(records, config)?;
    let monthly = rollup_monthly(&daily);
    Ok(UsageReport { daily, monthly })
}
