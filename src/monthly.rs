//! Monthly rollups over the daily aggregation output.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::daily::{round_to, DailyRecord};

/// Aggregated usage for one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRecord {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub download: f64,
    pub upload: f64,
    /// Total session touches summed over the month's daily records.
    pub sessions: usize,
    /// Number of days in the month with any recorded activity.
    pub active_days: usize,
}

impl MonthlyRecord {
    /// Stable `YYYY-MM` key for display and lookups.
    pub fn date_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Default)]
struct MonthAccum {
    download: f64,
    upload: f64,
    sessions: usize,
    active_days: usize,
}

/// Roll daily records up into one [`MonthlyRecord`] per calendar month,
/// ordered ascending.
///
/// Operates on the already-rounded daily totals; monthly byte totals are
/// rounded to two decimal places. Months with no active day are absent
/// from the output.
pub fn rollup_monthly(daily: &[DailyRecord]) -> Vec<MonthlyRecord> {
    let mut months: BTreeMap<(i32, u32), MonthAccum> = BTreeMap::new();

    for record in daily {
        let accum = months
            .entry((record.date.year(), record.date.month()))
            .or_default();
        accum.download += record.download;
        accum.upload += record.upload;
        accum.sessions += record.session_count;
        accum.active_days += 1;
    }

    months
        .into_iter()
        .map(|((year, month), accum)| MonthlyRecord {
            year,
            month,
            download: round_to(accum.download, 2),
            upload: round_to(accum.upload, 2),
            sessions: accum.sessions,
            active_days: accum.active_days,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::daily::{aggregate_daily, RawSessionRecord};

    fn record(login: &str, duration: &str, download: f64, upload: f64) -> RawSessionRecord {
        RawSessionRecord {
            login_time: login.to_string(),
            session_time: duration.to_string(),
            download,
            upload,
        }
    }

    #[test]
    fn test_rollup_matches_daily_sums() {
        let records = vec![
            record("05-01-2024 10:00:00", "01:00:00", 10.25, 1.5),
            record("06-01-2024 10:00:00", "01:00:00", 20.5, 2.25),
            record("06-01-2024 14:00:00", "01:00:00", 5.0, 0.5),
        ];
        let daily = aggregate_daily(&records, &EngineConfig::default()).unwrap();
        let monthly = rollup_monthly(&daily);

        assert_eq!(monthly.len(), 1);
        let jan = &monthly[0];
        assert_eq!((jan.year, jan.month), (2024, 1));
        assert_eq!(jan.date_key(), "2024-01");
        assert_eq!(jan.active_days, 2);
        assert_eq!(jan.sessions, 3);

        let down: f64 = daily.iter().map(|d| d.download).sum();
        let up: f64 = daily.iter().map(|d| d.upload).sum();
        assert!((jan.download - down).abs() < 0.005);
        assert!((jan.upload - up).abs() < 0.005);
    }

    #[test]
    fn test_rollup_year_boundary_order() {
        // December 2023 must sort before January 2024
        let records = vec![
            record("15-01-2024 10:00:00", "01:00:00", 2.0, 0.2),
            record("15-12-2023 10:00:00", "01:00:00", 1.0, 0.1),
        ];
        let daily = aggregate_daily(&records, &EngineConfig::default()).unwrap();
        let monthly = rollup_monthly(&daily);

        let keys: Vec<String> = monthly.iter().map(|m| m.date_key()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn test_rollup_counts_split_session_on_both_days() {
        // A midnight-spanning session counts toward both days' session
        // totals, so the monthly `sessions` figure is touches, not
        // distinct logins
        let records = vec![record("31-01-2024 23:30:00", "01:00:00", 100.0, 10.0)];
        let daily = aggregate_daily(&records, &EngineConfig::default()).unwrap();
        let monthly = rollup_monthly(&daily);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].date_key(), "2024-01");
        assert_eq!(monthly[1].date_key(), "2024-02");
        assert_eq!(monthly[0].sessions, 1);
        assert_eq!(monthly[1].sessions, 1);
        assert!((monthly[0].download - 50.0).abs() < 0.005);
        assert!((monthly[1].download - 50.0).abs() < 0.005);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        // 1.125 and -1.125 are exactly representable in binary
        assert_eq!(round_to(1.125, 2), 1.13);
        assert_eq!(round_to(-1.125, 2), -1.13);
    }

    #[test]
    fn test_rollup_empty() {
        assert!(rollup_monthly(&[]).is_empty());
    }
}
