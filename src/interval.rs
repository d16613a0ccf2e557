//! Time-interval primitives: merging active spans and computing the
//! complementary idle gaps within a day.

use serde::Serialize;

use crate::timefmt::format_clock_time;

/// Milliseconds in one UTC calendar day.
pub const DAY_MS: i64 = 86_400_000;

/// Sentinel rendered when a day has no idle gaps above the threshold.
pub const NO_MISSED_SESSIONS: &str = "No missed sessions";

/// Sentinel rendered when a day has no active intervals.
pub const NO_SESSIONS: &str = "No sessions";

/// Half-open `[start_ms, end_ms)` span in UTC epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Interval {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        debug_assert!(start_ms <= end_ms);
        Self { start_ms, end_ms }
    }

    /// Width in milliseconds.
    pub fn len_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Merge an unordered set of intervals, treating gaps below `gap_ms` as
/// continuous activity.
///
/// Sorts by start, then folds in a single scan: an interval starting
/// before the last accepted end plus `gap_ms` extends that interval,
/// anything else opens a new one. Idempotent -- merging an
/// already-merged sequence returns it unchanged.
pub fn merge_intervals(mut intervals: Vec<Interval>, gap_ms: i64) -> Vec<Interval> {
    if intervals.is_empty() {
        return intervals;
    }
    intervals.sort_by_key(|iv| (iv.start_ms, iv.end_ms));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start_ms < last.end_ms + gap_ms => {
                last.end_ms = last.end_ms.max(iv.end_ms);
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Idle gaps within `[day_start, day_end)` not covered by `merged`.
///
/// `merged` must come from [`merge_intervals`] (sorted, disjoint). Walks
/// the intervals in order, emitting the region since the previous end as
/// a gap, plus a final gap up to `day_end`. Gaps shorter than `gap_ms`
/// are dropped -- the merge step already treats them as continuous.
pub fn idle_gaps(merged: &[Interval], day_start: i64, day_end: i64, gap_ms: i64) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut last_end = day_start;
    for iv in merged {
        if iv.start_ms - last_end >= gap_ms {
            gaps.push(Interval::new(last_end, iv.start_ms));
        }
        last_end = last_end.max(iv.end_ms);
    }
    if day_end - last_end >= gap_ms {
        gaps.push(Interval::new(last_end, day_end));
    }
    gaps
}

/// Render a gap length as whole hours and minutes, seconds truncated.
pub fn format_gap_duration(ms: i64) -> String {
    let total_minutes = ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{} hour{}", hours, if hours > 1 { "s" } else { "" }));
    }
    if minutes > 0 {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!(
            "{} minute{}",
            minutes,
            if minutes > 1 { "s" } else { "" }
        ));
    }
    if out.is_empty() {
        out.push_str("0 minutes");
    }
    out
}

/// Human-readable idle summary for a day, e.g. `"2 hours 5 minutes, 12 minutes"`.
pub fn describe_idle(gaps: &[Interval]) -> String {
    if gaps.is_empty() {
        return NO_MISSED_SESSIONS.to_string();
    }
    gaps.iter()
        .map(|g| format_gap_duration(g.len_ms()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wall-clock summary of a day's merged active intervals, e.g.
/// `"09:00:00 - 10:00:00, 11:30:00 - 12:00:00"`.
pub fn describe_active(merged: &[Interval]) -> String {
    if merged.is_empty() {
        return NO_SESSIONS.to_string();
    }
    merged
        .iter()
        .map(|iv| {
            format!(
                "{} - {}",
                format_clock_time(iv.start_ms),
                format_clock_time(iv.end_ms)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;
    const MINUTE: i64 = 60_000;
    const GAP: i64 = 60_000;

    fn iv(start: i64, end: i64) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn test_merge_sub_threshold_gap() {
        // 09:00-10:00 and 10:00:30-11:00 (gap 30s < 60s) merge into one
        let merged = merge_intervals(
            vec![iv(9 * HOUR, 10 * HOUR), iv(10 * HOUR + 30_000, 11 * HOUR)],
            GAP,
        );
        assert_eq!(merged, vec![iv(9 * HOUR, 11 * HOUR)]);
    }

    #[test]
    fn test_merge_keeps_threshold_gap() {
        // 09:00-10:00 and 10:02-11:00 (gap 120s >= 60s) stay separate
        let merged = merge_intervals(
            vec![iv(9 * HOUR, 10 * HOUR), iv(10 * HOUR + 2 * MINUTE, 11 * HOUR)],
            GAP,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_sorts_and_swallows_contained() {
        let merged = merge_intervals(
            vec![iv(5 * HOUR, 6 * HOUR), iv(1 * HOUR, 4 * HOUR), iv(2 * HOUR, 3 * HOUR)],
            GAP,
        );
        assert_eq!(merged, vec![iv(1 * HOUR, 4 * HOUR), iv(5 * HOUR, 6 * HOUR)]);
    }

    #[test]
    fn test_merge_idempotent() {
        let input = vec![
            iv(9 * HOUR, 10 * HOUR),
            iv(10 * HOUR + 30_000, 11 * HOUR),
            iv(13 * HOUR, 14 * HOUR),
            iv(13 * HOUR + 30 * MINUTE, 15 * HOUR),
        ];
        let once = merge_intervals(input, GAP);
        let twice = merge_intervals(once.clone(), GAP);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_intervals(Vec::new(), GAP).is_empty());
    }

    #[test]
    fn test_idle_gaps_complement_active() {
        let active = merge_intervals(
            vec![iv(9 * HOUR, 10 * HOUR), iv(10 * HOUR + 2 * MINUTE, 11 * HOUR)],
            GAP,
        );
        let gaps = idle_gaps(&active, 0, DAY_MS, GAP);

        // 00:00-09:00, 10:00-10:02, 11:00-24:00
        assert_eq!(gaps.len(), 3);
        assert_eq!(gaps[1].len_ms(), 2 * MINUTE);

        // Active and idle together tile the whole day with no overlap
        let mut spans: Vec<Interval> = active.iter().chain(gaps.iter()).copied().collect();
        spans.sort_by_key(|s| s.start_ms);
        let mut cursor = 0;
        for span in &spans {
            assert_eq!(span.start_ms, cursor);
            cursor = span.end_ms;
        }
        assert_eq!(cursor, DAY_MS);
    }

    #[test]
    fn test_idle_gaps_drop_sub_threshold() {
        // Gap of 30s between day start and first interval is swallowed
        let active = vec![iv(30_000, DAY_MS - 30_000)];
        let gaps = idle_gaps(&active, 0, DAY_MS, GAP);
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_idle_gaps_empty_day() {
        let gaps = idle_gaps(&[], 0, DAY_MS, GAP);
        assert_eq!(gaps, vec![iv(0, DAY_MS)]);
    }

    #[test]
    fn test_format_gap_duration() {
        assert_eq!(format_gap_duration(2 * HOUR + 5 * MINUTE), "2 hours 5 minutes");
        assert_eq!(format_gap_duration(HOUR), "1 hour");
        assert_eq!(format_gap_duration(MINUTE), "1 minute");
        assert_eq!(format_gap_duration(2 * MINUTE), "2 minutes");
        // Seconds truncate rather than round
        assert_eq!(format_gap_duration(MINUTE + 59_000), "1 minute");
        assert_eq!(format_gap_duration(59_000), "0 minutes");
    }

    #[test]
    fn test_describe_sentinels() {
        assert_eq!(describe_idle(&[]), NO_MISSED_SESSIONS);
        assert_eq!(describe_active(&[]), NO_SESSIONS);
    }

    #[test]
    fn test_describe_active_format() {
        // 2024-01-01 09:00:00 UTC
        let base = 1_704_099_600_000;
        let text = describe_active(&[iv(base, base + HOUR)]);
        assert_eq!(text, "09:00:00 - 10:00:00");
    }
}
