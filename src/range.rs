//! Calendar range resolution: turning a named preset plus the data's
//! bounds into a concrete inclusive date range, and matching ranges back
//! to the preset that produced them.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::UsageError;

/// Named calendar spans the resolver understands.
///
/// Declaration order is also matcher precedence: [`match_preset`] returns
/// the first preset whose resolution equals the queried range, so the
/// more specific presets come first and `All` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    #[serde(rename = "last7")]
    Last7Days,
    #[serde(rename = "last30")]
    Last30Days,
    ThisMonth,
    LastMonth,
    Last3Months,
    Last6Months,
    ThisYear,
    LastYear,
    Last12Months,
    All,
    /// Caller-provided endpoints; never resolvable from the tag alone.
    Custom,
}

/// Inclusive calendar span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// First and last day for which data exists.
///
/// Construction validates `min <= max`, so a held value is always a
/// usable clamp target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBounds {
    min: NaiveDate,
    max: NaiveDate,
}

impl DataBounds {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Result<Self, UsageError> {
        if min > max {
            return Err(UsageError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }
}

/// Presets in matcher precedence order, `All` last before the `Custom`
/// fallback.
const MATCH_ORDER: &[DateRangePreset] = &[
    DateRangePreset::Today,
    DateRangePreset::Yesterday,
    DateRangePreset::ThisWeek,
    DateRangePreset::LastWeek,
    DateRangePreset::Last7Days,
    DateRangePreset::Last30Days,
    DateRangePreset::ThisMonth,
    DateRangePreset::LastMonth,
    DateRangePreset::Last3Months,
    DateRangePreset::Last6Months,
    DateRangePreset::ThisYear,
    DateRangePreset::LastYear,
    DateRangePreset::Last12Months,
    DateRangePreset::All,
];

/// Resolve a preset into a concrete inclusive range.
///
/// Pure: `today` is explicit and bounds are passed in, so resolution is
/// reproducible. Relative presets (`Last7Days`, `Last3Months`, ...)
/// anchor to `bounds.max` so "recent" means recent in the data, not on
/// the wall clock. `Today`/`Yesterday` anchor to `today`, falling back to
/// `bounds.max` when `today` lies outside the bounds.
///
/// When bounds are present both endpoints are clamped into them; a
/// preset wholly outside the data collapses to the nearest valid day
/// rather than producing an inverted range. Returns `None` for
/// [`DateRangePreset::Custom`] and for [`DateRangePreset::All`] without
/// bounds.
pub fn resolve(
    preset: DateRangePreset,
    today: NaiveDate,
    bounds: Option<&DataBounds>,
) -> Option<DateRange> {
    let anchor_today = match bounds {
        Some(b) if today < b.min || today > b.max => b.max,
        _ => today,
    };
    let anchor_end = bounds.map(|b| b.max).unwrap_or(today);

    let raw = match preset {
        DateRangePreset::Today => DateRange {
            start: anchor_today,
            end: anchor_today,
        },
        DateRangePreset::Yesterday => {
            let day = anchor_today - Duration::days(1);
            DateRange {
                start: day,
                end: day,
            }
        }
        DateRangePreset::ThisWeek => week_of(anchor_today),
        DateRangePreset::LastWeek => week_of(anchor_today - Duration::days(7)),
        DateRangePreset::Last7Days => DateRange {
            start: anchor_end - Duration::days(6),
            end: anchor_end,
        },
        DateRangePreset::Last30Days => DateRange {
            start: anchor_end - Duration::days(29),
            end: anchor_end,
        },
        DateRangePreset::ThisMonth => month_of(anchor_today),
        DateRangePreset::LastMonth => month_of(first_of_month(anchor_today) - Duration::days(1)),
        DateRangePreset::Last3Months => DateRange {
            start: months_back(anchor_end, 3),
            end: anchor_end,
        },
        DateRangePreset::Last6Months => DateRange {
            start: months_back(anchor_end, 6),
            end: anchor_end,
        },
        DateRangePreset::ThisYear => year_of(anchor_today.year()),
        DateRangePreset::LastYear => year_of(anchor_today.year() - 1),
        DateRangePreset::Last12Months => DateRange {
            start: months_back(anchor_end, 12),
            end: anchor_end,
        },
        DateRangePreset::All => {
            let b = bounds?;
            DateRange {
                start: b.min,
                end: b.max,
            }
        }
        DateRangePreset::Custom => return None,
    };

    Some(match bounds {
        Some(b) => clamp_range(raw, b),
        None => raw,
    })
}

/// Validate and clamp caller-provided custom endpoints.
pub fn clamp_custom(
    start: NaiveDate,
    end: NaiveDate,
    bounds: Option<&DataBounds>,
) -> Result<DateRange, UsageError> {
    if start > end {
        return Err(UsageError::InvalidBounds {
            min: start,
            max: end,
        });
    }
    let range = DateRange { start, end };
    Ok(match bounds {
        Some(b) => clamp_range(range, b),
        None => range,
    })
}

/// Find the preset that produces `range`, checking [`MATCH_ORDER`] and
/// falling back to [`DateRangePreset::Custom`].
pub fn match_preset(
    range: &DateRange,
    today: NaiveDate,
    bounds: Option<&DataBounds>,
) -> DateRangePreset {
    for &preset in MATCH_ORDER {
        if resolve(preset, today, bounds).as_ref() == Some(range) {
            return preset;
        }
    }
    DateRangePreset::Custom
}

/// Sunday-through-Saturday week containing `date`.
fn week_of(date: NaiveDate) -> DateRange {
    let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    DateRange {
        start,
        end: start + Duration::days(6),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    date.with_day(1).unwrap_or(date)
}

fn month_of(date: NaiveDate) -> DateRange {
    let start = first_of_month(date);
    DateRange {
        start,
        end: start + Months::new(1) - Duration::days(1),
    }
}

/// Inclusive start of an n-month lookback ending at `end`.
fn months_back(end: NaiveDate, n: u32) -> NaiveDate {
    end - Months::new(n) + Duration::days(1)
}

fn year_of(year: i32) -> DateRange {
    // Jan 1 and Dec 31 exist in every year chrono can represent
    DateRange {
        start: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
    }
}

fn clamp_range(range: DateRange, bounds: &DataBounds) -> DateRange {
    DateRange {
        start: range.start.clamp(bounds.min, bounds.max),
        end: range.end.clamp(bounds.min, bounds.max),
    }
}
