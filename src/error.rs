use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the aggregation engine.
///
/// Parse failures carry the offending field and the raw value so the
/// caller can decide whether to skip the record or abort the batch.
#[derive(Debug, Clone, Error)]
pub enum UsageError {
    /// A session record field could not be parsed.
    #[error("invalid {field} `{raw}`: {reason}")]
    Parse {
        field: &'static str,
        raw: String,
        reason: String,
    },

    /// A date range with its start after its end, rejected up front.
    #[error("invalid date bounds: {min} is after {max}")]
    InvalidBounds { min: NaiveDate, max: NaiveDate },
}
