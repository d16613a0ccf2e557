/// Default gap below which two adjacent active intervals are treated as
/// one continuous span: 60 seconds.
pub const DEFAULT_MERGE_GAP_MS: i64 = 60_000;

/// What the daily aggregator does with a record that fails validation.
///
/// The choice is the caller's, never implicit: a batch either aborts on
/// the first malformed record or aggregates everything that parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort the whole batch on the first malformed record.
    #[default]
    Strict,
    /// Drop malformed records and aggregate the rest.
    SkipInvalid,
}

/// Tunable knobs for one aggregation pass.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Gaps shorter than this many milliseconds are merged into the
    /// surrounding activity and never reported as idle time.
    pub merge_gap_ms: i64,
    /// Skip-vs-abort policy for malformed records.
    pub parse_policy: ParsePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merge_gap_ms: DEFAULT_MERGE_GAP_MS,
            parse_policy: ParsePolicy::default(),
        }
    }
}
