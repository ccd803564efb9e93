//! Activity metrics port (outbound).

use time::OffsetDateTime;

/// No-op implementation of ActivityMetrics.
///
/// Used when metrics are disabled.
impl ActivityMetrics for () {
    fn count(&self, _category: &str) {}

    fn duration_of(&self, _category: &str, _started_at: OffsetDateTime) {}
}

/// Outbound port for activity instrumentation.
///
/// Methods are infallible: recording a metric can never fail the operation
/// that reports it.
pub trait ActivityMetrics: Send + Sync + 'static {
    /// Count a started activity under its category.
    fn count(&self, category: &str);

    /// Observe the time elapsed since `started_at`, keyed by category.
    fn duration_of(&self, category: &str, started_at: OffsetDateTime);
}
