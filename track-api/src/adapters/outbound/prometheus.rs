//! Prometheus-backed implementation of the ActivityMetrics port.

use metrics_exporter_prometheus::{
    BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use time::OffsetDateTime;

use crate::domain::ports::outbound::ActivityMetrics;

pub const ACTIVITIES_STARTED: &str = "activities_started_total";
pub const ACTIVITY_DURATION: &str = "activity_duration_milliseconds";

const DURATION_QUANTILES: &[f64] = &[0.5, 0.9, 0.99];

/// Reports activity metrics through the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusActivityMetrics;

impl ActivityMetrics for PrometheusActivityMetrics {
    fn count(&self, category: &str) {
        metrics::counter!(ACTIVITIES_STARTED, "category" => category.to_owned()).increment(1);
    }

    fn duration_of(&self, category: &str, started_at: OffsetDateTime) {
        let elapsed = OffsetDateTime::now_utc() - started_at;
        // clock skew can put started_at in the future
        let millis = (elapsed.as_seconds_f64() * 1000.0).max(0.0);
        metrics::histogram!(ACTIVITY_DURATION, "category" => category.to_owned()).record(millis);
    }
}

/// Build a recorder whose histograms render as summaries with the p50, p90
/// and p99 quantiles.
#[cfg(test)]
pub fn build_recorder() -> Result<PrometheusRecorder, BuildError> {
    Ok(PrometheusBuilder::new()
        .set_quantiles(DURATION_QUANTILES)?
        .build_recorder())
}

/// Install the recorder globally and return the handle used to render the
/// exposition text.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_quantiles(DURATION_QUANTILES)?
        .install_recorder()
}
