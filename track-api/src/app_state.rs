use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::domain::ports::inbound::ActivityService;

#[derive(Clone)]
pub struct AppState {
    pub activity_service: Arc<dyn ActivityService>,
    /// Present when the Prometheus recorder is installed.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(activity_service: Arc<dyn ActivityService>) -> Self {
        Self {
            activity_service,
            metrics_handle: None,
        }
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
