use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
    })?;

    if METRICS_HANDLE.set(handle).is_err() {
        tracing::warn!("Metrics handle already set");
    }
    Ok(())
}

pub fn render_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one call to the curriculum API by outcome.
pub fn record_curriculum_request(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "curriculum_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
