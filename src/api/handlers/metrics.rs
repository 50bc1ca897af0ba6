use crate::metrics;

/// Prometheus text exposition endpoint
pub async fn get_metrics() -> String {
    metrics::render()
}
