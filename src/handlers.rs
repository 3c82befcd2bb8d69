// HTTP handlers for the observability endpoints. These are thin wrappers
// around the shared Prometheus `Registry`; the worker itself never serves
// traffic beyond metrics and a liveness probe.
use axum::extract::Extension;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

/// Expose Prometheus text-format metrics gathered from the shared
/// `Registry` extension.
pub async fn metrics_handler(Extension(registry): Extension<Arc<Registry>>) -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8_lossy(&buffer).to_string()
}

/// Liveness probe. The process is healthy as long as it can answer at all;
/// gateway connectivity shows up in the metrics instead.
pub async fn health_handler() -> &'static str {
    "ok"
}
