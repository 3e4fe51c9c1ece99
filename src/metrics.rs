//! Prometheus metrics
//!
//! Request rates and latencies, gradient resolutions, login outcomes and
//! collection sizes. Labels stay low-cardinality: ids are normalized out of
//! paths and never used as labels.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry};

lazy_static! {
    /// Global metrics registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // Request Metrics
    // ============================================================================

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "club_http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["method", "endpoint", "status"]
    ).unwrap();

    /// Total HTTP requests
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("club_http_requests_total", "Total HTTP requests"),
        &["method", "endpoint", "status"]
    ).unwrap();

    // ============================================================================
    // Content Metrics
    // ============================================================================

    /// Card gradient resolutions by rendering kind (class / inline_style / fallback)
    pub static ref GRADIENT_RESOLUTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("club_gradient_resolutions_total", "Card gradients resolved"),
        &["kind"]
    ).unwrap();

    /// Documents currently stored, per collection
    pub static ref DOCUMENTS_BY_COLLECTION: IntGaugeVec = IntGaugeVec::new(
        Opts::new("club_documents", "Documents stored per collection"),
        &["collection"]
    ).unwrap();

    // ============================================================================
    // Auth Metrics
    // ============================================================================

    /// Admin login attempts (success / invalid / rejected)
    pub static ref LOGIN_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("club_login_attempts_total", "Admin login attempts"),
        &["result"]
    ).unwrap();
}

/// Register all metrics with the global registry
pub fn register_metrics() -> Result<(), prometheus::Error> {
    METRICS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION.clone()))?;
    METRICS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;

    METRICS_REGISTRY.register(Box::new(GRADIENT_RESOLUTIONS_TOTAL.clone()))?;
    METRICS_REGISTRY.register(Box::new(DOCUMENTS_BY_COLLECTION.clone()))?;

    METRICS_REGISTRY.register(Box::new(LOGIN_ATTEMPTS_TOTAL.clone()))?;

    Ok(())
}

/// Count one resolved gradient
pub fn record_gradient(kind: &str) {
    GRADIENT_RESOLUTIONS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_login(result: &str) {
    LOGIN_ATTEMPTS_TOTAL.with_label_values(&[result]).inc();
}
