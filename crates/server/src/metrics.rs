//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the reelscout server:
//! - HTTP request metrics (latency, counts)
//! - WebSocket connection metrics
//! - Search page status (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelscout_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelscout_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "reelscout_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

/// Active WebSocket connections.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "reelscout_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

/// Total WebSocket connections (cumulative).
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "reelscout_ws_connections_total",
        "Total WebSocket connections since startup",
    )
    .unwrap()
});

/// WebSocket state snapshots sent.
pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelscout_ws_messages_sent_total", "WebSocket messages sent"),
        &["type"],
    )
    .unwrap()
});

// =============================================================================
// Search Page Metrics (collected dynamically)
// =============================================================================

/// Whether the search coordinator is running (1) or stopped (0).
pub static COORDINATOR_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "reelscout_coordinator_running",
        "Whether the search coordinator is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Movies currently shown.
pub static MOVIES_SHOWN: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("reelscout_movies_shown", "Number of movies currently shown").unwrap()
});

/// Trending rows currently shown.
pub static TRENDING_SHOWN: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "reelscout_trending_shown",
        "Number of trending search terms currently shown",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // WebSocket
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();

    // Search page
    registry
        .register(Box::new(COORDINATOR_RUNNING.clone()))
        .unwrap();
    registry.register(Box::new(MOVIES_SHOWN.clone())).unwrap();
    registry
        .register(Box::new(TRENDING_SHOWN.clone()))
        .unwrap();

    // Core metrics (fetch cycles, trend store, external services)
    for metric in reelscout_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Update gauges from the current search page state.
pub fn collect_dynamic_metrics(state: &AppState) {
    let coordinator = state.coordinator();
    COORDINATOR_RUNNING.set(if coordinator.is_running() { 1 } else { 0 });

    let snapshot = coordinator.snapshot();
    MOVIES_SHOWN.set(snapshot.movies.len() as i64);
    TRENDING_SHOWN.set(snapshot.trending.len() as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("reelscout_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        // Vec metrics only appear once a label set has been touched
        reelscout_core::metrics::FETCH_CYCLES
            .with_label_values(&["search", "success"])
            .inc();
        reelscout_core::metrics::TREND_RECORDS
            .with_label_values(&["created"])
            .inc();
        WS_CONNECTIONS_ACTIVE.set(0);
        COORDINATOR_RUNNING.set(0);

        let output = encode_metrics();

        assert!(output.contains("reelscout_ws_connections_active"));
        assert!(output.contains("reelscout_coordinator_running"));
        assert!(output.contains("reelscout_fetch_cycles_total"));
        assert!(output.contains("reelscout_trend_records_total"));
    }
}
