//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search coordinator (fetch cycles, result counts)
//! - Trend store (records by outcome, trending loads)
//! - External services (catalog, row store)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Fetch cycles total by result.
pub static FETCH_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelscout_fetch_cycles_total", "Total movie fetch cycles"),
        &["mode", "result"], // mode: "discover", "search"; result: "success", "failed"
    )
    .unwrap()
});

/// Movies returned per fetch cycle.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelscout_search_results",
            "Number of movies returned per fetch cycle",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Trend Metrics
// =============================================================================

/// Search term records by outcome.
pub static TREND_RECORDS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelscout_trend_records_total",
            "Total search term records",
        ),
        &["outcome"], // "created", "incremented", "failed"
    )
    .unwrap()
});

/// Trending list loads by result.
pub static TRENDING_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelscout_trending_loads_total", "Total trending list loads"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelscout_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelscout_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "result"], // service: "tmdb", "appwrite"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(FETCH_CYCLES.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Trends
        Box::new(TREND_RECORDS.clone()),
        Box::new(TRENDING_LOADS.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
