//! Metrics collection
//!
//! Prometheus metrics for HTTP traffic, search, geocoding and the database.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGauge, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sportmap_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "sportmap_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "sportmap_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    // Search Metrics

    /// Searches by kind (`list`, `nearby`) and outcome
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sportmap_search_total",
        "Total number of facility searches",
        &["kind", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Rows returned per search
    pub static ref SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "sportmap_search_results",
        "Number of facilities returned by a search",
        &["kind"],
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("Failed to register SEARCH_RESULTS");

    // Geocoding Metrics

    /// Provider calls by outcome (`ok`, `bad_status`, `timeout`, `error`)
    pub static ref GEOCODING_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sportmap_geocoding_requests_total",
        "Total number of geocoding provider requests",
        &["outcome"]
    )
    .expect("Failed to register GEOCODING_REQUESTS_TOTAL");

    // Database Metrics

    /// Database query duration
    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "sportmap_db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register DB_QUERY_DURATION_SECONDS");

    /// Open database connections
    pub static ref DB_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sportmap_db_connections_active",
        "Number of open database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_ACTIVE");

    /// Idle database connections
    pub static ref DB_CONNECTIONS_IDLE: IntGauge = register_int_gauge!(
        "sportmap_db_connections_idle",
        "Number of idle database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_IDLE");
}

/// Path label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";
