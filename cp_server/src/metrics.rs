//! Prometheus metrics for the casino server.
//!
//! Counters are recorded through the `metrics` facade. Without an installed
//! exporter they are no-ops, so handlers record unconditionally.
//!
//! ```rust,no_run
//! use cp_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//! metrics::simulations_total("roulette");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter with a scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Casino Metrics
// ============================================================================

pub fn simulations_total(game: &str) {
    metrics::counter!("casino_simulations_total", "game" => game.to_string()).increment(1);
}

/// `outcome` is `ok` or `insufficient_history`.
pub fn predictions_total(game: &str, outcome: &str) {
    metrics::counter!("casino_predictions_total",
        "game" => game.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// `outcome` is `answered` or `rejected`.
pub fn chat_requests_total(outcome: &str) {
    metrics::counter!("casino_chat_requests_total", "outcome" => outcome.to_string())
        .increment(1);
}

pub fn table_resets_total(game: &str) {
    metrics::counter!("casino_table_resets_total", "game" => game.to_string()).increment(1);
}
