//! Prometheus metrics for the bracket server.
//!
//! Counters are recorded through the `metrics` facade. They are exported
//! only when a Prometheus listener is installed with [`init_metrics`];
//! otherwise recording is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use club_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("GET", "/api/v1/tournaments", 200);
//! ```

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Bracket Metrics
// ============================================================================

/// Increment created tournaments counter.
pub fn tournaments_created_total() {
    metrics::counter!("tournaments_created_total").increment(1);
}

/// Add generated round-1 matches.
pub fn matches_generated_total(count: usize) {
    metrics::counter!("matches_generated_total").increment(count as u64);
}

/// Increment recorded results counter. `action` is `record` or `reset`.
pub fn results_recorded_total(action: &str) {
    metrics::counter!("results_recorded_total",
        "action" => action.to_string()
    )
    .increment(1);
}

/// Increment win credit changes. `direction` is `credit` or `revoke`.
pub fn wins_credited_total(direction: &str) {
    metrics::counter!("wins_credited_total",
        "direction" => direction.to_string()
    )
    .increment(1);
}

// ============================================================================
// Gate Metrics
// ============================================================================

/// Increment rejected code counter. `gate` is `edit` or `access`.
pub fn access_denied_total(gate: &str) {
    metrics::counter!("access_denied_total",
        "gate" => gate.to_string()
    )
    .increment(1);
}
