//! Prometheus metrics for the lookup service.
//!
//! Counters cover login attempts and searches; a histogram tracks document
//! store query latency. Metrics are recorded whether or not they have been
//! registered, and only registered ones appear in the `/metrics` output.
//!
//! # Example
//! ```no_run
//! use occupancy_lookup::metrics::{init_metrics, gather_metrics, LOGINS_TOTAL};
//!
//! init_metrics().ok();
//! LOGINS_TOTAL.with_label_values(&["accepted"]).inc();
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "occupancy_lookup";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Login attempts
    ///
    /// Labels: outcome (accepted, rejected, error)
    pub static ref LOGINS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("logins_total", "Total number of login attempts")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create LOGINS_TOTAL metric");

    /// Record searches
    ///
    /// Labels: field, outcome (found, not_found, skipped, error)
    pub static ref SEARCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("searches_total", "Total number of record searches")
            .namespace(NAMESPACE),
        &["field", "outcome"]
    ).expect("Failed to create SEARCHES_TOTAL metric");

    /// Document store query latency in seconds
    ///
    /// Labels: collection
    pub static ref STORE_QUERY_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "store_query_duration_seconds",
            "Document store query duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["collection"]
    ).expect("Failed to create STORE_QUERY_DURATION_SECONDS metric");
}

/// Register all metrics with the global registry.
///
/// Fails if called more than once per process.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(LOGINS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCHES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(STORE_QUERY_DURATION_SECONDS.clone()))?;

    tracing::debug!("Prometheus metrics registered");
    Ok(())
}

/// Encode registered metrics in the Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
