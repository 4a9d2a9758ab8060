//! Prometheus metrics for pathway latency tracking.
//!
//! All metrics follow the naming convention: `dsm_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: checkpoints created, stats points accepted/dropped
//! - **Histogram**: pathway and edge latency distributions

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

/// Outcome label for a stats point handed to the aggregator.
pub const OUTCOME_ACCEPTED: &str = "accepted";

/// Outcome label for a stats point dropped at a full buffer.
pub const OUTCOME_DROPPED: &str = "dropped";

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CHECKPOINT METRICS
    // =========================================================================

    /// Total checkpoints created (origin checkpoints included)
    pub static ref CHECKPOINTS: Counter = Counter::new(
        "dsm_checkpoints_total",
        "Total number of pathway checkpoints created"
    ).expect("metric creation failed");

    /// Stats points offered to the aggregator, by outcome
    pub static ref STATS_POINTS: CounterVec = CounterVec::new(
        Opts::new("dsm_stats_points_total", "Stats points offered to the aggregator"),
        &["outcome"]  // outcome: accepted/dropped
    ).expect("metric creation failed");

    /// Merges of converging pathways
    pub static ref MERGES: Counter = Counter::new(
        "dsm_pathway_merges_total",
        "Total number of pathway merges"
    ).expect("metric creation failed");

    // =========================================================================
    // PROPAGATION METRICS
    // =========================================================================

    /// Propagation headers that could not be decoded
    pub static ref DECODE_FAILURES: Counter = Counter::new(
        "dsm_pathway_decode_failures_total",
        "Propagated pathways that failed to decode"
    ).expect("metric creation failed");

    // =========================================================================
    // LATENCY METRICS
    // =========================================================================

    /// Time since pipeline origin
    pub static ref PATHWAY_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dsm_pathway_latency_seconds",
            "Time elapsed since the origin of the pathway"
        ).buckets(exponential_buckets(0.0001, 2.0, 20).unwrap())
    ).expect("metric creation failed");

    /// Time since previous hop
    pub static ref EDGE_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dsm_edge_latency_seconds",
            "Time elapsed since the previous checkpoint"
        ).buckets(exponential_buckets(0.0001, 2.0, 20).unwrap())
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CHECKPOINTS.clone()),
        Box::new(STATS_POINTS.clone()),
        Box::new(MERGES.clone()),
        Box::new(DECODE_FAILURES.clone()),
        Box::new(PATHWAY_LATENCY.clone()),
        Box::new(EDGE_LATENCY.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Convert a signed nanosecond latency to seconds, clamping clock skew to zero.
pub fn nanos_to_seconds(nanos: i64) -> f64 {
    nanos.max(0) as f64 / 1_000_000_000.0
}
