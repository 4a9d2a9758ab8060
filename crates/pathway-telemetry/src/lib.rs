//! # Pathway Telemetry
//!
//! Logging and metrics for pathway latency tracking.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with pretty or JSON output
//! - **Metrics**: Prometheus counters and latency histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pathway_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DSM_SERVICE` | `pathway-streams` | Service name in logs |
//! | `DSM_LOG_LEVEL` | `info` | Log level filter |
//! | `DSM_JSON_LOGS` | `false` | JSON log output |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, CHECKPOINTS, DECODE_FAILURES, EDGE_LATENCY, MERGES,
    PATHWAY_LATENCY, STATS_POINTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The tracing subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// A Prometheus collector could not be registered or encoded
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register metrics.
///
/// Call once at process start.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Metrics first, so anything logged during tracing setup is counted
    register_metrics()?;
    tracing_setup::init_tracing(config)?;
    Ok(())
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
