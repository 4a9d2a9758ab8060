//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging.
///
/// Metrics are not served by this crate; callers export them with
/// [`crate::encode_metrics`].
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Deployment environment (dev, staging, prod)
    pub environment: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "pathway-streams".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            environment: "dev".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DSM_SERVICE` or `DD_SERVICE`: Service name (default: pathway-streams)
    /// - `DSM_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DSM_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `DSM_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `DSM_ENV`: Deployment environment (default: dev)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("DSM_SERVICE")
                .or_else(|_| env::var("DD_SERVICE"))
                .unwrap_or_else(|_| "pathway-streams".to_string()),

            log_level: env::var("DSM_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("DSM_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("DSM_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            environment: env::var("DSM_ENV").unwrap_or_else(|_| "dev".to_string()),
        }
    }

    /// Override the service name, keeping every other setting.
    pub fn for_service(service_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = service_name.to_string();
        config
    }
}
