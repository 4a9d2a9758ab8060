//! Data streams configuration from environment variables.
//!
//! # Example
//!
//! ```ignore
//! use data_streams::DataStreamsConfig;
//!
//! let config = DataStreamsConfig::from_env()
//!     .with_service("billing-worker")
//!     .with_stats_buffer_capacity(1_000);
//! config.validate()?;
//! ```

use std::env;

use crate::error::ConfigError;

/// Default size of the stats ingestion buffer.
pub const DEFAULT_STATS_BUFFER_CAPACITY: usize = 10_000;

/// Service name used when none is configured.
pub const DEFAULT_SERVICE: &str = "unnamed-service";

/// Configuration for pathway tracking in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStreamsConfig {
    /// Identity of the local node, fixed for the process lifetime
    pub service: String,
    /// When false no sink is built; checkpoints still hash and propagate
    pub enabled: bool,
    /// Capacity of the bounded stats ingestion buffer
    pub stats_buffer_capacity: usize,
}

impl Default for DataStreamsConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            enabled: true,
            stats_buffer_capacity: DEFAULT_STATS_BUFFER_CAPACITY,
        }
    }
}

impl DataStreamsConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DSM_SERVICE` or `DD_SERVICE`: Local service name (default: unnamed-service)
    /// - `DSM_ENABLED`: Emit stats points (default: true)
    /// - `DSM_STATS_BUFFER_CAPACITY`: Ingestion buffer capacity (default: 10000)
    pub fn from_env() -> Self {
        Self {
            service: env::var("DSM_SERVICE")
                .or_else(|_| env::var("DD_SERVICE"))
                .unwrap_or_else(|_| DEFAULT_SERVICE.to_string()),

            enabled: env::var("DSM_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            stats_buffer_capacity: env::var("DSM_STATS_BUFFER_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_STATS_BUFFER_CAPACITY),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.trim().is_empty() {
            return Err(ConfigError::EmptyService);
        }
        if self.stats_buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Builder-style method to set the service name
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Builder-style method to enable or disable stats emission
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder-style method to set the ingestion buffer capacity
    pub fn with_stats_buffer_capacity(mut self, capacity: usize) -> Self {
        self.stats_buffer_capacity = capacity;
        self
    }
}
