//! Runtime configuration for the demonstration pipeline.

use std::env;

/// Shape of the simulated workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Payloads produced by the ingest stage
    pub messages: usize,
    /// Payloads merged into one settlement at the billing stage
    pub batch_size: usize,
    /// Partitions spread across the orders topic
    pub partitions: i32,
    /// Broadcast capacity of the in-memory bus
    pub bus_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            messages: 200,
            batch_size: 4,
            partitions: 3,
            bus_capacity: 4096,
        }
    }
}

impl PipelineConfig {
    /// Load overrides from `PIPELINE_MESSAGES`, `PIPELINE_BATCH_SIZE`,
    /// `PIPELINE_PARTITIONS` and `PIPELINE_BUS_CAPACITY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            messages: parse_var("PIPELINE_MESSAGES").unwrap_or(defaults.messages),
            batch_size: parse_var("PIPELINE_BATCH_SIZE")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.batch_size),
            partitions: parse_var("PIPELINE_PARTITIONS")
                .filter(|&n: &i32| n > 0)
                .unwrap_or(defaults.partitions),
            bus_capacity: parse_var("PIPELINE_BUS_CAPACITY")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.bus_capacity),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
