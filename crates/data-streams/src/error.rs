//! Error types for pathway propagation and configuration

use thiserror::Error;

/// Errors from decoding a propagated pathway
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Encoded pathway too short: {len} bytes, need at least 8 for the hash")]
    TooShort { len: usize },

    #[error("Truncated varint while reading {field}")]
    Truncated { field: &'static str },

    #[error("Varint overflows 64 bits while reading {field}")]
    VarintOverflow { field: &'static str },
}

/// Errors from validating data streams configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Service name must not be empty")]
    EmptyService,

    #[error("Stats buffer capacity must be greater than zero")]
    ZeroCapacity,
}
