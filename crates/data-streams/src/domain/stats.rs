//! Per-checkpoint latency record and wall-clock conversions

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Latency record produced by one checkpoint and handed to the aggregator.
///
/// Latencies are signed: a pathway decoded from another host can carry an
/// origin time ahead of the local clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPoint {
    /// Tags of the edge from the parent node to this node
    pub edge_tags: Vec<String>,
    /// Chain hash of the parent pathway (0 for an origin)
    pub parent_chain_hash: u64,
    /// Chain hash of the new pathway
    pub chain_hash: u64,
    /// Checkpoint time, Unix nanoseconds
    pub timestamp_nanos: i64,
    /// Checkpoint time minus pathway origin time
    pub pathway_latency_nanos: i64,
    /// Checkpoint time minus parent hop time
    pub edge_latency_nanos: i64,
}

/// Unix nanoseconds, negative before the epoch, saturating at the i64 range.
pub fn unix_nanos(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_nanos())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    }
}

/// Unix milliseconds, negative before the epoch, saturating at the i64 range.
pub fn unix_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_millis())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    }
}

/// Inverse of [`unix_millis`]. Out-of-range values collapse to the epoch.
pub fn from_unix_millis(millis: i64) -> SystemTime {
    let magnitude = Duration::from_millis(millis.unsigned_abs());
    let t = if millis >= 0 {
        UNIX_EPOCH.checked_add(magnitude)
    } else {
        UNIX_EPOCH.checked_sub(magnitude)
    };
    t.unwrap_or(UNIX_EPOCH)
}

/// `later - earlier` in nanoseconds.
pub(crate) fn elapsed_nanos(later: SystemTime, earlier: SystemTime) -> i64 {
    unix_nanos(later).saturating_sub(unix_nanos(earlier))
}
