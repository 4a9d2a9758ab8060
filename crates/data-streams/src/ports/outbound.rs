//! Outbound Ports (Driven Ports)
//!
//! The aggregation tier is an external collaborator. The core only needs a
//! place to hand off stats points that never makes the caller wait.

use crate::domain::StatsPoint;

/// Result of offering a stats point to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The point was buffered for aggregation.
    Accepted,
    /// The buffer was full or closed; the point is gone.
    Dropped,
}

/// Ingestion point of the aggregation tier (Driven Port)
///
/// Implementations must return in bounded, effectively constant time and
/// must never block, retry or back off. Delivery is at-most-once.
pub trait AggregatorSink: Send + Sync {
    /// Offer a stats point without waiting.
    fn try_enqueue(&self, point: StatsPoint) -> EnqueueOutcome;
}
