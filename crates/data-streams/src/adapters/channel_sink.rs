//! Bounded channel in front of the aggregation tier
//!
//! `try_send` on a bounded `tokio::sync::mpsc` channel is the whole
//! discipline: it never waits for capacity and resolves immediately to
//! accepted or dropped. The receiving half is drained by a
//! [`StatsForwarder`](crate::service::StatsForwarder).

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::StatsPoint;
use crate::ports::{AggregatorSink, EnqueueOutcome};

/// Aggregator sink backed by a bounded multi-producer channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<StatsPoint>,
    capacity: usize,
}

impl ChannelSink {
    /// Create a sink and the receiver the aggregation tier reads from.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StatsPoint>) {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender, capacity }, receiver)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now. Racy by nature; for diagnostics only.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }
}

impl AggregatorSink for ChannelSink {
    fn try_enqueue(&self, point: StatsPoint) -> EnqueueOutcome {
        match self.sender.try_send(point) {
            Ok(()) => EnqueueOutcome::Accepted,
            Err(TrySendError::Full(point)) => {
                warn!(
                    capacity = self.capacity,
                    chain_hash = %format!("{:016x}", point.chain_hash),
                    "Aggregator input channel full, disregarding stats point"
                );
                EnqueueOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Aggregator stopped, disregarding stats point");
                EnqueueOutcome::Dropped
            }
        }
    }
}
