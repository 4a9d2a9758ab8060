//! Stats forwarder: the receiving end of the ingestion buffer
//!
//! Drains stats points and feeds the Prometheus latency histograms. Bucketing
//! and export beyond that belong to the aggregation tier.

use pathway_telemetry::metric_observe;
use pathway_telemetry::metrics::nanos_to_seconds;
use pathway_telemetry::{EDGE_LATENCY, PATHWAY_LATENCY};
use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::domain::StatsPoint;

/// Consumes stats points from a [`ChannelSink`](crate::adapters::ChannelSink).
#[derive(Debug)]
pub struct StatsForwarder {
    receiver: mpsc::Receiver<StatsPoint>,
    forwarded: u64,
}

impl StatsForwarder {
    pub fn new(receiver: mpsc::Receiver<StatsPoint>) -> Self {
        Self {
            receiver,
            forwarded: 0,
        }
    }

    /// Forward points until every sink handle has been dropped.
    ///
    /// Returns the number of points forwarded. Spawn this as a background task.
    pub async fn run(mut self) -> u64 {
        info!("Stats forwarder started");
        while let Some(point) = self.receiver.recv().await {
            self.observe(&point);
        }
        info!(forwarded = self.forwarded, "Stats forwarder stopped");
        self.forwarded
    }

    /// Forward whatever is buffered right now and return it.
    pub fn drain(&mut self) -> Vec<StatsPoint> {
        let mut points = Vec::new();
        while let Ok(point) = self.receiver.try_recv() {
            self.observe(&point);
            points.push(point);
        }
        points
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    fn observe(&mut self, point: &StatsPoint) {
        metric_observe!(PATHWAY_LATENCY, nanos_to_seconds(point.pathway_latency_nanos));
        metric_observe!(EDGE_LATENCY, nanos_to_seconds(point.edge_latency_nanos));
        self.forwarded += 1;
        trace!(
            chain_hash = %format!("{:016x}", point.chain_hash),
            parent_chain_hash = %format!("{:016x}", point.parent_chain_hash),
            edge_tags = ?point.edge_tags,
            "Stats point forwarded"
        );
    }
}
