//! Pathway: the hash-chained record of a payload's journey
//!
//! ```text
//! service A --edge 1--> service B --edge 2--> service C
//! ```
//!
//! Every hop produces a new value; nothing is mutated in place. The chain
//! hash identifies the node together with all of its ancestors, the origin
//! time is carried unchanged from the first checkpoint, and the hop time is
//! reset at every checkpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use pathway_telemetry::metric_inc;
use pathway_telemetry::metrics::{OUTCOME_ACCEPTED, OUTCOME_DROPPED};
use pathway_telemetry::{CHECKPOINTS, STATS_POINTS};

use super::hashing::{node_hash, pathway_hash};
use super::stats::{elapsed_nanos, unix_nanos, StatsPoint};
use crate::ports::{AggregatorSink, EnqueueOutcome};

/// Immutable checkpoint in a chain of services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pathway {
    /// Hash of this node, its incoming edge, and the parent chain
    chain_hash: u64,
    /// Time of the first checkpoint in the chain
    origin_time: SystemTime,
    /// Time this checkpoint was created
    hop_time: SystemTime,
    /// Service of the current node
    service: String,
    /// Tags on the edge from the parent to this node
    edge_tags: Vec<String>,
}

/// The zero value: hash 0, no service, both timestamps at the Unix epoch.
impl Default for Pathway {
    fn default() -> Self {
        Self {
            chain_hash: 0,
            origin_time: UNIX_EPOCH,
            hop_time: UNIX_EPOCH,
            service: String::new(),
            edge_tags: Vec::new(),
        }
    }
}

impl Pathway {
    /// Zero-hash anchor a chain starts from.
    ///
    /// Not itself a checkpoint: checkpointing the anchor yields a pathway
    /// whose parent chain hash is 0.
    pub fn root(service: impl Into<String>, now: SystemTime) -> Self {
        Self {
            chain_hash: 0,
            origin_time: now,
            hop_time: now,
            service: service.into(),
            edge_tags: Vec::new(),
        }
    }

    /// Start a new chain: an origin checkpoint with no edge tags.
    pub fn new(
        service: impl Into<String>,
        now: SystemTime,
        sink: Option<&dyn AggregatorSink>,
    ) -> Self {
        Self::root(service, now).checkpoint(now, Vec::<String>::new(), sink)
    }

    /// Rebuild a pathway received from another process.
    pub(crate) fn from_parts(
        chain_hash: u64,
        origin_time: SystemTime,
        hop_time: SystemTime,
        service: String,
    ) -> Self {
        Self {
            chain_hash,
            origin_time,
            hop_time,
            service,
            edge_tags: Vec::new(),
        }
    }

    pub fn chain_hash(&self) -> u64 {
        self.chain_hash
    }

    pub fn origin_time(&self) -> SystemTime {
        self.origin_time
    }

    pub fn hop_time(&self) -> SystemTime {
        self.hop_time
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn edge_tags(&self) -> &[String] {
        &self.edge_tags
    }

    /// Derive the child pathway and its stats point without emitting anything.
    pub fn child<I, S>(&self, now: SystemTime, edge_tags: I) -> (Pathway, StatsPoint)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let child = self.derive(now, edge_tags.into_iter().map(Into::into).collect());
        let point = self.stats_point(&child, now);
        (child, point)
    }

    /// Record arrival at the next node.
    ///
    /// When a sink is given, the stats point for this hop is offered to it.
    /// A full or closed sink never affects the returned pathway.
    pub fn checkpoint<I, S>(
        &self,
        now: SystemTime,
        edge_tags: I,
        sink: Option<&dyn AggregatorSink>,
    ) -> Pathway
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let child = self.derive(now, edge_tags.into_iter().map(Into::into).collect());
        metric_inc!(CHECKPOINTS);

        if let Some(sink) = sink {
            match sink.try_enqueue(self.stats_point(&child, now)) {
                EnqueueOutcome::Accepted => metric_inc!(STATS_POINTS, &[OUTCOME_ACCEPTED]),
                EnqueueOutcome::Dropped => metric_inc!(STATS_POINTS, &[OUTCOME_DROPPED]),
            }
        }

        child
    }

    /// [`checkpoint`](Self::checkpoint) at the current wall-clock time.
    pub fn set_checkpoint<I, S>(&self, edge_tags: I, sink: Option<&dyn AggregatorSink>) -> Pathway
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checkpoint(SystemTime::now(), edge_tags, sink)
    }

    fn derive(&self, now: SystemTime, edge_tags: Vec<String>) -> Pathway {
        Pathway {
            chain_hash: pathway_hash(node_hash(&self.service, &edge_tags), self.chain_hash),
            origin_time: self.origin_time,
            hop_time: now,
            service: self.service.clone(),
            edge_tags,
        }
    }

    fn stats_point(&self, child: &Pathway, now: SystemTime) -> StatsPoint {
        StatsPoint {
            edge_tags: child.edge_tags.clone(),
            parent_chain_hash: self.chain_hash,
            chain_hash: child.chain_hash,
            timestamp_nanos: unix_nanos(now),
            pathway_latency_nanos: elapsed_nanos(now, self.origin_time),
            edge_latency_nanos: elapsed_nanos(now, self.hop_time),
        }
    }
}
