//! # Data Streams
//!
//! End-to-end latency tracking for payloads flowing through a pipeline of
//! services and message queues.
//!
//! Each hop records a checkpoint on an immutable [`Pathway`]. The chain hash
//! of a checkpoint identifies the node together with the whole path behind
//! it, so latencies can be aggregated per distinct route.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `Pathway`: hash-chained checkpoint value
//!   - `merge`: uniform sampling across converging branches
//!   - `Carrier`: request-scoped holder for the current pathway
//!   - `StatsPoint`: latency record emitted per checkpoint
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `AggregatorSink`: driven port, non-blocking hand-off of stats points
//!   - `KafkaMessage`: driving port, message metadata for the bus hooks
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `codec`: wire format under the `dd-pathway-ctx` header
//!   - `ChannelSink`: bounded `tokio` channel sink
//!   - `KafkaAdapter`: consume/produce hooks over `shared-bus` messages
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `DataStreams`: facade bound to the local service
//!   - `StatsForwarder`: feeds the latency histograms
//!
//! ## Invariants
//!
//! - Chain hashes are deterministic and independent of edge tag order
//! - Origin time is preserved by every checkpoint
//! - Emitting a stats point never blocks and never changes the result
//!
//! ## Usage Example
//!
//! ```ignore
//! use data_streams::{DataStreams, DataStreamsConfig, KafkaAdapter, Carrier};
//! use std::sync::Arc;
//!
//! let (streams, forwarder) = DataStreams::from_config(&DataStreamsConfig::from_env())?;
//! if let Some(forwarder) = forwarder {
//!     tokio::spawn(forwarder.run());
//! }
//!
//! let kafka = KafkaAdapter::new(Arc::new(streams));
//! let carrier = kafka.trace_kafka_consume(Carrier::new(), &message, "billing");
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    consume_edge_tags, decode, encode, produce_edge_tags, ChannelSink, KafkaAdapter,
    PROPAGATION_KEY,
};
pub use config::DataStreamsConfig;
pub use domain::{merge, merge_with_rng, node_hash, pathway_hash, Carrier, Pathway, StatsPoint};
pub use error::{ConfigError, DecodeError};
pub use ports::{AggregatorSink, EnqueueOutcome, KafkaMessage};
pub use service::{DataStreams, StatsForwarder};
