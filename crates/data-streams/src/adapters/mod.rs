//! Adapters Layer
//!
//! Connects the pathway core to the outside world:
//! - `codec`: binary wire format for propagated pathways
//! - `channel_sink`: bounded channel in front of the aggregation tier
//! - `kafka`: consume/produce hooks over the shared message bus

pub mod channel_sink;
pub mod codec;
pub mod kafka;

pub use channel_sink::ChannelSink;
pub use codec::{decode, encode, PROPAGATION_KEY};
pub use kafka::{consume_edge_tags, produce_edge_tags, KafkaAdapter};
