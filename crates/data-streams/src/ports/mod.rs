//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driven Ports (outbound) - the aggregation tier that receives stats points
//! - Driving Ports (inbound) - message metadata read and written by bus hooks

pub mod inbound;
pub mod outbound;

pub use inbound::KafkaMessage;
pub use outbound::{AggregatorSink, EnqueueOutcome};
