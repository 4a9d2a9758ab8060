//! Kafka-style consume and produce hooks
//!
//! On consume the propagated pathway is pulled out of the message headers and
//! checkpointed with the inbound edge. On produce the carried pathway is
//! checkpointed with the outbound edge and written back into the headers.
//!
//! ```text
//! producer ──[dd-pathway-ctx]──> bus ──> consumer
//!   direction:out                          direction:in
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use pathway_telemetry::{log_pathway_event, metric_inc, DECODE_FAILURES};
use shared_bus::BusMessage;
use tracing::debug;

use super::codec::{self, PROPAGATION_KEY};
use crate::domain::Carrier;
use crate::ports::KafkaMessage;
use crate::service::DataStreams;

impl KafkaMessage for BusMessage {
    fn header(&self, key: &str) -> Option<&[u8]> {
        BusMessage::header(self, key)
    }

    fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    fn partition(&self) -> i32 {
        self.partition
    }

    fn set_header(&mut self, key: &str, value: Vec<u8>) {
        BusMessage::set_header(self, key, value)
    }
}

/// Edge tags for a consumed message, in canonical order.
pub fn consume_edge_tags(group: &str, topic: Option<&str>, partition: i32) -> Vec<String> {
    let mut tags = vec![
        "type:kafka".to_string(),
        "direction:in".to_string(),
        format!("group:{group}"),
    ];
    if let Some(topic) = topic {
        tags.push(format!("topic:{topic}"));
    }
    tags.push(format!("partition:{partition}"));
    tags
}

/// Edge tags for a produced message, in canonical order.
pub fn produce_edge_tags(topic: Option<&str>) -> Vec<String> {
    let mut tags = vec!["type:kafka".to_string(), "direction:out".to_string()];
    if let Some(topic) = topic {
        tags.push(format!("topic:{topic}"));
    }
    tags
}

/// Bus hooks bound to one [`DataStreams`] instance.
#[derive(Debug, Clone)]
pub struct KafkaAdapter {
    streams: Arc<DataStreams>,
}

impl KafkaAdapter {
    pub fn new(streams: Arc<DataStreams>) -> Self {
        Self { streams }
    }

    pub fn streams(&self) -> &DataStreams {
        &self.streams
    }

    /// Bind the pathway propagated in `message` to `carrier`.
    ///
    /// An absent or undecodable header leaves the carrier as it was.
    pub fn extract_pathway<M>(&self, carrier: Carrier, message: &M) -> Carrier
    where
        M: KafkaMessage + ?Sized,
    {
        let Some(data) = message.header(PROPAGATION_KEY) else {
            return carrier;
        };
        match codec::decode(data, self.streams.service()) {
            Ok(pathway) => carrier.with_pathway(pathway),
            Err(e) => {
                metric_inc!(DECODE_FAILURES);
                debug!(
                    service = %self.streams.service(),
                    error = %e,
                    "Ignoring undecodable pathway header"
                );
                carrier
            }
        }
    }

    /// Record that `message` was consumed by `group`.
    ///
    /// Call exactly once per consumed message, with a fresh carrier. The
    /// returned carrier already includes this consume hop and must not be
    /// passed back in for the same message. Doing so emits a second stats
    /// point for the hop; if the message carries no header, the hop is also
    /// applied to the chain twice, corrupting its hash and latencies.
    ///
    /// A carrier that already holds a pathway from an earlier message
    /// continues that chain when the new message has no usable header.
    pub fn trace_kafka_consume<M>(&self, carrier: Carrier, message: &M, group: &str) -> Carrier
    where
        M: KafkaMessage + ?Sized,
    {
        self.trace_kafka_consume_at(carrier, message, group, SystemTime::now())
    }

    pub fn trace_kafka_consume_at<M>(
        &self,
        carrier: Carrier,
        message: &M,
        group: &str,
        now: SystemTime,
    ) -> Carrier
    where
        M: KafkaMessage + ?Sized,
    {
        let carrier = self.extract_pathway(carrier, message);
        let tags = consume_edge_tags(group, message.topic(), message.partition());
        let (pathway, carrier) = self.streams.set_checkpoint_at(carrier, now, tags);

        log_pathway_event!(
            debug,
            self.streams.service(),
            pathway.chain_hash(),
            "Consume checkpoint set",
            group = %group,
            partition = message.partition()
        );
        carrier
    }

    /// Record that `message` is about to be produced and propagate the
    /// resulting pathway in its headers.
    pub fn trace_kafka_produce<M>(&self, carrier: Carrier, message: &mut M) -> Carrier
    where
        M: KafkaMessage + ?Sized,
    {
        self.trace_kafka_produce_at(carrier, message, SystemTime::now())
    }

    pub fn trace_kafka_produce_at<M>(
        &self,
        carrier: Carrier,
        message: &mut M,
        now: SystemTime,
    ) -> Carrier
    where
        M: KafkaMessage + ?Sized,
    {
        let tags = produce_edge_tags(message.topic());
        let (pathway, carrier) = self.streams.set_checkpoint_at(carrier, now, tags);
        message.set_header(PROPAGATION_KEY, codec::encode(&pathway));

        log_pathway_event!(
            debug,
            self.streams.service(),
            pathway.chain_hash(),
            "Produce checkpoint set",
            partition = message.partition()
        );
        carrier
    }
}
