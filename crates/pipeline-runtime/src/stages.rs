//! Pipeline stages
//!
//! ```text
//! ingest ──orders──> enrich ──enriched──> billing ──(merge batch)──> settled
//! ```
//!
//! Every stage is a separate simulated service with its own
//! [`KafkaAdapter`]; all of them feed the same aggregator sink.

use std::sync::Arc;

use anyhow::{bail, Result};
use data_streams::{Carrier, KafkaAdapter, Pathway};
use pathway_telemetry::log_pathway_event;
use shared_bus::{BusMessage, InMemoryMessageBus, MessagePublisher, Subscription, SubscriptionError};
use tracing::info;

pub const ORDERS_TOPIC: &str = "orders";
pub const ENRICHED_TOPIC: &str = "enriched";
pub const ENRICH_GROUP: &str = "enrichment";
pub const BILLING_GROUP: &str = "billing";

/// Edge tags for the settlement emitted after a merged batch.
pub const SETTLEMENT_EDGE: [&str; 2] = ["type:batch", "direction:out"];

/// Produce `messages` fresh payloads, each starting its own pathway.
pub async fn run_ingest(
    kafka: KafkaAdapter,
    bus: Arc<InMemoryMessageBus>,
    messages: usize,
    partitions: i32,
) -> Result<usize> {
    let partitions = partitions.max(1);
    for i in 0..messages {
        let origin = kafka.streams().new_pathway();
        let partition = (i as i32) % partitions;
        let mut message =
            BusMessage::new(ORDERS_TOPIC, partition, format!("order-{i}").into_bytes());

        kafka.trace_kafka_produce(Carrier::new().with_pathway(origin), &mut message);
        if bus.publish(message).await == 0 {
            bail!("No subscriber received order {i}");
        }
    }
    info!(service = %kafka.streams().service(), messages, "Ingest finished");
    Ok(messages)
}

/// Next message for a stage that must see every payload.
///
/// `None` when the bus is closed. Lag is an error: the skipped payloads would
/// never be settled and the stage would wait for them forever.
async fn next_payload(subscription: &mut Subscription) -> Result<Option<BusMessage>> {
    match subscription.next_message().await {
        Ok(message) => Ok(Some(message)),
        Err(SubscriptionError::Closed) => Ok(None),
        Err(SubscriptionError::Lagged(skipped)) => bail!(
            "Consumer group {} lagged behind the bus and lost {skipped} messages, raise PIPELINE_BUS_CAPACITY",
            subscription.group()
        ),
    }
}

/// Consume orders, enrich them and forward downstream.
pub async fn run_enrich(
    kafka: KafkaAdapter,
    bus: Arc<InMemoryMessageBus>,
    mut subscription: Subscription,
    messages: usize,
) -> Result<usize> {
    let mut handled = 0;
    while handled < messages {
        let Some(message) = next_payload(&mut subscription).await? else {
            break;
        };
        let carrier = kafka.trace_kafka_consume(Carrier::new(), &message, subscription.group());

        let mut payload = message.payload.clone();
        payload.extend_from_slice(b"+enriched");
        let mut enriched = BusMessage::new(ENRICHED_TOPIC, message.partition, payload);
        kafka.trace_kafka_produce(carrier, &mut enriched);

        bus.publish(enriched).await;
        handled += 1;
    }
    info!(service = %kafka.streams().service(), handled, "Enrichment finished");
    Ok(handled)
}

/// Consume enriched orders and settle them in merged batches.
///
/// Returns the number of settlements.
pub async fn run_billing(
    kafka: KafkaAdapter,
    mut subscription: Subscription,
    messages: usize,
    batch_size: usize,
) -> Result<usize> {
    let batch_size = batch_size.max(1);
    let mut batch = Vec::with_capacity(batch_size);
    let mut handled = 0;
    let mut settlements = 0;

    while handled < messages {
        let Some(message) = next_payload(&mut subscription).await? else {
            break;
        };
        let carrier = kafka.trace_kafka_consume(Carrier::new(), &message, subscription.group());
        if let Some(pathway) = carrier.into_pathway() {
            batch.push(pathway);
        }
        handled += 1;

        if batch.len() == batch_size {
            settle(&kafka, &mut batch);
            settlements += 1;
        }
    }
    if !batch.is_empty() {
        settle(&kafka, &mut batch);
        settlements += 1;
    }

    info!(service = %kafka.streams().service(), handled, settlements, "Billing finished");
    Ok(settlements)
}

/// Merge a batch of converging pathways and checkpoint the settlement.
pub fn settle(kafka: &KafkaAdapter, batch: &mut Vec<Pathway>) -> Pathway {
    let streams = kafka.streams();
    let merged = streams.merge(batch);
    let settled = streams.checkpoint(&merged, SETTLEMENT_EDGE);

    log_pathway_event!(
        debug,
        streams.service(),
        settled.chain_hash(),
        "Batch settled",
        batch = batch.len(),
        parent = %format!("{:016x}", merged.chain_hash())
    );
    batch.clear();
    settled
}
