//! # Pathway Flows
//!
//! Tests that pathways survive the trip across services via the shared bus.
//!
//! ## Flow Tested:
//!
//! ```text
//! orders-api ──orders──> enricher ──enriched──> billing
//! ```
//!
//! 1. **Linear chain**: every hop's parent is the previous hop
//! 2. **Missing or corrupt context**: the consumer starts a fresh chain
//! 3. **Fan-in**: merging converging branches keeps one of them
//! 4. **Determinism**: the same route hashes the same in any process

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use rand::Rng;
    use tokio::time::timeout;

    use data_streams::{
        consume_edge_tags, node_hash, pathway_hash, produce_edge_tags, Carrier, DataStreams,
        KafkaAdapter, PROPAGATION_KEY,
    };
    use pathway_telemetry::DECODE_FAILURES;
    use shared_bus::{BusMessage, InMemoryMessageBus, MessageFilter, MessagePublisher};

    use crate::integration::{adapter_with_sink, RecordingSink};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn at(millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    fn adapter(service: &str) -> KafkaAdapter {
        KafkaAdapter::new(Arc::new(DataStreams::new(service)))
    }

    // =============================================================================
    // LINEAR CHAIN
    // =============================================================================

    #[tokio::test]
    async fn test_chain_across_three_services() {
        let sink = Arc::new(RecordingSink::default());
        let ingest = adapter_with_sink("orders-api", sink.clone());
        let enricher = adapter_with_sink("enricher", sink.clone());
        let billing = adapter_with_sink("billing", sink.clone());

        let bus = InMemoryMessageBus::new();
        let mut orders = bus.subscribe("enrichment", MessageFilter::topics(["orders"]));
        let mut enriched = bus.subscribe("billing", MessageFilter::topics(["enriched"]));

        // orders-api: origin, then produce
        let origin = ingest.streams().new_pathway_at(at(1_000));
        let mut message = BusMessage::new("orders", 1, b"order-1".to_vec());
        ingest.trace_kafka_produce_at(
            Carrier::new().with_pathway(origin.clone()),
            &mut message,
            at(1_010),
        );
        bus.publish(message).await;

        // enricher: consume, then produce downstream
        let received = timeout(Duration::from_secs(1), orders.recv())
            .await
            .expect("timeout")
            .expect("bus closed");
        let carrier = enricher.trace_kafka_consume_at(Carrier::new(), &received, "enrichment", at(1_050));
        let mut forwarded = BusMessage::new("enriched", received.partition, received.payload.clone());
        enricher.trace_kafka_produce_at(carrier, &mut forwarded, at(1_080));
        bus.publish(forwarded).await;

        // billing: consume
        let received = timeout(Duration::from_secs(1), enriched.recv())
            .await
            .expect("timeout")
            .expect("bus closed");
        let last = billing
            .trace_kafka_consume_at(Carrier::new(), &received, "billing", at(1_200))
            .into_pathway()
            .expect("pathway");

        let points = sink.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].parent_chain_hash, 0);
        assert_eq!(points[0].chain_hash, origin.chain_hash());
        for pair in points.windows(2) {
            assert_eq!(pair[1].parent_chain_hash, pair[0].chain_hash);
        }
        assert_eq!(points[4].chain_hash, last.chain_hash());

        // Expected hash, rebuilt from the route alone
        let mut expected = pathway_hash(node_hash::<&str>("orders-api", &[]), 0);
        expected = pathway_hash(node_hash("orders-api", &produce_edge_tags(Some("orders"))), expected);
        expected = pathway_hash(
            node_hash("enricher", &consume_edge_tags("enrichment", Some("orders"), 1)),
            expected,
        );
        expected = pathway_hash(node_hash("enricher", &produce_edge_tags(Some("enriched"))), expected);
        expected = pathway_hash(
            node_hash("billing", &consume_edge_tags("billing", Some("enriched"), 1)),
            expected,
        );
        assert_eq!(last.chain_hash(), expected);

        // Origin survives the wire; latencies are relative to it
        assert_eq!(last.origin_time(), at(1_000));
        assert_eq!(points[4].pathway_latency_nanos, 200_000_000);
        assert_eq!(points[4].edge_latency_nanos, 120_000_000);
    }

    // =============================================================================
    // MISSING OR CORRUPT CONTEXT
    // =============================================================================

    #[test]
    fn test_consume_without_context_starts_fresh_chain() {
        let sink = Arc::new(RecordingSink::default());
        let consumer = adapter_with_sink("billing", sink.clone());
        let message = BusMessage::new("enriched", 0, Vec::new());

        consumer.trace_kafka_consume_at(Carrier::new(), &message, "billing", at(10));

        let points = sink.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].parent_chain_hash, 0);
        assert_eq!(points[0].pathway_latency_nanos, 0);
    }

    #[test]
    fn test_corrupt_context_is_ignored() {
        let sink = Arc::new(RecordingSink::default());
        let consumer = adapter_with_sink("billing", sink.clone());
        let before = DECODE_FAILURES.get();

        for corrupt in [vec![], vec![0u8; 5], vec![0u8; 8], {
            let mut v = vec![0u8; 8];
            v.extend_from_slice(&[0xff; 12]);
            v
        }] {
            let message = BusMessage::new("enriched", 0, Vec::new()).with_header(PROPAGATION_KEY, corrupt);
            consumer.trace_kafka_consume_at(Carrier::new(), &message, "billing", at(10));
        }

        let points = sink.points();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.parent_chain_hash == 0));
        assert!(DECODE_FAILURES.get() >= before + 4.0);
    }

    #[test]
    fn test_topicless_message_uses_partition_only() {
        let producer = adapter("orders-api");
        let consumer = adapter("billing");
        let mut message = BusMessage::without_topic(9, Vec::new());

        let produced = producer
            .trace_kafka_produce_at(Carrier::new(), &mut message, at(0))
            .into_pathway()
            .unwrap();
        let consumed = consumer
            .trace_kafka_consume_at(Carrier::new(), &message, "g", at(1))
            .into_pathway()
            .unwrap();

        assert_eq!(produced.edge_tags(), ["type:kafka", "direction:out"]);
        assert_eq!(
            consumed.edge_tags(),
            ["type:kafka", "direction:in", "group:g", "partition:9"]
        );
    }

    // =============================================================================
    // FAN-IN
    // =============================================================================

    #[tokio::test]
    async fn test_fan_in_merge_keeps_one_branch() {
        let bus = InMemoryMessageBus::new();
        let mut joined = bus.subscribe("join", MessageFilter::topics(["events"]));

        let left = adapter("left-service");
        let right = adapter("right-service");
        let join = adapter("join-service");

        for producer in [&left, &right] {
            let mut message = BusMessage::new("events", 0, Vec::new());
            producer.trace_kafka_produce_at(Carrier::new(), &mut message, at(100));
            bus.publish(message).await;
        }

        let mut branches = Vec::new();
        for _ in 0..2 {
            let message = timeout(Duration::from_secs(1), joined.recv())
                .await
                .expect("timeout")
                .expect("bus closed");
            let carrier = join.trace_kafka_consume_at(Carrier::new(), &message, "join", at(150));
            branches.push(carrier.into_pathway().unwrap());
        }
        assert_ne!(branches[0].chain_hash(), branches[1].chain_hash());

        let candidates: HashSet<u64> = branches.iter().map(|p| p.chain_hash()).collect();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let merged = join.streams().merge(&branches);
            assert!(candidates.contains(&merged.chain_hash()));
            seen.insert(merged.chain_hash());
        }
        assert_eq!(seen, candidates);
    }

    #[tokio::test]
    async fn test_fan_in_of_random_width() {
        let width = rand::thread_rng().gen_range(3..12);
        let bus = InMemoryMessageBus::new();
        let mut joined = bus.subscribe("join", MessageFilter::topics(["events"]));
        let join = adapter("join-service");

        for i in 0..width {
            let producer = adapter(&format!("producer-{i}"));
            let mut message = BusMessage::new("events", i, Vec::new());
            producer.trace_kafka_produce_at(Carrier::new(), &mut message, at(100));
            bus.publish(message).await;
        }

        let mut branches = Vec::with_capacity(width as usize);
        for _ in 0..width {
            let message = timeout(Duration::from_secs(1), joined.recv())
                .await
                .expect("timeout")
                .expect("bus closed");
            let carrier = join.trace_kafka_consume_at(Carrier::new(), &message, "join", at(150));
            branches.push(carrier.into_pathway().unwrap());
        }

        let candidates: HashSet<u64> = branches.iter().map(|p| p.chain_hash()).collect();
        assert_eq!(candidates.len(), width as usize, "width {width}");

        let merged = join.streams().merge(&branches);
        assert!(candidates.contains(&merged.chain_hash()));
        assert_eq!(merged.origin_time(), at(100));
    }

    #[test]
    fn test_merge_then_checkpoint_continues_from_chosen_branch() {
        let join = adapter("join-service");
        let a = join.streams().new_pathway_at(at(0));
        let b = join.streams().set_checkpoint_at(Carrier::new(), at(0), ["edge:b"]).0;

        let merged = join.streams().merge(&[a.clone(), b.clone()]);
        let next = merged.checkpoint(at(10), ["edge:next"], None);

        let node = node_hash("join-service", &["edge:next"]);
        assert!(
            next.chain_hash() == pathway_hash(node, a.chain_hash())
                || next.chain_hash() == pathway_hash(node, b.chain_hash())
        );
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    #[test]
    fn test_same_route_same_hash_in_separate_instances() {
        let run = || {
            let producer = adapter("orders-api");
            let consumer = adapter("billing");
            let mut message = BusMessage::new("orders", 2, Vec::new());
            producer.trace_kafka_produce_at(Carrier::new(), &mut message, at(5));
            consumer
                .trace_kafka_consume_at(Carrier::new(), &message, "billing", at(9))
                .into_pathway()
                .unwrap()
                .chain_hash()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_different_groups_are_different_routes() {
        let producer = adapter("orders-api");
        let mut message = BusMessage::new("orders", 0, Vec::new());
        producer.trace_kafka_produce_at(Carrier::new(), &mut message, at(5));

        let a = adapter("billing")
            .trace_kafka_consume_at(Carrier::new(), &message, "group-a", at(9))
            .into_pathway()
            .unwrap();
        let b = adapter("billing")
            .trace_kafka_consume_at(Carrier::new(), &message, "group-b", at(9))
            .into_pathway()
            .unwrap();
        assert_ne!(a.chain_hash(), b.chain_hash());
    }
}
