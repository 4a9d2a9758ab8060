//! # Aggregator Back-Pressure
//!
//! A saturated or stopped aggregator must never slow down or alter the traced
//! path. Points beyond the buffer are dropped and counted.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use data_streams::{ChannelSink, DataStreams, Pathway, StatsForwarder};
    use pathway_telemetry::metrics::OUTCOME_DROPPED;
    use pathway_telemetry::STATS_POINTS;

    fn at(millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    #[test]
    fn test_saturated_sink_drops_without_blocking() {
        let (sink, receiver) = ChannelSink::new(8);
        let streams = DataStreams::with_sink("svc", Arc::new(sink));
        let silent = DataStreams::new("svc");
        let dropped_before = STATS_POINTS.with_label_values(&[OUTCOME_DROPPED]).get();

        let walk = |streams: &DataStreams| -> Duration {
            let start = Instant::now();
            let mut p = streams.new_pathway_at(at(0));
            for i in 0..1_000u64 {
                p = p.checkpoint(at(i), ["edge"], streams.sink());
            }
            start.elapsed()
        };
        let baseline = walk(&silent);
        let saturated = walk(&streams);

        // Dropping is a failed try_send plus a counter, not a wait
        assert!(
            saturated <= baseline * 50 + Duration::from_millis(200),
            "saturated {saturated:?} vs no sink {baseline:?}"
        );

        let mut forwarder = StatsForwarder::new(receiver);
        assert_eq!(forwarder.drain().len(), 8);

        let dropped = STATS_POINTS.with_label_values(&[OUTCOME_DROPPED]).get() - dropped_before;
        assert!(dropped >= 993.0);
    }

    #[test]
    fn test_sink_state_does_not_change_hashes() {
        let (sink, receiver) = ChannelSink::new(1);
        drop(receiver);
        let closed = DataStreams::with_sink("svc", Arc::new(sink));
        let silent = DataStreams::new("svc");

        let walk = |streams: &DataStreams| -> Pathway {
            let mut p = streams.new_pathway_at(at(0));
            for i in 0..50u64 {
                p = p.checkpoint(at(i), [format!("hop:{i}")], streams.sink());
            }
            p
        };
        assert_eq!(walk(&closed), walk(&silent));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkpoints_share_one_sink() {
        let (sink, receiver) = ChannelSink::new(100);
        let streams = Arc::new(DataStreams::with_sink("svc", Arc::new(sink)));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let streams = Arc::clone(&streams);
                tokio::spawn(async move {
                    let mut p = streams.new_pathway();
                    for hop in 0..50 {
                        p = streams.checkpoint(&p, [format!("worker:{worker}"), format!("hop:{hop}")]);
                    }
                    p
                })
            })
            .collect();

        let mut finals = Vec::new();
        for handle in handles {
            finals.push(handle.await.unwrap());
        }

        let mut forwarder = StatsForwarder::new(receiver);
        assert_eq!(forwarder.drain().len(), 100);

        // Workers tag their own hops, so no two end on the same route
        finals.sort_by_key(Pathway::chain_hash);
        finals.dedup_by_key(|p| p.chain_hash());
        assert_eq!(finals.len(), 8);
    }

    #[tokio::test]
    async fn test_forwarder_frees_capacity() {
        let (sink, receiver) = ChannelSink::new(2);
        let streams = DataStreams::with_sink("svc", Arc::new(sink.clone()));
        let mut forwarder = StatsForwarder::new(receiver);

        let p = streams.new_pathway_at(at(0));
        streams.checkpoint(&p, ["a"]);
        assert_eq!(sink.available(), 0);

        assert_eq!(forwarder.drain().len(), 2);
        assert_eq!(sink.available(), 2);
    }
}
