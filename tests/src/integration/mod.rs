//! Cross-crate integration flows.
//!
//! Shared fixtures live here; the scenarios are in the submodules.

pub mod flows;
pub mod sink_pressure;

use std::sync::Arc;

use data_streams::{AggregatorSink, DataStreams, EnqueueOutcome, KafkaAdapter, StatsPoint};
use parking_lot::Mutex;

/// Sink that keeps every stats point it is offered.
#[derive(Default)]
pub struct RecordingSink {
    points: Mutex<Vec<StatsPoint>>,
}

impl RecordingSink {
    pub fn points(&self) -> Vec<StatsPoint> {
        self.points.lock().clone()
    }
}

impl AggregatorSink for RecordingSink {
    fn try_enqueue(&self, point: StatsPoint) -> EnqueueOutcome {
        self.points.lock().push(point);
        EnqueueOutcome::Accepted
    }
}

/// Bus hooks for `service`, reporting into `sink`.
pub fn adapter_with_sink(service: &str, sink: Arc<dyn AggregatorSink>) -> KafkaAdapter {
    KafkaAdapter::new(Arc::new(DataStreams::with_sink(service, sink)))
}
