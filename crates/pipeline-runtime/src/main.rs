//! # Pipeline Runtime
//!
//! Runs a small order pipeline over the in-memory bus with pathway tracking
//! on every hop.
//!
//! ```text
//!  orders-api ──orders──> enricher ──enriched──> billing
//!     │                       │                     │
//!     └───────────────────────┴─────────────────────┴──> ChannelSink ──> StatsForwarder
//!                                                                            │
//!                                                                 Prometheus histograms
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (tracing subscriber, Prometheus registry)
//! 2. Load data streams and workload configuration from the environment
//! 3. Create the aggregator sink and spawn the stats forwarder
//! 4. Subscribe consumer groups, then start the stages
//! 5. Wait for completion or Ctrl+C, then dump metrics
//!
//! A consumer stage that falls more than `PIPELINE_BUS_CAPACITY` messages
//! behind the bus fails the run instead of waiting for lost payloads.

mod config;
mod stages;

use std::sync::Arc;

use anyhow::{Context, Result};
use data_streams::{DataStreams, DataStreamsConfig, KafkaAdapter};
use pathway_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_bus::{InMemoryMessageBus, MessageFilter};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::stages::{
    run_billing, run_enrich, run_ingest, BILLING_GROUP, ENRICHED_TOPIC, ENRICH_GROUP,
    ORDERS_TOPIC,
};

const ENRICH_SERVICE: &str = "enricher";
const BILLING_SERVICE: &str = "billing";

fn adapter_for(streams: &DataStreams, service: &str) -> KafkaAdapter {
    KafkaAdapter::new(Arc::new(streams.for_service(service)))
}

async fn run_pipeline(streams: DataStreams, pipeline: &PipelineConfig) -> Result<()> {
    let bus = Arc::new(InMemoryMessageBus::with_capacity(pipeline.bus_capacity));

    // Subscriptions must exist before the first publish
    let orders = bus.subscribe(ENRICH_GROUP, MessageFilter::topics([ORDERS_TOPIC]));
    let enriched = bus.subscribe(BILLING_GROUP, MessageFilter::topics([ENRICHED_TOPIC]));

    let enrich = tokio::spawn(run_enrich(
        adapter_for(&streams, ENRICH_SERVICE),
        Arc::clone(&bus),
        orders,
        pipeline.messages,
    ));
    let billing = tokio::spawn(run_billing(
        adapter_for(&streams, BILLING_SERVICE),
        enriched,
        pipeline.messages,
        pipeline.batch_size,
    ));

    let produced = run_ingest(
        KafkaAdapter::new(Arc::new(streams)),
        Arc::clone(&bus),
        pipeline.messages,
        pipeline.partitions,
    )
    .await?;

    let enriched = enrich.await.context("Enrichment stage panicked")??;
    let settlements = billing.await.context("Billing stage panicked")??;

    info!(produced, enriched, settlements, "Pipeline drained");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let streams_config = DataStreamsConfig::from_env();
    let pipeline = PipelineConfig::from_env();

    info!("===========================================");
    info!("  Pathway Streams Pipeline Runtime v0.1.0");
    info!("===========================================");
    info!(
        service = %streams_config.service,
        messages = pipeline.messages,
        batch_size = pipeline.batch_size,
        "Starting pipeline"
    );

    let (streams, forwarder) =
        DataStreams::from_config(&streams_config).context("Invalid data streams configuration")?;
    if forwarder.is_none() {
        warn!("Stats emission disabled, pathways will propagate without latency stats");
    }
    let forwarder = forwarder.map(|f| tokio::spawn(f.run()));

    let interrupted = tokio::select! {
        result = run_pipeline(streams, &pipeline) => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            true
        }
    };

    if let Some(forwarder) = forwarder {
        if interrupted {
            // Stage tasks may still hold sink handles
            forwarder.abort();
        } else {
            // The forwarder stops once every sink handle is gone
            match forwarder.await {
                Ok(forwarded) => info!(forwarded, "Stats forwarder drained"),
                Err(e) => warn!(error = %e, "Stats forwarder task failed"),
            }
        }
    }

    println!("{}", encode_metrics()?);
    Ok(())
}
