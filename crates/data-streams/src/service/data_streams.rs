//! Process-wide entry point for pathway tracking
//!
//! Holds the local service identity and the aggregator sink, and exposes the
//! pathway operations without callers having to thread either through.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;

use crate::adapters::{codec, ChannelSink};
use crate::config::DataStreamsConfig;
use crate::domain::{merge, Carrier, Pathway};
use crate::error::{ConfigError, DecodeError};
use crate::ports::AggregatorSink;
use crate::service::StatsForwarder;

/// Pathway tracking for one local service.
#[derive(Clone)]
pub struct DataStreams {
    service: String,
    sink: Option<Arc<dyn AggregatorSink>>,
}

impl fmt::Debug for DataStreams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStreams")
            .field("service", &self.service)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl DataStreams {
    /// Track pathways without emitting stats points.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            sink: None,
        }
    }

    /// Track pathways and offer every stats point to `sink`.
    pub fn with_sink(service: impl Into<String>, sink: Arc<dyn AggregatorSink>) -> Self {
        Self {
            service: service.into(),
            sink: Some(sink),
        }
    }

    /// Build from configuration.
    ///
    /// When enabled, a [`ChannelSink`] is created and the forwarder draining
    /// it is returned alongside; the caller decides where it runs.
    pub fn from_config(
        config: &DataStreamsConfig,
    ) -> Result<(Self, Option<StatsForwarder>), ConfigError> {
        config.validate()?;

        if !config.enabled {
            info!(service = %config.service, "Data streams enabled without stats emission");
            return Ok((Self::new(config.service.clone()), None));
        }

        let (sink, receiver) = ChannelSink::new(config.stats_buffer_capacity);
        info!(
            service = %config.service,
            capacity = config.stats_buffer_capacity,
            "Data streams initialized"
        );
        Ok((
            Self::with_sink(config.service.clone(), Arc::new(sink)),
            Some(StatsForwarder::new(receiver)),
        ))
    }

    /// Another local service sharing this instance's sink.
    #[must_use]
    pub fn for_service(&self, service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            sink: self.sink.clone(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn sink(&self) -> Option<&dyn AggregatorSink> {
        self.sink.as_deref()
    }

    /// Start a new pathway at the current time.
    pub fn new_pathway(&self) -> Pathway {
        self.new_pathway_at(SystemTime::now())
    }

    pub fn new_pathway_at(&self, now: SystemTime) -> Pathway {
        Pathway::new(self.service.clone(), now, self.sink())
    }

    /// Checkpoint `pathway` at the current time.
    pub fn checkpoint<I, S>(&self, pathway: &Pathway, edge_tags: I) -> Pathway
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        pathway.set_checkpoint(edge_tags, self.sink())
    }

    /// Checkpoint the pathway in `carrier`, or start one if it carries none.
    ///
    /// Returns the new pathway and the carrier updated to hold it.
    pub fn set_checkpoint<I, S>(&self, carrier: Carrier, edge_tags: I) -> (Pathway, Carrier)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_checkpoint_at(carrier, SystemTime::now(), edge_tags)
    }

    pub fn set_checkpoint_at<I, S>(
        &self,
        carrier: Carrier,
        now: SystemTime,
        edge_tags: I,
    ) -> (Pathway, Carrier)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let child = match carrier.pathway() {
            Some(parent) => parent.checkpoint(now, edge_tags, self.sink()),
            None => Pathway::root(self.service.clone(), now).checkpoint(now, edge_tags, self.sink()),
        };
        let carrier = carrier.with_pathway(child.clone());
        (child, carrier)
    }

    /// Pick one of several incoming pathways to continue from.
    pub fn merge(&self, pathways: &[Pathway]) -> Pathway {
        merge(pathways)
    }

    pub fn encode(&self, pathway: &Pathway) -> Vec<u8> {
        codec::encode(pathway)
    }

    /// Decode a propagated pathway as belonging to this service.
    pub fn decode(&self, data: &[u8]) -> Result<Pathway, DecodeError> {
        codec::decode(data, &self.service)
    }
}
