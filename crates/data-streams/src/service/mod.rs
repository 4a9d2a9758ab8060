//! Service Layer
//!
//! - `DataStreams`: process-wide facade holding the service identity and sink
//! - `StatsForwarder`: drains the ingestion buffer into latency histograms

pub mod data_streams;
pub mod forwarder;

pub use data_streams::DataStreams;
pub use forwarder::StatsForwarder;
