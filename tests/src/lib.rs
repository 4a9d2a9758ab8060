//! # Pathway Streams Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── checkpoint_benchmarks.rs   # Checkpoint, codec and sink throughput
//! └── src/
//!     └── integration/               # Cross-crate flows over the shared bus
//!         ├── flows.rs               # Produce → consume chains, fan-in merge
//!         └── sink_pressure.rs       # Saturated aggregator under load
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pathway-tests
//!
//! # Integration only
//! cargo test -p pathway-tests integration::
//!
//! # Benchmarks
//! cargo bench -p pathway-tests
//! ```

pub mod integration;
