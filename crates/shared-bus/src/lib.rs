//! # Shared Bus - In-Memory Message Bus
//!
//! A partitioned, header-carrying message bus used to move payloads between
//! services in tests and in the demo runtime. It mirrors the metadata a
//! Kafka consumer sees: topic, partition, and key/value headers.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Producer    │                    │  Consumer    │
//! │              │    publish()       │  (group g)   │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Message Bus  │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod message;
pub mod publisher;
pub mod subscriber;

pub use message::{BusMessage, MessageFilter, MessageHeader};
pub use publisher::{InMemoryMessageBus, MessagePublisher};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum messages to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
