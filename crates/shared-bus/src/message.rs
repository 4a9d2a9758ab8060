//! # Bus Messages
//!
//! A message carries an opaque payload plus the metadata a consumer hook
//! needs: an optional topic, a partition number and key/value headers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single key/value header attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Header key.
    pub key: String,
    /// Raw header value.
    pub value: Vec<u8>,
}

/// A message travelling through the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    /// Unique message id, assigned at construction.
    pub id: Uuid,
    /// Topic the message was produced to, if any.
    pub topic: Option<String>,
    /// Partition within the topic.
    pub partition: i32,
    /// Ordered headers. Keys are not required to be unique.
    pub headers: Vec<MessageHeader>,
    /// Opaque payload.
    pub payload: Vec<u8>,
}

impl BusMessage {
    /// Create a message for a topic and partition.
    #[must_use]
    pub fn new(topic: impl Into<String>, partition: i32, payload: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: Some(topic.into()),
            partition,
            headers: Vec::new(),
            payload,
        }
    }

    /// Create a message that carries no topic.
    #[must_use]
    pub fn without_topic(partition: i32, payload: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: None,
            partition,
            headers: Vec::new(),
            payload,
        }
    }

    /// Builder-style method to append a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.headers.push(MessageHeader {
            key: key.into(),
            value,
        });
        self
    }

    /// Value of the first header with this key.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.value.as_slice())
    }

    /// Set a header, replacing the first existing header with the same key.
    pub fn set_header(&mut self, key: &str, value: Vec<u8>) {
        match self.headers.iter_mut().find(|h| h.key == key) {
            Some(header) => header.value = value,
            None => self.headers.push(MessageHeader {
                key: key.to_string(),
                value,
            }),
        }
    }
}

/// Filter for subscribing to specific topics.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<String>,
}

impl MessageFilter {
    /// Create a filter that accepts all messages.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a message matches this filter.
    ///
    /// Messages without a topic only match the catch-all filter.
    #[must_use]
    pub fn matches(&self, message: &BusMessage) -> bool {
        if self.topics.is_empty() {
            return true;
        }
        message
            .topic
            .as_ref()
            .is_some_and(|topic| self.topics.contains(topic))
    }
}
