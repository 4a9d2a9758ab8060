//! Inbound Ports (Driving Ports)
//!
//! Message metadata the bus hooks need, independent of any particular
//! client library.

/// Read/write access to the metadata of a Kafka-style message.
pub trait KafkaMessage {
    /// Value of the first header with this key.
    fn header(&self, key: &str) -> Option<&[u8]>;

    /// Topic the message belongs to, when the client exposes one.
    fn topic(&self) -> Option<&str>;

    /// Partition number.
    fn partition(&self) -> i32;

    /// Set a header, replacing an existing one with the same key.
    fn set_header(&mut self, key: &str, value: Vec<u8>);
}
