//! # Message Subscriber
//!
//! Defines the subscription side of the bus.

use crate::message::{BusMessage, MessageFilter};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was closed.
    #[error("Message bus closed")]
    Closed,

    /// The subscriber fell behind and the bus overwrote unread messages.
    #[error("Subscriber lagged, {0} messages skipped")]
    Lagged(u64),
}

/// A consumer group's handle for receiving messages.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<BusMessage>,

    /// Filter for this subscription.
    filter: MessageFilter,

    /// Consumer group this subscription belongs to.
    group: String,

    /// Reference to subscription tracking (for cleanup).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<BusMessage>,
        filter: MessageFilter,
        group: String,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    ) -> Self {
        Self {
            receiver,
            filter,
            group,
            subscriptions,
        }
    }

    /// Receive the next message that matches the filter.
    ///
    /// Lag is logged and skipped. Use [`Subscription::next_message`] when the
    /// caller must know that messages were lost.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next matching message
    /// - `None` - The channel was closed (bus dropped)
    pub async fn recv(&mut self) -> Option<BusMessage> {
        loop {
            match self.next_message().await {
                Ok(message) => return Some(message),
                Err(SubscriptionError::Closed) => return None,
                Err(SubscriptionError::Lagged(count)) => {
                    debug!(group = %self.group, lagged = count, "Subscriber lagged, some messages dropped");
                }
            }
        }
    }

    /// Receive the next matching message, reporting lag as an error.
    ///
    /// After `Err(SubscriptionError::Lagged(n))` the subscription resumes
    /// from the oldest message still buffered. `n` counts every skipped
    /// message, matching or not.
    pub async fn next_message(&mut self) -> Result<BusMessage, SubscriptionError> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return Err(SubscriptionError::Closed),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    return Err(SubscriptionError::Lagged(count))
                }
            };

            if self.filter.matches(&message) {
                return Ok(message);
            }
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available and matched
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<BusMessage>, SubscriptionError> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&message) {
                return Ok(Some(message));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    /// Get the consumer group for this subscription.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.group) else {
            debug!(group = %self.group, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.group);
        }
        debug!(group = %self.group, "Subscription dropped");
    }
}
