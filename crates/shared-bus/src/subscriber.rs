//! # Event Subscriber
//!
//! Push-side view of the event log.

use crate::events::{EventFilter, LogEntry};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event log was dropped.
    #[error("Event log closed")]
    Closed,
}

/// A subscription handle for receiving committed entries.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<LogEntry>,

    /// Filter for this subscription.
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<LogEntry>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next entry that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(entry)` - The next matching entry
    /// - `None` - The log was dropped
    pub async fn recv(&mut self) -> Option<LogEntry> {
        loop {
            let entry = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some entries skipped");
                    continue;
                }
            };

            if self.filter.matches(&entry) {
                return Some(entry);
            }
        }
    }

    /// Try to receive the next matching entry without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` - An entry was available and matched
    /// - `Ok(None)` - Nothing available right now
    /// - `Err(SubscriptionError::Closed)` - The log was dropped
    pub fn try_recv(&mut self) -> Result<Option<LogEntry>, SubscriptionError> {
        loop {
            let entry = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&entry) {
                return Ok(Some(entry));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}
