//! # Event Log
//!
//! The append-only, ordered outbox that committed events are written to.
//!
//! Consumers either poll it with a cursor (`entries_since`) or hold a push
//! subscription. Both views see entries in the same order.

use crate::events::{BridgeEvent, EventFilter, LogEntry};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::RwLock;
use shared_types::entities::Address;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Trait for the event log written by the execution platform.
pub trait EventLog: Send + Sync {
    /// Append one committed event. Returns the stored entry.
    fn append(&self, tx_id: Uuid, emitter: Address, event: BridgeEvent) -> LogEntry;

    /// Entries with `index >= cursor`, in order.
    fn entries_since(&self, cursor: u64) -> Vec<LogEntry>;

    /// Number of entries ever appended.
    fn len(&self) -> u64;

    /// True if nothing was ever appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory implementation of the event log.
///
/// Entries are kept forever; pushes go out over a `tokio::sync::broadcast`
/// channel so slow subscribers lag instead of blocking the writer.
pub struct InMemoryEventLog {
    /// Committed entries.
    entries: RwLock<Vec<LogEntry>>,

    /// Broadcast sender for live subscribers.
    sender: broadcast::Sender<LogEntry>,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventLog {
    /// Create a new log with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new log with the given broadcast capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            entries: RwLock::new(Vec::new()),
            sender,
            capacity,
        }
    }

    /// Subscribe to entries appended from now on that match `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, emitters = filter.emitters.len(), "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// All entries matching `filter`, oldest first.
    #[must_use]
    pub fn query(&self, filter: &EventFilter) -> Vec<LogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    /// Get the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, tx_id: Uuid, emitter: Address, event: BridgeEvent) -> LogEntry {
        let mut entries = self.entries.write();
        let entry = LogEntry {
            index: entries.len() as u64,
            tx_id,
            emitter,
            event,
        };
        entries.push(entry.clone());

        // Broadcast under the write lock so push order equals index order
        let receivers = self.sender.send(entry.clone()).unwrap_or(0);
        debug!(
            index = entry.index,
            event = entry.event.name(),
            emitter = %entry.emitter,
            receivers,
            "Event appended"
        );
        entry
    }

    fn entries_since(&self, cursor: u64) -> Vec<LogEntry> {
        let entries = self.entries.read();
        let start = usize::try_from(cursor).unwrap_or(usize::MAX).min(entries.len());
        entries[start..].to_vec()
    }

    fn len(&self) -> u64 {
        self.entries.read().len() as u64
    }
}
