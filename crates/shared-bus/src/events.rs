//! # Bridge Events
//!
//! Defines every event a component can emit and the log entry that wraps it
//! once the emitting transaction commits.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Bytes, U256};
use uuid::Uuid;

/// All events that can be appended to the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeEvent {
    // =========================================================================
    // MESSAGE SENDER
    // =========================================================================
    /// A message was accepted for relaying.
    /// Source: MessageSender | Consumer: external relayer
    Sent {
        /// Destination of the message.
        target: Address,
        /// Opaque call data, verbatim.
        payload: Bytes,
    },

    // =========================================================================
    // MESSAGE RECEIVER
    // =========================================================================
    /// The relayer identity was overwritten.
    RelayerUpdated {
        /// The new relayer.
        new_relayer: Address,
    },

    /// A relayed message was executed against its target.
    TransactionExecuted {
        /// Target that was called.
        target: Address,
        /// Payload that was delivered.
        payload: Bytes,
    },

    // =========================================================================
    // COUNTER APPLICATION
    // =========================================================================
    /// An application's bridge address was overwritten.
    AmbAddressUpdated {
        /// The new bridge address.
        new_address: Address,
    },

    /// The application sender handed an instruction to the bridge.
    MessageSent {
        /// Destination application.
        target: Address,
        /// Flag argument of the instruction.
        bool_value: bool,
        /// Numeric argument of the instruction.
        numeric_value: U256,
    },

    /// The application receiver applied an instruction.
    IncrementExecuted {
        /// Flag that was stored.
        bool_value: bool,
        /// Number that was stored.
        numeric_value: U256,
        /// Counter after the increment.
        new_counter: U256,
    },

    // =========================================================================
    // OWNERSHIP
    // =========================================================================
    /// Ownership of a component moved.
    OwnershipTransferred {
        /// Previous owner (zero at construction).
        previous_owner: Address,
        /// New owner.
        new_owner: Address,
    },
}

impl BridgeEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Sent { .. } => EventTopic::MessageSender,
            Self::RelayerUpdated { .. } | Self::TransactionExecuted { .. } => {
                EventTopic::MessageReceiver
            }
            Self::AmbAddressUpdated { .. }
            | Self::MessageSent { .. }
            | Self::IncrementExecuted { .. } => EventTopic::Application,
            Self::OwnershipTransferred { .. } => EventTopic::Ownership,
        }
    }

    /// Short event name, matching the on-chain event identifiers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sent { .. } => "Sent",
            Self::RelayerUpdated { .. } => "RelayerUpdated",
            Self::TransactionExecuted { .. } => "TransactionExecuted",
            Self::AmbAddressUpdated { .. } => "AMBAddressUpdated",
            Self::MessageSent { .. } => "MessageSent",
            Self::IncrementExecuted { .. } => "IncrementExecuted",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// A committed event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log, starting at 0, gap-free.
    pub index: u64,
    /// Transaction that emitted the event.
    pub tx_id: Uuid,
    /// Component that emitted the event.
    pub emitter: Address,
    /// The event itself.
    pub event: BridgeEvent,
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// MessageSender events.
    MessageSender,
    /// MessageReceiver events.
    MessageReceiver,
    /// Counter application events.
    Application,
    /// Ownership changes on any component.
    Ownership,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Emitting components to include. Empty means all emitters.
    pub emitters: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            emitters: Vec::new(),
        }
    }

    /// Create a filter for events from specific components.
    #[must_use]
    pub fn from_emitters(emitters: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            emitters,
        }
    }

    /// Check if an entry matches this filter.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&entry.event.topic());

        let emitter_match = self.emitters.is_empty() || self.emitters.contains(&entry.emitter);

        topic_match && emitter_match
    }
}
