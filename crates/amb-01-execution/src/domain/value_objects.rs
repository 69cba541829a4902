//! # Value Objects
//!
//! Immutable types describing platform configuration and transaction results.

use serde::{Deserialize, Serialize};
use shared_bus::{BridgeEvent, LogEntry};
use shared_types::entities::{Address, Bytes, U256};
use uuid::Uuid;

/// A storage slot key.
pub type Slot = U256;

/// Builds the slot key for a small slot index.
#[must_use]
pub const fn slot(index: u64) -> Slot {
    U256([index, 0, 0, 0])
}

/// Default maximum nested call depth (EVM parity).
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Platform configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Maximum call depth. The top-level call runs at depth 0.
    pub max_call_depth: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Result of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique transaction ID.
    pub tx_id: Uuid,
    /// Transaction originator.
    pub from: Address,
    /// Called component, or the new component's address for a deployment.
    pub to: Address,
    /// Return data of the top-level call.
    pub output: Bytes,
    /// Entries appended to the event log, in emission order.
    pub logs: Vec<LogEntry>,
}

impl Receipt {
    /// Iterates over the committed events.
    pub fn events(&self) -> impl Iterator<Item = &BridgeEvent> {
        self.logs.iter().map(|entry| &entry.event)
    }

    /// Returns the first event with the given name, if any.
    #[must_use]
    pub fn find_event(&self, name: &str) -> Option<&BridgeEvent> {
        self.events().find(|event| event.name() == name)
    }
}

/// An event emitted inside a transaction that has not committed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingLog {
    /// Emitting component.
    pub emitter: Address,
    /// The event.
    pub event: BridgeEvent,
}
