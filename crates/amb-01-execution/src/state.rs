//! # World State
//!
//! Code registry, slot storage and deployment nonces, with a journal that
//! lets any call frame be undone.
//!
//! Every mutation made during a transaction pushes a [`JournalEntry`]. A
//! [`Checkpoint`] records the journal and pending-log lengths; reverting to
//! it replays the journal backwards and drops newer logs. Committing clears
//! the journal and hands the pending logs to the caller.

use crate::domain::{PendingLog, Slot};
use crate::ports::Contract;
use shared_types::entities::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;

/// One undoable mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum JournalEntry {
    /// A slot was written. `previous` is `None` if it held zero.
    StorageChanged {
        address: Address,
        slot: Slot,
        previous: Option<U256>,
    },
    /// Code was registered at an address.
    CodeInstalled { address: Address },
}

/// Position to revert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    journal_len: usize,
    logs_len: usize,
}

/// Mutable platform state. Always accessed under the chain lock.
#[derive(Default)]
pub struct WorldState {
    code: HashMap<Address, Arc<dyn Contract>>,
    storage: HashMap<(Address, Slot), U256>,
    nonces: HashMap<Address, u64>,
    journal: Vec<JournalEntry>,
    pending_logs: Vec<PendingLog>,
}

impl WorldState {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // CODE
    // =========================================================================

    /// Returns the component deployed at `address`.
    #[must_use]
    pub fn code(&self, address: Address) -> Option<Arc<dyn Contract>> {
        self.code.get(&address).cloned()
    }

    /// True if a component is deployed at `address`.
    #[must_use]
    pub fn has_code(&self, address: Address) -> bool {
        self.code.contains_key(&address)
    }

    /// Registers a component. Journaled.
    pub fn install_code(&mut self, address: Address, contract: Arc<dyn Contract>) {
        self.code.insert(address, contract);
        self.journal.push(JournalEntry::CodeInstalled { address });
    }

    // =========================================================================
    // STORAGE
    // =========================================================================

    /// Reads a slot. Unwritten slots read as zero.
    #[must_use]
    pub fn load(&self, address: Address, slot: Slot) -> U256 {
        self.storage
            .get(&(address, slot))
            .copied()
            .unwrap_or_default()
    }

    /// Writes a slot. Journaled.
    pub fn store(&mut self, address: Address, slot: Slot, value: U256) {
        let previous = if value.is_zero() {
            self.storage.remove(&(address, slot))
        } else {
            self.storage.insert((address, slot), value)
        };
        self.journal.push(JournalEntry::StorageChanged {
            address,
            slot,
            previous,
        });
    }

    // =========================================================================
    // NONCES
    // =========================================================================

    /// Deployment nonce of `address`.
    #[must_use]
    pub fn nonce(&self, address: Address) -> u64 {
        self.nonces.get(&address).copied().unwrap_or(0)
    }

    /// Returns the current nonce and increments it. Not journaled: a failed
    /// deployment still consumes its nonce.
    pub fn bump_nonce(&mut self, address: Address) -> u64 {
        let entry = self.nonces.entry(address).or_insert(0);
        let current = *entry;
        *entry = current.saturating_add(1);
        current
    }

    // =========================================================================
    // LOGS
    // =========================================================================

    /// Queues an event until the transaction commits.
    pub fn push_log(&mut self, log: PendingLog) {
        self.pending_logs.push(log);
    }

    /// Events queued so far in this transaction.
    #[must_use]
    pub fn pending_logs(&self) -> &[PendingLog] {
        &self.pending_logs
    }

    // =========================================================================
    // JOURNAL
    // =========================================================================

    /// Marks the current position.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            journal_len: self.journal.len(),
            logs_len: self.pending_logs.len(),
        }
    }

    /// Undoes every mutation and event recorded after `checkpoint`.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal_len {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry {
                JournalEntry::StorageChanged {
                    address,
                    slot,
                    previous,
                } => match previous {
                    Some(value) => {
                        self.storage.insert((address, slot), value);
                    }
                    None => {
                        self.storage.remove(&(address, slot));
                    }
                },
                JournalEntry::CodeInstalled { address } => {
                    self.code.remove(&address);
                }
            }
        }
        self.pending_logs.truncate(checkpoint.logs_len);
    }

    /// Undoes everything since the last commit.
    pub fn rollback(&mut self) {
        self.revert_to(Checkpoint {
            journal_len: 0,
            logs_len: 0,
        });
    }

    /// Makes every mutation since the last commit permanent and returns the
    /// queued events in emission order.
    pub fn commit(&mut self) -> Vec<PendingLog> {
        self.journal.clear();
        std::mem::take(&mut self.pending_logs)
    }
}
