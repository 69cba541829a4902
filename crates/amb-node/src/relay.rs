//! # Relay Agent
//!
//! The trusted off-core relayer. It polls the event log from a cursor, picks
//! `Sent` events emitted by its MessageSender, and submits each one to the
//! destination as `execute(target, payload)`.
//!
//! Deliveries are attempted once. A rejected delivery is logged and counted;
//! there is no retry and no deduplication.

use crate::config::RelayConfig;
use amb_01_execution::{ExecutionApi, Receipt};
use amb_03_message_receiver::MessageReceiverHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_bus::{BridgeEvent, EventLog};
use shared_types::entities::{Address, Bytes};
use shared_types::errors::ExecutionError;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

// =============================================================================
// DESTINATION PORT
// =============================================================================

/// Where relayed messages are delivered.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Delivers one message.
    async fn deliver(&self, target: Address, payload: &Bytes) -> Result<Receipt, ExecutionError>;
}

/// Delivers through a MessageReceiver, signing as the relayer.
pub struct ReceiverDestination {
    api: Arc<dyn ExecutionApi>,
    receiver: MessageReceiverHandle,
    relayer: Address,
}

impl ReceiverDestination {
    /// Creates a destination for `receiver`.
    pub fn new(api: Arc<dyn ExecutionApi>, receiver: MessageReceiverHandle, relayer: Address) -> Self {
        Self {
            api,
            receiver,
            relayer,
        }
    }
}

#[async_trait]
impl Destination for ReceiverDestination {
    async fn deliver(&self, target: Address, payload: &Bytes) -> Result<Receipt, ExecutionError> {
        self.receiver
            .execute(self.api.as_ref(), self.relayer, target, payload)
    }
}

#[async_trait]
impl<T: Destination + ?Sized> Destination for Arc<T> {
    async fn deliver(&self, target: Address, payload: &Bytes) -> Result<Receipt, ExecutionError> {
        self.as_ref().deliver(target, payload).await
    }
}

// =============================================================================
// AGENT
// =============================================================================

/// Counters kept by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    /// `Sent` events seen from the source.
    pub observed: u64,
    /// Deliveries accepted by the destination.
    pub relayed: u64,
    /// Deliveries rejected by the destination.
    pub failed: u64,
}

/// Polling relayer.
pub struct RelayAgent<D: Destination> {
    log: Arc<dyn EventLog>,
    destination: D,
    source: Address,
    config: RelayConfig,
    cursor: u64,
    stats: RelayStats,
}

impl<D: Destination> RelayAgent<D> {
    /// Creates an agent relaying messages emitted by `source`.
    pub fn new(log: Arc<dyn EventLog>, destination: D, source: Address, config: RelayConfig) -> Self {
        let cursor = config.start_cursor;
        Self {
            log,
            destination,
            source,
            config,
            cursor,
            stats: RelayStats::default(),
        }
    }

    /// Next log index to read.
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Relays everything appended since the cursor. Returns the number of
    /// accepted deliveries.
    pub async fn relay_pending(&mut self) -> usize {
        let entries = self.log.entries_since(self.cursor);
        let mut relayed = 0;

        for entry in entries {
            self.cursor = entry.index + 1;
            if entry.emitter != self.source {
                continue;
            }
            let BridgeEvent::Sent { target, payload } = entry.event else {
                continue;
            };

            self.stats.observed += 1;
            debug!(index = entry.index, %target, payload_len = payload.len(), "Relaying message");

            match self.destination.deliver(target, &payload).await {
                Ok(receipt) => {
                    self.stats.relayed += 1;
                    relayed += 1;
                    info!(
                        index = entry.index,
                        source_tx = %entry.tx_id,
                        delivery_tx = %receipt.tx_id,
                        %target,
                        "Message relayed"
                    );
                }
                Err(err) => {
                    self.stats.failed += 1;
                    warn!(
                        index = entry.index,
                        source_tx = %entry.tx_id,
                        %target,
                        error = %err,
                        "Delivery rejected"
                    );
                }
            }
        }

        relayed
    }

    /// Polls until `shutdown` flips to true, then drains once more and
    /// returns the final counters.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> RelayStats {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        info!(source = %self.source, cursor = self.cursor, "Relay agent started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.relay_pending().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.relay_pending().await;
        info!(
            observed = self.stats.observed,
            relayed = self.stats.relayed,
            failed = self.stats.failed,
            "Relay agent stopped"
        );
        self.stats
    }
}
