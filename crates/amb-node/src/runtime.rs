//! # Node Runtime
//!
//! Owns the platform, the event log and the wired deployment, and runs the
//! relay agent as a background task.
//!
//! ## Startup Sequence
//!
//! 1. Create the event log and the execution platform
//! 2. Deploy and wire the components
//! 3. Spawn the relay agent
//! 4. Optionally send the demo message and wait for its delivery

use crate::config::{ConfigError, NodeConfig};
use crate::deployment::Deployment;
use crate::relay::{RelayAgent, RelayStats, ReceiverDestination};
use amb_01_execution::{Chain, ExecutionApi, Receipt};
use amb_04_counter_app::CounterState;
use shared_bus::{BridgeEvent, EventFilter, InMemoryEventLog, LogEntry};
use shared_types::entities::{Address, U256};
use shared_types::errors::ExecutionError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runtime failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A platform call failed.
    #[error("execution failed: {0}")]
    Execution(#[from] ExecutionError),

    /// The relay agent is already running.
    #[error("relay agent already started")]
    AlreadyStarted,

    /// The delivery did not show up in time.
    #[error("no delivery observed within {0:?}")]
    DeliveryTimeout(Duration),

    /// The event log was dropped while waiting.
    #[error("event log closed")]
    LogClosed,
}

/// The running node.
pub struct NodeRuntime {
    config: NodeConfig,
    log: Arc<InMemoryEventLog>,
    chain: Arc<Chain>,
    deployment: Deployment,
    shutdown_tx: watch::Sender<bool>,
    agent: Option<JoinHandle<RelayStats>>,
}

impl NodeRuntime {
    /// Validates `config`, creates the platform and deploys the bridge.
    pub fn new(config: NodeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        info!("Creating AMB node runtime");

        let log = Arc::new(InMemoryEventLog::new());
        let chain = Arc::new(Chain::new(config.chain.clone(), log.clone()));
        let deployment = Deployment::bootstrap(
            &chain,
            config.accounts.deployer,
            config.accounts.relayer,
        )?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            log,
            chain,
            deployment,
            shutdown_tx,
            agent: None,
        })
    }

    /// Spawns the relay agent, reading the log from the configured start
    /// cursor.
    pub fn start(&mut self) -> Result<(), RuntimeError> {
        if self.agent.is_some() {
            return Err(RuntimeError::AlreadyStarted);
        }

        let api: Arc<dyn ExecutionApi> = self.chain.clone();
        let destination = ReceiverDestination::new(
            api,
            self.deployment.message_receiver,
            self.config.accounts.relayer,
        );
        let agent = RelayAgent::new(
            self.chain.event_log().clone(),
            destination,
            self.deployment.message_sender.address(),
            self.config.relay.clone(),
        );

        let shutdown_rx = self.shutdown_tx.subscribe();
        self.agent = Some(tokio::spawn(agent.run(shutdown_rx)));
        info!(
            poll_interval_ms = self.config.relay.poll_interval_ms,
            "Relay agent spawned"
        );
        Ok(())
    }

    /// Sends `CounterSender.send(CounterReceiver, bool_value, numeric_value)`
    /// from `from`.
    pub fn send_increment(
        &self,
        from: Address,
        bool_value: bool,
        numeric_value: U256,
    ) -> Result<Receipt, RuntimeError> {
        let receipt = self.deployment.counter_sender.send(
            self.chain.as_ref(),
            from,
            self.deployment.counter_receiver.address(),
            bool_value,
            numeric_value,
        )?;
        Ok(receipt)
    }

    /// Sends the configured demo message and waits until the receiver
    /// applies it.
    pub async fn run_demo(&self) -> Result<LogEntry, RuntimeError> {
        let demo = &self.config.demo;
        let mut subscription = self.log.subscribe(EventFilter::from_emitters(vec![self
            .deployment
            .counter_receiver
            .address()]));

        let receipt = self.send_increment(demo.sender, demo.bool_value, demo.numeric_value)?;
        self.print_receipt("send", &receipt);

        let wait = async {
            while let Some(entry) = subscription.recv().await {
                if matches!(entry.event, BridgeEvent::IncrementExecuted { .. }) {
                    return Ok(entry);
                }
            }
            Err(RuntimeError::LogClosed)
        };

        tokio::time::timeout(demo.timeout(), wait)
            .await
            .map_err(|_| RuntimeError::DeliveryTimeout(demo.timeout()))?
    }

    /// Current application state of the CounterReceiver.
    pub fn counter_state(&self) -> Result<CounterState, RuntimeError> {
        Ok(self.deployment.counter_receiver.state(self.chain.as_ref())?)
    }

    /// Stops the relay agent and returns its final counters.
    pub async fn shutdown(&mut self) -> RelayStats {
        info!("Initiating shutdown...");
        if self.shutdown_tx.send(true).is_err() {
            // No receiver means the agent already exited
            info!("Relay agent not running");
        }

        let stats = match self.agent.take() {
            Some(handle) => match handle.await {
                Ok(stats) => stats,
                Err(e) => {
                    error!("Relay agent task failed: {}", e);
                    RelayStats::default()
                }
            },
            None => RelayStats::default(),
        };

        info!("Shutdown complete");
        stats
    }

    /// Prints a receipt as JSON when enabled.
    pub fn print_receipt(&self, label: &str, receipt: &Receipt) {
        if !self.config.logging.json_receipts {
            return;
        }
        match serde_json::to_string_pretty(receipt) {
            Ok(json) => println!("{label}: {json}"),
            Err(e) => error!("Failed to serialize receipt: {}", e),
        }
    }

    /// The platform.
    #[must_use]
    pub fn chain(&self) -> &Arc<Chain> {
        &self.chain
    }

    /// The event log.
    #[must_use]
    pub fn event_log(&self) -> &Arc<InMemoryEventLog> {
        &self.log
    }

    /// The wired components.
    #[must_use]
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}
