//! # Deployment
//!
//! Deploys the four bridge components and wires them together:
//!
//! 1. deploy MessageSender, MessageReceiver, CounterSender, CounterReceiver
//! 2. `CounterSender.updateAMBAddress(MessageSender)`
//! 3. `MessageReceiver.updateRelayer(relayer)`
//! 4. `CounterReceiver.updateAMBAddress(MessageReceiver)`

use amb_01_execution::Chain;
use amb_02_message_sender::{MessageSender, MessageSenderHandle};
use amb_03_message_receiver::{MessageReceiver, MessageReceiverHandle};
use amb_04_counter_app::{CounterReceiver, CounterReceiverHandle, CounterSender, CounterSenderHandle};
use serde::Serialize;
use shared_types::entities::Address;
use shared_types::errors::ExecutionError;
use tracing::info;

/// Handles to a wired set of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Source-side bridge.
    pub message_sender: MessageSenderHandle,
    /// Destination-side bridge.
    pub message_receiver: MessageReceiverHandle,
    /// Source-side application.
    pub counter_sender: CounterSenderHandle,
    /// Destination-side application.
    pub counter_receiver: CounterReceiverHandle,
}

/// Component addresses, for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeployedAddresses {
    /// MessageSender.
    pub message_sender: Address,
    /// MessageReceiver.
    pub message_receiver: Address,
    /// CounterSender.
    pub counter_sender: Address,
    /// CounterReceiver.
    pub counter_receiver: Address,
}

impl Deployment {
    /// Deploys and wires everything from `deployer`.
    pub fn bootstrap(
        chain: &Chain,
        deployer: Address,
        relayer: Address,
    ) -> Result<Self, ExecutionError> {
        let message_sender = MessageSenderHandle::at(chain.deploy(deployer, MessageSender)?.to);
        let message_receiver =
            MessageReceiverHandle::at(chain.deploy(deployer, MessageReceiver)?.to);
        let counter_sender = CounterSenderHandle::at(chain.deploy(deployer, CounterSender)?.to);
        let counter_receiver =
            CounterReceiverHandle::at(chain.deploy(deployer, CounterReceiver)?.to);

        counter_sender.update_amb_address(chain, deployer, message_sender.address())?;
        message_receiver.update_relayer(chain, deployer, relayer)?;
        counter_receiver.update_amb_address(chain, deployer, message_receiver.address())?;

        let deployment = Self {
            message_sender,
            message_receiver,
            counter_sender,
            counter_receiver,
        };
        let addresses = deployment.addresses();
        info!(
            message_sender = %addresses.message_sender,
            message_receiver = %addresses.message_receiver,
            counter_sender = %addresses.counter_sender,
            counter_receiver = %addresses.counter_receiver,
            %relayer,
            "Bridge deployed and wired"
        );
        Ok(deployment)
    }

    /// Component addresses.
    #[must_use]
    pub fn addresses(&self) -> DeployedAddresses {
        DeployedAddresses {
            message_sender: self.message_sender.address(),
            message_receiver: self.message_receiver.address(),
            counter_sender: self.counter_sender.address(),
            counter_receiver: self.counter_receiver.address(),
        }
    }
}
