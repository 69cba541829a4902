//! Typed client for a deployed MessageSender.

use crate::contract::selectors;
use amb_01_execution::{ExecutionApi, Receipt};
use shared_types::abi::{self, Token};
use shared_types::entities::{Address, Bytes};
use shared_types::errors::ExecutionError;

/// Handle to a deployed MessageSender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSenderHandle {
    address: Address,
}

impl MessageSenderHandle {
    /// Wraps the component at `address`.
    #[must_use]
    pub const fn at(address: Address) -> Self {
        Self { address }
    }

    /// Component address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Calldata for `send(target, payload)`.
    #[must_use]
    pub fn encode_send(target: Address, payload: &Bytes) -> Bytes {
        abi::encode_call(
            selectors::SEND,
            &[Token::Address(target), Token::Bytes(payload.clone())],
        )
    }

    /// Sends `send(target, payload)` from `from`.
    pub fn send<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        target: Address,
        payload: &Bytes,
    ) -> Result<Receipt, ExecutionError> {
        api.transact(
            from,
            self.address,
            Self::encode_send(target, payload).as_slice(),
        )
    }
}
