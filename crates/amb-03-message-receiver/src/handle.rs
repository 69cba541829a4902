//! Typed client for a deployed MessageReceiver.

use crate::contract::selectors;
use amb_01_execution::{ExecutionApi, OwnableHandle, Receipt};
use shared_types::abi::{self, Token};
use shared_types::entities::{Address, Bytes};
use shared_types::errors::ExecutionError;

/// Handle to a deployed MessageReceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageReceiverHandle {
    address: Address,
}

impl MessageReceiverHandle {
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

    /// Calldata for `execute(target, payload)`.
    #[must_use]
    pub fn encode_execute(target: Address, payload: &Bytes) -> Bytes {
        abi::encode_call(
            selectors::EXECUTE,
            &[Token::Address(target), Token::Bytes(payload.clone())],
        )
    }

    /// Reads the configured relayer.
    pub fn relayer<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<Address, ExecutionError> {
        let output = api.query(
            Address::ZERO,
            self.address,
            abi::encode_call(selectors::RELAYER, &[]).as_slice(),
        )?;
        Ok(abi::decode_address(output.as_slice())?)
    }

    /// Sends `updateRelayer(new_relayer)` from `from`.
    pub fn update_relayer<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        new_relayer: Address,
    ) -> Result<Receipt, ExecutionError> {
        let calldata = abi::encode_call(selectors::UPDATE_RELAYER, &[Token::Address(new_relayer)]);
        api.transact(from, self.address, calldata.as_slice())
    }

    /// Sends `execute(target, payload)` from `from`.
    pub fn execute<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        target: Address,
        payload: &Bytes,
    ) -> Result<Receipt, ExecutionError> {
        api.transact(
            from,
            self.address,
            Self::encode_execute(target, payload).as_slice(),
        )
    }
}

impl OwnableHandle for MessageReceiverHandle {
    fn address(&self) -> Address {
        self.address
    }
}
