//! Typed clients for the application components.

use crate::selectors;
use amb_01_execution::{ExecutionApi, OwnableHandle, Receipt};
use serde::{Deserialize, Serialize};
use shared_types::abi::{self, Selector, Token};
use shared_types::entities::{Address, Bytes, U256};
use shared_types::errors::ExecutionError;

/// Snapshot of a CounterReceiver's application state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Number of applied increments.
    pub counter: U256,
    /// Last delivered flag.
    pub bool_value: bool,
    /// Last delivered number.
    pub numeric_value: U256,
}

fn query<E: ExecutionApi + ?Sized>(
    api: &E,
    address: Address,
    selector: Selector,
) -> Result<Bytes, ExecutionError> {
    api.query(
        Address::ZERO,
        address,
        abi::encode_call(selector, &[]).as_slice(),
    )
}

fn update_amb_address<E: ExecutionApi + ?Sized>(
    api: &E,
    address: Address,
    from: Address,
    new_address: Address,
) -> Result<Receipt, ExecutionError> {
    let calldata = abi::encode_call(
        selectors::UPDATE_AMB_ADDRESS,
        &[Token::Address(new_address)],
    );
    api.transact(from, address, calldata.as_slice())
}

// =============================================================================
// SENDER
// =============================================================================

/// Handle to a deployed CounterSender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSenderHandle {
    address: Address,
}

impl CounterSenderHandle {
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

    /// Reads the configured MessageSender.
    pub fn amb_address<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<Address, ExecutionError> {
        let output = query(api, self.address, selectors::AMB_ADDRESS)?;
        Ok(abi::decode_address(output.as_slice())?)
    }

    /// Sends `updateAMBAddress(new_address)` from `from`.
    pub fn update_amb_address<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        new_address: Address,
    ) -> Result<Receipt, ExecutionError> {
        update_amb_address(api, self.address, from, new_address)
    }

    /// Sends `send(target, bool_value, numeric_value)` from `from`.
    pub fn send<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        target: Address,
        bool_value: bool,
        numeric_value: U256,
    ) -> Result<Receipt, ExecutionError> {
        let calldata = abi::encode_call(
            selectors::SEND,
            &[
                Token::Address(target),
                Token::Bool(bool_value),
                Token::Uint(numeric_value),
            ],
        );
        api.transact(from, self.address, calldata.as_slice())
    }
}

impl OwnableHandle for CounterSenderHandle {
    fn address(&self) -> Address {
        self.address
    }
}

// =============================================================================
// RECEIVER
// =============================================================================

/// Handle to a deployed CounterReceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterReceiverHandle {
    address: Address,
}

impl CounterReceiverHandle {
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

    /// Reads the trusted MessageReceiver.
    pub fn amb_address<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<Address, ExecutionError> {
        let output = query(api, self.address, selectors::AMB_ADDRESS)?;
        Ok(abi::decode_address(output.as_slice())?)
    }

    /// Reads `counter()`.
    pub fn counter<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<U256, ExecutionError> {
        let output = query(api, self.address, selectors::COUNTER)?;
        Ok(abi::decode_uint(output.as_slice())?)
    }

    /// Reads `boolValue()`.
    pub fn bool_value<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<bool, ExecutionError> {
        let output = query(api, self.address, selectors::BOOL_VALUE)?;
        Ok(abi::decode_bool(output.as_slice())?)
    }

    /// Reads `uint256Value()`.
    pub fn uint256_value<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<U256, ExecutionError> {
        let output = query(api, self.address, selectors::UINT256_VALUE)?;
        Ok(abi::decode_uint(output.as_slice())?)
    }

    /// Reads all three application fields.
    pub fn state<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<CounterState, ExecutionError> {
        Ok(CounterState {
            counter: self.counter(api)?,
            bool_value: self.bool_value(api)?,
            numeric_value: self.uint256_value(api)?,
        })
    }

    /// Sends `updateAMBAddress(new_address)` from `from`.
    pub fn update_amb_address<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        new_address: Address,
    ) -> Result<Receipt, ExecutionError> {
        update_amb_address(api, self.address, from, new_address)
    }

    /// Sends `increment(bool_value, numeric_value)` directly from `from`.
    /// Only succeeds when `from` is the trusted bridge, which is never an
    /// externally owned account in a correct deployment.
    pub fn increment<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        bool_value: bool,
        numeric_value: U256,
    ) -> Result<Receipt, ExecutionError> {
        let payload = crate::instruction::encode_increment(bool_value, numeric_value);
        api.transact(from, self.address, payload.as_slice())
    }
}

impl OwnableHandle for CounterReceiverHandle {
    fn address(&self) -> Address {
        self.address
    }
}
