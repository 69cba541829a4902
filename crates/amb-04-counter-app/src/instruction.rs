//! The application instruction carried as the bridge payload.
//!
//! The payload is ready-to-execute calldata for the receiver:
//! `increment(bool,uint256)` selector followed by both arguments. The bridge
//! never looks inside it.

use crate::selectors;
use serde::{Deserialize, Serialize};
use shared_types::abi::{self, Decoder, Token};
use shared_types::entities::{Bytes, U256};
use shared_types::errors::ExecutionError;

/// Decoded `increment` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementInstruction {
    /// Flag to store.
    pub bool_value: bool,
    /// Number to store.
    pub numeric_value: U256,
}

/// Builds the payload for `increment(bool_value, numeric_value)`.
#[must_use]
pub fn encode_increment(bool_value: bool, numeric_value: U256) -> Bytes {
    abi::encode_call(
        selectors::INCREMENT,
        &[Token::Bool(bool_value), Token::Uint(numeric_value)],
    )
}

/// Parses an `increment` payload. Fails on any other selector.
pub fn decode_increment(payload: &[u8]) -> Result<IncrementInstruction, ExecutionError> {
    let (selector, args) = abi::split_selector(payload)?;
    if selector != selectors::INCREMENT {
        return Err(ExecutionError::UnknownSelector(selector));
    }
    let mut args = Decoder::new(args);
    Ok(IncrementInstruction {
        bool_value: args.bool()?,
        numeric_value: args.uint()?,
    })
}
