//! # Shared Types Crate
//!
//! Value objects, the ABI codec and the error taxonomy shared by the execution
//! platform, the bridge components and the relay node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Bytes` and `ExecutionError` are
//!   defined once here and used by every crate.
//! - **Opaque Payloads**: the codec is used by components to decode their own
//!   calldata. The bridge core never interprets a relayed payload.
//! - **Zero Means Unset**: `Address::ZERO` is the universal "not configured"
//!   sentinel.

pub mod abi;
pub mod entities;
pub mod errors;

pub use abi::{AbiError, Decoder, ParamType, Selector, Token};
pub use entities::*;
pub use errors::*;
