//! # AMB-01 Execution - In-Process Execution Platform
//!
//! Hosts the bridge components and gives them the platform guarantees they
//! rely on: code presence checks, synchronous nested calls, full rollback on
//! failure, and an ordered event log.
//!
//! Components are native Rust types implementing [`Contract`] and
//! dispatching on 4-byte function selectors. There is no bytecode.
//!
//! ## Platform Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | One transaction at a time | `service.rs` - single `parking_lot::Mutex` around `WorldState` |
//! | No state change on revert | `state.rs` - journal + `Checkpoint` per call frame |
//! | No event on revert | `state.rs` - pending logs truncated with the journal |
//! | Log order equals commit order | `service.rs` - logs appended while the lock is held |
//! | Call depth limit | `context.rs` - `call_frame()` |
//!
//! ## Execution Safety Limits
//!
//! | Limit | Value | Purpose |
//! |-------|-------|---------|
//! | `max_call_depth` | 1024 | Bound recursion |
//!
//! ## Usage Example
//!
//! ```ignore
//! use amb_01_execution::prelude::*;
//!
//! let log = Arc::new(InMemoryEventLog::new());
//! let chain = Chain::with_log(log.clone());
//! let receipt = chain.deploy(deployer, MyComponent)?;
//! let receipt = chain.transact(alice, receipt.to, &calldata)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod context;
pub mod domain;
pub mod ownable;
pub mod ports;
pub mod service;
pub mod state;

pub use context::CallContext;
pub use domain::{
    compute_contract_address, slot, ChainConfig, PendingLog, Receipt, Slot,
    DEFAULT_MAX_CALL_DEPTH,
};
pub use ownable::{Ownable, OwnableHandle, OWNER_SLOT};
pub use ports::{Contract, ExecutionApi};
pub use service::Chain;
pub use state::{Checkpoint, WorldState};

/// Prelude for component crates.
pub mod prelude {
    pub use crate::context::CallContext;
    pub use crate::domain::{slot, ChainConfig, Receipt, Slot};
    pub use crate::ownable::{Ownable, OwnableHandle};
    pub use crate::ports::{Contract, ExecutionApi};
    pub use crate::service::Chain;
    pub use shared_bus::{BridgeEvent, EventLog, InMemoryEventLog};
    pub use shared_types::abi::{self, Decoder, Selector, Token};
    pub use shared_types::entities::{Address, Bytes, U256};
    pub use shared_types::errors::ExecutionError;
    pub use std::sync::Arc;
}
