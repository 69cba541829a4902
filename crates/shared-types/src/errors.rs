//! # Error Types
//!
//! The execution error taxonomy shared by the platform and every component.
//!
//! Every variant is fully reverting: a call that returns one of these leaves
//! no storage writes and no events behind.

use crate::abi::{AbiError, Selector};
use crate::entities::Address;
use thiserror::Error;

/// Errors surfaced by a call into a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Configuration attempted by someone other than the owner.
    #[error("Ownable_NotOwner: caller {caller:?} is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },

    /// Delivery attempted by someone other than the configured relayer.
    #[error("AMBReceiver_OnlyRelayer: caller {caller:?} is not the relayer")]
    OnlyRelayer {
        /// The rejected caller.
        caller: Address,
    },

    /// Application call attempted by someone other than the trusted bridge receiver.
    #[error("CounterReceiver_OnlyAMB: caller {caller:?} is not the AMB address")]
    OnlyAmb {
        /// The rejected caller.
        caller: Address,
    },

    /// Delivery target has no code.
    #[error("AMBReceiver_OnlyForContracts: target {0:?} has no code")]
    OnlyForContracts(Address),

    /// The delivered call failed; the inner error is carried unchanged.
    #[error("AMBReceiver_ExecuteFailed: call to {target:?} failed: {source}")]
    ExecuteFailed {
        /// Target of the failed call.
        target: Address,
        /// What the target reported.
        #[source]
        source: Box<ExecutionError>,
    },

    /// A call was made to an address that has no code.
    #[error("call to non-contract address {0:?}")]
    NotAContract(Address),

    /// The zero address was supplied where a real identity is required.
    #[error("zero address not allowed")]
    ZeroAddress,

    /// No function matches the selector.
    #[error("unknown function selector 0x{}", hex::encode(.0))]
    UnknownSelector(Selector),

    /// Calldata could not be decoded.
    #[error("invalid calldata: {0}")]
    InvalidCalldata(#[from] AbiError),

    /// Nested calls went too deep.
    #[error("call depth exceeded: {depth} > {max}")]
    CallDepthExceeded {
        /// Depth that was attempted.
        depth: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Free-form revert raised by a component.
    #[error("revert: {0}")]
    Revert(String),
}

impl ExecutionError {
    /// True for the "target is not a contract" failure class.
    #[must_use]
    pub fn is_not_a_contract(&self) -> bool {
        matches!(self, Self::NotAContract(_) | Self::OnlyForContracts(_))
    }

    /// True when the error is an authorization rejection.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::NotOwner { .. } | Self::OnlyRelayer { .. } | Self::OnlyAmb { .. }
        )
    }

    /// Walks `ExecuteFailed` wrappers down to the originating error.
    #[must_use]
    pub fn root_cause(&self) -> &ExecutionError {
        match self {
            Self::ExecuteFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
