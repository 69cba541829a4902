//! # Driving Port (API - Inbound)
//!
//! The transaction surface offered to external callers.

use crate::domain::Receipt;
use shared_types::entities::{Address, Bytes};
use shared_types::errors::ExecutionError;

/// Transaction and query entry points of the platform.
///
/// Every call is processed to completion before the next one starts.
pub trait ExecutionApi: Send + Sync {
    /// Executes `calldata` against `to` as one atomic transaction sent by
    /// `from`. On success all writes and events are committed; on failure
    /// nothing is.
    fn transact(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Receipt, ExecutionError>;

    /// Executes `calldata` against `to` and returns the output. Effects are
    /// always discarded.
    fn query(&self, from: Address, to: Address, calldata: &[u8]) -> Result<Bytes, ExecutionError>;

    /// True if a component is deployed at `address`.
    fn has_code(&self, address: Address) -> bool;
}
