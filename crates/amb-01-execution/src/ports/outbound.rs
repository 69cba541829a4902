//! # Driven Port (SPI - Outbound)
//!
//! Components plug into the platform by implementing [`Contract`].

use crate::context::CallContext;
use shared_types::entities::Bytes;
use shared_types::errors::ExecutionError;

/// A deployed component.
///
/// Dispatch is `(caller context, opaque input) -> output or error`. An error
/// reverts every write and event made by this call and its nested calls.
pub trait Contract: Send + Sync {
    /// Human-readable component name, used in logs.
    fn name(&self) -> &'static str;

    /// Runs once at deployment, with the deployer as caller.
    fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), ExecutionError> {
        let _ = ctx;
        Ok(())
    }

    /// Handles one call.
    fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, ExecutionError>;
}
