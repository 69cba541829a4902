//! # Call Context
//!
//! The view a component gets of the platform while handling one call.

use crate::domain::{PendingLog, Slot};
use crate::ports::Contract;
use crate::state::WorldState;
use shared_bus::BridgeEvent;
use shared_types::entities::{Address, Bytes, U256};
use shared_types::errors::ExecutionError;
use std::sync::Arc;
use tracing::debug;

/// Per-frame execution context.
pub struct CallContext<'a> {
    world: &'a mut WorldState,
    caller: Address,
    address: Address,
    depth: usize,
    max_depth: usize,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        world: &'a mut WorldState,
        caller: Address,
        address: Address,
        depth: usize,
        max_depth: usize,
    ) -> Self {
        Self {
            world,
            caller,
            address,
            depth,
            max_depth,
        }
    }

    /// Immediate caller of this frame.
    #[must_use]
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Address of the executing component.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Nesting depth. The top-level call is 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Reads one of this component's slots.
    #[must_use]
    pub fn load(&self, slot: Slot) -> U256 {
        self.world.load(self.address, slot)
    }

    /// Writes one of this component's slots.
    pub fn store(&mut self, slot: Slot, value: U256) {
        self.world.store(self.address, slot, value);
    }

    /// Reads a slot holding a right-aligned address.
    #[must_use]
    pub fn load_address(&self, slot: Slot) -> Address {
        Address::from_word(self.load(slot))
    }

    /// Writes an address into a slot.
    pub fn store_address(&mut self, slot: Slot, address: Address) {
        self.store(slot, address.to_word());
    }

    /// Reads a slot holding a flag.
    #[must_use]
    pub fn load_bool(&self, slot: Slot) -> bool {
        !self.load(slot).is_zero()
    }

    /// Writes a flag into a slot.
    pub fn store_bool(&mut self, slot: Slot, value: bool) {
        self.store(slot, U256::from(u8::from(value)));
    }

    /// Emits an event from this component. Published only if the enclosing
    /// transaction commits.
    pub fn emit(&mut self, event: BridgeEvent) {
        debug!(emitter = %self.address, event = event.name(), "Event emitted");
        self.world.push_log(PendingLog {
            emitter: self.address,
            event,
        });
    }

    /// True if a component is deployed at `address`.
    #[must_use]
    pub fn has_code(&self, address: Address) -> bool {
        self.world.has_code(address)
    }

    /// Calls another component with this component as caller. If the callee
    /// fails, everything it wrote or emitted is undone before the error is
    /// returned.
    pub fn call(&mut self, target: Address, input: &[u8]) -> Result<Bytes, ExecutionError> {
        call_frame(
            self.world,
            self.address,
            target,
            input,
            self.depth + 1,
            self.max_depth,
        )
    }
}

/// Runs one call frame under its own checkpoint.
pub(crate) fn call_frame(
    world: &mut WorldState,
    caller: Address,
    target: Address,
    input: &[u8],
    depth: usize,
    max_depth: usize,
) -> Result<Bytes, ExecutionError> {
    if depth > max_depth {
        return Err(ExecutionError::CallDepthExceeded {
            depth,
            max: max_depth,
        });
    }

    let contract = world
        .code(target)
        .ok_or(ExecutionError::NotAContract(target))?;

    let checkpoint = world.checkpoint();
    let result = {
        let mut ctx = CallContext::new(world, caller, target, depth, max_depth);
        contract.call(&mut ctx, input)
    };

    if let Err(err) = &result {
        debug!(
            component = contract.name(),
            %target,
            depth,
            error = %err,
            "Call reverted"
        );
        world.revert_to(checkpoint);
    }
    result
}

/// Runs a component's constructor at `address` and registers its code on
/// success.
pub(crate) fn construct_frame(
    world: &mut WorldState,
    deployer: Address,
    address: Address,
    contract: Arc<dyn Contract>,
    max_depth: usize,
) -> Result<(), ExecutionError> {
    let checkpoint = world.checkpoint();
    let result = {
        let mut ctx = CallContext::new(world, deployer, address, 0, max_depth);
        contract.construct(&mut ctx)
    };

    match result {
        Ok(()) => {
            world.install_code(address, contract);
            Ok(())
        }
        Err(err) => {
            world.revert_to(checkpoint);
            Err(err)
        }
    }
}
