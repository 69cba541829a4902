//! # Ownership Capability
//!
//! A single owner per component, stored in slot 0. Components opt in by
//! implementing [`Ownable`] and routing unknown selectors through
//! [`Ownable::dispatch_ownable`]; handles opt in through [`OwnableHandle`].

use crate::context::CallContext;
use crate::domain::{slot, Receipt, Slot};
use crate::ports::ExecutionApi;
use shared_bus::BridgeEvent;
use shared_types::abi::{self, Decoder, Selector, Token};
use shared_types::entities::{Address, Bytes};
use shared_types::errors::ExecutionError;
use tracing::info;

/// Slot holding the owner on every owned component.
pub const OWNER_SLOT: Slot = slot(0);

/// Selectors of the ownership functions.
pub mod selectors {
    use shared_types::abi::Selector;

    /// `owner()`
    pub const OWNER: Selector = [0x8d, 0xa5, 0xcb, 0x5b];
    /// `transferOwnership(address)`
    pub const TRANSFER_OWNERSHIP: Selector = [0xf2, 0xfd, 0xe3, 0x8b];
}

/// Ownership gate shared by every configurable component.
pub trait Ownable {
    /// Current owner.
    fn owner(&self, ctx: &CallContext<'_>) -> Address {
        ctx.load_address(OWNER_SLOT)
    }

    /// Makes the caller the owner. Call from `construct`.
    fn initialize_owner(&self, ctx: &mut CallContext<'_>) {
        let owner = ctx.caller();
        ctx.store_address(OWNER_SLOT, owner);
        ctx.emit(BridgeEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: owner,
        });
    }

    /// Fails with `NotOwner` unless the caller is the owner.
    fn only_owner(&self, ctx: &CallContext<'_>) -> Result<(), ExecutionError> {
        let caller = ctx.caller();
        if caller != self.owner(ctx) {
            return Err(ExecutionError::NotOwner { caller });
        }
        Ok(())
    }

    /// Hands ownership to `new_owner`. Owner-only; the zero address is
    /// rejected.
    fn transfer_ownership(
        &self,
        ctx: &mut CallContext<'_>,
        new_owner: Address,
    ) -> Result<(), ExecutionError> {
        self.only_owner(ctx)?;
        if new_owner.is_zero() {
            return Err(ExecutionError::ZeroAddress);
        }
        let previous_owner = self.owner(ctx);
        ctx.store_address(OWNER_SLOT, new_owner);
        ctx.emit(BridgeEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        info!(component = %ctx.address(), %previous_owner, %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Handles `owner()` and `transferOwnership(address)`. Returns `None` for
    /// any other selector.
    fn dispatch_ownable(
        &self,
        ctx: &mut CallContext<'_>,
        selector: Selector,
        args: &[u8],
    ) -> Option<Result<Bytes, ExecutionError>> {
        match selector {
            selectors::OWNER => Some(Ok(Bytes::from(abi::encode(&[Token::Address(
                self.owner(ctx),
            )])))),
            selectors::TRANSFER_OWNERSHIP => Some(
                Decoder::new(args)
                    .address()
                    .map_err(ExecutionError::from)
                    .and_then(|new_owner| self.transfer_ownership(ctx, new_owner))
                    .map(|()| Bytes::new()),
            ),
            _ => None,
        }
    }
}

/// Client side of the ownership capability.
pub trait OwnableHandle {
    /// Address of the owned component.
    fn address(&self) -> Address;

    /// Reads the owner.
    fn owner<E: ExecutionApi + ?Sized>(&self, api: &E) -> Result<Address, ExecutionError> {
        let output = api.query(
            Address::ZERO,
            self.address(),
            abi::encode_call(selectors::OWNER, &[]).as_slice(),
        )?;
        Ok(abi::decode_address(output.as_slice())?)
    }

    /// Sends `transferOwnership(new_owner)` from `from`.
    fn transfer_ownership<E: ExecutionApi + ?Sized>(
        &self,
        api: &E,
        from: Address,
        new_owner: Address,
    ) -> Result<Receipt, ExecutionError> {
        let calldata = abi::encode_call(
            selectors::TRANSFER_OWNERSHIP,
            &[Token::Address(new_owner)],
        );
        api.transact(from, self.address(), calldata.as_slice())
    }
}
