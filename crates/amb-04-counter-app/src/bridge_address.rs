//! The owner-mutable bridge address both application components hold.

use amb_01_execution::prelude::*;
use tracing::info;

/// Slot holding the bridge address.
pub const AMB_ADDRESS_SLOT: Slot = slot(1);

pub(crate) fn amb_address(ctx: &CallContext<'_>) -> Address {
    ctx.load_address(AMB_ADDRESS_SLOT)
}

pub(crate) fn encode_amb_address(ctx: &CallContext<'_>) -> Bytes {
    Bytes::from(abi::encode(&[Token::Address(amb_address(ctx))]))
}

/// Owner-only overwrite. Zero is accepted and means unset.
pub(crate) fn update_amb_address<O: Ownable>(
    owner: &O,
    ctx: &mut CallContext<'_>,
    args: &[u8],
) -> Result<Bytes, ExecutionError> {
    owner.only_owner(ctx)?;
    let new_address = Decoder::new(args).address()?;
    ctx.store_address(AMB_ADDRESS_SLOT, new_address);
    ctx.emit(BridgeEvent::AmbAddressUpdated { new_address });
    info!(component = %ctx.address(), %new_address, "AMB address updated");
    Ok(Bytes::new())
}
