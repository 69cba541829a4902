//! MessageReceiver component.

use amb_01_execution::prelude::*;
use tracing::{info, warn};

/// Slot holding the relayer identity.
pub const RELAYER_SLOT: Slot = slot(1);

/// Function selectors.
pub mod selectors {
    use shared_types::abi::Selector;

    /// `relayer()`
    pub const RELAYER: Selector = [0x84, 0x06, 0xc0, 0x79];
    /// `updateRelayer(address)`
    pub const UPDATE_RELAYER: Selector = [0x8f, 0x83, 0xab, 0x13];
    /// `execute(address,bytes)`
    pub const EXECUTE: Selector = [0x1c, 0xff, 0x79, 0xcd];
}

/// Relayer-gated message executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageReceiver;

impl Ownable for MessageReceiver {}

impl MessageReceiver {
    fn relayer(&self, ctx: &CallContext<'_>) -> Address {
        ctx.load_address(RELAYER_SLOT)
    }

    fn update_relayer(
        &self,
        ctx: &mut CallContext<'_>,
        new_relayer: Address,
    ) -> Result<Bytes, ExecutionError> {
        self.only_owner(ctx)?;
        ctx.store_address(RELAYER_SLOT, new_relayer);
        ctx.emit(BridgeEvent::RelayerUpdated { new_relayer });
        info!(receiver = %ctx.address(), %new_relayer, "Relayer updated");
        Ok(Bytes::new())
    }

    fn execute(
        &self,
        ctx: &mut CallContext<'_>,
        target: Address,
        payload: Bytes,
    ) -> Result<Bytes, ExecutionError> {
        let caller = ctx.caller();
        let relayer = self.relayer(ctx);
        if relayer.is_zero() || caller != relayer {
            warn!(receiver = %ctx.address(), %caller, "Delivery rejected: not the relayer");
            return Err(ExecutionError::OnlyRelayer { caller });
        }

        if !ctx.has_code(target) {
            warn!(receiver = %ctx.address(), %target, "Delivery rejected: target has no code");
            return Err(ExecutionError::OnlyForContracts(target));
        }

        let output = ctx
            .call(target, payload.as_slice())
            .map_err(|source| ExecutionError::ExecuteFailed {
                target,
                source: Box::new(source),
            })?;

        ctx.emit(BridgeEvent::TransactionExecuted { target, payload });
        info!(receiver = %ctx.address(), %target, "Message executed");
        Ok(output)
    }
}

impl Contract for MessageReceiver {
    fn name(&self) -> &'static str {
        "MessageReceiver"
    }

    fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), ExecutionError> {
        self.initialize_owner(ctx);
        Ok(())
    }

    fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, ExecutionError> {
        let (selector, args) = abi::split_selector(input)?;
        if let Some(result) = self.dispatch_ownable(ctx, selector, args) {
            return result;
        }

        match selector {
            selectors::RELAYER => Ok(Bytes::from(abi::encode(&[Token::Address(
                self.relayer(ctx),
            )]))),
            selectors::UPDATE_RELAYER => {
                let new_relayer = Decoder::new(args).address()?;
                self.update_relayer(ctx, new_relayer)
            }
            selectors::EXECUTE => {
                let mut args = Decoder::new(args);
                let target = args.address()?;
                let payload = args.bytes()?;
                self.execute(ctx, target, payload)
            }
            other => Err(ExecutionError::UnknownSelector(other)),
        }
    }
}
