//! MessageSender component.

use amb_01_execution::prelude::*;
use tracing::debug;

/// Function selectors.
pub mod selectors {
    use shared_types::abi::Selector;

    /// `send(address,bytes)`
    pub const SEND: Selector = [0xc8, 0x9a, 0xcc, 0x86];
}

/// Stateless message emitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageSender;

impl MessageSender {
    fn send(
        &self,
        ctx: &mut CallContext<'_>,
        target: Address,
        payload: Bytes,
    ) -> Result<Bytes, ExecutionError> {
        debug!(from = %ctx.caller(), %target, payload_len = payload.len(), "Message accepted");
        ctx.emit(BridgeEvent::Sent { target, payload });
        Ok(Bytes::new())
    }
}

impl Contract for MessageSender {
    fn name(&self) -> &'static str {
        "MessageSender"
    }

    fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, ExecutionError> {
        let (selector, args) = abi::split_selector(input)?;
        match selector {
            selectors::SEND => {
                let mut args = Decoder::new(args);
                let target = args.address()?;
                let payload = args.bytes()?;
                self.send(ctx, target, payload)
            }
            other => Err(ExecutionError::UnknownSelector(other)),
        }
    }
}
