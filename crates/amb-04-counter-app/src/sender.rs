//! CounterSender component.

use crate::bridge_address::{amb_address, encode_amb_address, update_amb_address};
use crate::instruction::encode_increment;
use crate::selectors;
use amb_01_execution::prelude::*;
use amb_02_message_sender::MessageSenderHandle;
use tracing::info;

/// Source-side application: turns `send` into a bridge message.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterSender;

impl Ownable for CounterSender {}

impl CounterSender {
    fn send(
        &self,
        ctx: &mut CallContext<'_>,
        target: Address,
        bool_value: bool,
        numeric_value: U256,
    ) -> Result<Bytes, ExecutionError> {
        let bridge = amb_address(ctx);
        let payload = encode_increment(bool_value, numeric_value);

        // An unset bridge is the zero address, which has no code
        ctx.call(
            bridge,
            MessageSenderHandle::encode_send(target, &payload).as_slice(),
        )?;

        ctx.emit(BridgeEvent::MessageSent {
            target,
            bool_value,
            numeric_value,
        });
        info!(%bridge, %target, bool_value, %numeric_value, "Increment message sent");
        Ok(Bytes::new())
    }
}

impl Contract for CounterSender {
    fn name(&self) -> &'static str {
        "CounterSender"
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
            selectors::AMB_ADDRESS => Ok(encode_amb_address(ctx)),
            selectors::UPDATE_AMB_ADDRESS => update_amb_address(self, ctx, args),
            selectors::SEND => {
                let mut args = Decoder::new(args);
                let target = args.address()?;
                let bool_value = args.bool()?;
                let numeric_value = args.uint()?;
                self.send(ctx, target, bool_value, numeric_value)
            }
            other => Err(ExecutionError::UnknownSelector(other)),
        }
    }
}
