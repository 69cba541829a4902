//! CounterReceiver component.

use crate::bridge_address::{amb_address, encode_amb_address, update_amb_address};
use crate::selectors;
use amb_01_execution::prelude::*;
use tracing::{info, warn};

/// Slot holding the delivery counter.
pub const COUNTER_SLOT: Slot = slot(2);

/// Slot holding the last delivered flag.
pub const BOOL_VALUE_SLOT: Slot = slot(3);

/// Slot holding the last delivered number.
pub const UINT256_VALUE_SLOT: Slot = slot(4);

/// Destination-side application: applies `increment` for the trusted bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterReceiver;

impl Ownable for CounterReceiver {}

impl CounterReceiver {
    fn only_amb(&self, ctx: &CallContext<'_>) -> Result<(), ExecutionError> {
        let caller = ctx.caller();
        let trusted = amb_address(ctx);
        if trusted.is_zero() || caller != trusted {
            warn!(receiver = %ctx.address(), %caller, "Increment rejected: not the AMB address");
            return Err(ExecutionError::OnlyAmb { caller });
        }
        Ok(())
    }

    fn increment(
        &self,
        ctx: &mut CallContext<'_>,
        bool_value: bool,
        numeric_value: U256,
    ) -> Result<Bytes, ExecutionError> {
        self.only_amb(ctx)?;

        let new_counter = ctx
            .load(COUNTER_SLOT)
            .checked_add(U256::one())
            .ok_or_else(|| ExecutionError::Revert("counter overflow".into()))?;

        ctx.store_bool(BOOL_VALUE_SLOT, bool_value);
        ctx.store(UINT256_VALUE_SLOT, numeric_value);
        ctx.store(COUNTER_SLOT, new_counter);
        ctx.emit(BridgeEvent::IncrementExecuted {
            bool_value,
            numeric_value,
            new_counter,
        });
        info!(receiver = %ctx.address(), bool_value, %numeric_value, %new_counter, "Increment executed");
        Ok(Bytes::new())
    }
}

impl Contract for CounterReceiver {
    fn name(&self) -> &'static str {
        "CounterReceiver"
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
            selectors::COUNTER => Ok(Bytes::from(abi::encode(&[Token::Uint(
                ctx.load(COUNTER_SLOT),
            )]))),
            selectors::BOOL_VALUE => Ok(Bytes::from(abi::encode(&[Token::Bool(
                ctx.load_bool(BOOL_VALUE_SLOT),
            )]))),
            selectors::UINT256_VALUE => Ok(Bytes::from(abi::encode(&[Token::Uint(
                ctx.load(UINT256_VALUE_SLOT),
            )]))),
            selectors::INCREMENT => {
                let mut args = Decoder::new(args);
                let bool_value = args.bool()?;
                let numeric_value = args.uint()?;
                self.increment(ctx, bool_value, numeric_value)
            }
            other => Err(ExecutionError::UnknownSelector(other)),
        }
    }
}
