//! # AMB-04 Counter Application
//!
//! A two-sided example application on top of the bridge.
//!
//! ```text
//! CounterSender.send(target, b, n)
//!     └─▶ MessageSender.send(target, increment(b, n))  ── Sent ──▶ relayer
//!                                                                    │
//! CounterReceiver.increment(b, n) ◀── MessageReceiver.execute ◀──────┘
//! ```
//!
//! ## Storage
//!
//! | Component | Slot 0 | Slot 1 | Slot 2 | Slot 3 | Slot 4 |
//! |-----------|--------|--------|--------|--------|--------|
//! | CounterSender | owner | ambAddress | | | |
//! | CounterReceiver | owner | ambAddress | counter | boolValue | uint256Value |
//!
//! On the sender, `ambAddress` is the local MessageSender. On the receiver,
//! it is the only MessageReceiver allowed to call `increment`.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod bridge_address;
pub mod handle;
pub mod instruction;
pub mod receiver;
pub mod sender;

pub use bridge_address::AMB_ADDRESS_SLOT;
pub use handle::{CounterReceiverHandle, CounterSenderHandle, CounterState};
pub use instruction::{decode_increment, encode_increment, IncrementInstruction};
pub use receiver::CounterReceiver;
pub use sender::CounterSender;

/// Function selectors of both application components.
pub mod selectors {
    use shared_types::abi::Selector;

    /// `ambAddress()`
    pub const AMB_ADDRESS: Selector = [0x9e, 0xa1, 0x56, 0x80];
    /// `updateAMBAddress(address)`
    pub const UPDATE_AMB_ADDRESS: Selector = [0x15, 0x94, 0x02, 0xd0];
    /// `send(address,bool,uint256)`
    pub const SEND: Selector = [0x5a, 0x2c, 0x87, 0x95];
    /// `increment(bool,uint256)`
    pub const INCREMENT: Selector = [0x31, 0x4a, 0xc4, 0xd1];
    /// `counter()`
    pub const COUNTER: Selector = [0x61, 0xbc, 0x22, 0x1a];
    /// `boolValue()`
    pub const BOOL_VALUE: Selector = [0x93, 0xaf, 0x57, 0x8d];
    /// `uint256Value()`
    pub const UINT256_VALUE: Selector = [0x64, 0x98, 0xdb, 0x88];
}

#[cfg(test)]
mod tests {
    use super::selectors::*;
    use shared_types::abi::selector;

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(AMB_ADDRESS, selector("ambAddress()"));
        assert_eq!(UPDATE_AMB_ADDRESS, selector("updateAMBAddress(address)"));
        assert_eq!(SEND, selector("send(address,bool,uint256)"));
        assert_eq!(INCREMENT, selector("increment(bool,uint256)"));
        assert_eq!(COUNTER, selector("counter()"));
        assert_eq!(BOOL_VALUE, selector("boolValue()"));
        assert_eq!(UINT256_VALUE, selector("uint256Value()"));
    }
}
