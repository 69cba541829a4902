//! # AMB-02 Message Sender
//!
//! The source-side half of the bridge. Anyone may call
//! `send(address,bytes)`; the component emits `Sent(target, payload)` with
//! both arguments verbatim and stores nothing.
//!
//! The target is deliberately not validated here: it names a component on
//! the destination side, which this side cannot inspect.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod contract;
pub mod handle;

pub use contract::{selectors, MessageSender};
pub use handle::MessageSenderHandle;
