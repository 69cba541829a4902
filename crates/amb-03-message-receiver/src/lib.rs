//! # AMB-03 Message Receiver
//!
//! The destination-side half of the bridge.
//!
//! ## Authorization
//!
//! | Function | Who may call | Failure |
//! |----------|--------------|---------|
//! | `updateRelayer(address)` | owner | `NotOwner` |
//! | `transferOwnership(address)` | owner | `NotOwner`, `ZeroAddress` |
//! | `execute(address,bytes)` | configured relayer | `OnlyRelayer` |
//! | `relayer()`, `owner()` | anyone | - |
//!
//! `execute` additionally requires the target to have code
//! (`OnlyForContracts`) and wraps any failure of the delivered call in
//! `ExecuteFailed`, carrying the callee's error unchanged. A failed delivery
//! leaves no trace: the whole transaction reverts.
//!
//! There is no replay protection. Executing the same message twice delivers
//! it twice.
//!
//! ## Storage
//!
//! | Slot | Content |
//! |------|---------|
//! | 0 | owner |
//! | 1 | relayer (zero = unset, accepts nobody) |

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod contract;
pub mod handle;

pub use contract::{selectors, MessageReceiver, RELAYER_SLOT};
pub use handle::MessageReceiverHandle;
