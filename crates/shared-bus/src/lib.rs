//! # Shared Bus - Ordered Event Log
//!
//! The outbox that every committed component event is appended to.
//!
//! ## Model
//!
//! ```text
//! ┌──────────────┐   append()   ┌──────────────┐  entries_since()  ┌──────────────┐
//! │  Execution   │ ───────────▶ │  Event Log   │ ◀──────────────── │ Relay Agent  │
//! │  platform    │  (on commit) │  (ordered)   │ ────────────────▶ │  / tests     │
//! └──────────────┘              └──────────────┘    subscribe()    └──────────────┘
//! ```
//!
//! Entries are appended only when the emitting transaction commits, so a
//! reverted call never leaves an entry behind. Indices are gap-free and
//! monotonic; pull and push consumers observe the same order.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BridgeEvent, EventFilter, EventTopic, LogEntry};
pub use publisher::{EventLog, InMemoryEventLog};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum entries buffered per push subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
