//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `ExecutionApi`, used by handles and the relay agent
//! - **Driven Port (Outbound)**: `Contract`, implemented by every component
//!
//! The event log the platform publishes to is the `shared_bus::EventLog` trait.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
