//! # Domain Layer (Inner Hexagon)
//!
//! Pure platform concepts: configuration, receipts, storage slots and
//! contract address derivation. No locking, no I/O.

pub mod services;
pub mod value_objects;

pub use services::*;
pub use value_objects::*;
