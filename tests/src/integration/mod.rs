//! Integration tests across the bridge crates.

pub mod fixtures;

mod authorization;
mod e2e_relay;
mod flows;
