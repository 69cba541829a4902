//! # AMB Test Suite
//!
//! Cross-crate tests that need the whole bridge deployed.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # Deployed-and-wired bridge for tests
//!     ├── flows.rs         # Synchronous end-to-end flows
//!     ├── authorization.rs # Randomized access-control checks
//!     └── e2e_relay.rs     # Async flows through the relay agent
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p amb-tests
//! cargo test -p amb-tests integration::e2e_relay::
//! ```

pub mod integration;
