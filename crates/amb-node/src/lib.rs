//! # AMB Node
//!
//! Hosts the bridge on the in-process execution platform.
//!
//! ## Modular Structure
//!
//! - `config` - `NodeConfig` with `AMB_*` environment overrides
//! - `logging` - tracing subscriber setup
//! - `deployment` - deploy and wire the four components
//! - `relay` - the polling relay agent and its delivery port
//! - `runtime` - `NodeRuntime` tying it all together
//!
//! ## Message Flow
//!
//! ```text
//! user ──send──▶ CounterSender ──▶ MessageSender ──Sent──▶ Event Log
//!                                                             │
//!                                                     RelayAgent (poll)
//!                                                             │
//! CounterReceiver ◀── MessageReceiver.execute ◀── relayer ◀───┘
//! ```

pub mod config;
pub mod deployment;
pub mod logging;
pub mod relay;
pub mod runtime;

pub use config::{ConfigError, NodeConfig};
pub use deployment::{DeployedAddresses, Deployment};
pub use relay::{Destination, ReceiverDestination, RelayAgent, RelayStats};
pub use runtime::{NodeRuntime, RuntimeError};
