//! Shared fixtures: a fresh platform with the bridge deployed and wired.

use amb_01_execution::Chain;
use amb_node::Deployment;
use rand::Rng;
use shared_bus::InMemoryEventLog;
use shared_types::entities::Address;
use std::sync::Arc;

/// Deploys and owns everything.
pub const DEPLOYER: Address = Address::repeat_byte(0xD0);

/// The configured relayer.
pub const RELAYER: Address = Address::repeat_byte(0xE1);

/// An ordinary user.
pub const USER: Address = Address::repeat_byte(0x42);

/// A platform with the bridge deployed.
pub struct Bridge {
    /// Event log the platform publishes to.
    pub log: Arc<InMemoryEventLog>,
    /// The platform.
    pub chain: Arc<Chain>,
    /// The wired components.
    pub deployment: Deployment,
}

impl Bridge {
    /// Deploys with the default identities.
    pub fn deploy() -> Self {
        let log = Arc::new(InMemoryEventLog::new());
        let chain = Arc::new(Chain::with_log(log.clone()));
        let deployment = Deployment::bootstrap(&chain, DEPLOYER, RELAYER)
            .expect("bootstrap should succeed");
        Self {
            log,
            chain,
            deployment,
        }
    }
}

/// A random non-zero address different from every address in `exclude`.
pub fn random_address_except(exclude: &[Address]) -> Address {
    let mut rng = rand::thread_rng();
    loop {
        let candidate = Address::new(rng.gen());
        if !candidate.is_zero() && !exclude.contains(&candidate) {
            return candidate;
        }
    }
}
