//! # Chain Service
//!
//! Owns the world state and the event log, and processes deployments,
//! transactions and queries one at a time.
//!
//! ## Atomicity
//!
//! A single mutex guards the world state. Each entry point holds it from the
//! first read to the last log append, so transactions are totally ordered and
//! log order equals commit order. A failed transaction is rolled back before
//! the lock is released and publishes nothing.

use crate::context::{call_frame, construct_frame};
use crate::domain::{compute_contract_address, ChainConfig, Receipt, Slot};
use crate::ports::{Contract, ExecutionApi};
use crate::state::WorldState;
use parking_lot::Mutex;
use shared_bus::{EventLog, LogEntry};
use shared_types::entities::{Address, Bytes, U256};
use shared_types::errors::ExecutionError;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// The execution platform.
pub struct Chain {
    config: ChainConfig,
    world: Mutex<WorldState>,
    log: Arc<dyn EventLog>,
}

impl Chain {
    /// Creates a chain publishing to `log`.
    #[must_use]
    pub fn new(config: ChainConfig, log: Arc<dyn EventLog>) -> Self {
        info!(max_call_depth = config.max_call_depth, "Execution platform created");
        Self {
            config,
            world: Mutex::new(WorldState::new()),
            log,
        }
    }

    /// Creates a chain with default configuration.
    #[must_use]
    pub fn with_log(log: Arc<dyn EventLog>) -> Self {
        Self::new(ChainConfig::default(), log)
    }

    /// Platform configuration.
    #[must_use]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// The event log committed events are appended to.
    #[must_use]
    pub fn event_log(&self) -> &Arc<dyn EventLog> {
        &self.log
    }

    /// Deploys `contract` from `deployer`.
    ///
    /// The address is derived from the deployer and its deployment nonce.
    /// The constructor runs inside the transaction; code is registered only if
    /// it succeeds. `Receipt::to` is the new address.
    #[instrument(skip(self, contract), fields(component = contract.name()))]
    pub fn deploy<C: Contract + 'static>(
        &self,
        deployer: Address,
        contract: C,
    ) -> Result<Receipt, ExecutionError> {
        if deployer.is_zero() {
            return Err(ExecutionError::ZeroAddress);
        }

        let name = contract.name();
        let tx_id = Uuid::new_v4();
        let mut world = self.world.lock();

        let nonce = world.bump_nonce(deployer);
        let address = compute_contract_address(deployer, nonce);
        if world.has_code(address) {
            return Err(ExecutionError::Revert(format!(
                "address collision at {address}"
            )));
        }

        match construct_frame(
            &mut world,
            deployer,
            address,
            Arc::new(contract),
            self.config.max_call_depth,
        ) {
            Ok(()) => {
                let logs = self.commit(&mut world, tx_id);
                info!(%tx_id, %deployer, %address, nonce, "{} deployed", name);
                Ok(Receipt {
                    tx_id,
                    from: deployer,
                    to: address,
                    output: Bytes::new(),
                    logs,
                })
            }
            Err(err) => {
                world.rollback();
                warn!(%tx_id, %deployer, error = %err, "Deployment of {} failed", name);
                Err(err)
            }
        }
    }

    /// Executes one transaction. See [`ExecutionApi::transact`].
    #[instrument(skip(self, calldata), fields(calldata_len = calldata.len()))]
    pub fn transact(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Receipt, ExecutionError> {
        if from.is_zero() {
            return Err(ExecutionError::ZeroAddress);
        }

        let tx_id = Uuid::new_v4();
        let mut world = self.world.lock();

        match call_frame(&mut world, from, to, calldata, 0, self.config.max_call_depth) {
            Ok(output) => {
                let logs = self.commit(&mut world, tx_id);
                debug!(%tx_id, events = logs.len(), "Transaction committed");
                Ok(Receipt {
                    tx_id,
                    from,
                    to,
                    output,
                    logs,
                })
            }
            Err(err) => {
                world.rollback();
                warn!(%tx_id, error = %err, "Transaction reverted");
                Err(err)
            }
        }
    }

    /// Runs a call and discards its effects. See [`ExecutionApi::query`].
    pub fn query(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Bytes, ExecutionError> {
        let mut world = self.world.lock();
        let result = call_frame(&mut world, from, to, calldata, 0, self.config.max_call_depth);
        world.rollback();
        result
    }

    /// True if a component is deployed at `address`.
    #[must_use]
    pub fn has_code(&self, address: Address) -> bool {
        self.world.lock().has_code(address)
    }

    /// Raw committed storage read.
    #[must_use]
    pub fn storage_at(&self, address: Address, slot: Slot) -> U256 {
        self.world.lock().load(address, slot)
    }

    /// Deployment nonce of `address`.
    #[must_use]
    pub fn nonce(&self, address: Address) -> u64 {
        self.world.lock().nonce(address)
    }

    fn commit(&self, world: &mut WorldState, tx_id: Uuid) -> Vec<LogEntry> {
        world
            .commit()
            .into_iter()
            .map(|pending| self.log.append(tx_id, pending.emitter, pending.event))
            .collect()
    }
}

impl ExecutionApi for Chain {
    fn transact(
        &self,
        from: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Receipt, ExecutionError> {
        Chain::transact(self, from, to, calldata)
    }

    fn query(&self, from: Address, to: Address, calldata: &[u8]) -> Result<Bytes, ExecutionError> {
        Chain::query(self, from, to, calldata)
    }

    fn has_code(&self, address: Address) -> bool {
        Chain::has_code(self, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CallContext;
    use crate::domain::slot;
    use crate::ownable::{Ownable, OwnableHandle};
    use shared_bus::{BridgeEvent, InMemoryEventLog};
    use shared_types::abi::{self, Decoder, Token};

    const DEPLOYER: Address = Address::repeat_byte(0xD0);
    const ALICE: Address = Address::repeat_byte(0xA1);

    // Test component: selector byte 0 = store(uint) and emit,
    // 1 = forward(address, bytes), 2 = fail, 3 = recurse into self forever.
    struct Probe;

    impl Ownable for Probe {}

    impl Contract for Probe {
        fn name(&self) -> &'static str {
            "Probe"
        }

        fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), ExecutionError> {
            self.initialize_owner(ctx);
            Ok(())
        }

        fn call(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Bytes, ExecutionError> {
            let (selector, args) = abi::split_selector(input)?;
            if let Some(result) = self.dispatch_ownable(ctx, selector, args) {
                return result;
            }
            match selector[0] {
                0 => {
                    let value = Decoder::new(args).uint()?;
                    ctx.store(slot(1), value);
                    ctx.emit(BridgeEvent::AmbAddressUpdated {
                        new_address: ctx.caller(),
                    });
                    Ok(Bytes::new())
                }
                1 => {
                    let mut decoder = Decoder::new(args);
                    let target = decoder.address()?;
                    let payload = decoder.bytes()?;
                    ctx.store(slot(2), U256::one());
                    ctx.call(target, payload.as_slice())
                }
                2 => Err(ExecutionError::Revert("probe failure".into())),
                3 => {
                    let me = ctx.address();
                    ctx.call(me, input)
                }
                _ => Err(ExecutionError::UnknownSelector(selector)),
            }
        }
    }

    struct ProbeHandle(Address);

    impl OwnableHandle for ProbeHandle {
        fn address(&self) -> Address {
            self.0
        }
    }

    fn store_call(value: u64) -> Bytes {
        abi::encode_call([0, 0, 0, 0], &[Token::Uint(U256::from(value))])
    }

    fn forward_call(target: Address, payload: &Bytes) -> Bytes {
        abi::encode_call(
            [1, 0, 0, 0],
            &[Token::Address(target), Token::Bytes(payload.clone())],
        )
    }

    fn setup() -> (Chain, Arc<InMemoryEventLog>) {
        let log = Arc::new(InMemoryEventLog::new());
        (Chain::with_log(log.clone()), log)
    }

    #[test]
    fn test_deploy_assigns_nonce_derived_address() {
        let (chain, log) = setup();
        let first = chain.deploy(DEPLOYER, Probe).unwrap();
        let second = chain.deploy(DEPLOYER, Probe).unwrap();

        assert_eq!(first.to, compute_contract_address(DEPLOYER, 0));
        assert_eq!(second.to, compute_contract_address(DEPLOYER, 1));
        assert!(chain.has_code(first.to));
        assert_eq!(chain.nonce(DEPLOYER), 2);

        // Constructor emitted OwnershipTransferred
        assert_eq!(log.len(), 2);
        assert!(first.find_event("OwnershipTransferred").is_some());
    }

    #[test]
    fn test_deploy_rejects_zero_deployer() {
        let (chain, _) = setup();
        assert_eq!(
            chain.deploy(Address::ZERO, Probe).unwrap_err(),
            ExecutionError::ZeroAddress
        );
    }

    #[test]
    fn test_transact_commits_state_and_events() {
        let (chain, log) = setup();
        let probe = chain.deploy(DEPLOYER, Probe).unwrap().to;

        let receipt = chain.transact(ALICE, probe, store_call(42).as_slice()).unwrap();

        assert_eq!(chain.storage_at(probe, slot(1)), U256::from(42));
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].emitter, probe);
        assert_eq!(receipt.logs[0].tx_id, receipt.tx_id);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_transact_rejects_zero_sender() {
        let (chain, _) = setup();
        let probe = chain.deploy(DEPLOYER, Probe).unwrap().to;
        assert_eq!(
            chain
                .transact(Address::ZERO, probe, store_call(1).as_slice())
                .unwrap_err(),
            ExecutionError::ZeroAddress
        );
    }

    #[test]
    fn test_call_to_address_without_code() {
        let (chain, _) = setup();
        let err = chain
            .transact(ALICE, Address::repeat_byte(0x55), &[0, 0, 0, 0])
            .unwrap_err();
        assert_eq!(err, ExecutionError::NotAContract(Address::repeat_byte(0x55)));
    }

    #[test]
    fn test_nested_failure_reverts_whole_transaction() {
        let (chain, log) = setup();
        let outer = chain.deploy(DEPLOYER, Probe).unwrap().to;
        let inner = chain.deploy(DEPLOYER, Probe).unwrap().to;
        let before = log.len();

        let fail = abi::encode_call([2, 0, 0, 0], &[]);
        let err = chain
            .transact(ALICE, outer, forward_call(inner, &fail).as_slice())
            .unwrap_err();

        assert_eq!(err, ExecutionError::Revert("probe failure".into()));
        // Outer frame's write is gone too
        assert_eq!(chain.storage_at(outer, slot(2)), U256::zero());
        assert_eq!(log.len(), before);
    }

    #[test]
    fn test_nested_success_commits_both_frames() {
        let (chain, _) = setup();
        let outer = chain.deploy(DEPLOYER, Probe).unwrap().to;
        let inner = chain.deploy(DEPLOYER, Probe).unwrap().to;

        let receipt = chain
            .transact(ALICE, outer, forward_call(inner, &store_call(7)).as_slice())
            .unwrap();

        assert_eq!(chain.storage_at(outer, slot(2)), U256::one());
        assert_eq!(chain.storage_at(inner, slot(1)), U256::from(7));
        // Inner frame saw the outer component as caller
        assert_eq!(
            receipt.logs[0].event,
            BridgeEvent::AmbAddressUpdated { new_address: outer }
        );
    }

    #[test]
    fn test_call_depth_limit() {
        let log = Arc::new(InMemoryEventLog::new());
        let chain = Chain::new(ChainConfig { max_call_depth: 8 }, log);
        let probe = chain.deploy(DEPLOYER, Probe).unwrap().to;

        let err = chain
            .transact(ALICE, probe, &[3, 0, 0, 0])
            .unwrap_err();
        assert_eq!(err, ExecutionError::CallDepthExceeded { depth: 9, max: 8 });
    }

    #[test]
    fn test_query_discards_effects() {
        let (chain, log) = setup();
        let probe = chain.deploy(DEPLOYER, Probe).unwrap().to;
        let before = log.len();

        chain.query(ALICE, probe, store_call(5).as_slice()).unwrap();

        assert_eq!(chain.storage_at(probe, slot(1)), U256::zero());
        assert_eq!(log.len(), before);
    }

    #[test]
    fn test_unknown_selector() {
        let (chain, _) = setup();
        let probe = chain.deploy(DEPLOYER, Probe).unwrap().to;
        let err = chain.transact(ALICE, probe, &[9, 9, 9, 9]).unwrap_err();
        assert_eq!(err, ExecutionError::UnknownSelector([9, 9, 9, 9]));
    }

    #[test]
    fn test_ownership_capability() {
        let (chain, _) = setup();
        let handle = ProbeHandle(chain.deploy(DEPLOYER, Probe).unwrap().to);

        assert_eq!(handle.owner(&chain).unwrap(), DEPLOYER);

        let err = handle.transfer_ownership(&chain, ALICE, ALICE).unwrap_err();
        assert_eq!(err, ExecutionError::NotOwner { caller: ALICE });

        let err = handle
            .transfer_ownership(&chain, DEPLOYER, Address::ZERO)
            .unwrap_err();
        assert_eq!(err, ExecutionError::ZeroAddress);

        let receipt = handle.transfer_ownership(&chain, DEPLOYER, ALICE).unwrap();
        assert_eq!(
            receipt.logs[0].event,
            BridgeEvent::OwnershipTransferred {
                previous_owner: DEPLOYER,
                new_owner: ALICE,
            }
        );
        assert_eq!(handle.owner(&chain).unwrap(), ALICE);
    }

    #[test]
    fn test_receipt_serializes() {
        let (chain, _) = setup();
        let receipt = chain.deploy(DEPLOYER, Probe).unwrap();
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("OwnershipTransferred"));
    }
}
