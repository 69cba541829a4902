//! # End-to-End Bridge Flows
//!
//! Drives the deployed bridge synchronously: a user sends through the
//! CounterSender, the test plays the relayer by reading the `Sent` event and
//! calling `MessageReceiver.execute` with it.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{Bridge, DEPLOYER, RELAYER, USER};
    use amb_01_execution::prelude::*;
    use amb_04_counter_app::{encode_increment, CounterState};
    use shared_bus::{EventFilter, EventLog, EventTopic};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Target that writes a slot and then rejects the call.
    struct AlwaysReverts;

    impl Contract for AlwaysReverts {
        fn name(&self) -> &'static str {
            "AlwaysReverts"
        }

        fn call(&self, ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Bytes, ExecutionError> {
            ctx.store(slot(9), U256::from(99));
            Err(ExecutionError::Revert("nope".into()))
        }
    }

    /// Extracts the single `Sent` event of a receipt.
    fn sent_message(receipt: &Receipt) -> (Address, Bytes) {
        match receipt.find_event("Sent") {
            Some(BridgeEvent::Sent { target, payload }) => (*target, payload.clone()),
            other => panic!("expected Sent, got {other:?}"),
        }
    }

    /// Sends one increment and relays it. Returns the delivery receipt.
    fn send_and_relay(bridge: &Bridge, bool_value: bool, numeric_value: U256) -> Receipt {
        let d = &bridge.deployment;
        let receipt = d
            .counter_sender
            .send(
                bridge.chain.as_ref(),
                USER,
                d.counter_receiver.address(),
                bool_value,
                numeric_value,
            )
            .unwrap();
        let (target, payload) = sent_message(&receipt);
        d.message_receiver
            .execute(bridge.chain.as_ref(), RELAYER, target, &payload)
            .unwrap()
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn test_wiring_after_bootstrap() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();

        assert_eq!(d.counter_sender.amb_address(chain).unwrap(), d.message_sender.address());
        assert_eq!(d.message_receiver.relayer(chain).unwrap(), RELAYER);
        assert_eq!(
            d.counter_receiver.amb_address(chain).unwrap(),
            d.message_receiver.address()
        );
        for owner in [
            d.message_receiver.owner(chain).unwrap(),
            d.counter_sender.owner(chain).unwrap(),
            d.counter_receiver.owner(chain).unwrap(),
        ] {
            assert_eq!(owner, DEPLOYER);
        }
        assert_eq!(d.counter_receiver.state(chain).unwrap(), CounterState::default());
    }

    #[test]
    fn test_send_emits_sent_with_increment_payload() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;

        let receipt = d
            .counter_sender
            .send(
                bridge.chain.as_ref(),
                USER,
                d.counter_receiver.address(),
                true,
                U256::from(10),
            )
            .unwrap();

        let (target, payload) = sent_message(&receipt);
        assert_eq!(target, d.counter_receiver.address());
        assert_eq!(payload, encode_increment(true, U256::from(10)));

        // Sent comes from the MessageSender, MessageSent from the app
        let emitters: Vec<_> = receipt.logs.iter().map(|e| (e.event.name(), e.emitter)).collect();
        assert_eq!(
            emitters,
            vec![
                ("Sent", d.message_sender.address()),
                ("MessageSent", d.counter_sender.address()),
            ]
        );
    }

    #[test]
    fn test_full_round_trip_updates_counter() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;

        let receipt = send_and_relay(&bridge, true, U256::from(10));

        assert_eq!(
            d.counter_receiver.state(bridge.chain.as_ref()).unwrap(),
            CounterState {
                counter: U256::one(),
                bool_value: true,
                numeric_value: U256::from(10),
            }
        );

        let names: Vec<_> = receipt.events().map(BridgeEvent::name).collect();
        assert_eq!(names, vec!["IncrementExecuted", "TransactionExecuted"]);
    }

    #[test]
    fn test_replayed_delivery_applies_twice() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();

        let receipt = d
            .counter_sender
            .send(chain, USER, d.counter_receiver.address(), true, U256::from(10))
            .unwrap();
        let (target, payload) = sent_message(&receipt);

        d.message_receiver.execute(chain, RELAYER, target, &payload).unwrap();
        d.message_receiver.execute(chain, RELAYER, target, &payload).unwrap();

        assert_eq!(d.counter_receiver.counter(chain).unwrap(), U256::from(2));
        let executed = bridge
            .log
            .query(&EventFilter::topics(vec![EventTopic::MessageReceiver]))
            .into_iter()
            .filter(|e| e.event.name() == "TransactionExecuted")
            .count();
        assert_eq!(executed, 2);
    }

    #[test]
    fn test_last_delivery_wins_for_stored_values() {
        let bridge = Bridge::deploy();
        let chain = bridge.chain.as_ref();

        send_and_relay(&bridge, true, U256::from(10));
        send_and_relay(&bridge, false, U256::MAX);

        assert_eq!(
            bridge.deployment.counter_receiver.state(chain).unwrap(),
            CounterState {
                counter: U256::from(2),
                bool_value: false,
                numeric_value: U256::MAX,
            }
        );
    }

    // =========================================================================
    // FAILURE PATHS
    // =========================================================================

    #[test]
    fn test_reverting_target_wraps_error_and_leaves_no_trace() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let target = chain.deploy(DEPLOYER, AlwaysReverts).unwrap().to;
        let log_len = bridge.log.len();

        let err = d
            .message_receiver
            .execute(chain, RELAYER, target, &Bytes::from(vec![1, 2, 3]))
            .unwrap_err();

        assert_eq!(
            err,
            ExecutionError::ExecuteFailed {
                target,
                source: Box::new(ExecutionError::Revert("nope".into())),
            }
        );
        assert_eq!(chain.storage_at(target, slot(9)), U256::zero());
        assert_eq!(bridge.log.len(), log_len);
    }

    #[test]
    fn test_delivery_with_unknown_selector_is_wrapped() {
        // The CounterSender has no increment function
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;

        let err = d
            .message_receiver
            .execute(
                bridge.chain.as_ref(),
                RELAYER,
                d.counter_sender.address(),
                &encode_increment(true, U256::one()),
            )
            .unwrap_err();

        assert!(matches!(err, ExecutionError::ExecuteFailed { .. }));
        assert!(matches!(err.root_cause(), ExecutionError::UnknownSelector(_)));
    }

    #[test]
    fn test_delivery_from_non_relayer_rejected() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let payload = encode_increment(true, U256::one());

        let err = d
            .message_receiver
            .execute(bridge.chain.as_ref(), USER, d.counter_receiver.address(), &payload)
            .unwrap_err();

        assert_eq!(err, ExecutionError::OnlyRelayer { caller: USER });
        assert_eq!(
            d.counter_receiver.counter(bridge.chain.as_ref()).unwrap(),
            U256::zero()
        );
    }

    #[test]
    fn test_delivery_to_account_without_code_rejected() {
        let bridge = Bridge::deploy();
        let payload = encode_increment(true, U256::one());

        let err = bridge
            .deployment
            .message_receiver
            .execute(bridge.chain.as_ref(), RELAYER, USER, &payload)
            .unwrap_err();

        assert_eq!(err, ExecutionError::OnlyForContracts(USER));
    }

    #[test]
    fn test_direct_increment_from_user_rejected() {
        let bridge = Bridge::deploy();
        let err = bridge
            .deployment
            .counter_receiver
            .increment(bridge.chain.as_ref(), USER, true, U256::one())
            .unwrap_err();

        assert_eq!(err, ExecutionError::OnlyAmb { caller: USER });
    }

    #[test]
    fn test_send_with_unset_bridge_fails_without_events() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();

        d.counter_sender
            .update_amb_address(chain, DEPLOYER, Address::ZERO)
            .unwrap();
        let log_len = bridge.log.len();

        let err = d
            .counter_sender
            .send(chain, USER, d.counter_receiver.address(), true, U256::one())
            .unwrap_err();

        assert!(err.is_not_a_contract());
        assert_eq!(bridge.log.len(), log_len);
    }

    #[test]
    fn test_cleared_relayer_blocks_every_delivery() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        d.message_receiver
            .update_relayer(chain, DEPLOYER, Address::ZERO)
            .unwrap();

        let err = d
            .message_receiver
            .execute(
                chain,
                RELAYER,
                d.counter_receiver.address(),
                &encode_increment(true, U256::one()),
            )
            .unwrap_err();

        assert_eq!(err, ExecutionError::OnlyRelayer { caller: RELAYER });
    }

    // =========================================================================
    // RECONFIGURATION
    // =========================================================================

    #[test]
    fn test_rotated_relayer_takes_over() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let new_relayer = Address::repeat_byte(0xE2);

        d.message_receiver
            .update_relayer(chain, DEPLOYER, new_relayer)
            .unwrap();

        let payload = encode_increment(true, U256::from(5));
        let target = d.counter_receiver.address();
        assert!(d.message_receiver.execute(chain, RELAYER, target, &payload).is_err());
        d.message_receiver
            .execute(chain, new_relayer, target, &payload)
            .unwrap();

        assert_eq!(d.counter_receiver.counter(chain).unwrap(), U256::one());
    }

    #[test]
    fn test_ownership_transfer_moves_configuration_rights() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let new_owner = Address::repeat_byte(0x0A);

        d.counter_receiver
            .transfer_ownership(chain, DEPLOYER, new_owner)
            .unwrap();

        assert_eq!(
            d.counter_receiver
                .update_amb_address(chain, DEPLOYER, Address::repeat_byte(1))
                .unwrap_err(),
            ExecutionError::NotOwner { caller: DEPLOYER }
        );
        d.counter_receiver
            .update_amb_address(chain, new_owner, Address::repeat_byte(1))
            .unwrap();

        // The old MessageReceiver is no longer trusted
        let err = d
            .message_receiver
            .execute(
                chain,
                RELAYER,
                d.counter_receiver.address(),
                &encode_increment(true, U256::one()),
            )
            .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ExecutionError::OnlyAmb { caller } if *caller == d.message_receiver.address()
        ));
    }

    #[test]
    fn test_log_entries_are_gap_free_and_ordered() {
        let bridge = Bridge::deploy();
        send_and_relay(&bridge, true, U256::from(1));
        send_and_relay(&bridge, true, U256::from(2));

        let entries = bridge.log.entries_since(0);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.index, i as u64);
        }
    }

    #[test]
    fn test_delivery_receipt_serializes() {
        let bridge = Bridge::deploy();
        let receipt = send_and_relay(&bridge, true, U256::from(10));

        let json = serde_json::to_value(&receipt).unwrap();
        let receiver = serde_json::to_value(bridge.deployment.message_receiver.address()).unwrap();
        assert_eq!(json["to"], receiver);
        assert_eq!(json["logs"].as_array().unwrap().len(), 2);
    }
}
