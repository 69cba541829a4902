//! # Relay Agent End-to-End
//!
//! Runs the background relay agent against a live deployment and observes
//! deliveries through log subscriptions.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{Bridge, DEPLOYER, RELAYER, USER};
    use amb_01_execution::prelude::*;
    use amb_04_counter_app::CounterState;
    use amb_node::config::RelayConfig;
    use amb_node::{NodeConfig, NodeRuntime, ReceiverDestination, RelayAgent, RelayStats};
    use shared_bus::{EventFilter, EventTopic};
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio::time::timeout;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn fast_relay() -> RelayConfig {
        RelayConfig {
            poll_interval_ms: 5,
            start_cursor: 0,
        }
    }

    fn agent_for(bridge: &Bridge, relayer: Address) -> RelayAgent<ReceiverDestination> {
        let api: Arc<dyn ExecutionApi> = bridge.chain.clone();
        let destination =
            ReceiverDestination::new(api, bridge.deployment.message_receiver, relayer);
        RelayAgent::new(
            bridge.log.clone(),
            destination,
            bridge.deployment.message_sender.address(),
            fast_relay(),
        )
    }

    // =========================================================================
    // AGENT
    // =========================================================================

    #[tokio::test]
    async fn test_agent_relays_messages_in_order() {
        let bridge = Bridge::deploy();
        let d = bridge.deployment;
        let mut agent = agent_for(&bridge, RELAYER);

        for n in 1..=3u64 {
            d.counter_sender
                .send(
                    bridge.chain.as_ref(),
                    USER,
                    d.counter_receiver.address(),
                    n % 2 == 1,
                    U256::from(n),
                )
                .unwrap();
        }

        assert_eq!(agent.relay_pending().await, 3);
        assert_eq!(
            d.counter_receiver.state(bridge.chain.as_ref()).unwrap(),
            CounterState {
                counter: U256::from(3),
                bool_value: true,
                numeric_value: U256::from(3),
            }
        );

        // Nothing new: a second pass delivers nothing
        assert_eq!(agent.relay_pending().await, 0);
        assert_eq!(agent.stats().relayed, 3);
    }

    #[tokio::test]
    async fn test_agent_with_wrong_key_fails_every_delivery() {
        let bridge = Bridge::deploy();
        let d = bridge.deployment;
        let mut agent = agent_for(&bridge, USER);

        d.counter_sender
            .send(bridge.chain.as_ref(), USER, d.counter_receiver.address(), true, U256::one())
            .unwrap();

        assert_eq!(agent.relay_pending().await, 0);
        assert_eq!(
            agent.stats(),
            RelayStats {
                observed: 1,
                relayed: 0,
                failed: 1,
            }
        );
        assert_eq!(
            d.counter_receiver.counter(bridge.chain.as_ref()).unwrap(),
            U256::zero()
        );
    }

    #[tokio::test]
    async fn test_background_agent_delivers_and_drains_on_shutdown() {
        let bridge = Bridge::deploy();
        let d = bridge.deployment;
        let agent = agent_for(&bridge, RELAYER);
        let mut executed = bridge.log.subscribe(EventFilter::topics(vec![EventTopic::Application]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(agent.run(shutdown_rx));

        d.counter_sender
            .send(bridge.chain.as_ref(), USER, d.counter_receiver.address(), true, U256::from(10))
            .unwrap();

        // MessageSent comes first, then the delivered IncrementExecuted
        let delivered = timeout(Duration::from_secs(2), async {
            while let Some(entry) = executed.recv().await {
                if let BridgeEvent::IncrementExecuted { new_counter, .. } = entry.event {
                    return Some(new_counter);
                }
            }
            None
        })
        .await
        .expect("delivery timed out");
        assert_eq!(delivered, Some(U256::one()));

        d.counter_sender
            .send(bridge.chain.as_ref(), USER, d.counter_receiver.address(), false, U256::from(7))
            .unwrap();
        shutdown_tx.send(true).unwrap();

        let stats = handle.await.unwrap();
        assert_eq!(stats.relayed, 2);
        assert_eq!(
            d.counter_receiver.counter(bridge.chain.as_ref()).unwrap(),
            U256::from(2)
        );
    }

    #[tokio::test]
    async fn test_agent_ignores_reconfiguration_events() {
        let bridge = Bridge::deploy();
        let d = bridge.deployment;
        let mut agent = agent_for(&bridge, RELAYER);

        d.message_receiver
            .update_relayer(bridge.chain.as_ref(), DEPLOYER, RELAYER)
            .unwrap();

        assert_eq!(agent.relay_pending().await, 0);
        assert_eq!(agent.stats().observed, 0);
        assert_eq!(agent.cursor(), bridge.log.entries_since(0).len() as u64);
    }

    // =========================================================================
    // NODE RUNTIME
    // =========================================================================

    #[tokio::test]
    async fn test_node_runtime_demo_end_to_end() {
        let mut config = NodeConfig::default();
        config.relay.poll_interval_ms = 5;
        config.demo.timeout_ms = 2_000;

        let mut runtime = NodeRuntime::new(config).unwrap();
        runtime.start().unwrap();
        runtime.run_demo().await.unwrap();
        let stats = runtime.shutdown().await;

        assert_eq!(stats.relayed, 1);
        assert_eq!(
            runtime.counter_state().unwrap(),
            CounterState {
                counter: U256::one(),
                bool_value: true,
                numeric_value: U256::from(10),
            }
        );
    }
}
