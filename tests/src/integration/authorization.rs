//! # Access Control
//!
//! Randomized checks that no identity other than the authorized one can
//! reach a gated entry point, and that rejected calls change nothing.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{random_address_except, Bridge, DEPLOYER, RELAYER};
    use amb_01_execution::prelude::*;
    use amb_04_counter_app::{encode_increment, CounterState};

    const ROUNDS: usize = 32;

    #[test]
    fn test_random_callers_cannot_configure() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let log_len = bridge.log.len();

        for _ in 0..ROUNDS {
            let caller = random_address_except(&[DEPLOYER]);
            let expected = ExecutionError::NotOwner { caller };

            assert_eq!(
                d.message_receiver.update_relayer(chain, caller, caller).unwrap_err(),
                expected
            );
            assert_eq!(
                d.counter_sender.update_amb_address(chain, caller, caller).unwrap_err(),
                expected
            );
            assert_eq!(
                d.counter_receiver.update_amb_address(chain, caller, caller).unwrap_err(),
                expected
            );
            assert_eq!(
                d.counter_receiver.transfer_ownership(chain, caller, caller).unwrap_err(),
                expected
            );
        }

        assert_eq!(bridge.log.len(), log_len);
        assert_eq!(d.message_receiver.relayer(chain).unwrap(), RELAYER);
    }

    #[test]
    fn test_random_callers_cannot_deliver() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let payload = encode_increment(true, U256::from(10));

        for _ in 0..ROUNDS {
            let caller = random_address_except(&[RELAYER]);
            assert_eq!(
                d.message_receiver
                    .execute(chain, caller, d.counter_receiver.address(), &payload)
                    .unwrap_err(),
                ExecutionError::OnlyRelayer { caller }
            );
        }

        assert_eq!(d.counter_receiver.state(chain).unwrap(), CounterState::default());
    }

    #[test]
    fn test_random_callers_cannot_increment_directly() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();
        let trusted = d.message_receiver.address();

        for _ in 0..ROUNDS {
            let caller = random_address_except(&[trusted]);
            assert_eq!(
                d.counter_receiver
                    .increment(chain, caller, true, U256::one())
                    .unwrap_err(),
                ExecutionError::OnlyAmb { caller }
            );
        }

        assert_eq!(d.counter_receiver.counter(chain).unwrap(), U256::zero());
    }

    #[test]
    fn test_any_user_may_send() {
        let bridge = Bridge::deploy();
        let d = &bridge.deployment;
        let chain = bridge.chain.as_ref();

        for _ in 0..ROUNDS {
            let user = random_address_except(&[]);
            let receipt = d
                .counter_sender
                .send(chain, user, d.counter_receiver.address(), false, U256::one())
                .unwrap();
            assert_eq!(receipt.from, user);
        }
    }
}
