//! # Node Configuration
//!
//! Defaults for every section, overridable from `AMB_*` environment
//! variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AMB_DEPLOYER` | `accounts.deployer` |
//! | `AMB_RELAYER` | `accounts.relayer` |
//! | `AMB_MAX_CALL_DEPTH` | `chain.max_call_depth` |
//! | `AMB_POLL_INTERVAL_MS` | `relay.poll_interval_ms` |
//! | `AMB_DEMO_ENABLED` | `demo.enabled` |
//! | `AMB_DEMO_SENDER` | `demo.sender` |
//! | `AMB_DEMO_BOOL` | `demo.bool_value` |
//! | `AMB_DEMO_VALUE` | `demo.numeric_value` |
//! | `AMB_DEMO_TIMEOUT_MS` | `demo.timeout_ms` |
//! | `AMB_LOG_LEVEL` | `logging.level` |
//! | `AMB_JSON_RECEIPTS` | `logging.json_receipts` |

use amb_01_execution::ChainConfig;
use shared_types::entities::{Address, U256};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        /// Environment variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A required identity is the zero address.
    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),

    /// A numeric limit is zero.
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Well-known accounts.
    pub accounts: AccountsConfig,
    /// Execution platform limits.
    pub chain: ChainConfig,
    /// Relay agent settings.
    pub relay: RelayConfig,
    /// Demo message settings.
    pub demo: DemoConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Deployer and relayer identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsConfig {
    /// Deploys and owns every component.
    pub deployer: Address,
    /// The only identity the MessageReceiver accepts deliveries from.
    pub relayer: Address,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            // First two accounts of the standard development mnemonic
            deployer: Address::new([
                0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82,
                0x72, 0x79, 0xcf, 0xff, 0xb9, 0x22, 0x66,
            ]),
            relayer: Address::new([
                0x70, 0x99, 0x79, 0x70, 0xc5, 0x18, 0x12, 0xdc, 0x3a, 0x01, 0x0c, 0x7d, 0x01,
                0xb5, 0x0e, 0x0d, 0x17, 0xdc, 0x79, 0xc8,
            ]),
        }
    }
}

/// Relay agent settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// How often the outbox is polled.
    pub poll_interval_ms: u64,
    /// Log index to start relaying from.
    pub start_cursor: u64,
}

impl RelayConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            start_cursor: 0,
        }
    }
}

/// Demo message sent after bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Send a demo message and exit once it is delivered.
    pub enabled: bool,
    /// Account that calls `CounterSender.send`.
    pub sender: Address,
    /// Flag argument.
    pub bool_value: bool,
    /// Numeric argument.
    pub numeric_value: U256,
    /// How long to wait for delivery.
    pub timeout_ms: u64,
}

impl DemoConfig {
    /// Delivery timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sender: Address::new([
                0x3c, 0x44, 0xcd, 0xdd, 0xb6, 0xa9, 0x00, 0xfa, 0x2b, 0x58, 0x5d, 0xd2, 0x99,
                0xe0, 0x3d, 0x12, 0xfa, 0x42, 0x93, 0xbc,
            ]),
            bool_value: true,
            numeric_value: U256::from(10),
            timeout_ms: 5_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Print receipts as JSON on stdout.
    pub json_receipts: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_receipts: false,
        }
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        })
}

fn parse_u256(key: &'static str, value: String) -> Result<U256, ConfigError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(digits) => U256::from_str_radix(digits, 16).map_err(|e| format!("{e:?}")),
        None => U256::from_dec_str(trimmed).map_err(|e| format!("{e:?}")),
    };
    parsed.map_err(|reason| ConfigError::InvalidValue { key, value, reason })
}

impl NodeConfig {
    /// Builds a configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("AMB_DEPLOYER") {
            config.accounts.deployer = parse("AMB_DEPLOYER", v)?;
        }
        if let Some(v) = lookup("AMB_RELAYER") {
            config.accounts.relayer = parse("AMB_RELAYER", v)?;
        }
        if let Some(v) = lookup("AMB_MAX_CALL_DEPTH") {
            config.chain.max_call_depth = parse("AMB_MAX_CALL_DEPTH", v)?;
        }
        if let Some(v) = lookup("AMB_POLL_INTERVAL_MS") {
            config.relay.poll_interval_ms = parse("AMB_POLL_INTERVAL_MS", v)?;
        }
        if let Some(v) = lookup("AMB_DEMO_ENABLED") {
            config.demo.enabled = parse("AMB_DEMO_ENABLED", v)?;
        }
        if let Some(v) = lookup("AMB_DEMO_SENDER") {
            config.demo.sender = parse("AMB_DEMO_SENDER", v)?;
        }
        if let Some(v) = lookup("AMB_DEMO_BOOL") {
            config.demo.bool_value = parse("AMB_DEMO_BOOL", v)?;
        }
        if let Some(v) = lookup("AMB_DEMO_VALUE") {
            config.demo.numeric_value = parse_u256("AMB_DEMO_VALUE", v)?;
        }
        if let Some(v) = lookup("AMB_DEMO_TIMEOUT_MS") {
            config.demo.timeout_ms = parse("AMB_DEMO_TIMEOUT_MS", v)?;
        }
        if let Some(v) = lookup("AMB_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("AMB_JSON_RECEIPTS") {
            config.logging.json_receipts = parse("AMB_JSON_RECEIPTS", v)?;
        }

        Ok(config)
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accounts.deployer.is_zero() {
            return Err(ConfigError::ZeroAddress("deployer"));
        }
        if self.accounts.relayer.is_zero() {
            return Err(ConfigError::ZeroAddress("relayer"));
        }
        if self.demo.enabled && self.demo.sender.is_zero() {
            return Err(ConfigError::ZeroAddress("demo sender"));
        }
        if self.chain.max_call_depth == 0 {
            return Err(ConfigError::ZeroLimit("max_call_depth"));
        }
        if self.relay.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroLimit("poll_interval_ms"));
        }
        Ok(())
    }
}
