//! # AMB Node
//!
//! Loads configuration, deploys the bridge, runs the relay agent and, when
//! the demo is enabled, sends one message end to end and exits.

use amb_node::logging::init_logging;
use amb_node::{NodeConfig, NodeRuntime};
use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // Initialize logging
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("===========================================");
    info!("  AMB Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let mut runtime = NodeRuntime::new(config).context("Failed to bootstrap the bridge")?;
    runtime.start().context("Failed to start relay agent")?;

    let addresses = runtime.deployment().addresses();
    println!(
        "{}",
        serde_json::to_string_pretty(&addresses).context("Failed to serialize addresses")?
    );

    if runtime.config().demo.enabled {
        let entry = runtime.run_demo().await.context("Demo message was not delivered")?;
        info!(index = entry.index, tx_id = %entry.tx_id, "Demo message delivered");
    } else {
        info!("Node is running. Press Ctrl+C to stop.");
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
    }

    let stats = runtime.shutdown().await;
    let state = runtime.counter_state().context("Failed to read counter state")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "counter": state,
            "relay": stats,
        }))
        .context("Failed to serialize summary")?
    );

    Ok(())
}
