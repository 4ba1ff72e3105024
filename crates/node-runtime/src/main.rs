//! # Quantum-Chain Node Runtime
//!
//! The main entry point for the Quantum-Chain blockchain node.
//!
//! ## Core subsystems
//!
//! - `quantum-governance`: the on-chain validator registry, delegation
//!   book, DKG artifact collection, and protocol parameters.
//! - `quantum-lattice`: the block-lattice BFT consensus engine — a
//!   multi-chain DAG with total ordering and consensus-timestamp
//!   assignment.
//!
//! Both are wired to the shared event bus in [`node_runtime::wiring`].

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use node_runtime::container::NodeConfig;
use node_runtime::wiring::NodeSubsystems;

/// Initialize the node runtime.
fn init_node(config: &NodeConfig) -> NodeSubsystems {
    info!("Initializing Quantum-Chain node...");
    info!("P2P Port: {}", config.network.p2p_port);
    info!("RPC Port: {}", config.network.rpc_port);
    info!("Data Dir: {}", config.storage.data_dir.display());
    info!("Lattice chains: {}", config.lattice.num_chains);

    let subsystems = NodeSubsystems::new(config);

    info!("Quantum-Chain node initialized successfully");
    subsystems
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Quantum-Chain Node Runtime v0.1.0");
    info!("===========================================");

    let config = NodeConfig::default();
    let _subsystems = init_node(&config);

    // Keep the node running
    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down gracefully...");

    Ok(())
}
