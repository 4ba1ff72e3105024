//! Outbound ports for every collaborator outside this node's two core
//! subsystems (governance, lattice consensus). These are narrow trait
//! definitions only — execution, networking, and storage backends are
//! out of scope here and are supplied by whatever binary wires a real
//! node together; tests supply mocks.

use async_trait::async_trait;

use quantum_lattice::domain::Block;

/// Executes a block's payload against EVM-compatible account state once
/// the lattice has assigned it a consensus timestamp.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute_block(&self, block: &Block, consensus_time: u64) -> anyhow::Result<[u8; 32]>;
}

/// Supplies candidate transactions for the next block this node
/// proposes and is notified once a block including them is confirmed.
pub trait TransactionPool: Send + Sync {
    fn pending_payload(&self, max_bytes: usize) -> Vec<u8>;
    fn on_block_confirmed(&self, block: &Block);
}

/// Gossips blocks and acks to and from the peer set.
#[async_trait]
pub trait PeerGossip: Send + Sync {
    async fn broadcast_block(&self, block: &Block) -> anyhow::Result<()>;
    async fn request_block(&self, hash: [u8; 32]) -> anyhow::Result<Option<Block>>;
}

/// Durable key-value storage for blocks and governance/lattice snapshots.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn put(&self, key: &[u8], value: &[u8]);
}

/// JSON-RPC surface the node exposes to clients.
#[async_trait]
pub trait RpcServer: Send + Sync {
    async fn serve(&self, addr: std::net::SocketAddr) -> anyhow::Result<()>;
}

/// Bootstraps a node's initial peer set and configuration on startup.
pub trait Bootstrap: Send + Sync {
    fn bootstrap_peers(&self) -> Vec<std::net::SocketAddr>;
}

/// Backfills missing block ranges from peers during sync.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download_range(&self, from: u64, to: u64, chain_id: u32) -> anyhow::Result<Vec<Block>>;
}

/// Indexes finalized blocks for historical transaction/log lookup.
pub trait Indexer: Send + Sync {
    fn index_block(&self, block: &Block, consensus_time: u64);
}

/// Manages locally held account keys used to sign proposed blocks.
pub trait AccountManager: Send + Sync {
    fn sign(&self, message: &[u8]) -> anyhow::Result<Vec<u8>>;
    fn address(&self) -> [u8; 20];
}

/// Subscribes clients to filtered event-log streams.
pub trait LogFilterSubscription: Send + Sync {
    fn matches(&self, topics: &[[u8; 32]]) -> bool;
    fn notify(&self, block: &Block, topics: &[[u8; 32]]);
}
