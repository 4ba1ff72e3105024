//! Block-lattice wire and domain types: one block per (chain, height),
//! acking the current tips of every chain it has observed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A 32-byte block hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..")
    }
}

/// Identifies a block by its chain and height within that chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Debug)]
pub struct Position {
    pub chain_id: u32,
    pub height: u64,
}

impl Position {
    /// True when `self` is strictly later than `other` on the same
    /// chain, or `other` is the chain's pre-genesis position.
    #[must_use]
    pub fn newer(&self, other: &Position) -> bool {
        self.height > other.height
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.height.cmp(&other.height)
    }
}

/// Finality witness: the last height of the application state this
/// block's proposer had observed when it was produced.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Witness {
    pub height: u64,
    pub data: Vec<u8>,
}

/// A block-lattice block: a node on one chain of the DAG, acking the
/// tips of other chains it is aware of.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Block {
    pub hash: Hash,
    pub position: Position,
    pub timestamp: u64,
    /// Acknowledged tips of other chains, sorted by `(chain_id, hash)` —
    /// `sanity_check` rejects an unsorted ack list.
    pub acks: Vec<Position>,
    pub parent_hash: Hash,
    pub witness: Witness,
    pub payload: Vec<u8>,
    pub proposer: [u8; 20],
    pub signature: Vec<u8>,
}

impl Block {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty() && self.signature.is_empty()
    }
}

/// The output of total ordering: a batch of blocks in their finalized
/// linear order, plus the mode that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliverMode {
    /// Produced by the fast path once enough acks confirmed the batch.
    Early,
    /// Produced by the flush path at round boundaries / sync.
    Flush,
}

/// A block after total ordering and consensus-timestamp assignment.
#[derive(Clone, Debug)]
pub struct Finalization {
    pub block: Block,
    pub consensus_time: u64,
    pub mode: DeliverMode,
}
