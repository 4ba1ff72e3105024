//! Error taxonomy for the lattice, mirroring the original coordinator's
//! three-way split: benign ("retry me later"), structural ("drop and
//! dishonor the sender"), and fatal ("the in-memory DAG state is
//! corrupt, stop the process").

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// One of the block's acks references a block this node has not
    /// seen yet. Benign: the block stays queued in the per-chain pool
    /// and is retried on the next sweep.
    #[error("acking block does not exist: chain={chain_id} height={height}")]
    AckingBlockNotExists { chain_id: u32, height: u64 },

    /// The block's hash does not match its content, or its signature
    /// failed verification.
    #[error("block failed signature/hash verification")]
    InvalidBlock,

    /// The block's ack list is not sorted by `(chain_id, hash)`.
    #[error("acks are not sorted")]
    AcksNotSorted,

    /// A new block on a chain is not newer than that chain's current
    /// tip (stale/duplicate submission).
    #[error("block is not newer than the chain tip")]
    NotNewerThanTip,

    /// `append_config` called out of round sequence.
    #[error("config for round {given} is out of sequence (expected {expected})")]
    ConfigRoundOutOfSequence { given: u64, expected: u64 },

    /// A chain id referenced by a block/position does not exist under
    /// the active configuration.
    #[error("chain id {0} out of range")]
    UnknownChain(u32),

    /// No admitted block with the requested hash.
    #[error("block not found")]
    BlockNotFound,
}

impl LatticeError {
    /// Benign errors mean "not ready yet" — the caller should keep the
    /// block around and retry, not treat it as misbehavior.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LatticeError::AckingBlockNotExists { .. })
    }
}
