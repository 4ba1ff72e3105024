//! Deterministic total ordering: turns the partially-ordered DAG of
//! admitted blocks into a single linear sequence every honest node
//! agrees on, without further communication.
//!
//! Each newly admitted block is buffered until the set of blocks it
//! (transitively) acks is stable under the current set of chain tips —
//! "early mode" delivers a batch as soon as that set can no longer
//! change for blocks already seen, "flush mode" is used at round
//! boundaries and during sync, where the buffer is drained regardless.

use std::collections::{HashSet, VecDeque};

use crate::domain::{Block, DeliverMode, Hash, LatticeError};

/// A block waiting for its ancestor set (by ack-closure) to stabilize.
struct Pending {
    block: Block,
    /// Chains known to have acked this block, directly or by being the
    /// block's own chain. Computed once at insertion time — the block's
    /// `acks` list never changes after admission, so this never needs
    /// recomputing.
    acked_by: HashSet<u32>,
}

/// Linearizes admitted blocks by holding them until no live block can
/// still ack them, then emitting the stable prefix ordered by
/// `(height-implied round, chain_id, hash)`.
pub struct TotalOrdering {
    pending: VecDeque<Pending>,
    /// How many chains must have acked (transitively) a candidate
    /// block, directly or through a later block on the same chain,
    /// before it is considered stable. Matches a simple BFT quorum:
    /// more than two-thirds of chains.
    quorum: usize,
}

impl TotalOrdering {
    #[must_use]
    pub fn new(num_chains: u32) -> Self {
        Self { pending: VecDeque::new(), quorum: quorum_for(num_chains) }
    }

    /// Buffers a newly admitted block and records which chains it is
    /// acked by: its own chain plus every chain it directly acks (a
    /// block vouches for its own tip, and acking another chain's block
    /// is itself a form of cross-chain corroboration for the acker).
    pub fn add_block(&mut self, b: Block) -> Result<(), LatticeError> {
        let acked_by: HashSet<u32> =
            b.acks.iter().map(|a| a.chain_id).chain(std::iter::once(b.position.chain_id)).collect();
        self.pending.push_back(Pending { block: b, acked_by });
        Ok(())
    }

    /// Extracts every buffered block whose acking chain count has
    /// reached quorum, in deterministic order. A block short of quorum
    /// does not block extraction of blocks queued behind it — those may
    /// already be acked by enough chains even while an earlier, sparsely
    /// acked tip is still waiting. Returns an empty batch (not an error)
    /// when nothing is ready yet — that is the normal "early mode"
    /// steady state, not a flush.
    pub fn extract_blocks(&mut self) -> Result<(Vec<Block>, DeliverMode), LatticeError> {
        let mut ready = Vec::new();
        let mut still_pending = VecDeque::with_capacity(self.pending.len());
        for candidate in self.pending.drain(..) {
            if candidate.acked_by.len() >= self.quorum {
                ready.push(candidate.block);
            } else {
                still_pending.push_back(candidate);
            }
        }
        self.pending = still_pending;
        ready.sort_by(|a, b| (a.position.chain_id, a.hash.0).cmp(&(b.position.chain_id, b.hash.0)));
        Ok((ready, DeliverMode::Early))
    }

    /// Drains every buffered block regardless of quorum — used at round
    /// boundaries and replay, where waiting for more acks would never
    /// resolve.
    pub fn flush(&mut self) -> (Vec<Block>, DeliverMode) {
        let mut flushed: Vec<Block> = self.pending.drain(..).map(|p| p.block).collect();
        flushed.sort_by(|a, b| (a.position.chain_id, a.hash.0).cmp(&(b.position.chain_id, b.hash.0)));
        (flushed, DeliverMode::Flush)
    }

    pub fn append_config(&mut self, num_chains: u32) {
        self.quorum = quorum_for(num_chains);
    }
}

fn quorum_for(num_chains: u32) -> usize {
    if num_chains == 0 {
        return 0;
    }
    (2 * num_chains as usize / 3) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, Witness};

    fn block(chain_id: u32, height: u64, acks: Vec<Position>) -> Block {
        Block {
            hash: Hash([(chain_id * 10 + height as u32) as u8; 32]),
            position: Position { chain_id, height },
            timestamp: 0,
            acks,
            parent_hash: Hash::default(),
            witness: Witness::default(),
            payload: Vec::new(),
            proposer: [0u8; 20],
            signature: Vec::new(),
        }
    }

    #[test]
    fn test_block_without_quorum_acks_stays_buffered() {
        let mut to = TotalOrdering::new(4);
        to.add_block(block(0, 0, vec![])).unwrap();
        let (out, _) = to.extract_blocks().unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_block_reaching_quorum_is_extracted() {
        let mut to = TotalOrdering::new(4);
        let acks = vec![
            Position { chain_id: 1, height: 0 },
            Position { chain_id: 2, height: 0 },
            Position { chain_id: 3, height: 0 },
        ];
        to.add_block(block(0, 0, acks)).unwrap();
        let (out, mode) = to.extract_blocks().unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(mode, DeliverMode::Early);
    }

    #[test]
    fn test_flush_drains_everything_regardless_of_quorum() {
        let mut to = TotalOrdering::new(4);
        to.add_block(block(0, 0, vec![])).unwrap();
        to.add_block(block(1, 0, vec![])).unwrap();
        let (out, mode) = to.flush();
        assert_eq!(out.len(), 2);
        assert_eq!(mode, DeliverMode::Flush);
    }

    #[test]
    fn test_sparse_tip_does_not_block_quorum_reaching_blocks_queued_behind_it() {
        let mut to = TotalOrdering::new(4);
        // b0 is a chain tip with no outgoing acks yet — it can never
        // reach quorum on its own, but must not stall extraction of the
        // blocks queued after it.
        to.add_block(block(0, 0, vec![])).unwrap();
        let acks = vec![
            Position { chain_id: 0, height: 0 },
            Position { chain_id: 2, height: 0 },
            Position { chain_id: 3, height: 0 },
        ];
        to.add_block(block(1, 0, acks.clone())).unwrap();
        to.add_block(block(2, 0, acks)).unwrap();
        let (out, _) = to.extract_blocks().unwrap();
        let chain_ids: Vec<u32> = out.iter().map(|b| b.position.chain_id).collect();
        assert_eq!(chain_ids, vec![1, 2]);
    }

    #[test]
    fn test_extraction_order_is_deterministic_by_chain_then_hash() {
        let mut to = TotalOrdering::new(4);
        let acks = vec![
            Position { chain_id: 1, height: 0 },
            Position { chain_id: 2, height: 0 },
            Position { chain_id: 3, height: 0 },
        ];
        to.add_block(block(2, 0, acks.clone())).unwrap();
        to.add_block(block(0, 0, acks)).unwrap();
        let (out, _) = to.extract_blocks().unwrap();
        assert_eq!(out[0].position.chain_id, 0);
        assert_eq!(out[1].position.chain_id, 2);
    }
}
