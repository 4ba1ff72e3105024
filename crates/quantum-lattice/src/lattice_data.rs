//! DAG bookkeeping: the current tip of every chain, and the sanity
//! checks a block must pass before it is admitted. This is the `l.data`
//! half of the coordinator — `pool.rs` is the waiting room, this module
//! is the DAG itself.

use std::collections::HashMap;

use crate::domain::{Block, LatticeError, Position};

/// Per-chain state: the last admitted block and the height of the next
/// one expected.
#[derive(Clone, Default)]
struct ChainStatus {
    tip: Option<Block>,
    next_height: u64,
}

/// Tracks admitted blocks across all chains and enforces the
/// ack-sortedness / ack-existence / height-monotonicity invariants a
/// block must satisfy before it becomes part of the DAG.
pub struct LatticeData {
    chains: Vec<ChainStatus>,
    /// All admitted blocks, by hash, so acks can be resolved regardless
    /// of whether they point at the current tip of their chain.
    blocks: HashMap<crate::domain::Hash, Block>,
    round: u64,
}

impl LatticeData {
    #[must_use]
    pub fn new(num_chains: u32) -> Self {
        Self {
            chains: vec![ChainStatus::default(); num_chains as usize],
            blocks: HashMap::new(),
            round: 0,
        }
    }

    /// Fills in `position.height`, `parent_hash`, and `acks` (the
    /// current tip of every other chain) for a block a local proposer
    /// is about to produce on `chain_id`.
    pub fn prepare_block(&self, b: &mut Block) -> Result<(), LatticeError> {
        let chain_id = b.position.chain_id;
        let status = self
            .chains
            .get(chain_id as usize)
            .ok_or(LatticeError::UnknownChain(chain_id))?;

        b.position.height = status.next_height;
        b.parent_hash = status.tip.as_ref().map_or(crate::domain::Hash::default(), |t| t.hash);

        b.acks = self
            .chains
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                if i as u32 == chain_id {
                    return None;
                }
                s.tip.as_ref().map(|t| t.position)
            })
            .collect();
        b.acks.sort();
        Ok(())
    }

    /// Like [`prepare_block`](Self::prepare_block) but for an empty
    /// block (no payload, no signature) proposed when a chain's
    /// designated proposer is unavailable.
    pub fn prepare_empty_block(&self, chain_id: u32) -> Result<Block, LatticeError> {
        let mut b = Block { position: Position { chain_id, height: 0 }, ..Block::default() };
        self.prepare_block(&mut b)?;
        Ok(b)
    }

    /// Resolves a previously admitted block by hash.
    pub fn find_block(&self, hash: &crate::domain::Hash) -> Result<&Block, LatticeError> {
        self.blocks.get(hash).ok_or(LatticeError::BlockNotFound)
    }

    /// Validates `b` against the invariants required before admission:
    /// strictly newer than its chain's tip, acks sorted, and every
    /// acked position already admitted.
    pub fn sanity_check(&self, b: &Block) -> Result<(), LatticeError> {
        let status = self
            .chains
            .get(b.position.chain_id as usize)
            .ok_or(LatticeError::UnknownChain(b.position.chain_id))?;

        if b.position.height != status.next_height {
            return Err(LatticeError::NotNewerThanTip);
        }

        if !b.acks.windows(2).all(|w| w[0] < w[1]) {
            return Err(LatticeError::AcksNotSorted);
        }

        for ack in &b.acks {
            let acked_status = self
                .chains
                .get(ack.chain_id as usize)
                .ok_or(LatticeError::UnknownChain(ack.chain_id))?;
            let acked_height = acked_status.tip.as_ref().map(|t| t.position.height);
            if acked_height.map_or(true, |h| ack.height > h) {
                return Err(LatticeError::AckingBlockNotExists {
                    chain_id: ack.chain_id,
                    height: ack.height,
                });
            }
        }

        Ok(())
    }

    /// Admits a block that has already passed [`sanity_check`](Self::sanity_check),
    /// advancing its chain's tip. Returns the block as the single
    /// output newly confirmed by this admission (a block always
    /// confirms itself; downstream total ordering decides when a batch
    /// becomes deliverable).
    pub fn add_block(&mut self, b: Block) -> Result<Block, LatticeError> {
        let chain_id = b.position.chain_id as usize;
        let status = self.chains.get_mut(chain_id).ok_or(LatticeError::UnknownChain(b.position.chain_id))?;
        status.next_height = b.position.height + 1;
        status.tip = Some(b.clone());
        self.blocks.insert(b.hash, b.clone());
        Ok(b)
    }

    /// The height a new block proposed on `chain_id` in `round` should
    /// carry.
    pub fn next_height(&self, round: u64, chain_id: u32) -> Result<u64, LatticeError> {
        let _ = round;
        self.chains
            .get(chain_id as usize)
            .map(|s| s.next_height)
            .ok_or(LatticeError::UnknownChain(chain_id))
    }

    /// Drops retained block bodies at or below the given positions,
    /// retaining only tip metadata — called once those blocks have been
    /// finalized and no longer need to be held for ack resolution.
    pub fn purge_blocks(&mut self, positions: &[Position]) {
        for pos in positions {
            if let Some(status) = self.chains.get(pos.chain_id as usize) {
                if let Some(tip) = &status.tip {
                    if tip.position.height == pos.height {
                        self.blocks.remove(&tip.hash);
                    }
                }
            }
        }
    }

    /// Applies a round transition: grows the chain set if `num_chains`
    /// increased, rejecting any other change for now.
    pub fn append_config(&mut self, round: u64, num_chains: u32) -> Result<(), LatticeError> {
        if round != self.round + 1 && !(round == 0 && self.round == 0) {
            return Err(LatticeError::ConfigRoundOutOfSequence { given: round, expected: self.round + 1 });
        }
        if num_chains as usize > self.chains.len() {
            self.chains.resize(num_chains as usize, ChainStatus::default());
        }
        self.round = round;
        Ok(())
    }

    /// Used on the sync/replay path: admits a block that has already
    /// been finalized elsewhere without re-running sanity checks other
    /// than height monotonicity, since a finalized block is trusted by
    /// construction.
    pub fn add_finalized_block(&mut self, b: Block) -> Result<(), LatticeError> {
        let chain_id = b.position.chain_id as usize;
        let status = self.chains.get_mut(chain_id).ok_or(LatticeError::UnknownChain(b.position.chain_id))?;
        if let Some(tip) = &status.tip {
            if b.position.height <= tip.position.height {
                return Err(LatticeError::NotNewerThanTip);
            }
        }
        status.next_height = b.position.height + 1;
        status.tip = Some(b.clone());
        self.blocks.insert(b.hash, b);
        Ok(())
    }

    #[must_use]
    pub fn tip(&self, chain_id: u32) -> Option<&Block> {
        self.chains.get(chain_id as usize).and_then(|s| s.tip.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Hash, Witness};

    fn block(chain_id: u32, height: u64, acks: Vec<Position>) -> Block {
        Block {
            hash: Hash([(chain_id * 100 + height as u32) as u8; 32]),
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
    fn test_genesis_blocks_have_no_acks_required() {
        let data = LatticeData::new(3);
        let b = block(0, 0, vec![]);
        assert!(data.sanity_check(&b).is_ok());
    }

    #[test]
    fn test_rejects_stale_height() {
        let mut data = LatticeData::new(2);
        data.add_block(block(0, 0, vec![])).unwrap();
        let stale = block(0, 0, vec![]);
        assert_eq!(data.sanity_check(&stale), Err(LatticeError::NotNewerThanTip));
    }

    #[test]
    fn test_rejects_unsorted_acks() {
        let mut data = LatticeData::new(3);
        data.add_block(block(1, 0, vec![])).unwrap();
        data.add_block(block(2, 0, vec![])).unwrap();
        let unsorted = block(0, 0, vec![Position { chain_id: 2, height: 0 }, Position { chain_id: 1, height: 0 }]);
        assert_eq!(data.sanity_check(&unsorted), Err(LatticeError::AcksNotSorted));
    }

    #[test]
    fn test_rejects_ack_on_unseen_block() {
        let data = LatticeData::new(2);
        let b = block(0, 0, vec![Position { chain_id: 1, height: 0 }]);
        assert_eq!(
            data.sanity_check(&b),
            Err(LatticeError::AckingBlockNotExists { chain_id: 1, height: 0 })
        );
    }

    #[test]
    fn test_add_block_advances_tip_and_next_height() {
        let mut data = LatticeData::new(1);
        data.add_block(block(0, 0, vec![])).unwrap();
        assert_eq!(data.next_height(0, 0).unwrap(), 1);
        assert_eq!(data.tip(0).unwrap().position.height, 0);
    }

    #[test]
    fn test_prepare_block_fills_acks_from_tips() {
        let mut data = LatticeData::new(3);
        data.add_block(block(1, 0, vec![])).unwrap();
        let mut proposal = Block { position: Position { chain_id: 0, height: 0 }, ..Block::default() };
        data.prepare_block(&mut proposal).unwrap();
        assert_eq!(proposal.acks, vec![Position { chain_id: 1, height: 0 }]);
    }

    #[test]
    fn test_append_config_grows_chain_set() {
        let mut data = LatticeData::new(2);
        data.append_config(1, 4).unwrap();
        assert!(data.next_height(1, 3).is_ok());
    }
}
