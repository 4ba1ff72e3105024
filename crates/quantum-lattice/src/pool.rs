//! Per-chain block pool: blocks that have arrived but cannot yet be
//! admitted into the lattice DAG because one or more of their acks
//! reference blocks this node has not seen. Each chain keeps at most
//! one pending block at a time — its candidate "tip" — since a chain's
//! blocks must be admitted in height order.

use crate::domain::{Block, Position};

/// Holds one pending block per chain, keyed by chain id.
#[derive(Default)]
pub struct BlockPool {
    slots: Vec<Option<Block>>,
}

impl BlockPool {
    #[must_use]
    pub fn new(num_chains: u32) -> Self {
        Self { slots: (0..num_chains).map(|_| None).collect() }
    }

    /// Grows or shrinks the pool to match a new chain count, taking
    /// effect at a round boundary. Existing pending blocks on retained
    /// chains are preserved.
    pub fn resize(&mut self, num_chains: u32) {
        self.slots.resize_with(num_chains as usize, || None);
    }

    /// Queues `block` as the pending candidate for its chain, replacing
    /// whatever was there before (a chain is only ever waiting on one
    /// height at a time).
    pub fn add_block(&mut self, block: Block) {
        let idx = block.position.chain_id as usize;
        if idx >= self.slots.len() {
            return;
        }
        self.slots[idx] = Some(block);
    }

    /// The block currently waiting on `chain_id`, if any.
    #[must_use]
    pub fn tip(&self, chain_id: u32) -> Option<&Block> {
        self.slots.get(chain_id as usize).and_then(|s| s.as_ref())
    }

    /// Removes and returns the pending block for `chain_id` once it has
    /// been admitted into the lattice DAG.
    pub fn remove_tip(&mut self, chain_id: u32) -> Option<Block> {
        self.slots.get_mut(chain_id as usize).and_then(Option::take)
    }

    /// Drops the pending block on `chain_id` if it is at or below
    /// `height` — it has been superseded by a later submission or the
    /// chain has moved on without it.
    pub fn purge_blocks(&mut self, chain_id: u32, height: u64) {
        if let Some(slot) = self.slots.get_mut(chain_id as usize) {
            if matches!(slot, Some(b) if b.position.height <= height) {
                *slot = None;
            }
        }
    }

    #[must_use]
    pub fn num_chains(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Iterates over `(chain_id, &Block)` for every chain with a block
    /// currently pending, in chain-id order — used by the coordinator's
    /// pool-sweep retry loop.
    pub fn pending(&self) -> impl Iterator<Item = (u32, &Block)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|b| (i as u32, b)))
    }
}

/// Convenience used by the coordinator when logging which position a
/// purge targeted.
#[must_use]
pub fn position_of(block: &Block) -> Position {
    block.position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Hash, Witness};

    fn block_at(chain_id: u32, height: u64) -> Block {
        Block {
            hash: Hash([height as u8; 32]),
            position: Position { chain_id, height },
            timestamp: 0,
            acks: Vec::new(),
            parent_hash: Hash::default(),
            witness: Witness::default(),
            payload: Vec::new(),
            proposer: [0u8; 20],
            signature: Vec::new(),
        }
    }

    #[test]
    fn test_add_and_remove_tip() {
        let mut pool = BlockPool::new(4);
        pool.add_block(block_at(1, 5));
        assert_eq!(pool.tip(1).unwrap().position.height, 5);
        let removed = pool.remove_tip(1).unwrap();
        assert_eq!(removed.position.height, 5);
        assert!(pool.tip(1).is_none());
    }

    #[test]
    fn test_add_block_replaces_existing_pending() {
        let mut pool = BlockPool::new(2);
        pool.add_block(block_at(0, 3));
        pool.add_block(block_at(0, 4));
        assert_eq!(pool.tip(0).unwrap().position.height, 4);
    }

    #[test]
    fn test_purge_blocks_drops_superseded_pending() {
        let mut pool = BlockPool::new(2);
        pool.add_block(block_at(0, 3));
        pool.purge_blocks(0, 3);
        assert!(pool.tip(0).is_none());
    }

    #[test]
    fn test_purge_blocks_keeps_newer_pending() {
        let mut pool = BlockPool::new(2);
        pool.add_block(block_at(0, 10));
        pool.purge_blocks(0, 3);
        assert!(pool.tip(0).is_some());
    }

    #[test]
    fn test_resize_grows_pool() {
        let mut pool = BlockPool::new(2);
        pool.resize(5);
        assert_eq!(pool.num_chains(), 5);
        assert!(pool.tip(4).is_none());
    }

    #[test]
    fn test_pending_iterates_in_chain_order() {
        let mut pool = BlockPool::new(3);
        pool.add_block(block_at(2, 1));
        pool.add_block(block_at(0, 1));
        let ids: Vec<u32> = pool.pending().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2]);
    }
}
