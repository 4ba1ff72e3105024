//! The lattice coordinator: owns the pool, the DAG, total ordering, and
//! consensus-timestamp assignment behind a single `RwLock`, and wires
//! them together into the block-admission pipeline.
//!
//! Read-only queries (`prepare_block`, `prepare_empty_block`,
//! `sanity_check`, `exist`, `next_height`) take a read lock. Anything
//! that mutates DAG state (`process_block`, `purge_blocks`,
//! `append_config`, `process_finalized_block`) takes the write lock for
//! its whole duration — the lattice never observes a state half
//! advanced by another writer.

use parking_lot::RwLock;

use crate::consensus_timestamp::ConsensusTimestamp;
use crate::domain::{Block, Finalization, Hash, LatticeError, Position};
use crate::lattice_data::LatticeData;
use crate::pool::BlockPool;
use crate::total_ordering::TotalOrdering;

struct Inner {
    pool: BlockPool,
    data: LatticeData,
    to_module: TotalOrdering,
    ct_module: ConsensusTimestamp,
}

/// Coordinates block admission across the pool, the DAG, total
/// ordering, and consensus timestamping.
pub struct Lattice {
    inner: RwLock<Inner>,
}

impl Lattice {
    #[must_use]
    pub fn new(num_chains: u32, ct_window: usize, d_moment: u64) -> Self {
        Self {
            inner: RwLock::new(Inner {
                pool: BlockPool::new(num_chains),
                data: LatticeData::new(num_chains),
                to_module: TotalOrdering::new(num_chains),
                ct_module: ConsensusTimestamp::new(num_chains, ct_window, d_moment),
            }),
        }
    }

    /// Fills in height, parent hash, and acks for a block this node is
    /// about to propose.
    pub fn prepare_block(&self, b: &mut Block) -> Result<(), LatticeError> {
        let guard = self.inner.read();
        guard.data.prepare_block(b)
    }

    pub fn prepare_empty_block(&self, chain_id: u32) -> Result<Block, LatticeError> {
        let guard = self.inner.read();
        guard.data.prepare_empty_block(chain_id)
    }

    pub fn sanity_check(&self, b: &Block) -> Result<(), LatticeError> {
        let guard = self.inner.read();
        guard.data.sanity_check(b)
    }

    /// True if a block with this hash has already been admitted.
    #[must_use]
    pub fn exist(&self, hash: &Hash) -> bool {
        let guard = self.inner.read();
        guard.data.find_block(hash).is_ok()
    }

    pub fn next_height(&self, round: u64, chain_id: u32) -> Result<u64, LatticeError> {
        let guard = self.inner.read();
        guard.data.next_height(round, chain_id)
    }

    /// Admits `input` into the DAG, running the cascading pool-sweep
    /// retry loop: repeatedly scans every chain's pending tip, admits
    /// whatever now passes sanity check, and keeps going as long as a
    /// full pass produced at least one admission. `AckingBlockNotExists`
    /// during a sweep is benign — the block just stays in the pool for
    /// the next round of input. Any other sanity-check failure at this
    /// point means a block that should have been validated upstream
    /// slipped through, which is a state-corruption bug, not normal
    /// operation — so it panics rather than silently dropping data.
    fn add_block_to_lattice(inner: &mut Inner, input: Block) -> Vec<Block> {
        inner.pool.add_block(input);
        let mut newly_admitted = Vec::new();

        loop {
            let mut progressed = false;
            for chain_id in 0..inner.pool.num_chains() {
                let Some(tip) = inner.pool.tip(chain_id) else { continue };

                match inner.data.sanity_check(tip) {
                    Ok(()) => {}
                    Err(e) if e.is_recoverable() => continue,
                    Err(e) => panic!("lattice DAG invariant violated during pool sweep: {e}"),
                }

                let tip = inner.pool.remove_tip(chain_id).expect("tip checked present above");
                let admitted = inner
                    .data
                    .add_block(tip)
                    .unwrap_or_else(|e| panic!("admission of sanity-checked block failed: {e}"));
                inner.pool.purge_blocks(admitted.position.chain_id, admitted.position.height);
                newly_admitted.push(admitted);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        newly_admitted
    }

    /// Processes one newly received block end to end: admits it into
    /// the DAG (if ready) and feeds every admitted block through total
    /// ordering and consensus timestamping. Errors from the
    /// total-ordering module at this point are treated the same way as
    /// DAG sanity errors — they indicate a block reached here without
    /// having been properly validated, so this panics rather than
    /// returning a recoverable error.
    pub fn process_block(&self, input: Block) -> Vec<Finalization> {
        let mut guard = self.inner.write();
        let admitted = Self::add_block_to_lattice(&mut guard, input);

        for b in admitted {
            guard
                .to_module
                .add_block(b)
                .unwrap_or_else(|e| panic!("total ordering rejected an admitted block: {e}"));
        }

        let (delivered, _mode) = guard
            .to_module
            .extract_blocks()
            .unwrap_or_else(|e| panic!("total ordering extraction failed: {e}"));

        if delivered.is_empty() {
            return Vec::new();
        }

        guard
            .ct_module
            .process_blocks(delivered)
            .unwrap_or_else(|e| panic!("consensus timestamp assignment failed: {e}"))
    }

    pub fn purge_blocks(&self, positions: &[Position]) {
        let mut guard = self.inner.write();
        guard.data.purge_blocks(positions);
    }

    /// Applies a round transition across every submodule.
    pub fn append_config(&self, round: u64, num_chains: u32, ct_window: usize) -> Result<(), LatticeError> {
        let mut guard = self.inner.write();
        guard.pool.resize(num_chains);
        guard.data.append_config(round, num_chains)?;
        guard.to_module.append_config(num_chains);
        guard.ct_module.append_config(num_chains, ct_window);
        Ok(())
    }

    /// Sync/replay path: admits a block already known to be finalized
    /// elsewhere. Unlike `process_block`, a total-ordering failure here
    /// only breaks out of the extraction loop rather than panicking —
    /// replay is expected to tolerate gaps the live path never sees.
    pub fn process_finalized_block(&self, b: Block) -> Vec<Finalization> {
        let mut guard = self.inner.write();

        if guard.data.add_finalized_block(b.clone()).is_err() {
            return Vec::new();
        }
        guard.pool.purge_blocks(b.position.chain_id, b.position.height);

        if guard.to_module.add_block(b).is_err() {
            return Vec::new();
        }

        let mut all_delivered = Vec::new();
        loop {
            match guard.to_module.extract_blocks() {
                Ok((delivered, _)) if !delivered.is_empty() => all_delivered.extend(delivered),
                _ => break,
            }
        }

        if all_delivered.is_empty() {
            return Vec::new();
        }

        match guard.ct_module.process_blocks(all_delivered) {
            Ok(finalizations) => finalizations,
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Witness;

    fn block(chain_id: u32, height: u64, acks: Vec<Position>) -> Block {
        Block {
            hash: Hash([(chain_id * 10 + height as u32) as u8; 32]),
            position: Position { chain_id, height },
            timestamp: 1000 + height,
            acks,
            parent_hash: Hash::default(),
            witness: Witness::default(),
            payload: Vec::new(),
            proposer: [0u8; 20],
            signature: Vec::new(),
        }
    }

    #[test]
    fn test_genesis_round_admits_without_acks() {
        let lattice = Lattice::new(4, 5, 0);
        let finalizations = lattice.process_block(block(0, 0, vec![]));
        assert!(finalizations.is_empty());
        assert!(lattice.exist(&Hash([0u8; 32])));
    }

    #[test]
    fn test_block_with_missing_ack_stays_pooled_not_admitted() {
        let lattice = Lattice::new(4, 5, 0);
        let b = block(0, 0, vec![Position { chain_id: 1, height: 0 }]);
        lattice.process_block(b);
        assert!(!lattice.exist(&Hash([0u8; 32])));
    }

    #[test]
    fn test_cascading_sweep_admits_pooled_block_once_ack_resolves() {
        let lattice = Lattice::new(4, 5, 0);
        let blocked = block(0, 0, vec![Position { chain_id: 1, height: 0 }]);
        lattice.process_block(blocked);
        assert!(!lattice.exist(&Hash([0u8; 32])));

        lattice.process_block(block(1, 0, vec![]));
        assert!(lattice.exist(&Hash([10u8; 32])));
        assert!(lattice.exist(&Hash([0u8; 32])));
    }

    #[test]
    fn test_quorum_batch_yields_finalized_timestamps() {
        let lattice = Lattice::new(4, 5, 0);
        lattice.process_block(block(1, 0, vec![]));
        lattice.process_block(block(2, 0, vec![]));
        lattice.process_block(block(3, 0, vec![]));
        let acks = vec![
            Position { chain_id: 1, height: 0 },
            Position { chain_id: 2, height: 0 },
            Position { chain_id: 3, height: 0 },
        ];
        let finalizations = lattice.process_block(block(0, 0, acks));
        assert!(!finalizations.is_empty());
    }

    #[test]
    fn test_append_config_grows_chain_count() {
        let lattice = Lattice::new(2, 5, 0);
        lattice.append_config(1, 4, 5).unwrap();
        assert!(lattice.next_height(1, 3).is_ok());
    }
}
