//! Consensus-timestamp assignment: replaces each block's self-reported
//! (and potentially dishonest) timestamp with a value every node agrees
//! on, derived from the previous batch's per-chain representative
//! timestamps.

use std::collections::HashSet;

use crate::domain::{Block, Finalization, LatticeError};

/// Assigns consensus timestamps to totally-ordered batches. Every block
/// delivered together shares one consensus time, computed as the median
/// of the per-chain representative timestamps left behind by the
/// previously processed batch — never a block's own batch, so a
/// proposer can't influence the time assigned to its own block.
/// Monotonic across batches; the very first batch falls back to a
/// configured `d_moment` seed since there is no previous batch yet.
pub struct ConsensusTimestamp {
    window_size: usize,
    per_chain_history: Vec<Vec<u64>>,
    /// Each chain's representative timestamp as of the end of the last
    /// batch that touched it — the input to the next batch's median.
    representatives: Vec<Option<u64>>,
    last_assigned: u64,
    d_moment: u64,
}

impl ConsensusTimestamp {
    #[must_use]
    pub fn new(num_chains: u32, window_size: usize, d_moment: u64) -> Self {
        Self {
            window_size: window_size.max(1),
            per_chain_history: vec![Vec::new(); num_chains as usize],
            representatives: vec![None; num_chains as usize],
            last_assigned: d_moment,
            d_moment,
        }
    }

    /// Processes a batch of totally-ordered blocks, assigning all of
    /// them the same consensus time, then folds this batch's own
    /// timestamps into each touched chain's representative for the next
    /// batch to consume.
    pub fn process_blocks(&mut self, blocks: Vec<Block>) -> Result<Vec<Finalization>, LatticeError> {
        if blocks.is_empty() {
            return Ok(Vec::new());
        }

        let reps: Vec<u64> = self.representatives.iter().filter_map(|r| *r).collect();
        let candidate = if reps.is_empty() { self.d_moment } else { median(&reps) };
        let consensus_time = candidate.max(self.last_assigned);
        self.last_assigned = consensus_time;

        let mut touched = HashSet::new();
        for block in &blocks {
            let chain_id = block.position.chain_id as usize;
            let history = self
                .per_chain_history
                .get_mut(chain_id)
                .ok_or(LatticeError::UnknownChain(block.position.chain_id))?;
            history.push(block.timestamp);
            if history.len() > self.window_size {
                history.remove(0);
            }
            touched.insert(chain_id);
        }
        for chain_id in touched {
            self.representatives[chain_id] = Some(median(&self.per_chain_history[chain_id]));
        }

        Ok(blocks
            .into_iter()
            .map(|block| Finalization { block, consensus_time, mode: crate::domain::DeliverMode::Early })
            .collect())
    }

    pub fn append_config(&mut self, num_chains: u32, window_size: usize) {
        self.per_chain_history.resize(num_chains as usize, Vec::new());
        self.representatives.resize(num_chains as usize, None);
        self.window_size = window_size.max(1);
    }
}

fn median(values: &[u64]) -> u64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 && mid > 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Hash, Position, Witness};

    fn block(chain_id: u32, height: u64, timestamp: u64) -> Block {
        Block {
            hash: Hash::default(),
            position: Position { chain_id, height },
            timestamp,
            acks: Vec::new(),
            parent_hash: Hash::default(),
            witness: Witness::default(),
            payload: Vec::new(),
            proposer: [0u8; 20],
            signature: Vec::new(),
        }
    }

    #[test]
    fn test_first_batch_uses_d_moment_seed() {
        let mut ct = ConsensusTimestamp::new(2, 5, 42);
        let out = ct.process_blocks(vec![block(0, 0, 1000)]).unwrap();
        assert_eq!(out[0].consensus_time, 42);
    }

    #[test]
    fn test_second_batch_uses_previous_batch_representatives() {
        let mut ct = ConsensusTimestamp::new(2, 5, 0);
        ct.process_blocks(vec![block(0, 0, 100), block(1, 0, 200)]).unwrap();
        let out = ct.process_blocks(vec![block(0, 1, 999_999)]).unwrap();
        // median of {100, 200} from the prior batch, not this batch's own 999_999.
        assert_eq!(out[0].consensus_time, 150);
    }

    #[test]
    fn test_all_blocks_in_one_batch_share_one_consensus_time() {
        let mut ct = ConsensusTimestamp::new(2, 5, 0);
        ct.process_blocks(vec![block(0, 0, 100), block(1, 0, 200)]).unwrap();
        let out = ct.process_blocks(vec![block(0, 1, 10), block(1, 1, 20)]).unwrap();
        assert_eq!(out[0].consensus_time, out[1].consensus_time);
    }

    #[test]
    fn test_monotonic_across_batches_even_if_representatives_regress() {
        let mut ct = ConsensusTimestamp::new(1, 5, 0);
        ct.process_blocks(vec![block(0, 0, 1_000)]).unwrap();
        let second = ct.process_blocks(vec![block(0, 1, 5)]).unwrap();
        assert_eq!(second[0].consensus_time, 1_000);
        let third = ct.process_blocks(vec![block(0, 2, 5)]).unwrap();
        assert!(third[0].consensus_time >= second[0].consensus_time);
    }

    #[test]
    fn test_chain_absent_from_previous_batch_does_not_contribute() {
        let mut ct = ConsensusTimestamp::new(2, 5, 0);
        ct.process_blocks(vec![block(0, 0, 100)]).unwrap();
        let out = ct.process_blocks(vec![block(1, 0, 1)]).unwrap();
        // only chain 0 has a representative so far; median of {100} is 100.
        assert_eq!(out[0].consensus_time, 100);
    }
}
