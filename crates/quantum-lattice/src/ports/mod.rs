//! Outbound ports: everything the lattice needs from its environment
//! but does not implement itself — payload construction, witness data,
//! signature verification, and delivery of finalized blocks downstream.

use async_trait::async_trait;

use crate::domain::{Block, Finalization, LatticeError};
use crate::rlp::block_hash;

/// Supplies the application payload for a block this node is about to
/// propose (pending transactions, typically).
#[async_trait]
pub trait PreparePayload: Send + Sync {
    async fn prepare_payload(&self, chain_id: u32) -> Result<Vec<u8>, LatticeError>;
}

/// Supplies the witness (last observed finalized application height)
/// to attach to a block this node is about to propose.
#[async_trait]
pub trait PrepareWitness: Send + Sync {
    async fn prepare_witness(&self) -> Result<crate::domain::Witness, LatticeError>;
}

/// Verifies a block's signature against its proposer's registered
/// public key before it is handed to the coordinator.
pub trait BlockValidator: Send + Sync {
    fn verify_block(&self, b: &Block) -> Result<(), LatticeError>;
}

/// Conservative default: enforces the structural invariants the spec
/// already mandates elsewhere (acks sorted, non-empty blocks signed)
/// without a real signature check. A node wiring in actual proposer
/// keys should supply its own `BlockValidator`.
#[derive(Default)]
pub struct DefaultBlockValidator;

impl BlockValidator for DefaultBlockValidator {
    fn verify_block(&self, b: &Block) -> Result<(), LatticeError> {
        if !b.acks.windows(2).all(|w| w[0] < w[1]) {
            return Err(LatticeError::AcksNotSorted);
        }
        if block_hash(b).0 != b.hash.0 {
            return Err(LatticeError::InvalidBlock);
        }
        if !b.is_empty() && b.signature.is_empty() {
            return Err(LatticeError::InvalidBlock);
        }
        Ok(())
    }
}

/// Notified once a block has been admitted into the DAG, before total
/// ordering has run — used to stop rebroadcasting it.
pub trait BlockConfirmed: Send + Sync {
    fn on_block_confirmed(&self, b: &Block);
}

/// Notified once a block has been totally ordered and assigned a
/// consensus timestamp — the point at which it is safe to execute.
#[async_trait]
pub trait BlockDelivered: Send + Sync {
    async fn on_block_delivered(&self, finalization: &Finalization);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Hash, Position, Witness};

    fn block(acks: Vec<Position>, signature: Vec<u8>) -> Block {
        let mut b = Block {
            hash: Hash::default(),
            position: Position { chain_id: 0, height: 0 },
            timestamp: 0,
            acks,
            parent_hash: Hash::default(),
            witness: Witness::default(),
            payload: vec![1],
            proposer: [0u8; 20],
            signature,
        };
        b.hash = block_hash(&b);
        b
    }

    #[test]
    fn test_default_validator_rejects_unsorted_acks() {
        let v = DefaultBlockValidator;
        let acks = vec![Position { chain_id: 2, height: 0 }, Position { chain_id: 1, height: 0 }];
        assert_eq!(v.verify_block(&block(acks, vec![0xaa])), Err(LatticeError::AcksNotSorted));
    }

    #[test]
    fn test_default_validator_rejects_unsigned_nonempty_block() {
        let v = DefaultBlockValidator;
        assert_eq!(v.verify_block(&block(vec![], vec![])), Err(LatticeError::InvalidBlock));
    }

    #[test]
    fn test_default_validator_accepts_signed_block() {
        let v = DefaultBlockValidator;
        assert!(v.verify_block(&block(vec![], vec![0xaa])).is_ok());
    }

    #[test]
    fn test_default_validator_rejects_tampered_hash() {
        let v = DefaultBlockValidator;
        let mut b = block(vec![], vec![0xaa]);
        b.payload.push(0xff);
        assert_eq!(v.verify_block(&b), Err(LatticeError::InvalidBlock));
    }
}
