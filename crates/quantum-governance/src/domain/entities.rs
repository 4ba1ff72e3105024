//! Entities stored in governance state: nodes, delegators, DKG artifacts
//! and protocol configuration.

use super::value_objects::{Address, BoundedString, Bytes, Hash32};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A registered validator node (`Node[] public nodes` in the original layout).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub owner: Address,
    pub public_key: Bytes,
    pub staked: U256,
    pub fined: U256,
    pub name: BoundedString,
    pub email: BoundedString,
    pub location: BoundedString,
    pub url: BoundedString,
    pub unstaked: bool,
}

impl Node {
    /// A node is qualified for DKG/notary-set membership when it has not
    /// unstaked and its staked balance, net of outstanding fines, still
    /// meets the minimum stake requirement.
    #[must_use]
    pub fn is_qualified(&self, min_stake: U256) -> bool {
        if self.unstaked {
            return false;
        }
        self.staked.saturating_sub(self.fined) >= min_stake
    }
}

/// A single delegation record (`mapping(address => Delegator[])`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegator {
    pub owner: Address,
    pub value: U256,
    /// Zero while still delegated; set to the consensus timestamp (as a
    /// unix-second count) when `undelegate` is called.
    pub undelegated_at: U256,
}

impl Delegator {
    #[must_use]
    pub fn has_undelegated(&self) -> bool {
        !self.undelegated_at.is_zero()
    }
}

/// Protocol-wide tunable parameters (`owner`-mutable configuration struct).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub min_stake: U256,
    pub lockup_period: U256,
    pub block_reward: U256,
    pub block_gas_limit: U256,
    pub num_chains: u32,
    pub lambda_ba: U256,
    pub lambda_dkg: U256,
    pub k: u32,
    pub phi_ratio: U256,
    pub notary_set_size: u32,
    pub dkg_set_size: u32,
    pub round_interval: U256,
    pub min_block_interval: U256,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            min_stake: U256::from(10u64).pow(U256::from(18u64)).saturating_mul(U256::from(50u64)),
            lockup_period: U256::from(2_000u64),
            block_reward: U256::zero(),
            block_gas_limit: U256::from(8_000_000u64),
            num_chains: 4,
            lambda_ba: U256::from(250u64),
            lambda_dkg: U256::from(8_000u64),
            k: 1,
            phi_ratio: U256::from(667u64), // parts-per-thousand, i.e. 2/3
            notary_set_size: 13,
            dkg_set_size: 13,
            round_interval: U256::from(3_600_000u64),
            min_block_interval: U256::from(1_000u64),
        }
    }
}

/// Per-round DKG artifacts: submitted master public keys, complaints, and
/// the mpk-ready / finalized vote tallies.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DkgArtifacts {
    pub master_public_keys: Vec<Bytes>,
    pub complaints: Vec<Bytes>,
    pub mpk_ready_count: u64,
    pub finalized_count: u64,
}

/// The monotonically-growing chain of common reference strings, one per
/// completed round; `round() == crs.len() - 1`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CrsChain {
    pub crs: Vec<Hash32>,
}

impl CrsChain {
    #[must_use]
    pub fn round(&self) -> u64 {
        self.crs.len().saturating_sub(1) as u64
    }

    #[must_use]
    pub fn current(&self) -> Option<Hash32> {
        self.crs.last().copied()
    }

    #[must_use]
    pub fn at(&self, round: u64) -> Option<Hash32> {
        self.crs.get(round as usize).copied()
    }
}

/// Round-height snapshots (`uint256[] public roundHeight`), mapping a DKG
/// round number to the consensus block height it was snapshotted at.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub heights: Vec<U256>,
}

impl RoundSnapshot {
    #[must_use]
    pub fn next_round(&self) -> u64 {
        self.heights.len() as u64
    }
}

/// Per-report-type fine amounts and a de-duplication ledger keyed by the
/// hash of the (sorted) misbehavior payload, preventing the same evidence
/// from being fined twice.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FineLedger {
    pub fine_values: Vec<U256>,
    pub fined_payloads: std::collections::HashSet<Hash32>,
}

/// The privileged account permitted to call `updateConfiguration` and
/// `transferOwnership`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Owner(pub Address);
