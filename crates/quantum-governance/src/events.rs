//! Domain events published onto the shared event bus whenever a
//! governance handler commits a state change, mirroring the original
//! contract's `emit*` calls.

use crate::domain::{Address, Hash32};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_bus::BlockchainEvent;

/// Every event the governance contract can emit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GovernanceEvent {
    Staked { node: Address },
    Unstaked { node: Address },
    Delegated { node: Address, delegator: Address, value: U256 },
    Undelegated { node: Address, delegator: Address },
    ConfigurationChanged,
    CrsProposed { round: u64, crs: Hash32 },
}

impl From<GovernanceEvent> for BlockchainEvent {
    fn from(event: GovernanceEvent) -> Self {
        match event {
            GovernanceEvent::Staked { node } => BlockchainEvent::GovernanceStaked { node: node.0 },
            GovernanceEvent::Unstaked { node } => BlockchainEvent::GovernanceUnstaked { node: node.0 },
            GovernanceEvent::Delegated { node, delegator, value } => {
                let mut buf = [0u8; 32];
                value.to_big_endian(&mut buf);
                BlockchainEvent::GovernanceDelegated {
                    node: node.0,
                    delegator: delegator.0,
                    value: buf,
                }
            }
            GovernanceEvent::Undelegated { node, delegator } => BlockchainEvent::GovernanceUndelegated {
                node: node.0,
                delegator: delegator.0,
            },
            GovernanceEvent::ConfigurationChanged => BlockchainEvent::GovernanceConfigurationChanged,
            GovernanceEvent::CrsProposed { round, crs } => {
                BlockchainEvent::GovernanceCrsProposed { round, crs: crs.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staked_event_converts() {
        let event = GovernanceEvent::Staked { node: Address::new([5u8; 20]) };
        match BlockchainEvent::from(event) {
            BlockchainEvent::GovernanceStaked { node } => assert_eq!(node, [5u8; 20]),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
