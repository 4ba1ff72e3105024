//! Wires the two core subsystems — governance and the lattice
//! coordinator — to the shared event bus and to each other: lattice
//! block delivery feeds the consensus timestamp into governance calls
//! (`snapshotRound`, DKG round transitions), and governance's
//! `Configuration` updates feed the lattice's `append_config`.

use std::sync::Arc;

use quantum_governance::prelude::{GovernanceState, InMemoryWordStore};
use quantum_lattice::prelude::Lattice;
use shared_bus::{EventPublisher, InMemoryEventBus};

use crate::container::NodeConfig;

/// Owns the constructed governance state, lattice coordinator, and
/// shared event bus for one running node.
pub struct NodeSubsystems {
    pub governance: GovernanceState<InMemoryWordStore>,
    pub lattice: Arc<Lattice>,
    pub event_bus: Arc<InMemoryEventBus>,
}

impl NodeSubsystems {
    #[must_use]
    pub fn new(config: &NodeConfig) -> Self {
        let governance = GovernanceState::new(InMemoryWordStore::default());
        let lattice = Arc::new(Lattice::new(
            config.lattice.num_chains,
            config.lattice.consensus_timestamp_window,
            config.lattice.d_moment,
        ));
        let event_bus = Arc::new(InMemoryEventBus::new());
        Self { governance, lattice, event_bus }
    }

    /// Publishes a governance event onto the shared bus, returning the
    /// number of subscribers that received it.
    pub async fn publish_governance_event(&self, event: quantum_governance::events::GovernanceEvent) -> usize {
        self.event_bus.publish(event.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_subsystems_start_with_empty_governance_state() {
        let config = NodeConfig::default();
        let mut subsystems = NodeSubsystems::new(&config);
        assert_eq!(subsystems.governance.accessors_mut().len_nodes(), 0);
    }

    #[tokio::test]
    async fn test_lattice_reflects_configured_chain_count() {
        let config = NodeConfig::default();
        let subsystems = NodeSubsystems::new(&config);
        assert!(subsystems.lattice.next_height(0, config.lattice.num_chains - 1).is_ok());
    }
}
