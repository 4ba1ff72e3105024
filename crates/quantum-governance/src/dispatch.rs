//! Selector → handler routing. Raw ABI argument decoding belongs to the
//! EVM-execution layer (out of scope for this crate); `dispatch` takes an
//! already-decoded [`GovernanceMethod`] and routes it to the matching
//! handler, so this module's job is strictly the selector table plus the
//! original contract's routing quirks (two selector names rarely used by
//! different client generations both landing on one handler).

use crate::domain::{Address, Configuration, GovernanceError, Hash32};
use crate::handlers::{self, CallContext, CallOutcome, ReportType};
use crate::state::GovernanceState;
use crate::storage::WordStore;
use primitive_types::U256;
use std::collections::HashMap;

/// A fully-decoded governance method call, ready to execute.
#[derive(Clone, Debug)]
pub enum GovernanceMethod {
    Stake { public_key: Vec<u8>, name: String, email: String, location: String, url: String },
    Delegate { node: Address },
    Undelegate { node: Address },
    Withdraw { node: Address },
    Unstake,
    PayFine { node: Address },
    ProposeCrs { next_round: u64, signed_crs: Vec<u8> },
    AddDkgMasterPublicKey { round: u64, proposer_id: Hash32, mpk: Vec<u8>, signature: Vec<u8> },
    AddDkgMpkReady { round: u64, proposer_id: Hash32, signature: Vec<u8> },
    AddDkgFinalize { round: u64, proposer_id: Hash32, signature: Vec<u8> },
    AddDkgComplaint { round: u64, proposer_id: Hash32, fine_target: Hash32, payload: Vec<u8>, signature: Vec<u8> },
    Report { node: Hash32, report_type: ReportType, evidence: (Vec<u8>, Vec<u8>) },
    TransferOwnership { new_owner: Address },
    UpdateConfiguration { config: Configuration },
    SnapshotRound { round: u64, height: U256, real_height: Option<u64> },
}

impl GovernanceMethod {
    /// The original contract's method signature, for selector derivation
    /// and logging.
    #[must_use]
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Stake { .. } => "stake(bytes,string,string,string,string)",
            Self::Delegate { .. } => "delegate(address)",
            Self::Undelegate { .. } => "undelegate(address)",
            Self::Withdraw { .. } => "withdraw(address)",
            Self::Unstake => "unstake()",
            Self::PayFine { .. } => "payFine(address)",
            Self::ProposeCrs { .. } => "proposeCRS(uint256,bytes)",
            Self::AddDkgMasterPublicKey { .. } => "addDKGMasterPublicKey(uint256,bytes)",
            // Both selector spellings the original client/contract pair
            // accepted across protocol versions route to the same handler.
            Self::AddDkgMpkReady { .. } => "addDKGMPKReady(uint256,bytes)",
            Self::AddDkgFinalize { .. } => "addDKGFinalize(uint256,bytes)",
            Self::AddDkgComplaint { .. } => "addDKGComplaint(uint256,bytes)",
            Self::Report { .. } => "report(uint256,bytes,bytes)",
            Self::TransferOwnership { .. } => "transferOwnership(address)",
            Self::UpdateConfiguration { .. } => "updateConfiguration(bytes)",
            Self::SnapshotRound { .. } => "snapshotRound(uint256,uint256)",
        }
    }

    #[must_use]
    pub fn selector(&self) -> [u8; 4] {
        shared_crypto::selector(self.signature())
    }
}

/// Builds the selector lookup table, including the two historical
/// aliases (`dkgMPKReadys`/`dkgMPKReadysCount` vs `dkgReadys`/
/// `dkgReadysCount`) that both address the mpk-ready tally.
#[must_use]
pub fn selector_table() -> HashMap<[u8; 4], &'static str> {
    let mut table = HashMap::new();
    for sig in [
        "stake(bytes,string,string,string,string)",
        "delegate(address)",
        "undelegate(address)",
        "withdraw(address)",
        "unstake()",
        "payFine(address)",
        "proposeCRS(uint256,bytes)",
        "addDKGMasterPublicKey(uint256,bytes)",
        "addDKGMPKReady(uint256,bytes)",
        "addDKGFinalize(uint256,bytes)",
        "addDKGComplaint(uint256,bytes)",
        "report(uint256,bytes,bytes)",
        "transferOwnership(address)",
        "updateConfiguration(bytes)",
        "snapshotRound(uint256,uint256)",
        // Aliases: older clients queried the mpk-ready tally under the
        // `dkgReadys`/`dkgReadysCount` names; both resolve to the same
        // read path as `dkgMPKReadys`/`dkgMPKReadysCount`.
        "dkgMPKReadys(uint256,address)",
        "dkgReadys(uint256,address)",
        "dkgMPKReadysCount(uint256)",
        "dkgReadysCount(uint256)",
    ] {
        table.insert(shared_crypto::selector(sig), sig);
    }
    table
}

/// Executes a decoded method call against `state`.
pub fn dispatch<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    method: GovernanceMethod,
) -> Result<CallOutcome, GovernanceError> {
    match method {
        GovernanceMethod::Stake { public_key, name, email, location, url } => {
            handlers::stake(state, ctx, public_key.into(), name, email, location, url)
        }
        GovernanceMethod::Delegate { node } => handlers::delegate(state, ctx, node),
        GovernanceMethod::Undelegate { node } => handlers::undelegate(state, ctx, node),
        GovernanceMethod::Withdraw { node } => handlers::withdraw(state, ctx, node),
        GovernanceMethod::Unstake => handlers::unstake(state, ctx),
        GovernanceMethod::PayFine { node } => handlers::pay_fine(state, ctx, node),
        GovernanceMethod::ProposeCrs { next_round, signed_crs } => {
            handlers::propose_crs(state, ctx, next_round, signed_crs)
        }
        GovernanceMethod::AddDkgMasterPublicKey { round, proposer_id, mpk, signature } => {
            handlers::add_dkg_master_public_key(state, ctx, round, proposer_id, mpk, signature)
        }
        GovernanceMethod::AddDkgMpkReady { round, proposer_id, signature } => {
            handlers::add_dkg_mpk_ready(state, ctx, round, proposer_id, signature)
        }
        GovernanceMethod::AddDkgFinalize { round, proposer_id, signature } => {
            handlers::add_dkg_finalize(state, ctx, round, proposer_id, signature)
        }
        GovernanceMethod::AddDkgComplaint { round, proposer_id, fine_target, payload, signature } => {
            handlers::add_dkg_complaint(state, ctx, round, proposer_id, fine_target, payload, signature)
        }
        GovernanceMethod::Report { node, report_type, evidence } => {
            handlers::report(state, node, report_type, evidence)?;
            Ok(CallOutcome::default())
        }
        GovernanceMethod::TransferOwnership { new_owner } => {
            handlers::transfer_ownership(state, ctx, new_owner)?;
            Ok(CallOutcome::default())
        }
        GovernanceMethod::UpdateConfiguration { config } => {
            handlers::update_configuration(state, ctx, config)
        }
        GovernanceMethod::SnapshotRound { round, height, real_height } => {
            handlers::snapshot_round(state, ctx, round, height, real_height)?;
            Ok(CallOutcome::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_table_has_both_mpk_ready_aliases() {
        let table = selector_table();
        let a = shared_crypto::selector("dkgMPKReadys(uint256,address)");
        let b = shared_crypto::selector("dkgReadys(uint256,address)");
        assert!(table.contains_key(&a));
        assert!(table.contains_key(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_signatures_produce_distinct_selectors() {
        let table = selector_table();
        assert_eq!(table.len(), 18);
    }
}
