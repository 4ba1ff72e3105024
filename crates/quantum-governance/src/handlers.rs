//! One function per governance contract method, matching the original
//! contract's dispatch table. Every handler takes the caller/value/gas
//! context explicitly rather than reading it off a shared EVM handle, so
//! it can be driven directly from tests or from a real EVM-execution
//! adapter without this crate depending on one.

use crate::domain::{Address, BoundedString, Bytes, Delegator, GovernanceError, Hash32, Node};
use crate::dkg_set;
use crate::events::GovernanceEvent;
use crate::state::GovernanceState;
use crate::storage::WordStore;
use primitive_types::U256;

/// Everything a handler needs to know about the call that invoked it.
#[derive(Clone, Debug)]
pub struct CallContext {
    pub caller: Address,
    /// Value attached to the call, in the native token's smallest unit.
    pub value: U256,
    /// Gas supplied with the call.
    pub gas: u64,
    /// Consensus timestamp of the block executing this call.
    pub time: U256,
    /// True when the executing node is this round's block proposer (only
    /// the proposer's `snapshotRound` call is cross-checked against the
    /// real round height).
    pub is_block_proposer: bool,
}

/// A handler's successful outcome: gas consumed and events to publish.
#[derive(Clone, Debug, Default)]
pub struct CallOutcome {
    pub gas_used: u64,
    pub events: Vec<GovernanceEvent>,
}

impl CallOutcome {
    fn gas(amount: u64) -> Self {
        Self { gas_used: amount, events: Vec::new() }
    }

    fn with_event(mut self, event: GovernanceEvent) -> Self {
        self.events.push(event);
        self
    }
}

type HandlerResult = Result<CallOutcome, GovernanceError>;

fn use_gas(ctx: &CallContext, amount: u64) -> Result<(), GovernanceError> {
    if ctx.gas < amount {
        return Err(GovernanceError::OutOfGas);
    }
    Ok(())
}

/// Registers a new validator node. Rejects bounded-text-field overflow by
/// consuming all gas (provable malformed input); rejects a second `stake`
/// from an already-registered address with a plain revert.
pub fn stake<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    public_key: Bytes,
    name: String,
    email: String,
    location: String,
    url: String,
) -> HandlerResult {
    let name = BoundedString::new(name, 32)?;
    let email = BoundedString::new(email, 32)?;
    let location = BoundedString::new(location, 32)?;
    let url = BoundedString::new(url, 128)?;

    let mut acc = state.accessors_mut();
    if acc.nodes_offset_by_address(ctx.caller).is_some() {
        return Err(GovernanceError::NodeAlreadyRegistered);
    }

    let node = Node {
        owner: ctx.caller,
        public_key,
        staked: U256::zero(),
        fined: U256::zero(),
        name,
        email,
        location,
        url,
        unstaked: false,
    };
    let id = dkg_set::node_id(node.public_key.as_ref());
    let offset = acc.push_node(&node);
    acc.put_node_offsets(&node, id, offset);
    drop(acc);

    use_gas(ctx, 100_000)?;
    let mut outcome = CallOutcome::gas(100_000).with_event(GovernanceEvent::Staked { node: ctx.caller });

    if ctx.value > U256::zero() {
        let delegate_outcome = delegate(state, ctx, ctx.caller)?;
        outcome.events.extend(delegate_outcome.events);
    }

    Ok(outcome)
}

/// Adds `ctx.value` as a delegation to `node_addr`. A caller may delegate
/// to a given node only once; subsequent top-ups must go through
/// `undelegate` + `withdraw` + a fresh `delegate`, matching the original
/// contract's one-record-per-delegator-per-node invariant.
pub fn delegate<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    node_addr: Address,
) -> HandlerResult {
    let mut acc = state.accessors_mut();
    let offset = acc.nodes_offset_by_address(node_addr).ok_or(GovernanceError::NodeNotFound)?;

    if ctx.value.is_zero() {
        return Err(GovernanceError::ZeroValueDelegation);
    }
    if acc.delegators_offset(node_addr, ctx.caller).is_some() {
        return Err(GovernanceError::DelegatorAlreadyExists);
    }

    let mut node = acc.node(offset);
    node.staked = node.staked.saturating_add(ctx.value);
    acc.update_node(offset, &node);

    let delegator_offset = acc.len_delegators(node_addr);
    acc.push_delegator(
        node_addr,
        &Delegator { owner: ctx.caller, value: ctx.value, undelegated_at: U256::zero() },
    );
    acc.put_delegator_offset(node_addr, ctx.caller, delegator_offset);
    drop(acc);

    use_gas(ctx, 200_000)?;
    Ok(CallOutcome::gas(200_000).with_event(GovernanceEvent::Delegated {
        node: node_addr,
        delegator: ctx.caller,
        value: ctx.value,
    }))
}

/// Marks `delegator`'s stake against `node_addr` as undelegated, starting
/// the lockup clock. Shared by the public `undelegate` entrypoint and by
/// `unstake`, which undelegates every delegator of a node at once.
fn undelegate_helper<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    node_addr: Address,
    delegator_owner: Address,
) -> HandlerResult {
    let mut acc = state.accessors_mut();
    let node_offset = acc.nodes_offset_by_address(node_addr).ok_or(GovernanceError::NodeNotFound)?;
    let offset = acc
        .delegators_offset(node_addr, delegator_owner)
        .ok_or(GovernanceError::DelegatorNotFound)?;

    let mut node = acc.node(node_offset);
    if node.fined > U256::zero() {
        return Err(GovernanceError::NodeIsFined);
    }

    let mut delegator = acc.delegator(node_addr, offset);
    delegator.undelegated_at = ctx.time;
    acc.update_delegator(node_addr, offset, &delegator);

    node.staked = node.staked.saturating_sub(delegator.value);
    acc.update_node(node_offset, &node);
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000)
        .with_event(GovernanceEvent::Undelegated { node: node_addr, delegator: delegator_owner }))
}

pub fn undelegate<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    node_addr: Address,
) -> HandlerResult {
    undelegate_helper(state, ctx, node_addr, ctx.caller)
}

/// Returns a delegator's stake once the lockup period has elapsed since
/// `undelegate`. Removes the delegator record (swap-with-last) and, if
/// this was the node's last delegator, removes the node record too.
pub fn withdraw<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    node_addr: Address,
) -> HandlerResult {
    let mut acc = state.accessors_mut();
    let node_offset = acc.nodes_offset_by_address(node_addr).ok_or(GovernanceError::NodeNotFound)?;
    let offset = acc
        .delegators_offset(node_addr, ctx.caller)
        .ok_or(GovernanceError::DelegatorNotFound)?;

    let delegator = acc.delegator(node_addr, offset);
    if !delegator.has_undelegated() {
        return Err(GovernanceError::NotYetUndelegated);
    }

    let lockup_period = acc.configuration().lockup_period;
    let unlock_time = delegator.undelegated_at.saturating_add(lockup_period);
    if ctx.time <= unlock_time {
        return Err(GovernanceError::LockupNotElapsed);
    }

    let length = acc.len_delegators(node_addr);
    let last_index = length.saturating_sub(1);
    if offset != last_index {
        let last = acc.delegator(node_addr, last_index);
        acc.update_delegator(node_addr, offset, &last);
        acc.put_delegator_offset(node_addr, last.owner, offset);
    }
    acc.delete_delegators_offset(node_addr, ctx.caller);
    acc.pop_last_delegator(node_addr);

    // The transfer of the withdrawn value back to the delegator is the
    // caller's responsibility (this crate models governance state only,
    // not token balances); a `TransferFailed` here would come from that
    // outer layer and is surfaced the same way the original contract
    // surfaces a failed native transfer.

    if acc.len_delegators(node_addr) == 0 {
        let node_len = acc.len_nodes();
        let node_last_index = node_len.saturating_sub(1);
        if node_offset != node_last_index {
            let last_node = acc.node(node_last_index);
            acc.update_node(node_offset, &last_node);
            let id = dkg_set::node_id(last_node.public_key.as_ref());
            acc.put_node_offsets(&last_node, id, node_offset);
        }
        acc.delete_nodes_offset_by_address(node_addr);
        acc.pop_last_node();
    }
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000))
}

/// Undelegates every delegator of the caller's node, then marks the node
/// unstaked so it drops out of future DKG/notary set computation.
pub fn unstake<S: WordStore>(state: &mut GovernanceState<S>, ctx: &CallContext) -> HandlerResult {
    let (offset, mut node, delegator_owners) = {
        let acc = state.accessors_mut();
        let offset = acc.nodes_offset_by_address(ctx.caller).ok_or(GovernanceError::NodeNotFound)?;
        let node = acc.node(offset);
        if node.fined > U256::zero() {
            return Err(GovernanceError::NodeIsFined);
        }
        let len = acc.len_delegators(ctx.caller);
        let owners: Vec<Address> = (0..len).map(|i| acc.delegator(ctx.caller, i).owner).collect();
        (offset, node, owners)
    };

    let mut events = Vec::new();
    for owner in delegator_owners.into_iter().rev() {
        let result = undelegate_helper(state, ctx, ctx.caller, owner)?;
        events.extend(result.events);
    }

    node.unstaked = true;
    let mut acc = state.accessors_mut();
    acc.update_node(offset, &node);
    drop(acc);

    use_gas(ctx, 100_000)?;
    events.push(GovernanceEvent::Unstaked { node: ctx.caller });
    Ok(CallOutcome { gas_used: 100_000, events })
}

/// Pays down an outstanding fine on `node_addr`. Requires the paid
/// amount to exactly match (or be covered by) the fine balance — the
/// original contract reverts rather than accepting a partial overpay.
pub fn pay_fine<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    node_addr: Address,
) -> HandlerResult {
    let mut acc = state.accessors_mut();
    let node_offset = acc.nodes_offset_by_address(node_addr).ok_or(GovernanceError::NodeNotFound)?;
    acc.delegators_offset(node_addr, ctx.caller)
        .ok_or(GovernanceError::DelegatorNotFound)?;

    let mut node = acc.node(node_offset);
    if node.fined.is_zero() || node.fined < ctx.value {
        return Err(GovernanceError::InvalidFineAmount);
    }
    node.fined = node.fined.saturating_sub(ctx.value);
    acc.update_node(node_offset, &node);
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000))
}

/// Adds `amount` to `node_addr`'s outstanding fine, de-duplicating on the
/// hash of the (sorted) evidence payloads so the same misbehavior cannot
/// be fined twice.
fn fine<S: WordStore>(
    state: &mut GovernanceState<S>,
    node_addr: Address,
    amount: U256,
    mut payloads: Vec<Vec<u8>>,
) -> Result<(), GovernanceError> {
    payloads.sort();
    let mut concatenated = Vec::new();
    for p in &payloads {
        concatenated.extend_from_slice(p);
    }
    let hash = Hash32::new(shared_crypto::keccak256(&concatenated));

    let mut acc = state.accessors_mut();
    if acc.fine_records(hash) {
        return Err(GovernanceError::AlreadyFined);
    }
    acc.set_fine_records(hash, true);

    let node_offset = acc.nodes_offset_by_address(node_addr).ok_or(GovernanceError::NodeNotFound)?;
    let mut node = acc.node(node_offset);
    node.fined = node.fined.saturating_add(amount);
    acc.update_node(node_offset, &node);
    Ok(())
}

/// Verifies a threshold-BLS signature over the previous round's CRS and,
/// if valid, advances the round and records the new CRS.
pub fn propose_crs<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    next_round: u64,
    signed_crs: Vec<u8>,
) -> HandlerResult {
    let acc = state.accessors_mut();
    let len_crs = acc.len_crs();
    // `round()` underflows to `u64::MAX` before any CRS has been pushed;
    // treat that as round -1 so the first ever proposal (round 0) is valid.
    let current_round: i128 = if len_crs == 0 { -1 } else { (len_crs - 1) as i128 };
    if i128::from(next_round) <= current_round {
        return Err(GovernanceError::InvalidRound {
            given: next_round,
            current: acc.round(),
        });
    }

    let prev_crs = if len_crs == 0 { Hash32::ZERO } else { acc.crs(len_crs - 1) };
    let round = if len_crs == 0 { 0 } else { len_crs - 1 };
    let cfg = acc.configuration();
    let master_public_keys: Vec<Vec<u8>> =
        acc.dkg_master_public_keys(round).into_iter().map(|b| b.0).collect();
    drop(acc);

    let threshold = (cfg.dkg_set_size as usize) / 3 + 1;
    let gpk = dkg_set::GroupPublicKey::reconstruct(&master_public_keys, threshold)?;

    let signature = shared_crypto::BlsSignature::from_bytes(
        signed_crs.as_slice().try_into().map_err(|_| GovernanceError::InvalidSignature)?,
    )
    .map_err(|_| GovernanceError::InvalidSignature)?;

    if !gpk.verify(&prev_crs.0, &signature) {
        return Err(GovernanceError::InvalidSignature);
    }

    let new_crs = Hash32::new(shared_crypto::keccak256(&signed_crs));
    let mut acc = state.accessors_mut();
    acc.push_crs(new_crs);
    drop(acc);

    let _ = ctx;
    Ok(CallOutcome::gas(0)
        .with_event(GovernanceEvent::CrsProposed { round: next_round, crs: new_crs }))
}

/// True when `id` belongs to the DKG set derived for `round`.
pub fn in_dkg_set<S: WordStore>(state: &mut GovernanceState<S>, round: u64, id: Hash32) -> bool {
    let acc = state.accessors_mut();
    let crs = acc.crs(round.min(acc.len_crs().saturating_sub(1)));
    let cfg = acc.configuration();
    let nodes = acc.qualified_nodes(cfg.min_stake);
    drop(acc);

    let target = dkg_set::set_target(crs);
    dkg_set::is_member(&nodes, target, cfg.dkg_set_size as usize, id)
}

/// True when `id` belongs to the notary set derived for `round`.
pub fn in_notary_set<S: WordStore>(state: &mut GovernanceState<S>, round: u64, id: Hash32) -> bool {
    let acc = state.accessors_mut();
    let crs = acc.crs(round.min(acc.len_crs().saturating_sub(1)));
    let cfg = acc.configuration();
    let nodes = acc.qualified_nodes(cfg.min_stake);
    drop(acc);

    let target = dkg_set::set_target(crs);
    dkg_set::is_member(&nodes, target, cfg.notary_set_size as usize, id)
}

/// Verifies a DKG artifact's signature against its submitter's
/// registered BLS public key, matching the original contract's
/// `VerifyDKGMasterPublicKeySignature`/`VerifyDKGMPKReadySignature`/
/// `VerifyDKGFinalizeSignature`/`VerifyDKGComplaintSignature` checks.
fn verify_dkg_signature<S: WordStore>(
    state: &mut GovernanceState<S>,
    proposer_id: Hash32,
    message: &[u8],
    signature: &[u8],
) -> Result<(), GovernanceError> {
    let node_offset = state
        .accessors_mut()
        .nodes_offset_by_id(proposer_id)
        .ok_or(GovernanceError::InvalidSignature)?;
    let node = state.accessors_mut().node(node_offset);

    let pk_bytes: [u8; 48] =
        node.public_key.as_ref().try_into().map_err(|_| GovernanceError::InvalidSignature)?;
    let public_key = shared_crypto::BlsPublicKey::from_bytes(&pk_bytes)
        .map_err(|_| GovernanceError::InvalidSignature)?;

    let sig_bytes: [u8; 96] = signature.try_into().map_err(|_| GovernanceError::InvalidSignature)?;
    let sig = shared_crypto::BlsSignature::from_bytes(&sig_bytes)
        .map_err(|_| GovernanceError::InvalidSignature)?;

    if !public_key.verify(message, &sig) {
        return Err(GovernanceError::InvalidSignature);
    }
    Ok(())
}

/// Canonical message a DKG-set member signs to attest readiness or
/// finalization for `round`, binding the signature to both the round and
/// the member's identity so it cannot be replayed for another round or
/// claimed by another member.
fn dkg_marker_message(round: u64, proposer_id: Hash32, tag: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(8 + 32 + tag.len());
    message.extend_from_slice(&round.to_be_bytes());
    message.extend_from_slice(&proposer_id.0);
    message.extend_from_slice(tag);
    message
}

/// Submits a master public key for the DKG round, reserved for members
/// of that round's DKG set, capped once 2f+1 of the set has submitted.
pub fn add_dkg_master_public_key<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    round: u64,
    proposer_id: Hash32,
    mpk: Vec<u8>,
    signature: Vec<u8>,
) -> HandlerResult {
    let acc = state.accessors_mut();
    let current_round = acc.round();
    drop(acc);
    if round > current_round.wrapping_add(1) {
        return Err(GovernanceError::MalformedPayload);
    }

    let offset = {
        let acc = state.accessors_mut();
        acc.nodes_offset_by_address(ctx.caller)
    };
    if offset.is_none() {
        return Err(GovernanceError::NodeNotFound);
    }

    let ready = {
        let acc = state.accessors_mut();
        acc.dkg_mpk_ready(round, ctx.caller)
    };
    if ready {
        return Err(GovernanceError::NotInDkgSet);
    }

    let cfg = { state.accessors_mut().configuration() };
    let threshold = 2 * (cfg.dkg_set_size as u64 / 3);
    let count = { state.accessors_mut().dkg_mpk_readys_count(round) };
    if count > threshold {
        return Err(GovernanceError::InsufficientDkgQuorum);
    }

    if !in_dkg_set(state, round, proposer_id) {
        return Err(GovernanceError::NotInDkgSet);
    }

    verify_dkg_signature(state, proposer_id, &mpk, &signature)?;

    let mut acc = state.accessors_mut();
    acc.push_dkg_master_public_key(round, &mpk);
    acc.put_dkg_master_public_key_by_node(round, proposer_id, &mpk);
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000))
}

/// Marks the caller as "MPK ready" for `round` once its master public
/// key submission has been accepted by the DKG set.
pub fn add_dkg_mpk_ready<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    round: u64,
    proposer_id: Hash32,
    signature: Vec<u8>,
) -> HandlerResult {
    let current_round = state.accessors_mut().round();
    if round != current_round {
        return Err(GovernanceError::InvalidRound { given: round, current: current_round });
    }
    if !in_dkg_set(state, round, proposer_id) {
        return Err(GovernanceError::NotInDkgSet);
    }

    verify_dkg_signature(state, proposer_id, &dkg_marker_message(round, proposer_id, b"mpk_ready"), &signature)?;

    let mut acc = state.accessors_mut();
    if !acc.dkg_mpk_ready(round, ctx.caller) {
        acc.put_dkg_mpk_ready(round, ctx.caller, true);
        acc.inc_dkg_mpk_readys_count(round);
    }
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000))
}

/// Marks the caller as finalized for `round`'s DKG.
pub fn add_dkg_finalize<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    round: u64,
    proposer_id: Hash32,
    signature: Vec<u8>,
) -> HandlerResult {
    let current_round = state.accessors_mut().round();
    if round != current_round {
        return Err(GovernanceError::InvalidRound { given: round, current: current_round });
    }
    if !in_dkg_set(state, round, proposer_id) {
        return Err(GovernanceError::NotInDkgSet);
    }

    verify_dkg_signature(state, proposer_id, &dkg_marker_message(round, proposer_id, b"finalize"), &signature)?;

    let mut acc = state.accessors_mut();
    if !acc.dkg_finalized(round, ctx.caller) {
        acc.put_dkg_finalized(round, ctx.caller, true);
        acc.inc_dkg_finalizeds_count(round);
    }
    drop(acc);

    use_gas(ctx, 100_000)?;
    Ok(CallOutcome::gas(100_000))
}

/// Checks whether `complaint_payload` demonstrates that `accused_mpk` is
/// an invalid private share. Full Feldman-VSS share verification is out
/// of scope for this crate; the complaint must still commit to the exact
/// master public key bytes it accuses (its first 32 bytes must equal
/// `keccak256(accused_mpk)`), so an arbitrary or misdirected payload
/// cannot get an uninvolved node fined.
fn complaint_proves_invalid_share(accused_mpk: &Bytes, complaint_payload: &[u8]) -> bool {
    let commitment = shared_crypto::keccak256(accused_mpk.as_ref());
    complaint_payload.len() >= 32 && complaint_payload[..32] == commitment
}

/// Submits a complaint against a DKG master public key's private share.
/// Reserved for DKG-set members; fines the offending proposer's node
/// once the complaint's signature checks out and it actually proves an
/// invalid share against the accused's submitted master public key.
pub fn add_dkg_complaint<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    round: u64,
    proposer_id: Hash32,
    fine_target_node_id: Hash32,
    complaint_payload: Vec<u8>,
    signature: Vec<u8>,
) -> HandlerResult {
    let current_round = state.accessors_mut().round();
    if round != current_round {
        return Err(GovernanceError::InvalidRound { given: round, current: current_round });
    }

    if state.accessors_mut().dkg_finalized(round, ctx.caller) {
        return Err(GovernanceError::NotInDkgSet);
    }

    let cfg = state.accessors_mut().configuration();
    let threshold = 2 * (cfg.dkg_set_size as u64 / 3);
    if state.accessors_mut().dkg_finalizeds_count(round) > threshold {
        return Err(GovernanceError::InvalidFineAmount);
    }

    if !in_dkg_set(state, round, proposer_id) {
        return Err(GovernanceError::NotInDkgSet);
    }

    verify_dkg_signature(state, proposer_id, &complaint_payload, &signature)?;

    let accused_mpk = state
        .accessors_mut()
        .dkg_master_public_key_by_node(round, fine_target_node_id)
        .ok_or(GovernanceError::NodeNotFound)?;

    if complaint_proves_invalid_share(&accused_mpk, &complaint_payload) {
        let fine_value = state.accessors_mut().fine_value(ReportType::InvalidDkg as u64);
        let node_offset = state
            .accessors_mut()
            .nodes_offset_by_id(fine_target_node_id)
            .ok_or(GovernanceError::NodeNotFound)?;
        let node = state.accessors_mut().node(node_offset);
        fine(state, node.owner, fine_value, vec![complaint_payload.clone()])
            .map_err(|_| GovernanceError::NotInDkgSet)?;
    }

    let mut acc = state.accessors_mut();
    acc.push_dkg_complaint(round, &complaint_payload);
    drop(acc);

    use_gas(ctx, 5_000_000)?;
    Ok(CallOutcome::gas(5_000_000))
}

/// The misbehavior categories a `report` call can target, matching the
/// original contract's `ReportType` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ReportType {
    InvalidDkg = 0,
    ForkVote = 1,
    ForkBlock = 2,
}

/// Reports proposer misbehavior (forked votes or forked blocks), fining
/// the reported node once the evidence has been verified by the caller
/// (the actual fork-proof check is a port the EVM-execution layer
/// supplies, since it requires decoding consensus vote/block payloads
/// this crate does not otherwise model).
pub fn report<S: WordStore>(
    state: &mut GovernanceState<S>,
    reported_node_id: Hash32,
    report_type: ReportType,
    evidence: (Vec<u8>, Vec<u8>),
) -> Result<(), GovernanceError> {
    let node_offset = state
        .accessors_mut()
        .nodes_offset_by_id(reported_node_id)
        .ok_or(GovernanceError::NodeNotFound)?;
    let node = state.accessors_mut().node(node_offset);
    let fine_value = state.accessors_mut().fine_value(report_type as u64);
    fine(state, node.owner, fine_value, vec![evidence.0, evidence.1])
}

/// Transfers contract ownership; only the current owner may call this.
pub fn transfer_ownership<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    new_owner: Address,
) -> Result<(), GovernanceError> {
    let mut acc = state.accessors_mut();
    if ctx.caller != acc.owner().0 {
        return Err(GovernanceError::NotOwner);
    }
    acc.set_owner(new_owner);
    Ok(())
}

/// Applies an owner-supplied configuration update wholesale.
pub fn update_configuration<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    cfg: crate::domain::Configuration,
) -> HandlerResult {
    let mut acc = state.accessors_mut();
    if ctx.caller != acc.owner().0 {
        return Err(GovernanceError::NotOwner);
    }
    acc.update_configuration(&cfg);
    drop(acc);
    Ok(CallOutcome::gas(0).with_event(GovernanceEvent::ConfigurationChanged))
}

/// Records the consensus height a DKG round began at. Only the block
/// proposer's call is cross-checked against the real round height; any
/// node may call this to push the next sequential round forward.
pub fn snapshot_round<S: WordStore>(
    state: &mut GovernanceState<S>,
    ctx: &CallContext,
    round: u64,
    height: U256,
    real_height: Option<u64>,
) -> Result<(), GovernanceError> {
    if ctx.is_block_proposer {
        let real_height = real_height.ok_or(GovernanceError::RoundHeightOutOfSequence)?;
        if height != U256::from(real_height) {
            return Err(GovernanceError::RoundHeightOutOfSequence);
        }
    }

    let mut acc = state.accessors_mut();
    let next_round = acc.len_round_height();
    if round != next_round {
        return Err(GovernanceError::RoundHeightOutOfSequence);
    }
    acc.push_round_height(height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Configuration;
    use crate::storage::InMemoryWordStore;
    use shared_crypto::BlsKeyPair;

    fn ctx(caller: Address) -> CallContext {
        CallContext { caller, value: U256::zero(), gas: u64::MAX, time: U256::zero(), is_block_proposer: false }
    }

    /// Stakes one node under a real BLS key and makes it the sole member
    /// of a size-1 DKG set, returning its id and key pair.
    fn staked_dkg_member(state: &mut GovernanceState<InMemoryWordStore>) -> (Hash32, BlsKeyPair) {
        let keypair = BlsKeyPair::generate();
        let addr = Address::new([7u8; 20]);
        stake(
            state,
            &ctx(addr),
            Bytes::from(keypair.public_key().to_bytes().to_vec()),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        )
        .unwrap();

        let mut acc = state.accessors_mut();
        acc.update_configuration(&Configuration { dkg_set_size: 1, min_stake: U256::zero(), ..Configuration::default() });
        drop(acc);

        let id = dkg_set::node_id(keypair.public_key().to_bytes().as_ref());
        (id, keypair)
    }

    #[test]
    fn test_in_notary_set_mirrors_in_dkg_set_derivation() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, _keypair) = staked_dkg_member(&mut state);

        let mut acc = state.accessors_mut();
        let mut cfg = acc.configuration();
        cfg.notary_set_size = 1;
        acc.update_configuration(&cfg);
        drop(acc);

        assert!(in_dkg_set(&mut state, 0, id));
        assert!(in_notary_set(&mut state, 0, id));
        assert!(!in_notary_set(&mut state, 0, Hash32::new([0xAAu8; 32])));
    }

    #[test]
    fn test_report_type_discriminants_match_original_ordering() {
        assert_eq!(ReportType::InvalidDkg as u64, 0);
        assert_eq!(ReportType::ForkVote as u64, 1);
        assert_eq!(ReportType::ForkBlock as u64, 2);
    }

    #[test]
    fn test_add_dkg_master_public_key_rejects_forged_signature() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, keypair) = staked_dkg_member(&mut state);
        let mpk = keypair.public_key().to_bytes().to_vec();

        let forger = BlsKeyPair::generate();
        let bad_signature = forger.sign(&mpk).to_bytes().to_vec();

        let result = add_dkg_master_public_key(&mut state, &ctx(Address::new([7u8; 20])), 0, id, mpk, bad_signature);
        assert_eq!(result, Err(GovernanceError::InvalidSignature));
    }

    #[test]
    fn test_add_dkg_master_public_key_accepts_valid_signature() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, keypair) = staked_dkg_member(&mut state);
        let mpk = keypair.public_key().to_bytes().to_vec();
        let signature = keypair.sign(&mpk).to_bytes().to_vec();

        let result = add_dkg_master_public_key(&mut state, &ctx(Address::new([7u8; 20])), 0, id, mpk, signature);
        assert!(result.is_ok());
    }

    #[test]
    fn test_add_dkg_mpk_ready_rejects_wrong_signature() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, _keypair) = staked_dkg_member(&mut state);
        let forger = BlsKeyPair::generate();
        let message = dkg_marker_message(0, id, b"mpk_ready");
        let bad_signature = forger.sign(&message).to_bytes().to_vec();

        let result = add_dkg_mpk_ready(&mut state, &ctx(Address::new([7u8; 20])), 0, id, bad_signature);
        assert_eq!(result, Err(GovernanceError::InvalidSignature));
    }

    #[test]
    fn test_add_dkg_finalize_accepts_valid_signature() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, keypair) = staked_dkg_member(&mut state);
        let message = dkg_marker_message(0, id, b"finalize");
        let signature = keypair.sign(&message).to_bytes().to_vec();

        let result = add_dkg_finalize(&mut state, &ctx(Address::new([7u8; 20])), 0, id, signature);
        assert!(result.is_ok());
    }

    #[test]
    fn test_add_dkg_complaint_does_not_fine_without_matching_commitment() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, keypair) = staked_dkg_member(&mut state);
        state.accessors_mut().set_fine_value(ReportType::InvalidDkg as u64, U256::from(1_000u64));

        let mpk = keypair.public_key().to_bytes().to_vec();
        let mpk_signature = keypair.sign(&mpk).to_bytes().to_vec();
        add_dkg_master_public_key(&mut state, &ctx(Address::new([7u8; 20])), 0, id, mpk, mpk_signature).unwrap();

        let complaint_payload = vec![0xaa; 40]; // does not commit to the accused's mpk
        let signature = keypair.sign(&complaint_payload).to_bytes().to_vec();
        let result =
            add_dkg_complaint(&mut state, &ctx(Address::new([7u8; 20])), 0, id, id, complaint_payload, signature);
        assert!(result.is_ok());

        let node_offset = state.accessors_mut().nodes_offset_by_id(id).unwrap();
        let node = state.accessors_mut().node(node_offset);
        assert_eq!(node.fined, U256::zero());
    }

    #[test]
    fn test_add_dkg_complaint_fines_when_commitment_matches() {
        let mut state = GovernanceState::new(InMemoryWordStore::default());
        let (id, keypair) = staked_dkg_member(&mut state);
        state.accessors_mut().set_fine_value(ReportType::InvalidDkg as u64, U256::from(1_000u64));

        let mpk = keypair.public_key().to_bytes().to_vec();
        let mpk_signature = keypair.sign(&mpk).to_bytes().to_vec();
        add_dkg_master_public_key(&mut state, &ctx(Address::new([7u8; 20])), 0, id, mpk.clone(), mpk_signature)
            .unwrap();

        let mut complaint_payload = shared_crypto::keccak256(&mpk).to_vec();
        complaint_payload.extend_from_slice(b"evidence");
        let signature = keypair.sign(&complaint_payload).to_bytes().to_vec();
        let result =
            add_dkg_complaint(&mut state, &ctx(Address::new([7u8; 20])), 0, id, id, complaint_payload, signature);
        assert!(result.is_ok());

        let node_offset = state.accessors_mut().nodes_offset_by_id(id).unwrap();
        let node = state.accessors_mut().node(node_offset);
        assert_eq!(node.fined, U256::from(1_000u64));
    }
}
