//! Governance contract error taxonomy.
//!
//! Mirrors the gas-accounting split the original contract makes between a
//! plain revert (remaining gas refunded) and a penalty (all remaining gas
//! consumed, reserved for provable misbehavior).

use thiserror::Error;

/// Every way a governance method call can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// A bounded text field (name/email/location/url) exceeded its limit.
    #[error("text field too long: max_len={max_len}, actual_len={actual_len}")]
    TextTooLong { max_len: usize, actual_len: usize },

    /// Caller is not staked / has no node registered.
    #[error("caller has no registered node")]
    NodeNotFound,

    /// `stake` called by an address that already has a node.
    #[error("node already registered for this address")]
    NodeAlreadyRegistered,

    /// Delegation/undelegation target has no delegator record.
    #[error("no delegator record for this caller")]
    DelegatorNotFound,

    /// `delegate` called twice by the same address against the same node.
    #[error("caller has already delegated to this node")]
    DelegatorAlreadyExists,

    /// `delegate` called with zero value attached.
    #[error("delegation requires a non-zero value")]
    ZeroValueDelegation,

    /// `withdraw` called before `undelegate`.
    #[error("delegator has not undelegated yet")]
    NotYetUndelegated,

    /// `withdraw` called before the lockup period elapsed.
    #[error("lockup period has not elapsed")]
    LockupNotElapsed,

    /// `undelegate`/`unstake`/`payFine` against a node that is currently fined.
    #[error("node has an outstanding fine")]
    NodeIsFined,

    /// `payFine` with an amount that does not match an outstanding fine.
    #[error("fine amount does not match outstanding balance")]
    InvalidFineAmount,

    /// A privileged method was called by a non-owner address.
    #[error("caller is not the contract owner")]
    NotOwner,

    /// `proposeCRS`/`addDKG*` referenced a round that is not current (or,
    /// for master-public-key submission, not current-or-next).
    #[error("round {given} is not valid (current is {current})")]
    InvalidRound { given: u64, current: u64 },

    /// `addDKG*` caller is not a member of the DKG set for the round.
    #[error("caller is not a member of the DKG set for this round")]
    NotInDkgSet,

    /// RLP-encoded DKG payload failed to decode.
    #[error("malformed DKG payload")]
    MalformedPayload,

    /// A BLS/ECDSA signature failed verification.
    #[error("signature verification failed")]
    InvalidSignature,

    /// `proposeCRS` submitted before 2f+1 of the DKG set finalized.
    #[error("insufficient DKG quorum to reconstruct group public key")]
    InsufficientDkgQuorum,

    /// `snapshotRound` referenced a round other than the next expected one.
    #[error("round height already snapshotted or out of sequence")]
    RoundHeightOutOfSequence,

    /// A misbehavior report failed re-verification against the submitted payload.
    #[error("report payload does not demonstrate punishable misbehavior")]
    UnsubstantiatedReport,

    /// The same misbehavior payload was already fined once.
    #[error("this misbehavior payload has already been fined")]
    AlreadyFined,

    /// Value transfer between accounts failed (insufficient balance).
    #[error("value transfer failed")]
    TransferFailed,

    /// Caller attempted to spend more gas than was supplied with the call.
    #[error("out of gas")]
    OutOfGas,

    /// Storage codec read a malformed encoding (corrupt word layout).
    #[error("storage codec error: {0}")]
    Storage(String),
}

impl GovernanceError {
    /// A plain revert unwinds the call but refunds any gas the caller did
    /// not spend. This is the default outcome for "this call cannot
    /// proceed" conditions that are not themselves evidence of misbehavior.
    #[must_use]
    pub fn is_plain_revert(&self) -> bool {
        !self.consumes_all_gas()
    }

    /// A penalize outcome consumes every unit of gas the caller supplied,
    /// in addition to reverting state changes. Reserved for conditions the
    /// original contract treats as proof of misbehavior: malformed
    /// payloads, bad signatures, non-members submitting DKG artifacts, or
    /// out-of-bound field lengths.
    #[must_use]
    pub fn consumes_all_gas(&self) -> bool {
        matches!(
            self,
            GovernanceError::TextTooLong { .. }
                | GovernanceError::NotInDkgSet
                | GovernanceError::MalformedPayload
                | GovernanceError::InvalidSignature
                | GovernanceError::UnsubstantiatedReport
                | GovernanceError::NotYetUndelegated
                | GovernanceError::LockupNotElapsed
        )
    }
}
