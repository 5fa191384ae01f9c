use crate::proposal::ProposalState;
use hdao_crypto::SignatureError;
use hdao_types::{Address, Amount, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error(
        "action list shape mismatch: {targets} targets, {values} values, {calldatas} calldatas"
    )]
    LengthMismatch {
        targets: usize,
        values: usize,
        calldatas: usize,
    },

    #[error("proposal must contain at least one action")]
    EmptyActionList,

    #[error("invalid stakeholder set: {0}")]
    InvalidStakeholders(String),

    #[error("invalid governance parameters: {0}")]
    InvalidParams(String),

    #[error("proposer weight {have} is below the proposal threshold {need}")]
    BelowProposalThreshold { have: Amount, need: Amount },

    #[error("{0} is not a stakeholder of this instance")]
    UnknownVoter(Address),

    #[error("{voter} has already voted on proposal {proposal}")]
    DuplicateVote { proposal: ProposalId, voter: Address },

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("proposal {proposal} is {state} and does not accept votes")]
    ProposalNotActive {
        proposal: ProposalId,
        state: ProposalState,
    },

    #[error("proposal {0} has not passed")]
    NotYetPassed(ProposalId),

    #[error("threshold not met: {have} < {need}")]
    ThresholdNotMet { have: Amount, need: Amount },

    #[error("accumulated weight overflow on proposal {0}")]
    WeightOverflow(ProposalId),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("vote {index} in batch rejected: {source}")]
    BatchVoteFailed {
        index: usize,
        source: Box<GovernanceError>,
    },

    #[error("action {index} failed: {reason}")]
    Dispatch { index: usize, reason: String },

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Error taxonomy shared by every governance operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; a caller bug. Rejected before any state change.
    Validation,
    /// The caller (or signer) lacks standing.
    Authorization,
    /// The operation was already satisfied.
    Replay,
    /// Not enough accumulated weight yet; retryable once more votes arrive.
    Threshold,
    /// A dispatched action failed; the execution was rolled back.
    Dispatch,
    /// Unknown proposal.
    NotFound,
    /// The proposal's lifecycle state forbids the operation.
    State,
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch { .. }
            | Self::EmptyActionList
            | Self::InvalidStakeholders(_)
            | Self::InvalidParams(_)
            | Self::WeightOverflow(_)
            | Self::Snapshot(_)
            | Self::Signature(SignatureError::InvalidSignatureLength { .. }) => {
                ErrorKind::Validation
            }
            Self::BelowProposalThreshold { .. }
            | Self::UnknownVoter(_)
            | Self::Signature(SignatureError::SignatureRecoveryFailed { .. }) => {
                ErrorKind::Authorization
            }
            Self::DuplicateVote { .. } | Self::AlreadyExecuted(_) => ErrorKind::Replay,
            Self::ThresholdNotMet { .. } | Self::NotYetPassed(_) => ErrorKind::Threshold,
            Self::Dispatch { .. } => ErrorKind::Dispatch,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ProposalNotActive { .. } => ErrorKind::State,
            Self::BatchVoteFailed { source, .. } => source.kind(),
        }
    }

    /// Whether resubmitting the same call can succeed later without the
    /// caller changing its input.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Threshold | ErrorKind::Dispatch)
    }
}
