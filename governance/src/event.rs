//! Observations emitted by the engine for external indexing.

use hdao_types::{Address, Amount, Hash256, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// How a vote reached the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChannel {
    /// Submitted by the stakeholder itself.
    Direct,
    /// Relayed as an off-chain signature.
    Signature,
}

/// Events queued by the engine. Hosts drain them with
/// [`GovernanceEngine::drain_events`](crate::GovernanceEngine::drain_events).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        proposal: ProposalId,
        proposer: Address,
        description_hash: Hash256,
        action_count: usize,
        vote_start: Timestamp,
        vote_end: Timestamp,
    },
    VoteCast {
        proposal: ProposalId,
        voter: Address,
        weight: Amount,
        channel: VoteChannel,
        total_weight: Amount,
    },
    ProposalExecuted {
        proposal: ProposalId,
        total_weight: Amount,
    },
}
